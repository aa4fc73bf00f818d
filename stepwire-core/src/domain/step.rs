//! Job step domain types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Step identifier within a job
///
/// `StepId::ALL` is the controller's reserved "no value" marker and asks for
/// every step of the job. The client never interprets it, it is sent as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(pub u32);

impl StepId {
    /// Sentinel meaning "all steps of this job"
    pub const ALL: StepId = StepId(0xFFFF_FFFE);

    /// Raw value as carried on the wire
    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn is_all(self) -> bool {
        self == Self::ALL
    }
}

impl From<u32> for StepId {
    fn from(value: u32) -> Self {
        StepId(value)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters of one job step query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStepQuery {
    pub job_id: u32,
    pub step_id: StepId,
}

impl JobStepQuery {
    /// Query every step of `job_id`
    pub fn all_steps(job_id: u32) -> Self {
        Self {
            job_id,
            step_id: StepId::ALL,
        }
    }

    /// Query a single step
    pub fn single(job_id: u32, step_id: u32) -> Self {
        Self {
            job_id,
            step_id: StepId(step_id),
        }
    }
}

/// State of one job step as reported by the controller
///
/// Timestamps are UNIX seconds, exactly as carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStepRecord {
    pub job_id: u32,
    pub step_id: u32,
    pub user_id: u32,
    pub start_time: i64,
    pub partition: String,
    pub nodes: String,
}

impl JobStepRecord {
    /// Start time as a UTC timestamp, if representable
    pub fn start_time_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.start_time, 0)
    }
}

/// Job steps returned by a single successful query
///
/// Record order is the controller's order and is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStepCollection {
    pub last_update: i64,
    pub job_steps: Vec<JobStepRecord>,
}

impl JobStepCollection {
    pub fn new(last_update: i64, job_steps: Vec<JobStepRecord>) -> Self {
        Self {
            last_update,
            job_steps,
        }
    }

    /// Zero-record collection
    ///
    /// Produced when the controller answers with a success return code and no
    /// job step payload. Such a reply cannot be told apart from an empty
    /// result set, so both are reported as zero records.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.job_steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.job_steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JobStepRecord> {
        self.job_steps.iter()
    }

    pub fn last_update_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.last_update, 0)
    }
}

impl IntoIterator for JobStepCollection {
    type Item = JobStepRecord;
    type IntoIter = std::vec::IntoIter<JobStepRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.job_steps.into_iter()
    }
}
