//! Plain-text job step report
//!
//! The layout is consumed by existing tooling and must stay byte-for-byte
//! stable:
//!
//! ```text
//! Job steps updated at <last_update>, record count <N>
//! JobId=<job_id> StepId=<step_id> UserId=<user_id> StartTime=<start_time> Partition=<partition> Nodes=<nodes>
//!
//! ```

use std::fmt;
use std::io;

use thiserror::Error;

use crate::domain::step::{JobStepCollection, JobStepRecord};

/// Write the header line followed by one block per record
pub fn write_collection<W: io::Write>(
    out: &mut W,
    collection: &JobStepCollection,
) -> io::Result<()> {
    write!(out, "{}", CollectionReport(collection))
}

/// Write a single record block, including its trailing blank line
pub fn write_record<W: io::Write>(out: &mut W, record: &JobStepRecord) -> io::Result<()> {
    write!(out, "{}", RecordReport(record))
}

pub fn format_collection(collection: &JobStepCollection) -> String {
    CollectionReport(collection).to_string()
}

/// Report rendering of a whole collection
pub struct CollectionReport<'a>(pub &'a JobStepCollection);

impl fmt::Display for CollectionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let collection = self.0;
        writeln!(
            f,
            "Job steps updated at {}, record count {}",
            collection.last_update,
            collection.len()
        )?;
        for record in collection.iter() {
            write!(f, "{}", RecordReport(record))?;
        }
        Ok(())
    }
}

/// Report rendering of one record block
pub struct RecordReport<'a>(pub &'a JobStepRecord);

impl fmt::Display for RecordReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        write!(
            f,
            "JobId={} StepId={} UserId={} ",
            record.job_id, record.step_id, record.user_id
        )?;
        write!(
            f,
            "StartTime={} Partition={} Nodes={}\n\n",
            record.start_time, record.partition, record.nodes
        )
    }
}

/// Errors raised while reading a report back
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportParseError {
    #[error("report is empty")]
    Empty,

    #[error("malformed header line: {0}")]
    Header(String),

    #[error("malformed record line {line}: {reason}")]
    Record { line: usize, reason: String },

    #[error("header announces {announced} records but {found} were found")]
    CountMismatch { announced: usize, found: usize },
}

/// Contents recovered from a rendered report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub last_update: i64,
    pub record_count: usize,
    pub records: Vec<JobStepRecord>,
}

/// Parse a report produced by [`write_collection`]
pub fn parse_summary(text: &str) -> Result<ReportSummary, ReportParseError> {
    let mut lines = text.lines().enumerate();
    let (_, header) = lines.next().ok_or(ReportParseError::Empty)?;
    let (last_update, record_count) = parse_header(header)?;

    let mut records = Vec::with_capacity(record_count);
    for (index, line) in lines {
        if line.is_empty() {
            continue;
        }
        let record = parse_record(line).map_err(|reason| ReportParseError::Record {
            line: index + 1,
            reason,
        })?;
        records.push(record);
    }

    if records.len() != record_count {
        return Err(ReportParseError::CountMismatch {
            announced: record_count,
            found: records.len(),
        });
    }

    Ok(ReportSummary {
        last_update,
        record_count,
        records,
    })
}

fn parse_header(line: &str) -> Result<(i64, usize), ReportParseError> {
    let malformed = || ReportParseError::Header(line.to_string());
    let rest = line
        .strip_prefix("Job steps updated at ")
        .ok_or_else(malformed)?;
    let (last_update, count) = rest.split_once(", record count ").ok_or_else(malformed)?;
    Ok((
        last_update.parse().map_err(|_| malformed())?,
        count.parse().map_err(|_| malformed())?,
    ))
}

// Partition and nodes are free text, so they are split off from the right
// at their key and only the numeric prefix is split on spaces.
fn parse_record(line: &str) -> Result<JobStepRecord, String> {
    let (rest, nodes) = line
        .rsplit_once(" Nodes=")
        .ok_or_else(|| "missing Nodes".to_string())?;
    let (rest, partition) = rest
        .rsplit_once(" Partition=")
        .ok_or_else(|| "missing Partition".to_string())?;

    let mut fields = rest.split(' ');
    let job_id = field(&mut fields, "JobId")?;
    let step_id = field(&mut fields, "StepId")?;
    let user_id = field(&mut fields, "UserId")?;
    let start_time = field(&mut fields, "StartTime")?;
    if let Some(extra) = fields.next() {
        return Err(format!("unexpected field '{}'", extra));
    }

    Ok(JobStepRecord {
        job_id: job_id.parse().map_err(|e| format!("JobId: {}", e))?,
        step_id: step_id.parse().map_err(|e| format!("StepId: {}", e))?,
        user_id: user_id.parse().map_err(|e| format!("UserId: {}", e))?,
        start_time: start_time
            .parse()
            .map_err(|e| format!("StartTime: {}", e))?,
        partition: partition.to_string(),
        nodes: nodes.to_string(),
    })
}

fn field<'a>(fields: &mut std::str::Split<'a, char>, key: &str) -> Result<&'a str, String> {
    let field = fields.next().ok_or_else(|| format!("missing {}", key))?;
    field
        .strip_prefix(key)
        .and_then(|f| f.strip_prefix('='))
        .ok_or_else(|| format!("expected {}=, found '{}'", key, field))
}
