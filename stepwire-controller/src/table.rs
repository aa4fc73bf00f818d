//! Job step table
//!
//! In-memory, ordered job step state served by the controller.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use stepwire_core::domain::step::{JobStepCollection, JobStepRecord, StepId};

/// Job steps known to the controller, in insertion order
#[derive(Debug, Clone, Default)]
pub struct StepTable {
    last_update: i64,
    steps: Vec<JobStepRecord>,
}

impl StepTable {
    pub fn new(steps: Vec<JobStepRecord>) -> Self {
        Self {
            last_update: Utc::now().timestamp(),
            steps,
        }
    }

    /// Load a JSON array of job step records
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let steps: Vec<JobStepRecord> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Self::new(steps))
    }

    pub fn last_update(&self) -> i64 {
        self.last_update
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps of `job_id` matching `step_id`, in table order
    ///
    /// `StepId::ALL` selects every step of the job.
    pub fn lookup(&self, job_id: u32, step_id: StepId) -> JobStepCollection {
        let job_steps = self
            .steps
            .iter()
            .filter(|s| s.job_id == job_id)
            .filter(|s| step_id.is_all() || s.step_id == step_id.as_u32())
            .cloned()
            .collect();

        JobStepCollection::new(self.last_update, job_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(job_id: u32, step_id: u32) -> JobStepRecord {
        JobStepRecord {
            job_id,
            step_id,
            user_id: 1001,
            start_time: 0,
            partition: "part1".to_string(),
            nodes: format!("node{}", step_id),
        }
    }

    #[test]
    fn test_lookup_all_steps_keeps_order() {
        let table = StepTable::new(vec![record(100, 1), record(200, 0), record(100, 0)]);
        let found = table.lookup(100, StepId::ALL);

        let steps: Vec<u32> = found.iter().map(|s| s.step_id).collect();
        assert_eq!(steps, vec![1, 0]);
        assert_eq!(found.last_update, table.last_update());
    }

    #[test]
    fn test_lookup_single_step() {
        let table = StepTable::new(vec![record(100, 0), record(100, 1)]);
        let found = table.lookup(100, StepId(1));
        assert_eq!(found.len(), 1);
        assert_eq!(found.job_steps[0].nodes, "node1");
    }

    #[test]
    fn test_lookup_unknown_job_is_empty() {
        let table = StepTable::new(vec![record(100, 0)]);
        assert!(table.lookup(7, StepId::ALL).is_empty());
    }

    #[test]
    fn test_new_table_is_stamped() {
        assert!(StepTable::default().is_empty());

        let table = StepTable::new(vec![record(1, 0)]);
        assert_eq!(table.len(), 1);
        assert!(table.last_update() > 0);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("stepwire-table-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&vec![record(5, 0)]).unwrap()).unwrap();

        let table = StepTable::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(table.lookup(5, StepId::ALL).len(), 1);
    }
}
