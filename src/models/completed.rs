use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::models::project::Project;

/// Snapshot of a project taken the first time all of its tasks were done.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletedProject {
    #[serde(flatten)]
    pub project: Project,
    /// Missing on records written before completion times were tracked
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
    pub progress: u8,
}

impl CompletedProject {
    pub fn new(project: Project, completed_at: Timestamp) -> Self {
        Self {
            project,
            completed_at: Some(completed_at),
            progress: 100,
        }
    }

    /// Completion time, falling back to the snapshot's last update.
    pub fn sort_key(&self) -> Timestamp {
        self.completed_at.unwrap_or(self.project.updated_at)
    }

    /// Whole days from creation to completion, rounded up. `None` without a completion time.
    pub fn duration_days(&self) -> Option<i64> {
        let completed_at = self.completed_at?;
        let elapsed = completed_at.duration_since(self.project.created_at);
        Some((elapsed.as_secs_f64() / SECONDS_PER_DAY).ceil() as i64)
    }
}

const SECONDS_PER_DAY: f64 = 86_400.0;
