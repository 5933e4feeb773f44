use std::{fmt, str::FromStr};

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::member::Member;

/// Days ahead of a task deadline at which it is shown as approaching.
pub const TASK_DEADLINE_WARNING_DAYS: i32 = 3;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// UUID to identify the task, unique across the whole board
    pub id: Uuid,
    /// Title of the task
    pub title: String,
    /// Free text description
    #[serde(default)]
    pub description: String,
    /// Tags of the task
    #[serde(default)]
    pub tags: Vec<String>,
    /// Member the task is assigned to
    pub assignee: Member,
    #[serde(default)]
    pub priority: Priority,
    /// Deadline for this task
    #[serde(default)]
    pub deadline: Option<Date>,
    /// When the task was created
    pub created_at: Timestamp,
}

impl Task {
    pub fn is_deadline_approaching(&self, today: Date) -> bool {
        deadline_within(self.deadline, today, TASK_DEADLINE_WARNING_DAYS)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Error)]
#[error("Unknown priority '{0}', expected one of: low, medium, high")]
pub struct ParsePriorityError(String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        f.write_str(name)
    }
}

/// Splits a comma separated input into trimmed, non-empty tags.
///
/// Repeated tags are dropped, keeping the position of the first occurrence.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// True when `deadline` falls between today and `days` days from now, inclusive.
pub(crate) fn deadline_within(deadline: Option<Date>, today: Date, days: i32) -> bool {
    let Some(deadline) = deadline else {
        return false;
    };
    match today.until(deadline) {
        Ok(span) => {
            let remaining = span.get_days();
            (0..=days).contains(&remaining)
        }
        Err(_) => false,
    }
}
