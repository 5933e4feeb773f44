use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    board::{BoardSummary, progress_percentage},
    member::Member,
    task::deadline_within,
};

/// Days ahead of a project deadline at which it is flagged as approaching.
pub const PROJECT_DEADLINE_WARNING_DAYS: i32 = 7;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// UUID of the project
    pub id: Uuid,
    /// Title of the project, never blank
    pub title: String,
    /// Description of the project
    #[serde(default)]
    pub description: String,
    /// Tags of the project
    #[serde(default)]
    pub tags: Vec<String>,
    /// Deadline of the project
    #[serde(default)]
    pub deadline: Option<Date>,
    // Cached from the project's board, rewritten after every board mutation.
    #[serde(default)]
    task_count: usize,
    #[serde(default)]
    completed_tasks: usize,
    /// Member who created the project
    pub manager: Member,
    /// Members of the project, the manager first
    #[serde(default)]
    pub members: Vec<Member>,
    /// Created at timestamp of the project
    pub created_at: Timestamp,
    /// Bumped on every task or membership change
    pub updated_at: Timestamp,
}

impl Project {
    pub(crate) fn new(
        title: String,
        description: String,
        tags: Vec<String>,
        deadline: Option<Date>,
        now: Timestamp,
    ) -> Self {
        let manager = Member::current_user();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            tags,
            deadline,
            task_count: 0,
            completed_tasks: 0,
            members: vec![manager.clone()],
            manager,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn task_count(&self) -> usize {
        self.task_count
    }

    pub fn completed_tasks(&self) -> usize {
        self.completed_tasks
    }

    /// Progress as recorded by the last board mutation.
    pub fn progress(&self) -> u8 {
        progress_percentage(self.completed_tasks, self.task_count)
    }

    pub fn is_deadline_approaching(&self, today: Date) -> bool {
        deadline_within(self.deadline, today, PROJECT_DEADLINE_WARNING_DAYS)
    }

    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == member_id)
    }

    pub(crate) fn apply_summary(&mut self, summary: &BoardSummary) {
        self.task_count = summary.total_tasks;
        self.completed_tasks = summary.completed_tasks;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::member::CURRENT_USER_ID;
    use jiff::civil::date;

    fn project() -> Project {
        Project::new(
            String::from("Launch"),
            String::new(),
            vec![],
            None,
            Timestamp::now(),
        )
    }

    #[test]
    fn test_new_project_starts_empty_with_creator() {
        let project = project();

        assert_eq!(project.task_count(), 0);
        assert_eq!(project.completed_tasks(), 0);
        assert_eq!(project.progress(), 0);
        assert_eq!(project.members.len(), 1);
        assert_eq!(project.members[0].id, CURRENT_USER_ID);
        assert_eq!(project.manager, project.members[0]);
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn test_apply_summary_updates_counters() {
        let mut project = project();
        project.apply_summary(&BoardSummary {
            total_tasks: 4,
            completed_tasks: 1,
            progress_percentage: 25,
        });

        assert_eq!(project.task_count(), 4);
        assert_eq!(project.completed_tasks(), 1);
        assert_eq!(project.progress(), 25);
    }

    #[test]
    fn test_deadline_approaching_uses_week_window() {
        let today = date(2026, 5, 1);
        let mut project = project();
        assert!(!project.is_deadline_approaching(today));

        project.deadline = Some(date(2026, 5, 8));
        assert!(project.is_deadline_approaching(today));

        project.deadline = Some(date(2026, 5, 9));
        assert!(!project.is_deadline_approaching(today));
    }

    #[test]
    fn test_serializes_counters_in_camel_case() {
        let value = serde_json::to_value(project()).unwrap();

        assert_eq!(value["taskCount"], 0);
        assert_eq!(value["completedTasks"], 0);
        assert!(value.get("createdAt").is_some());
    }
}
