use std::collections::{BTreeMap, HashSet};

use jiff::Timestamp;
use uuid::Uuid;

use crate::models::{board::Board, completed::CompletedProject, project::Project};

/// In-memory state of the dashboard.
///
/// Readers get shared references only. Every write goes through the crate's
/// service functions, which keep each project's counters in step with its board.
#[derive(Debug, Default, Clone)]
pub struct Store {
    projects: Vec<Project>,
    boards: BTreeMap<Uuid, Board>,
    completed: Vec<CompletedProject>,
    /// Set while the archive holds records that storage has not accepted yet
    completed_unsaved: bool,
}

impl Store {
    /// Assembles a store from persisted parts.
    ///
    /// Repeated project ids and repeated task ids are dropped (first one wins),
    /// missing boards become empty boards and cached counters are recomputed.
    pub(crate) fn from_parts(
        projects: Vec<Project>,
        mut boards: BTreeMap<Uuid, Board>,
        completed: Vec<CompletedProject>,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut store = Store::default();

        for mut project in projects {
            if !seen.insert(project.id) {
                tracing::warn!(project_id = %project.id, "dropping duplicate persisted project");
                continue;
            }
            let mut board = boards.remove(&project.id).unwrap_or_default();
            let dropped = board.dedupe();
            if dropped > 0 {
                tracing::warn!(project_id = %project.id, dropped, "dropping duplicate persisted tasks");
            }
            project.apply_summary(&board.aggregate());
            store.boards.insert(project.id, board);
            store.projects.push(project);
        }

        let mut archived = HashSet::new();
        store.completed = completed
            .into_iter()
            .filter(|record| {
                let first = archived.insert(record.project.id);
                if !first {
                    tracing::warn!(project_id = %record.project.id, "dropping duplicate archive record");
                }
                first
            })
            .collect();

        store
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, project_id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn board(&self, project_id: Uuid) -> Option<&Board> {
        self.boards.get(&project_id)
    }

    /// Completion percentage computed from the project's board.
    pub fn progress(&self, project_id: Uuid) -> Option<u8> {
        self.board(project_id)
            .map(|board| board.aggregate().progress_percentage)
    }

    /// Archive records in insertion order.
    pub fn completed(&self) -> &[CompletedProject] {
        &self.completed
    }

    pub fn is_archived(&self, project_id: Uuid) -> bool {
        self.completed.iter().any(|r| r.project.id == project_id)
    }

    pub(crate) fn add_project(&mut self, project: Project) {
        self.boards.insert(project.id, Board::default());
        self.projects.push(project);
    }

    pub(crate) fn project_mut(&mut self, project_id: Uuid) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == project_id)
    }

    pub(crate) fn remove_project(&mut self, project_id: Uuid) -> Option<Project> {
        let position = self.projects.iter().position(|p| p.id == project_id)?;
        self.boards.remove(&project_id);
        Some(self.projects.remove(position))
    }

    /// Runs `edit` against a project's board.
    ///
    /// When `edit` returns `Some`, the board changed: the project's counters are
    /// recomputed and `updated_at` is set to `now`. `None` leaves the project as is.
    pub(crate) fn edit_board<R>(
        &mut self,
        project_id: Uuid,
        now: Timestamp,
        edit: impl FnOnce(&mut Board) -> Option<R>,
    ) -> Option<R> {
        let board = self.boards.get_mut(&project_id)?;
        let result = edit(board)?;
        let summary = board.aggregate();

        if let Some(project) = self.projects.iter_mut().find(|p| p.id == project_id) {
            project.apply_summary(&summary);
            project.updated_at = now;
        }
        Some(result)
    }

    pub(crate) fn push_completed(&mut self, record: CompletedProject) {
        self.completed.push(record);
        self.completed_unsaved = true;
    }

    pub(crate) fn has_unsaved_completed(&self) -> bool {
        self.completed_unsaved
    }

    pub(crate) fn mark_completed_saved(&mut self) {
        self.completed_unsaved = false;
    }
}
