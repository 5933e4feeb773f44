//! State engine for a team dashboard: projects, three-column task boards,
//! progress tracking and the archive of completed projects.

pub mod models;
pub mod services;
pub mod storage;
