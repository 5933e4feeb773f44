pub mod board;
pub mod completed;
pub mod member;
pub mod project;
pub mod store;
pub mod task;
