//! Core domain models for Tasklist, shared by the API server and the web client.
pub mod edit;
pub mod task;

pub use edit::{EditKey, EditOutcome, InlineEdit};
pub use task::{Task, TaskFilter, TaskId, TaskText, TaskTextError, UnknownFilter, pending_count};
