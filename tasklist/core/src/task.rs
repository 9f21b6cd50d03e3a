use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque identifier assigned to a task by the store when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct TaskId(Uuid);

impl TaskId {
    /// Parses an identifier received from a client.
    /// Returns `None` for anything that is not a well-formed id, which callers
    /// treat the same as an id that does not exist.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for TaskId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
}

impl Task {
    pub fn new(id: TaskId, text: String, completed: bool) -> Self {
        Self {
            id,
            text,
            completed,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskTextError {
    #[error("Task text must not be empty")]
    Empty,
}

/// Task text that has been trimmed and checked to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskText(String);

impl TaskText {
    /// Trims the raw input and rejects it if nothing is left.
    pub fn parse(raw: &str) -> Result<Self, TaskTextError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskTextError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TaskText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Predicate over `Task::completed` used to narrow a task listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TaskFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown task filter '{0}'")]
pub struct UnknownFilter(pub String);

impl TaskFilter {
    /// Every filter, in the order they are offered to users.
    pub const ALL: [TaskFilter; 3] = [
        TaskFilter::All,
        TaskFilter::Completed,
        TaskFilter::Incomplete,
    ];

    /// Interprets the `filter` query parameter of a listing request.
    /// A missing or unrecognised value lists everything.
    pub fn from_query(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    /// The value `completed` must have for a task to pass, or `None` when every task passes.
    pub fn completed(&self) -> Option<bool> {
        match self {
            TaskFilter::All => None,
            TaskFilter::Completed => Some(true),
            TaskFilter::Incomplete => Some(false),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.completed()
            .is_none_or(|completed| task.completed == completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Completed => "completed",
            TaskFilter::Incomplete => "incomplete",
        }
    }

    /// Human readable label for filter pickers.
    pub fn label(&self) -> &'static str {
        match self {
            TaskFilter::All => "All",
            TaskFilter::Completed => "Completed",
            TaskFilter::Incomplete => "Incomplete",
        }
    }
}

impl FromStr for TaskFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "completed" => Ok(TaskFilter::Completed),
            "incomplete" => Ok(TaskFilter::Incomplete),
            _ => Err(UnknownFilter(s.to_string())),
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of tasks still waiting to be completed.
pub fn pending_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|task| !task.completed).count()
}
