//! Client-side state for the task board.
//!
//! The filter choice lives in LocalStorage so it survives reloads; the task
//! lists are resources re-fetched from the server after every change.

use crate::api::{ApiError, TaskApi};
use dioxus::prelude::*;
use gloo_storage::{LocalStorage, Storage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tasklist_core::{pending_count, Task, TaskFilter};

const FILTER_STORAGE_KEY: &str = "selectedFilter";

/// Hook for the persisted filter selection. Falls back to showing every task.
pub fn use_filter_preference() -> UsePersistent<TaskFilter> {
    use_persistent(FILTER_STORAGE_KEY, TaskFilter::default)
}

/// A persistent storage hook that can be used to store data across application reloads.
///
/// Contract:
/// - key: unique storage key
/// - init: supplier to construct value if no stored value
/// - persists immediately on set
pub fn use_persistent<T: Serialize + DeserializeOwned + 'static>(
    key: impl ToString,
    init: impl FnOnce() -> T,
) -> UsePersistent<T> {
    let state = use_signal(move || {
        let key = key.to_string();
        let value = LocalStorage::get(key.as_str()).ok().unwrap_or_else(init);
        StorageEntry { key, value }
    });
    UsePersistent { inner: state }
}

#[derive(Debug)]
struct StorageEntry<T> {
    key: String,
    value: T,
}

/// Storage that persists across application reloads.
pub struct UsePersistent<T: 'static> {
    inner: Signal<StorageEntry<T>>,
}

impl<T: 'static> Clone for UsePersistent<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for UsePersistent<T> {}

impl<T: Serialize + DeserializeOwned + Clone + 'static> UsePersistent<T> {
    /// Gets a cloned value snapshot.
    pub fn get(&self) -> T {
        self.inner.read().value.clone()
    }

    /// Replaces the stored value and persists.
    pub fn set(&mut self, value: T) {
        let mut inner = self.inner.write();
        if let Err(e) = LocalStorage::set(inner.key.as_str(), &value) {
            tracing::warn!("Could not persist {}: {}", inner.key, e);
        }
        inner.value = value;
    }
}

/// The tasks shown under the current filter, plus the unfiltered list that
/// feeds the pending counter and the clear-all button.
#[derive(Clone, Copy)]
pub struct TaskBoard {
    pub listed: Resource<Result<Vec<Task>, ApiError>>,
    pub everything: Resource<Result<Vec<Task>, ApiError>>,
}

impl TaskBoard {
    /// Re-fetches both lists from the server.
    pub fn refresh(&mut self) {
        self.listed.restart();
        self.everything.restart();
    }

    /// Number of incomplete tasks, once the unfiltered list has loaded.
    pub fn pending_count(&self) -> Option<usize> {
        match &*self.everything.read() {
            Some(Ok(tasks)) => Some(pending_count(tasks)),
            _ => None,
        }
    }

    /// Whether clear-all should be offered: only once a listing has loaded and is non-empty.
    pub fn has_tasks(&self) -> bool {
        any_loaded(&self.everything.read())
    }
}

fn any_loaded(listing: &Option<Result<Vec<Task>, ApiError>>) -> bool {
    matches!(listing, Some(Ok(tasks)) if !tasks.is_empty())
}

/// Creates the board resources and shares them with every component below.
pub fn use_task_board(api: TaskApi, filter: UsePersistent<TaskFilter>) -> TaskBoard {
    let listed_api = api.clone();
    let listed = use_resource(move || {
        let api = listed_api.clone();
        let filter = filter.get();
        async move { api.list(filter).await }
    });
    let everything = use_resource(move || {
        let api = api.clone();
        async move { api.list(TaskFilter::All).await }
    });
    use_context_provider(|| TaskBoard { listed, everything })
}
