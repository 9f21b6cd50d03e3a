//! HTTP client for the task API.
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tasklist_core::{Task, TaskFilter, TaskId, TaskText};

const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server responded with {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
struct TextBody<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct CompleteBody {
    completed: bool,
}

/// Thin wrapper over the REST endpoints; one method per endpoint.
#[derive(Clone, Debug)]
pub struct TaskApi {
    base_url: String,
    client: Client,
}

impl TaskApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Uses `TASKLIST_API_URL` from the build environment, falling back to a local server.
    pub fn from_build_env() -> Self {
        Self::new(option_env!("TASKLIST_API_URL").unwrap_or(DEFAULT_API_URL))
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: TaskId, action: &str) -> String {
        format!("{}/tasks/{}/{}", self.base_url, id, action)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, ApiError> {
        let response = self
            .client
            .get(self.tasks_url())
            .query(&[("filter", filter.as_str())])
            .send()
            .await?;
        read_json(response).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, text: &TaskText) -> Result<Task, ApiError> {
        let response = self
            .client
            .post(self.tasks_url())
            .json(&TextBody {
                text: text.as_str(),
            })
            .send()
            .await?;
        read_json(response).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn edit(&self, id: TaskId, text: &TaskText) -> Result<Task, ApiError> {
        let response = self
            .client
            .put(self.task_url(id, "editTask"))
            .json(&TextBody {
                text: text.as_str(),
            })
            .send()
            .await?;
        read_json(response).await
    }

    /// Stores an explicit completion state rather than flipping it, so a
    /// repeated click cannot undo itself.
    #[tracing::instrument(skip(self))]
    pub async fn set_completed(&self, id: TaskId, completed: bool) -> Result<Task, ApiError> {
        let response = self
            .client
            .put(self.task_url(id, "complete"))
            .json(&CompleteBody { completed })
            .send()
            .await?;
        read_json(response).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: TaskId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.task_url(id, "deleteTask"))
            .send()
            .await?;
        let confirmation: MessageResponse = read_json(response).await?;
        tracing::debug!("{}", confirmation.message);
        Ok(())
    }

    /// Deletes every task, waiting for each deletion before starting the next.
    /// Returns how many tasks were removed; failures are logged and skipped.
    #[tracing::instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<usize, ApiError> {
        let tasks = self.list(TaskFilter::All).await?;
        let mut deleted = 0;
        for task in &tasks {
            match self.delete(task.id).await {
                Ok(()) => deleted += 1,
                Err(e) => tracing::error!("Error deleting task {}: {}", task.id, e),
            }
        }
        Ok(deleted)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let message = response
        .json::<MessageResponse>()
        .await
        .map(|body| body.message)
        .unwrap_or_else(|_| status.to_string());
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}
