use crate::task::{TaskService, TaskServiceError};
use crate::web::api::MessageResponse;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tasklist_core::{Task, TaskFilter, TaskId};
use utoipa::ToSchema;

const UNEXPECTED_ERROR_MESSAGE: &str =
    "An unexpected error occurred while processing your request. Please try again later.";

#[derive(Clone, Debug)]
pub struct TaskState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskJson {
    /// Unique identifier assigned when the task was created
    id: String,
    /// What needs doing
    text: String,
    /// Whether the task has been done
    completed: bool,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            text: task.text,
            completed: task.completed,
        }
    }
}

/// Request body for creating or editing a task.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TaskTextRequest {
    /// Task text; surrounding whitespace is removed and the rest must not be empty
    #[serde(default)]
    text: String,
}

/// Optional request body for PUT /tasks/{id}/complete.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CompleteRequest {
    /// Completion state to store instead of flipping the current one
    completed: bool,
}

/// Errors returned by the task endpoints.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] TaskServiceError),
    /// The path did not contain a well-formed task ID.
    #[error("Task not found")]
    UnknownId,
    /// The request body could not be read as the expected JSON.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            ApiError::Service(TaskServiceError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::InvalidBody(reason) => {
                (StatusCode::BAD_REQUEST, format!("Invalid request body: {reason}"))
            }
            ApiError::Service(TaskServiceError::TaskNotFound(_)) | ApiError::UnknownId => {
                (StatusCode::NOT_FOUND, "Task not found".to_string())
            }
            ApiError::Service(TaskServiceError::Database(err)) => {
                tracing::error!("Task store failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UNEXPECTED_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status_code, Json(MessageResponse::new(message))).into_response()
    }
}

fn parse_id(raw: &str) -> Result<TaskId, ApiError> {
    TaskId::parse(raw).ok_or(ApiError::UnknownId)
}

/// Picks the filter out of raw query pairs. Anything other than a single
/// recognised `filter` value, including a repeated one, lists every task.
fn filter_from_query(params: &[(String, String)]) -> TaskFilter {
    let mut values = params
        .iter()
        .filter(|(key, _)| key == "filter")
        .map(|(_, value)| value.as_str());
    match (values.next(), values.next()) {
        (value, None) => TaskFilter::from_query(value),
        _ => TaskFilter::All,
    }
}

/// Handler for GET /tasks - Returns the tasks matching the optional filter.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tasks",
    params(
        ("filter" = Option<String>, Query, description = "One of all, completed or incomplete; anything else lists every task")
    ),
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = Vec<TaskJson>),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "Tasks"
)]
pub async fn list_tasks_handler(
    State(state): State<Arc<TaskState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<TaskJson>>, ApiError> {
    let filter = filter_from_query(&params);
    let tasks = TaskService::new(&state.db).list_tasks(filter).await?;
    Ok(Json(tasks.into_iter().map(TaskJson::from).collect()))
}

/// Handler for POST /tasks - Creates a task.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = TaskTextRequest,
    responses(
        (status = 201, description = "Task created", body = TaskJson),
        (status = 400, description = "Task text missing or blank", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    payload: Result<Json<TaskTextRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskJson>), ApiError> {
    let Json(request) = payload?;
    let task = TaskService::new(&state.db)
        .create_task(&request.text)
        .await?;
    tracing::info!("Created task {}", task.id);
    Ok((StatusCode::CREATED, Json(TaskJson::from(task))))
}

/// Handler for PUT /tasks/{id}/editTask - Replaces the text of a task.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    put,
    path = "/tasks/{id}/editTask",
    params(("id" = String, Path, description = "Task ID")),
    request_body = TaskTextRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskJson),
        (status = 400, description = "Task text missing or blank", body = MessageResponse),
        (status = 404, description = "Task not found", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "Tasks"
)]
pub async fn edit_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
    payload: Result<Json<TaskTextRequest>, JsonRejection>,
) -> Result<Json<TaskJson>, ApiError> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let task = TaskService::new(&state.db)
        .edit_task_by_id(id, &request.text)
        .await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for PUT /tasks/{id}/complete - Flips the completion state of a task,
/// or sets it when the body carries `{"completed": bool}`.
#[tracing::instrument(skip(state, body))]
#[utoipa::path(
    put,
    path = "/tasks/{id}/complete",
    params(("id" = String, Path, description = "Task ID")),
    request_body(content = CompleteRequest, description = "Omit the body to toggle"),
    responses(
        (status = 200, description = "Task updated", body = TaskJson),
        (status = 400, description = "Malformed body", body = MessageResponse),
        (status = 404, description = "Task not found", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "Tasks"
)]
pub async fn complete_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<TaskJson>, ApiError> {
    let id = parse_id(&id)?;
    let service = TaskService::new(&state.db);

    let task = if body.iter().all(u8::is_ascii_whitespace) {
        service.toggle_task_by_id(id).await?
    } else {
        let request: CompleteRequest = serde_json::from_slice(&body)
            .map_err(|err| ApiError::InvalidBody(err.to_string()))?;
        service.set_task_completed(id, request.completed).await?
    };
    Ok(Json(TaskJson::from(task)))
}

/// Handler for DELETE /tasks/{id}/deleteTask - Removes a task.
/// Succeeds whether or not the task existed.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/tasks/{id}/deleteTask",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if let Some(id) = TaskId::parse(&id) {
        let removed = TaskService::new(&state.db).delete_task_by_id(id).await?;
        if !removed {
            tracing::debug!("Task {} was already gone", id);
        }
    }
    Ok(Json(MessageResponse::new("Task deleted".to_string())))
}

/// Handler for GET /tasks/debug - Confirms the task routes are mounted.
#[tracing::instrument]
pub async fn debug_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Debug route works".to_string()))
}

/// Creates and returns the tasks API router.
pub fn create_task_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route(
            "/tasks",
            get(list_tasks_handler).post(create_task_handler),
        )
        .route("/tasks/debug", get(debug_handler))
        .route("/tasks/{id}/editTask", put(edit_task_handler))
        .route("/tasks/{id}/deleteTask", delete(delete_task_handler))
        .route("/tasks/{id}/complete", put(complete_task_handler))
        .with_state(state)
}
