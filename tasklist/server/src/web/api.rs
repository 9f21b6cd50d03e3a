use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::task::api::v1::{self as tasks_v1, TaskState};

/// JSON body carrying a single human readable message, used for
/// confirmations and errors alike.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        tasks_v1::list_tasks_handler,
        tasks_v1::create_task_handler,
        tasks_v1::edit_task_handler,
        tasks_v1::complete_task_handler,
        tasks_v1::delete_task_handler,
    ),
    components(schemas(
        tasks_v1::TaskJson,
        tasks_v1::TaskTextRequest,
        tasks_v1::CompleteRequest,
        MessageResponse
    )),
    tags((name = "Tasks", description = "Task list management"))
)]
pub struct ApiDoc;

#[tracing::instrument]
async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates the routes for the JSON API endpoints.
pub fn create_api_router(task_state: Arc<TaskState>) -> Router {
    tasks_v1::create_task_router(task_state)
        .route("/api-docs/openapi.json", get(openapi_handler))
}
