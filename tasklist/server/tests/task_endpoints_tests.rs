use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use migration::MigratorTrait;
use insta::assert_yaml_snapshot;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use std::sync::Arc;
use tasklist_server::task::api::v1::{TaskState, create_task_router};
use testcontainers_modules::{postgres, testcontainers};
use tower::ServiceExt;

mod common;

use common::JsonResponseSnapshot;

/// Test context for endpoint tests.
pub struct TestContext {
    #[allow(dead_code)] // container is kept to ensure it's not dropped
    pub container: testcontainers::ContainerAsync<postgres::Postgres>,
    pub app: Router,
}

/// Setup function for endpoint tests using PostgreSQL container.
async fn setup() -> anyhow::Result<TestContext> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let container = common::setup_container().await?;
    let db = common::setup_db(&container).await?;
    Ok(TestContext {
        app: router_for(db),
        container,
    })
}

/// Setup whose store fails every query: the schema is rolled back after
/// a task was created, so the returned ID once existed.
async fn setup_with_failing_store() -> anyhow::Result<(TestContext, String)> {
    let _ = tracing_subscriber::fmt().try_init();
    let container = common::setup_container().await?;
    let db = common::setup_db(&container).await?;
    let app = router_for(db.clone());
    let created = create_task(&app, "Buy milk").await;
    let id = created["id"].as_str().unwrap_or_default().to_string();
    migration::Migrator::down(&db, None).await?;
    Ok((TestContext { container, app }, id))
}

fn router_for(db: DatabaseConnection) -> Router {
    create_task_router(Arc::new(TaskState { db: Arc::new(db) }))
}

/// Router whose database is unreachable, for paths that must not touch the store.
fn disconnected_router() -> Router {
    router_for(DatabaseConnection::Disconnected)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Sends a request and returns the status with the parsed JSON body.
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn create_task(app: &Router, text: &str) -> Value {
    let (status, body) = send(
        app,
        json_request(Method::POST, "/tasks", json!({ "text": text })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn list_tasks(app: &Router, filter: Option<&str>) -> Vec<Value> {
    let uri = match filter {
        Some(filter) => format!("/tasks?filter={filter}"),
        None => "/tasks".to_string(),
    };
    let (status, body) = send(app, empty_request(Method::GET, &uri)).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().cloned().unwrap_or_default()
}

fn ids(tasks: &[Value]) -> Vec<String> {
    tasks
        .iter()
        .map(|task| task["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn can_create_task_successfully() {
    let state = setup().await.expect("Failed to setup test context");

    let created = create_task(&state.app, "Buy milk").await;

    assert_eq!(created["text"], "Buy milk");
    assert_eq!(created["completed"], false);
    assert!(uuid::Uuid::parse_str(created["id"].as_str().unwrap()).is_ok());
    assert_eq!(created.as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn cannot_create_task_with_blank_text() {
    let app = disconnected_router();

    let response = app
        .oneshot(json_request(Method::POST, "/tasks", json!({ "text": "   " })))
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let snapshot_data =
        JsonResponseSnapshot::new(&body, status, &headers, "create_task_with_blank_text");

    assert_yaml_snapshot!(snapshot_data);
}

#[tokio::test]
async fn cannot_create_task_without_text() {
    let app = disconnected_router();

    let (status, body) = send(&app, json_request(Method::POST, "/tasks", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Task text must not be empty");
}

#[tokio::test]
async fn cannot_create_task_with_malformed_body() {
    let app = disconnected_router();

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/tasks", json!({ "text": 42 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body")
    );
}

#[tokio::test]
async fn cannot_create_blank_task_and_nothing_is_stored() {
    let state = setup().await.expect("Failed to setup test context");

    let (status, _) = send(
        &state.app,
        json_request(Method::POST, "/tasks", json!({ "text": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(list_tasks(&state.app, None).await.is_empty());
}

#[tokio::test]
async fn can_edit_task_text() {
    let state = setup().await.expect("Failed to setup test context");
    let created = create_task(&state.app, "Buy milk").await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(
        &state.app,
        json_request(
            Method::PUT,
            &format!("/tasks/{id}/editTask"),
            json!({ "text": "Buy oat milk" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "id": id, "text": "Buy oat milk", "completed": false })
    );
}

#[tokio::test]
async fn cannot_edit_task_to_blank_text() {
    let state = setup().await.expect("Failed to setup test context");
    let created = create_task(&state.app, "Buy milk").await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(
        &state.app,
        json_request(
            Method::PUT,
            &format!("/tasks/{id}/editTask"),
            json!({ "text": " " }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Task text must not be empty");
    let tasks = list_tasks(&state.app, None).await;
    assert_eq!(tasks[0]["text"], "Buy milk");
}

#[tokio::test]
async fn cannot_edit_unknown_task() {
    let state = setup().await.expect("Failed to setup test context");
    let created = create_task(&state.app, "Buy milk").await;
    let missing = uuid::Uuid::new_v4();

    let (status, body) = send(
        &state.app,
        json_request(
            Method::PUT,
            &format!("/tasks/{missing}/editTask"),
            json!({ "text": "Anything" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found");
    assert_eq!(list_tasks(&state.app, None).await, vec![created]);
}

#[tokio::test]
async fn cannot_edit_task_with_malformed_id() {
    let app = disconnected_router();

    let response = app
        .oneshot(json_request(
            Method::PUT,
            "/tasks/not-a-task-id/editTask",
            json!({ "text": "Anything" }),
        ))
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let snapshot_data =
        JsonResponseSnapshot::new(&body, status, &headers, "edit_task_with_malformed_id");

    assert_yaml_snapshot!(snapshot_data);
}

#[tokio::test]
async fn can_toggle_task_completion_twice() {
    let state = setup().await.expect("Failed to setup test context");
    let created = create_task(&state.app, "Buy milk").await;
    let uri = format!("/tasks/{}/complete", created["id"].as_str().unwrap());

    let (status, once) = send(&state.app, empty_request(Method::PUT, &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(once["completed"], true);

    let (status, twice) = send(&state.app, empty_request(Method::PUT, &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(twice, created);
}

#[tokio::test]
async fn can_set_explicit_completion_state() {
    let state = setup().await.expect("Failed to setup test context");
    let created = create_task(&state.app, "Buy milk").await;
    let uri = format!("/tasks/{}/complete", created["id"].as_str().unwrap());

    for _ in 0..2 {
        let (status, body) = send(
            &state.app,
            json_request(Method::PUT, &uri, json!({ "completed": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["completed"], true);
    }
}

#[tokio::test]
async fn cannot_toggle_unknown_task() {
    let state = setup().await.expect("Failed to setup test context");
    let missing = uuid::Uuid::new_v4();

    let (status, body) = send(
        &state.app,
        empty_request(Method::PUT, &format!("/tasks/{missing}/complete")),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found");
}

#[tokio::test]
async fn can_delete_task_and_delete_again() {
    let state = setup().await.expect("Failed to setup test context");
    let created = create_task(&state.app, "Buy milk").await;
    let uri = format!("/tasks/{}/deleteTask", created["id"].as_str().unwrap());

    let (status, body) = send(&state.app, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Task deleted" }));
    assert!(list_tasks(&state.app, None).await.is_empty());

    let (status, body) = send(&state.app, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Task deleted" }));
}

#[tokio::test]
async fn can_delete_task_with_malformed_id() {
    let app = disconnected_router();

    let (status, body) = send(
        &app,
        empty_request(Method::DELETE, "/tasks/not-a-task-id/deleteTask"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Task deleted" }));
}

#[tokio::test]
async fn can_filter_listed_tasks() {
    let state = setup().await.expect("Failed to setup test context");
    for text in ["Done one", "Done two"] {
        let created = create_task(&state.app, text).await;
        let uri = format!("/tasks/{}/complete", created["id"].as_str().unwrap());
        send(&state.app, empty_request(Method::PUT, &uri)).await;
    }
    for text in ["Todo one", "Todo two", "Todo three"] {
        create_task(&state.app, text).await;
    }

    let completed = list_tasks(&state.app, Some("completed")).await;
    let incomplete = list_tasks(&state.app, Some("incomplete")).await;
    let all = list_tasks(&state.app, Some("all")).await;
    let unfiltered = list_tasks(&state.app, None).await;

    assert_eq!(completed.len(), 2);
    assert!(completed.iter().all(|task| task["completed"] == true));
    assert_eq!(incomplete.len(), 3);
    assert!(incomplete.iter().all(|task| task["completed"] == false));
    assert_eq!(all.len(), 5);
    assert_eq!(all, unfiltered);

    let mut combined = ids(&completed);
    combined.extend(ids(&incomplete));
    combined.sort();
    let mut everything = ids(&all);
    everything.sort();
    assert_eq!(combined, everything);
}

#[tokio::test]
async fn can_treat_unknown_filter_as_all() {
    let state = setup().await.expect("Failed to setup test context");
    create_task(&state.app, "Buy milk").await;

    let tasks = list_tasks(&state.app, Some("archived")).await;

    assert_eq!(tasks.len(), 1);
}

#[tokio::test]
async fn can_treat_repeated_filter_as_all() {
    let state = setup().await.expect("Failed to setup test context");
    let first = create_task(&state.app, "Buy milk").await;
    create_task(&state.app, "Walk the dog").await;
    let id = first["id"].as_str().unwrap();
    send(
        &state.app,
        json_request(
            Method::PUT,
            &format!("/tasks/{id}/complete"),
            json!({ "completed": true }),
        ),
    )
    .await;

    let (status, body) = send(
        &state.app,
        empty_request(Method::GET, "/tasks?filter=completed&filter=all"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn can_walk_task_through_its_lifecycle() {
    let state = setup().await.expect("Failed to setup test context");

    let created = create_task(&state.app, "Task A").await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(ids(&list_tasks(&state.app, None).await), vec![id.clone()]);

    let (status, _) = send(
        &state.app,
        empty_request(Method::PUT, &format!("/tasks/{id}/complete")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ids(&list_tasks(&state.app, Some("completed")).await),
        vec![id.clone()]
    );
    assert!(list_tasks(&state.app, Some("incomplete")).await.is_empty());

    let (status, _) = send(
        &state.app,
        empty_request(Method::DELETE, &format!("/tasks/{id}/deleteTask")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(list_tasks(&state.app, None).await.is_empty());
}

#[tokio::test]
async fn can_report_store_failure_when_listing() {
    let app = disconnected_router();

    let (status, body) = send(&app, empty_request(Method::GET, "/tasks")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "An unexpected error occurred while processing your request. Please try again later."
    );
}

#[tokio::test]
async fn cannot_complete_task_with_malformed_body() {
    let app = disconnected_router();
    let id = "6f9619ff-8b86-d011-b42d-00cf4fc964ff";

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/tasks/{id}/complete"),
            json!({ "completed": "yes" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body")
    );
}

async fn assert_store_failure(app: &Router, request: Request<Body>) {
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "An unexpected error occurred while processing your request. Please try again later."
    );
}

#[tokio::test]
async fn can_report_store_failure_when_editing() {
    let (state, id) = setup_with_failing_store()
        .await
        .expect("Failed to setup test context");

    assert_store_failure(
        &state.app,
        json_request(
            Method::PUT,
            &format!("/tasks/{id}/editTask"),
            json!({ "text": "Buy oat milk" }),
        ),
    )
    .await;
}

#[tokio::test]
async fn can_report_store_failure_when_completing() {
    let (state, id) = setup_with_failing_store()
        .await
        .expect("Failed to setup test context");

    assert_store_failure(
        &state.app,
        empty_request(Method::PUT, &format!("/tasks/{id}/complete")),
    )
    .await;
    assert_store_failure(
        &state.app,
        json_request(
            Method::PUT,
            &format!("/tasks/{id}/complete"),
            json!({ "completed": true }),
        ),
    )
    .await;
}

#[tokio::test]
async fn can_report_store_failure_when_deleting() {
    let (state, id) = setup_with_failing_store()
        .await
        .expect("Failed to setup test context");

    assert_store_failure(
        &state.app,
        empty_request(Method::DELETE, &format!("/tasks/{id}/deleteTask")),
    )
    .await;
}

#[tokio::test]
async fn can_serve_debug_route() {
    let app = disconnected_router();

    let response = app
        .oneshot(empty_request(Method::GET, "/tasks/debug"))
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let snapshot_data = JsonResponseSnapshot::new(&body, status, &headers, "debug_route");

    assert_yaml_snapshot!(snapshot_data);
}
