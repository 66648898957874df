//! Handler tests for the todo domain
//!
//! These tests verify that HTTP handlers work correctly:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON)
//! - HTTP status codes
//! - Error responses
//!
//! They run against the in-memory repository, so no database is needed.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use core_config::limits::LimitsConfig;
use domain_todo::*;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // For oneshot()

fn build_app(limits: LimitsConfig) -> (Router, TaskService<InMemoryRepository, InMemoryRepository>)
{
    let store = InMemoryRepository::new();
    let project_service = ProjectService::new(store.clone(), limits);
    let task_service = TaskService::new(store.clone(), store, limits);

    let app = handlers::router(project_service, task_service.clone());
    (app, task_service)
}

fn default_app() -> Router {
    build_app(LimitsConfig::default()).0
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn patch_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create_project(app: &Router, name: &str) -> Project {
    let response = app
        .clone()
        .oneshot(post_json("/", json!({"name": name})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

async fn create_task(app: &Router, project_id: &str, body: serde_json::Value) -> Task {
    let response = app
        .clone()
        .oneshot(post_json(&format!("/{}/tasks", project_id), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_project_returns_201() {
    let app = default_app();

    let response = app
        .oneshot(post_json(
            "/",
            json!({"name": "Launch", "description": "v1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let project: Project = json_body(response.into_body()).await;
    assert_eq!(project.name, "Launch");
    assert_eq!(project.description.as_deref(), Some("v1"));
}

#[tokio::test]
async fn test_create_project_rejects_empty_name() {
    let app = default_app();

    let response = app
        .oneshot(post_json("/", json!({"name": ""})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_project_rejects_long_name() {
    let app = default_app();
    let long_name = vec!["word"; 31].join(" ");

    let response = app
        .oneshot(post_json("/", json!({"name": long_name})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_project_name_returns_409() {
    let app = default_app();

    create_project(&app, "Launch").await;

    let response = app
        .oneshot(post_json("/", json!({"name": "Launch"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_project_limit_returns_409() {
    let (app, _) = build_app(LimitsConfig {
        max_projects: 2,
        max_tasks: 100,
    });

    create_project(&app, "one").await;
    create_project(&app, "two").await;

    let response = app
        .oneshot(post_json("/", json!({"name": "three"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_missing_project_returns_404() {
    let app = default_app();
    let missing_id = uuid::Uuid::now_v7();

    let response = app.oneshot(get(&format!("/{}", missing_id))).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_projects_ordered() {
    let app = default_app();

    create_project(&app, "first").await;
    create_project(&app, "second").await;

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let projects: Vec<Project> = json_body(response.into_body()).await;
    let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[tokio::test]
async fn test_edit_project_partial_update() {
    let app = default_app();
    let project = create_project(&app, "Launch").await;

    let response = app
        .oneshot(patch_json(
            &format!("/{}", project.id),
            json!({"description": "updated"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Project = json_body(response.into_body()).await;
    assert_eq!(updated.name, "Launch");
    assert_eq!(updated.description.as_deref(), Some("updated"));
}

#[tokio::test]
async fn test_edit_project_with_no_fields_is_a_noop() {
    let app = default_app();
    let project = create_project(&app, "Launch").await;

    let response = app
        .oneshot(patch_json(&format!("/{}", project.id), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Project = json_body(response.into_body()).await;
    assert_eq!(updated.name, "Launch");
    assert_eq!(updated.description, None);
}

#[tokio::test]
async fn test_rename_to_existing_name_returns_409() {
    let app = default_app();
    create_project(&app, "Launch").await;
    let other = create_project(&app, "Other").await;

    let response = app
        .oneshot(patch_json(
            &format!("/{}", other.id),
            json!({"name": "Launch"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_task_defaults_to_todo() {
    let app = default_app();
    let project = create_project(&app, "Launch").await;

    let task = create_task(
        &app,
        &project.id.to_string(),
        json!({"title": "Write spec"}),
    )
    .await;

    assert_eq!(task.status, TaskStatus::Todo);
    assert!(task.closed_at.is_none());
    assert_eq!(task.project_id, project.id);
}

#[tokio::test]
async fn test_create_task_in_missing_project_returns_404() {
    let app = default_app();
    let missing_id = uuid::Uuid::now_v7();

    let response = app
        .oneshot(post_json(
            &format!("/{}/tasks", missing_id),
            json!({"title": "Write spec"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_task_invalid_status_returns_400() {
    let app = default_app();
    let project = create_project(&app, "Launch").await;

    let response = app
        .oneshot(post_json(
            &format!("/{}/tasks", project.id),
            json!({"title": "Write spec", "status": "urgent"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_task_wrong_deadline_format_returns_400() {
    let app = default_app();
    let project = create_project(&app, "Launch").await;

    let response = app
        .oneshot(post_json(
            &format!("/{}/tasks", project.id),
            json!({"title": "Write spec", "deadline": "2020/01/01"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_task_limit_returns_409() {
    let (app, _) = build_app(LimitsConfig {
        max_projects: 10,
        max_tasks: 1,
    });
    let project = create_project(&app, "Launch").await;

    create_task(&app, &project.id.to_string(), json!({"title": "one"})).await;

    let response = app
        .oneshot(post_json(
            &format!("/{}/tasks", project.id),
            json!({"title": "two"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_change_status_couples_closed_at() {
    let app = default_app();
    let project = create_project(&app, "Launch").await;
    let task = create_task(
        &app,
        &project.id.to_string(),
        json!({"title": "Write spec"}),
    )
    .await;

    // To done: closed_at gets stamped
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/{}/tasks/{}/status", project.id, task.id),
            json!({"status": "done"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let done: Task = json_body(response.into_body()).await;
    assert_eq!(done.status, TaskStatus::Done);
    assert!(done.closed_at.is_some());

    // Back to todo: closed_at is cleared
    let response = app
        .oneshot(post_json(
            &format!("/{}/tasks/{}/status", project.id, task.id),
            json!({"status": "todo"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let reopened: Task = json_body(response.into_body()).await;
    assert_eq!(reopened.status, TaskStatus::Todo);
    assert!(reopened.closed_at.is_none());
}

#[tokio::test]
async fn test_task_of_other_project_returns_400() {
    let app = default_app();
    let project = create_project(&app, "Launch").await;
    let other = create_project(&app, "Other").await;
    let task = create_task(
        &app,
        &project.id.to_string(),
        json!({"title": "Write spec"}),
    )
    .await;

    // The task exists, but under a different project
    let response = app
        .oneshot(get(&format!("/{}/tasks/{}", other.id, task.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_task_updates_deadline() {
    let app = default_app();
    let project = create_project(&app, "Launch").await;
    let task = create_task(
        &app,
        &project.id.to_string(),
        json!({"title": "Write spec", "deadline": "2026-06-01"}),
    )
    .await;

    let response = app
        .oneshot(patch_json(
            &format!("/{}/tasks/{}", project.id, task.id),
            json!({"deadline": "2026-07-01", "status": "doing"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Task = json_body(response.into_body()).await;
    assert_eq!(
        updated.deadline,
        chrono::NaiveDate::from_ymd_opt(2026, 7, 1)
    );
    assert_eq!(updated.status, TaskStatus::Doing);
    assert_eq!(updated.title, "Write spec");
}

#[tokio::test]
async fn test_delete_task_returns_204() {
    let app = default_app();
    let project = create_project(&app, "Launch").await;
    let task = create_task(
        &app,
        &project.id.to_string(),
        json!({"title": "Write spec"}),
    )
    .await;

    let response = app
        .clone()
        .oneshot(delete(&format!("/{}/tasks/{}", project.id, task.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get(&format!("/{}/tasks/{}", project.id, task.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_project_cascades() {
    let app = default_app();
    let project = create_project(&app, "Launch").await;
    create_task(
        &app,
        &project.id.to_string(),
        json!({"title": "Write spec"}),
    )
    .await;

    let response = app
        .clone()
        .oneshot(delete(&format!("/{}", project.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The project is gone, so its task listing 404s
    let response = app
        .oneshot(get(&format!("/{}/tasks", project.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_autoclose_scenario() {
    let (app, task_service) = build_app(LimitsConfig::default());

    let project = create_project(&app, "Launch").await;
    let task = create_task(
        &app,
        &project.id.to_string(),
        json!({"title": "Write spec", "deadline": "2020-01-01"}),
    )
    .await;
    assert_eq!(task.status, TaskStatus::Todo);

    // The deadline is long past, so the sweep closes exactly this task
    let now = Utc::now();
    let closed = task_service.autoclose_overdue(now).await.unwrap();
    assert_eq!(closed, 1);

    let response = app
        .clone()
        .oneshot(get(&format!("/{}/tasks/{}", project.id, task.id)))
        .await
        .unwrap();
    let task: Task = json_body(response.into_body()).await;
    assert_eq!(task.status, TaskStatus::Done);
    assert!(task.closed_at.is_some());

    // A second run finds nothing left to close
    let closed = task_service.autoclose_overdue(Utc::now()).await.unwrap();
    assert_eq!(closed, 0);
}
