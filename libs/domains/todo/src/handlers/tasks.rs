use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::{TodoError, TodoResult};
use crate::models::{ChangeTaskStatus, CreateTask, Task, UpdateTask};
use crate::repository::{ProjectRepository, TaskRepository};
use crate::service::TaskService;

const TAG: &str = "tasks";

/// OpenAPI documentation for the task endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        list_tasks,
        create_task,
        get_task,
        update_task,
        delete_task,
        change_task_status,
    ),
    components(
        schemas(Task, CreateTask, UpdateTask, ChangeTaskStatus),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Task management endpoints (nested under a project)")
    )
)]
pub struct ApiDoc;

/// Create the task router; meant to be nested at `/{project_id}/tasks`
pub fn router<P, T>(service: Arc<TaskService<P, T>>) -> Router
where
    P: ProjectRepository + 'static,
    T: TaskRepository + 'static,
{
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route(
            "/{task_id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .route("/{task_id}/status", post(change_task_status))
        .with_state(service)
}

fn parse_uuid(raw: &str, what: &str) -> TodoResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| TodoError::Validation(format!("Invalid {} '{}'", what, raw)))
}

/// List a project's tasks, oldest first
#[utoipa::path(
    get,
    path = "/{project_id}/tasks",
    tag = TAG,
    params(
        ("project_id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "List of tasks", body = Vec<Task>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_tasks<P: ProjectRepository, T: TaskRepository>(
    State(service): State<Arc<TaskService<P, T>>>,
    Path(project_id): Path<String>,
) -> TodoResult<Json<Vec<Task>>> {
    let project_id = parse_uuid(&project_id, "project ID")?;

    let tasks = service.list_tasks(project_id).await?;
    Ok(Json(tasks))
}

/// Create a new task in a project
#[utoipa::path(
    post,
    path = "/{project_id}/tasks",
    tag = TAG,
    params(
        ("project_id" = Uuid, Path, description = "Project ID")
    ),
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created successfully", body = Task),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_task<P: ProjectRepository, T: TaskRepository>(
    State(service): State<Arc<TaskService<P, T>>>,
    Path(project_id): Path<String>,
    ValidatedJson(input): ValidatedJson<CreateTask>,
) -> TodoResult<impl IntoResponse> {
    let project_id = parse_uuid(&project_id, "project ID")?;

    let task = service.create_task(project_id, input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Get a task by ID
#[utoipa::path(
    get,
    path = "/{project_id}/tasks/{task_id}",
    tag = TAG,
    params(
        ("project_id" = Uuid, Path, description = "Project ID"),
        ("task_id" = Uuid, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_task<P: ProjectRepository, T: TaskRepository>(
    State(service): State<Arc<TaskService<P, T>>>,
    Path((project_id, task_id)): Path<(String, String)>,
) -> TodoResult<Json<Task>> {
    let project_id = parse_uuid(&project_id, "project ID")?;
    let task_id = parse_uuid(&task_id, "task ID")?;

    let task = service.get_task(project_id, task_id).await?;
    Ok(Json(task))
}

/// Update a task (partial update; omitted fields keep their value)
#[utoipa::path(
    patch,
    path = "/{project_id}/tasks/{task_id}",
    tag = TAG,
    params(
        ("project_id" = Uuid, Path, description = "Project ID"),
        ("task_id" = Uuid, Path, description = "Task ID")
    ),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Task updated successfully", body = Task),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_task<P: ProjectRepository, T: TaskRepository>(
    State(service): State<Arc<TaskService<P, T>>>,
    Path((project_id, task_id)): Path<(String, String)>,
    ValidatedJson(input): ValidatedJson<UpdateTask>,
) -> TodoResult<Json<Task>> {
    let project_id = parse_uuid(&project_id, "project ID")?;
    let task_id = parse_uuid(&task_id, "task ID")?;

    let task = service.edit_task(project_id, task_id, input).await?;
    Ok(Json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/{project_id}/tasks/{task_id}",
    tag = TAG,
    params(
        ("project_id" = Uuid, Path, description = "Project ID"),
        ("task_id" = Uuid, Path, description = "Task ID")
    ),
    responses(
        (status = 204, description = "Task deleted successfully"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_task<P: ProjectRepository, T: TaskRepository>(
    State(service): State<Arc<TaskService<P, T>>>,
    Path((project_id, task_id)): Path<(String, String)>,
) -> TodoResult<impl IntoResponse> {
    let project_id = parse_uuid(&project_id, "project ID")?;
    let task_id = parse_uuid(&task_id, "task ID")?;

    service.delete_task(project_id, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Change a task's status
#[utoipa::path(
    post,
    path = "/{project_id}/tasks/{task_id}/status",
    tag = TAG,
    params(
        ("project_id" = Uuid, Path, description = "Project ID"),
        ("task_id" = Uuid, Path, description = "Task ID")
    ),
    request_body = ChangeTaskStatus,
    responses(
        (status = 200, description = "Status changed successfully", body = Task),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn change_task_status<P: ProjectRepository, T: TaskRepository>(
    State(service): State<Arc<TaskService<P, T>>>,
    Path((project_id, task_id)): Path<(String, String)>,
    Json(input): Json<ChangeTaskStatus>,
) -> TodoResult<Json<Task>> {
    let project_id = parse_uuid(&project_id, "project ID")?;
    let task_id = parse_uuid(&task_id, "task ID")?;

    let task = service
        .change_task_status(project_id, task_id, &input.status)
        .await?;
    Ok(Json(task))
}
