//! HTTP handlers: Axum routers over the project and task services.
//!
//! The combined router is meant to be nested at `/projects`:
//!
//! - `GET/POST /` and `GET/PATCH/DELETE /{id}` — projects
//! - `GET/POST /{project_id}/tasks` and
//!   `GET/PATCH/DELETE /{project_id}/tasks/{task_id}` — tasks
//! - `POST /{project_id}/tasks/{task_id}/status` — status transitions

pub mod projects;
pub mod tasks;

use axum::Router;
use std::sync::Arc;

use crate::repository::{ProjectRepository, TaskRepository};
use crate::service::{ProjectService, TaskService};

/// Create the combined router with all project and task endpoints
pub fn router<P, T>(
    project_service: ProjectService<P>,
    task_service: TaskService<P, T>,
) -> Router
where
    P: ProjectRepository + 'static,
    T: TaskRepository + 'static,
{
    let project_service = Arc::new(project_service);
    let task_service = Arc::new(task_service);

    Router::new()
        .merge(projects::router(project_service))
        .nest("/{project_id}/tasks", tasks::router(task_service))
}
