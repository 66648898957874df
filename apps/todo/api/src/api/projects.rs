use axum::Router;
use domain_todo::{PgProjectRepository, PgTaskRepository, ProjectService, TaskService, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let limits = state.config.limits;

    let project_service = ProjectService::new(PgProjectRepository::new(state.db.clone()), limits);
    let task_service = TaskService::new(
        PgProjectRepository::new(state.db.clone()),
        PgTaskRepository::new(state.db.clone()),
        limits,
    );

    handlers::router(project_service, task_service)
}
