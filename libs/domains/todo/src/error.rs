use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    #[error("Task not found: {0}")]
    TaskNotFound(Uuid),

    #[error("Project with name '{0}' already exists")]
    DuplicateProjectName(String),

    #[error("Maximum number of projects ({0}) reached")]
    ProjectLimitExceeded(usize),

    #[error("Maximum number of tasks per project ({0}) reached")]
    TaskLimitExceeded(usize),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid status '{0}' (expected todo, doing or done)")]
    InvalidStatus(String),

    #[error("Invalid deadline '{0}' (use YYYY-MM-DD)")]
    InvalidDeadline(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type TodoResult<T> = Result<T, TodoError>;

/// Convert TodoError to AppError for standardized error responses
///
/// Not-found maps to 404, duplicate names and exhausted limits to 409,
/// malformed input to 400, and storage failures to 500.
impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::ProjectNotFound(id) => {
                AppError::NotFound(format!("Project {} not found", id))
            }
            TodoError::TaskNotFound(id) => AppError::NotFound(format!("Task {} not found", id)),
            TodoError::DuplicateProjectName(name) => {
                AppError::Conflict(format!("Project with name '{}' already exists", name))
            }
            TodoError::ProjectLimitExceeded(max) => {
                AppError::Conflict(format!("Maximum number of projects ({}) reached", max))
            }
            TodoError::TaskLimitExceeded(max) => AppError::Conflict(format!(
                "Maximum number of tasks per project ({}) reached",
                max
            )),
            TodoError::Validation(msg) => AppError::BadRequest(msg),
            TodoError::InvalidStatus(status) => AppError::BadRequest(format!(
                "Invalid status '{}' (expected todo, doing or done)",
                status
            )),
            TodoError::InvalidDeadline(deadline) => {
                AppError::BadRequest(format!("Invalid deadline '{}' (use YYYY-MM-DD)", deadline))
            }
            TodoError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        // Convert to AppError for the standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for TodoError {
    fn from(err: sea_orm::DbErr) -> Self {
        TodoError::Database(err.to_string())
    }
}
