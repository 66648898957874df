use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Word limit for project names and task titles
pub const NAME_WORD_LIMIT: usize = 30;

/// Word limit for project and task descriptions
pub const DESCRIPTION_WORD_LIMIT: usize = 150;

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Custom validator: project names and task titles stay within 30 words
fn validate_name_words(text: &str) -> Result<(), validator::ValidationError> {
    if word_count(text) > NAME_WORD_LIMIT {
        let mut err = validator::ValidationError::new("word_count");
        err.message = Some(format!("exceeds {} words", NAME_WORD_LIMIT).into());
        return Err(err);
    }
    Ok(())
}

/// Custom validator: descriptions stay within 150 words
fn validate_description_words(text: &str) -> Result<(), validator::ValidationError> {
    if word_count(text) > DESCRIPTION_WORD_LIMIT {
        let mut err = validator::ValidationError::new("word_count");
        err.message = Some(format!("exceeds {} words", DESCRIPTION_WORD_LIMIT).into());
        return Err(err);
    }
    Ok(())
}

/// Task status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "task_status")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TaskStatus {
    /// Task not started
    #[default]
    #[sea_orm(string_value = "todo")]
    Todo,
    /// Task in progress
    #[sea_orm(string_value = "doing")]
    Doing,
    /// Task finished (manually or by autoclose)
    #[sea_orm(string_value = "done")]
    Done,
}

/// Project entity - a named container of tasks
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Project {
    /// Unique identifier
    pub id: Uuid,
    /// Project name (unique across all projects, case-sensitive)
    pub name: String,
    /// Optional project description
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Task entity - a unit of work belonging to exactly one project
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Task {
    /// Unique identifier
    pub id: Uuid,
    /// Task title
    pub title: String,
    /// Optional task description
    pub description: Option<String>,
    /// Current status
    pub status: TaskStatus,
    /// Optional deadline (day granularity)
    pub deadline: Option<NaiveDate>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Set while the task is done, unset otherwise
    pub closed_at: Option<DateTime<Utc>>,
    /// Owning project
    pub project_id: Uuid,
}

/// DTO for creating a new project
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProject {
    #[validate(length(min = 1), custom(function = "validate_name_words"))]
    pub name: String,
    #[validate(custom(function = "validate_description_words"))]
    pub description: Option<String>,
}

/// DTO for updating an existing project; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProject {
    #[validate(length(min = 1), custom(function = "validate_name_words"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_description_words"))]
    pub description: Option<String>,
}

/// DTO for creating a new task
///
/// `status` and `deadline` arrive as raw strings; the service validates them
/// against the status enum and the `YYYY-MM-DD` format.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTask {
    #[validate(length(min = 1), custom(function = "validate_name_words"))]
    pub title: String,
    #[validate(custom(function = "validate_description_words"))]
    pub description: Option<String>,
    /// Initial status (todo/doing/done, case-insensitive); defaults to todo
    pub status: Option<String>,
    /// Deadline in YYYY-MM-DD format
    pub deadline: Option<String>,
}

/// DTO for updating an existing task; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTask {
    #[validate(length(min = 1), custom(function = "validate_name_words"))]
    pub title: Option<String>,
    #[validate(custom(function = "validate_description_words"))]
    pub description: Option<String>,
    /// New status (todo/doing/done, case-insensitive)
    pub status: Option<String>,
    /// New deadline in YYYY-MM-DD format; an empty string clears the deadline
    pub deadline: Option<String>,
}

/// DTO for the dedicated status-change endpoint
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChangeTaskStatus {
    /// New status (todo/doing/done, case-insensitive)
    pub status: String,
}

/// Validated task input handed from the service to the repository
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub deadline: Option<NaiveDate>,
    pub project_id: Uuid,
}

/// Validated partial task update handed from the service to the repository
///
/// The nested option on `deadline` distinguishes "leave unchanged" (`None`)
/// from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub deadline: Option<Option<NaiveDate>>,
}

impl Project {
    /// Create a new project from the CreateProject DTO
    pub fn new(input: CreateProject) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            created_at: Utc::now(),
        }
    }

    /// Apply a partial update; omitted fields keep their current value
    pub fn apply_update(&mut self, update: UpdateProject) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
    }
}

impl Task {
    /// Create a new task from validated input
    ///
    /// `closed_at` starts unset regardless of the initial status; it is only
    /// ever written by status transitions.
    pub fn new(input: NewTask) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            status: input.status,
            deadline: input.deadline,
            created_at: Utc::now(),
            closed_at: None,
            project_id: input.project_id,
        }
    }

    /// Transition to a new status, keeping `closed_at` coupled to it:
    /// entering Done stamps `closed_at` (unless already stamped), leaving
    /// Done clears it.
    pub fn set_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        self.status = status;
        match status {
            TaskStatus::Done => {
                if self.closed_at.is_none() {
                    self.closed_at = Some(now);
                }
            }
            _ => self.closed_at = None,
        }
    }

    /// Apply a partial update; omitted fields keep their current value
    pub fn apply_changes(&mut self, changes: TaskChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(status) = changes.status {
            self.set_status(status, now);
        }
        if let Some(deadline) = changes.deadline {
            self.deadline = deadline;
        }
    }

    /// Whether this task counts as overdue at `now`.
    ///
    /// A deadline marks the start of its day (UTC midnight); the task is
    /// overdue once that instant has passed and the task is not done.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) => {
                self.status != TaskStatus::Done
                    && deadline.and_time(NaiveTime::MIN).and_utc() < now
            }
            None => false,
        }
    }
}
