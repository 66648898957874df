use core_config::limits::LimitsConfig;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{TodoError, TodoResult};
use crate::models::{CreateProject, Project, UpdateProject};
use crate::repository::ProjectRepository;

/// Service layer for Project business logic
#[derive(Clone)]
pub struct ProjectService<R: ProjectRepository> {
    repository: Arc<R>,
    limits: LimitsConfig,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repository: R, limits: LimitsConfig) -> Self {
        Self {
            repository: Arc::new(repository),
            limits,
        }
    }

    /// Create a new project, enforcing word limits, the project ceiling and
    /// name uniqueness
    #[instrument(skip(self, input), fields(project_name = %input.name))]
    pub async fn create_project(&self, input: CreateProject) -> TodoResult<Project> {
        input
            .validate()
            .map_err(|e| TodoError::Validation(e.to_string()))?;

        let count = self.repository.count().await?;
        if count >= self.limits.max_projects {
            return Err(TodoError::ProjectLimitExceeded(self.limits.max_projects));
        }

        if self.repository.exists_by_name(&input.name, None).await? {
            return Err(TodoError::DuplicateProjectName(input.name));
        }

        self.repository.create(input).await
    }

    /// Get a project by ID
    pub async fn get_project(&self, id: Uuid) -> TodoResult<Project> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(TodoError::ProjectNotFound(id))
    }

    /// List all projects, ascending by creation time
    pub async fn list_projects(&self) -> TodoResult<Vec<Project>> {
        self.repository.list().await
    }

    /// Apply a partial update; omitted fields keep their current value.
    /// A new name must not collide with any other project's name.
    #[instrument(skip(self, input), fields(project_id = %id))]
    pub async fn edit_project(&self, id: Uuid, input: UpdateProject) -> TodoResult<Project> {
        input
            .validate()
            .map_err(|e| TodoError::Validation(e.to_string()))?;

        let project = self.get_project(id).await?;

        if let Some(new_name) = &input.name {
            if *new_name != project.name
                && self.repository.exists_by_name(new_name, Some(id)).await?
            {
                return Err(TodoError::DuplicateProjectName(new_name.clone()));
            }
        }

        self.repository.update(id, input).await
    }

    /// Delete a project and all of its tasks
    #[instrument(skip(self), fields(project_id = %id))]
    pub async fn delete_project(&self, id: Uuid) -> TodoResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(TodoError::ProjectNotFound(id));
        }

        Ok(())
    }
}
