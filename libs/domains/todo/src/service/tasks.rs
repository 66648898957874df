use chrono::{DateTime, NaiveDate, Utc};
use core_config::limits::LimitsConfig;
use std::str::FromStr;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{TodoError, TodoResult};
use crate::models::{CreateTask, NewTask, Task, TaskChanges, TaskStatus, UpdateTask};
use crate::repository::{ProjectRepository, TaskRepository};

/// Service layer for Task business logic
///
/// Holds both repositories: every task operation verifies the owning
/// project first.
#[derive(Clone)]
pub struct TaskService<P: ProjectRepository, T: TaskRepository> {
    projects: Arc<P>,
    tasks: Arc<T>,
    limits: LimitsConfig,
}

/// Parse a status string (todo/doing/done, case-insensitive)
fn parse_status(input: &str) -> TodoResult<TaskStatus> {
    TaskStatus::from_str(input).map_err(|_| TodoError::InvalidStatus(input.to_string()))
}

/// Parse a `YYYY-MM-DD` deadline; empty input means "no deadline"
fn parse_deadline(input: &str) -> TodoResult<Option<NaiveDate>> {
    if input.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| TodoError::InvalidDeadline(input.to_string()))
}

impl<P: ProjectRepository, T: TaskRepository> TaskService<P, T> {
    pub fn new(projects: P, tasks: T, limits: LimitsConfig) -> Self {
        Self {
            projects: Arc::new(projects),
            tasks: Arc::new(tasks),
            limits,
        }
    }

    async fn ensure_project(&self, project_id: Uuid) -> TodoResult<()> {
        self.projects
            .get_by_id(project_id)
            .await?
            .ok_or(TodoError::ProjectNotFound(project_id))?;
        Ok(())
    }

    /// Create a new task in a project, enforcing word limits, status and
    /// deadline formats, and the per-project task ceiling
    #[instrument(skip(self, input), fields(project_id = %project_id, task_title = %input.title))]
    pub async fn create_task(&self, project_id: Uuid, input: CreateTask) -> TodoResult<Task> {
        self.ensure_project(project_id).await?;

        input
            .validate()
            .map_err(|e| TodoError::Validation(e.to_string()))?;

        let status = match input.status.as_deref() {
            Some(raw) => parse_status(raw)?,
            None => TaskStatus::default(),
        };

        let deadline = match input.deadline.as_deref() {
            Some(raw) => parse_deadline(raw)?,
            None => None,
        };

        let count = self.tasks.count_by_project(project_id).await?;
        if count >= self.limits.max_tasks {
            return Err(TodoError::TaskLimitExceeded(self.limits.max_tasks));
        }

        self.tasks
            .create(NewTask {
                title: input.title,
                description: input.description,
                status,
                deadline,
                project_id,
            })
            .await
    }

    /// Get a task, verifying it belongs to the given project
    pub async fn get_task(&self, project_id: Uuid, task_id: Uuid) -> TodoResult<Task> {
        self.ensure_project(project_id).await?;

        let task = self
            .tasks
            .get_by_id(task_id)
            .await?
            .ok_or(TodoError::TaskNotFound(task_id))?;

        if task.project_id != project_id {
            return Err(TodoError::Validation(format!(
                "Task {} does not belong to project {}",
                task_id, project_id
            )));
        }

        Ok(task)
    }

    /// List a project's tasks, ascending by creation time
    pub async fn list_tasks(&self, project_id: Uuid) -> TodoResult<Vec<Task>> {
        self.ensure_project(project_id).await?;
        self.tasks.list_by_project(project_id).await
    }

    /// Change a task's status. Entering done stamps `closed_at`; leaving
    /// done clears it.
    #[instrument(skip(self), fields(project_id = %project_id, task_id = %task_id))]
    pub async fn change_task_status(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        new_status: &str,
    ) -> TodoResult<Task> {
        self.get_task(project_id, task_id).await?;

        let status = parse_status(new_status)?;

        self.tasks
            .update(
                task_id,
                TaskChanges {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await
    }

    /// Apply a partial update; omitted fields keep their current value.
    /// Status changes follow the same `closed_at` rule as
    /// [`change_task_status`](Self::change_task_status).
    #[instrument(skip(self, input), fields(project_id = %project_id, task_id = %task_id))]
    pub async fn edit_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        input: UpdateTask,
    ) -> TodoResult<Task> {
        self.get_task(project_id, task_id).await?;

        input
            .validate()
            .map_err(|e| TodoError::Validation(e.to_string()))?;

        let status = match input.status.as_deref() {
            Some(raw) => Some(parse_status(raw)?),
            None => None,
        };

        // An empty string clears the deadline; absence leaves it unchanged
        let deadline = match input.deadline.as_deref() {
            Some(raw) => Some(parse_deadline(raw)?),
            None => None,
        };

        self.tasks
            .update(
                task_id,
                TaskChanges {
                    title: input.title,
                    description: input.description,
                    status,
                    deadline,
                },
            )
            .await
    }

    /// Delete a task, verifying it belongs to the given project
    #[instrument(skip(self), fields(project_id = %project_id, task_id = %task_id))]
    pub async fn delete_task(&self, project_id: Uuid, task_id: Uuid) -> TodoResult<()> {
        self.get_task(project_id, task_id).await?;

        let deleted = self.tasks.delete(task_id).await?;
        if !deleted {
            return Err(TodoError::TaskNotFound(task_id));
        }

        Ok(())
    }

    /// List every overdue, unfinished task across all projects
    pub async fn list_overdue(&self, now: DateTime<Utc>) -> TodoResult<Vec<Task>> {
        self.tasks.find_overdue_open(now).await
    }

    /// Close every overdue, unfinished task and return how many were closed.
    ///
    /// The whole batch commits as one unit of work; a failure closes
    /// nothing. Running twice in a row closes the same task at most once.
    #[instrument(skip(self))]
    pub async fn autoclose_overdue(&self, now: DateTime<Utc>) -> TodoResult<usize> {
        let closed = self.tasks.close_overdue(now).await?;

        for task in &closed {
            tracing::info!(task_id = %task.id, title = %task.title, "Auto-closed overdue task");
        }

        Ok(closed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Project;
    use crate::repository::{MockProjectRepository, MockTaskRepository};

    fn limits(max_tasks: usize) -> LimitsConfig {
        LimitsConfig {
            max_projects: 10,
            max_tasks,
        }
    }

    fn project_repo_with(project: Project) -> MockProjectRepository {
        let mut mock = MockProjectRepository::new();
        mock.expect_get_by_id()
            .returning(move |id| {
                if id == project.id {
                    Ok(Some(project.clone()))
                } else {
                    Ok(None)
                }
            });
        mock
    }

    fn sample_project() -> Project {
        Project {
            id: Uuid::now_v7(),
            name: "Launch".to_string(),
            description: None,
            created_at: Utc::now(),
        }
    }

    fn sample_task(project_id: Uuid) -> Task {
        Task::new(NewTask {
            title: "Write spec".to_string(),
            description: None,
            status: TaskStatus::Todo,
            deadline: None,
            project_id,
        })
    }

    fn create_input(title: &str) -> CreateTask {
        CreateTask {
            title: title.to_string(),
            description: None,
            status: None,
            deadline: None,
        }
    }

    #[tokio::test]
    async fn test_create_task_defaults_to_todo() {
        let project = sample_project();
        let project_id = project.id;

        let mut task_repo = MockTaskRepository::new();
        task_repo.expect_count_by_project().returning(|_| Ok(0));
        task_repo
            .expect_create()
            .withf(|input| input.status == TaskStatus::Todo && input.deadline.is_none())
            .returning(|input| Ok(Task::new(input)));

        let service = TaskService::new(project_repo_with(project), task_repo, limits(100));
        let task = service
            .create_task(project_id, create_input("Write spec"))
            .await
            .unwrap();

        assert_eq!(task.status, TaskStatus::Todo);
        assert!(task.closed_at.is_none());
        assert_eq!(task.project_id, project_id);
    }

    #[tokio::test]
    async fn test_create_task_missing_project_fails() {
        let mut project_repo = MockProjectRepository::new();
        project_repo.expect_get_by_id().returning(|_| Ok(None));
        let task_repo = MockTaskRepository::new();

        let service = TaskService::new(project_repo, task_repo, limits(100));
        let result = service
            .create_task(Uuid::now_v7(), create_input("Write spec"))
            .await;

        assert!(matches!(result, Err(TodoError::ProjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_task_invalid_status_fails() {
        let project = sample_project();
        let project_id = project.id;
        let task_repo = MockTaskRepository::new();

        let service = TaskService::new(project_repo_with(project), task_repo, limits(100));
        let mut input = create_input("Write spec");
        input.status = Some("urgent".to_string());

        let result = service.create_task(project_id, input).await;
        assert!(matches!(result, Err(TodoError::InvalidStatus(_))));
    }

    #[tokio::test]
    async fn test_create_task_accepts_mixed_case_status() {
        let project = sample_project();
        let project_id = project.id;

        let mut task_repo = MockTaskRepository::new();
        task_repo.expect_count_by_project().returning(|_| Ok(0));
        task_repo
            .expect_create()
            .withf(|input| input.status == TaskStatus::Doing)
            .returning(|input| Ok(Task::new(input)));

        let service = TaskService::new(project_repo_with(project), task_repo, limits(100));
        let mut input = create_input("Write spec");
        input.status = Some("DoInG".to_string());

        let result = service.create_task(project_id, input).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_task_wrong_deadline_separator_fails() {
        let project = sample_project();
        let project_id = project.id;
        let task_repo = MockTaskRepository::new();

        let service = TaskService::new(project_repo_with(project), task_repo, limits(100));
        let mut input = create_input("Write spec");
        input.deadline = Some("2020/01/01".to_string());

        let result = service.create_task(project_id, input).await;
        assert!(matches!(result, Err(TodoError::InvalidDeadline(_))));
    }

    #[tokio::test]
    async fn test_create_task_invalid_calendar_date_fails() {
        let project = sample_project();
        let project_id = project.id;
        let task_repo = MockTaskRepository::new();

        let service = TaskService::new(project_repo_with(project), task_repo, limits(100));
        let mut input = create_input("Write spec");
        input.deadline = Some("2020-02-30".to_string());

        let result = service.create_task(project_id, input).await;
        assert!(matches!(result, Err(TodoError::InvalidDeadline(_))));
    }

    #[tokio::test]
    async fn test_create_task_past_deadline_accepted() {
        let project = sample_project();
        let project_id = project.id;

        let mut task_repo = MockTaskRepository::new();
        task_repo.expect_count_by_project().returning(|_| Ok(0));
        task_repo
            .expect_create()
            .returning(|input| Ok(Task::new(input)));

        let service = TaskService::new(project_repo_with(project), task_repo, limits(100));
        let mut input = create_input("Write spec");
        input.deadline = Some("2020-01-01".to_string());

        let task = service.create_task(project_id, input).await.unwrap();
        assert_eq!(task.deadline, NaiveDate::from_ymd_opt(2020, 1, 1));
    }

    #[tokio::test]
    async fn test_create_task_at_limit_fails() {
        let project = sample_project();
        let project_id = project.id;

        let mut task_repo = MockTaskRepository::new();
        task_repo.expect_count_by_project().returning(|_| Ok(100));

        let service = TaskService::new(project_repo_with(project), task_repo, limits(100));
        let result = service
            .create_task(project_id, create_input("Write spec"))
            .await;

        assert!(matches!(result, Err(TodoError::TaskLimitExceeded(100))));
    }

    #[tokio::test]
    async fn test_change_status_rejects_foreign_task() {
        let project = sample_project();
        let project_id = project.id;

        // The task belongs to some other project
        let foreign_task = sample_task(Uuid::now_v7());
        let task_id = foreign_task.id;

        let mut task_repo = MockTaskRepository::new();
        task_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(foreign_task.clone())));

        let service = TaskService::new(project_repo_with(project), task_repo, limits(100));
        let result = service
            .change_task_status(project_id, task_id, "done")
            .await;

        assert!(matches!(result, Err(TodoError::Validation(_))));
    }

    #[tokio::test]
    async fn test_change_status_passes_parsed_status_to_storage() {
        let project = sample_project();
        let project_id = project.id;
        let task = sample_task(project_id);
        let task_id = task.id;

        let mut task_repo = MockTaskRepository::new();
        let fetched = task.clone();
        task_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(fetched.clone())));
        task_repo
            .expect_update()
            .withf(|_, changes| {
                *changes
                    == TaskChanges {
                        status: Some(TaskStatus::Done),
                        ..Default::default()
                    }
            })
            .returning(move |_, changes| {
                let mut updated = task.clone();
                updated.apply_changes(changes, Utc::now());
                Ok(updated)
            });

        let service = TaskService::new(project_repo_with(project), task_repo, limits(100));
        let updated = service
            .change_task_status(project_id, task_id, "DONE")
            .await
            .unwrap();

        assert_eq!(updated.status, TaskStatus::Done);
        assert!(updated.closed_at.is_some());
    }

    #[tokio::test]
    async fn test_change_status_invalid_value_fails() {
        let project = sample_project();
        let project_id = project.id;
        let task = sample_task(project_id);
        let task_id = task.id;

        let mut task_repo = MockTaskRepository::new();
        task_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(task.clone())));

        let service = TaskService::new(project_repo_with(project), task_repo, limits(100));
        let result = service
            .change_task_status(project_id, task_id, "blocked")
            .await;

        assert!(matches!(result, Err(TodoError::InvalidStatus(_))));
    }

    #[tokio::test]
    async fn test_edit_task_empty_deadline_clears_it() {
        let project = sample_project();
        let project_id = project.id;
        let mut task = sample_task(project_id);
        task.deadline = NaiveDate::from_ymd_opt(2026, 6, 1);
        let task_id = task.id;

        let mut task_repo = MockTaskRepository::new();
        let fetched = task.clone();
        task_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(fetched.clone())));
        task_repo
            .expect_update()
            .withf(|_, changes| changes.deadline == Some(None))
            .returning(move |_, changes| {
                let mut updated = task.clone();
                updated.apply_changes(changes, Utc::now());
                Ok(updated)
            });

        let service = TaskService::new(project_repo_with(project), task_repo, limits(100));
        let updated = service
            .edit_task(
                project_id,
                task_id,
                UpdateTask {
                    deadline: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.deadline.is_none());
    }

    #[tokio::test]
    async fn test_edit_task_missing_task_fails() {
        let project = sample_project();
        let project_id = project.id;

        let mut task_repo = MockTaskRepository::new();
        task_repo.expect_get_by_id().returning(|_| Ok(None));

        let service = TaskService::new(project_repo_with(project), task_repo, limits(100));
        let result = service
            .edit_task(project_id, Uuid::now_v7(), UpdateTask::default())
            .await;

        assert!(matches!(result, Err(TodoError::TaskNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_tasks_missing_project_fails() {
        let mut project_repo = MockProjectRepository::new();
        project_repo.expect_get_by_id().returning(|_| Ok(None));
        let task_repo = MockTaskRepository::new();

        let service = TaskService::new(project_repo, task_repo, limits(100));
        let result = service.list_tasks(Uuid::now_v7()).await;

        assert!(matches!(result, Err(TodoError::ProjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_autoclose_reports_count() {
        let project_repo = MockProjectRepository::new();
        let project_id = Uuid::now_v7();

        let mut task_repo = MockTaskRepository::new();
        task_repo.expect_close_overdue().returning(move |now| {
            let mut first = sample_task(project_id);
            first.set_status(TaskStatus::Done, now);
            let mut second = sample_task(project_id);
            second.set_status(TaskStatus::Done, now);
            Ok(vec![first, second])
        });

        let service = TaskService::new(project_repo, task_repo, limits(100));
        let count = service.autoclose_overdue(Utc::now()).await.unwrap();

        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn test_autoclose_no_overdue_reports_zero() {
        let project_repo = MockProjectRepository::new();

        let mut task_repo = MockTaskRepository::new();
        task_repo.expect_close_overdue().returning(|_| Ok(vec![]));

        let service = TaskService::new(project_repo, task_repo, limits(100));
        let count = service.autoclose_overdue(Utc::now()).await.unwrap();

        assert_eq!(count, 0);
    }
}
