use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{TodoError, TodoResult};
use crate::models::{
    CreateProject, NewTask, Project, Task, TaskChanges, TaskStatus, UpdateProject,
};

/// Repository trait for Project persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Create a new project, assigning its id and creation timestamp
    async fn create(&self, input: CreateProject) -> TodoResult<Project>;

    /// Get a project by ID
    async fn get_by_id(&self, id: Uuid) -> TodoResult<Option<Project>>;

    /// List all projects, ascending by creation time
    async fn list(&self) -> TodoResult<Vec<Project>>;

    /// Apply a partial update to an existing project
    async fn update(&self, id: Uuid, changes: UpdateProject) -> TodoResult<Project>;

    /// Delete a project and all of its tasks as one unit of work.
    /// Returns false if the project did not exist.
    async fn delete(&self, id: Uuid) -> TodoResult<bool>;

    /// Count all projects
    async fn count(&self) -> TodoResult<usize>;

    /// Check whether a project with this exact name exists, optionally
    /// excluding one project id (for renames)
    async fn exists_by_name(&self, name: &str, exclude: Option<Uuid>) -> TodoResult<bool>;
}

/// Repository trait for Task persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a new task, assigning its id and creation timestamp
    async fn create(&self, input: NewTask) -> TodoResult<Task>;

    /// Get a task by ID
    async fn get_by_id(&self, id: Uuid) -> TodoResult<Option<Task>>;

    /// List a project's tasks, ascending by creation time
    async fn list_by_project(&self, project_id: Uuid) -> TodoResult<Vec<Task>>;

    /// Apply a partial update to an existing task
    async fn update(&self, id: Uuid, changes: TaskChanges) -> TodoResult<Task>;

    /// Delete a task by ID. Returns false if the task did not exist.
    async fn delete(&self, id: Uuid) -> TodoResult<bool>;

    /// Count tasks belonging to a project
    async fn count_by_project(&self, project_id: Uuid) -> TodoResult<usize>;

    /// Find tasks whose deadline has passed and whose status is not done
    async fn find_overdue_open(&self, now: DateTime<Utc>) -> TodoResult<Vec<Task>>;

    /// Close every overdue, unfinished task as one unit of work and return
    /// the closed tasks. Either all matching tasks are closed or none are.
    async fn close_overdue(&self, now: DateTime<Utc>) -> TodoResult<Vec<Task>>;
}

/// In-memory implementation of both repositories (for development/testing)
///
/// One store backs both traits so cross-entity operations (cascade delete)
/// can hold both maps at once.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRepository {
    projects: Arc<RwLock<HashMap<Uuid, Project>>>,
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryRepository {
    async fn create(&self, input: CreateProject) -> TodoResult<Project> {
        let mut projects = self.projects.write().await;

        // Mirror the unique index the persistent backend carries
        if projects.values().any(|p| p.name == input.name) {
            return Err(TodoError::DuplicateProjectName(input.name));
        }

        let project = Project::new(input);
        projects.insert(project.id, project.clone());

        tracing::info!(project_id = %project.id, "Created project");
        Ok(project)
    }

    async fn get_by_id(&self, id: Uuid) -> TodoResult<Option<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.get(&id).cloned())
    }

    async fn list(&self) -> TodoResult<Vec<Project>> {
        let projects = self.projects.read().await;

        let mut result: Vec<Project> = projects.values().cloned().collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(result)
    }

    async fn update(&self, id: Uuid, changes: UpdateProject) -> TodoResult<Project> {
        let mut projects = self.projects.write().await;

        let project = projects
            .get_mut(&id)
            .ok_or(TodoError::ProjectNotFound(id))?;
        project.apply_update(changes);
        let updated = project.clone();

        tracing::info!(project_id = %id, "Updated project");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> TodoResult<bool> {
        // Hold both maps so the cascade is atomic with respect to readers
        let mut projects = self.projects.write().await;
        let mut tasks = self.tasks.write().await;

        if projects.remove(&id).is_none() {
            return Ok(false);
        }

        tasks.retain(|_, task| task.project_id != id);

        tracing::info!(project_id = %id, "Deleted project and its tasks");
        Ok(true)
    }

    async fn count(&self) -> TodoResult<usize> {
        let projects = self.projects.read().await;
        Ok(projects.len())
    }

    async fn exists_by_name(&self, name: &str, exclude: Option<Uuid>) -> TodoResult<bool> {
        let projects = self.projects.read().await;
        let exists = projects
            .values()
            .any(|p| p.name == name && Some(p.id) != exclude);
        Ok(exists)
    }
}

#[async_trait]
impl TaskRepository for InMemoryRepository {
    async fn create(&self, input: NewTask) -> TodoResult<Task> {
        let mut tasks = self.tasks.write().await;

        let task = Task::new(input);
        tasks.insert(task.id, task.clone());

        tracing::info!(task_id = %task.id, project_id = %task.project_id, "Created task");
        Ok(task)
    }

    async fn get_by_id(&self, id: Uuid) -> TodoResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn list_by_project(&self, project_id: Uuid) -> TodoResult<Vec<Task>> {
        let tasks = self.tasks.read().await;

        let mut result: Vec<Task> = tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(result)
    }

    async fn update(&self, id: Uuid, changes: TaskChanges) -> TodoResult<Task> {
        let mut tasks = self.tasks.write().await;

        let task = tasks.get_mut(&id).ok_or(TodoError::TaskNotFound(id))?;
        task.apply_changes(changes, Utc::now());
        let updated = task.clone();

        tracing::info!(task_id = %id, "Updated task");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> TodoResult<bool> {
        let mut tasks = self.tasks.write().await;

        if tasks.remove(&id).is_some() {
            tracing::info!(task_id = %id, "Deleted task");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn count_by_project(&self, project_id: Uuid) -> TodoResult<usize> {
        let tasks = self.tasks.read().await;
        Ok(tasks.values().filter(|t| t.project_id == project_id).count())
    }

    async fn find_overdue_open(&self, now: DateTime<Utc>) -> TodoResult<Vec<Task>> {
        let tasks = self.tasks.read().await;

        let mut result: Vec<Task> = tasks
            .values()
            .filter(|t| t.is_overdue(now))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(result)
    }

    async fn close_overdue(&self, now: DateTime<Utc>) -> TodoResult<Vec<Task>> {
        // One write lock for the whole batch: all tasks close or none do
        let mut tasks = self.tasks.write().await;

        let mut closed = Vec::new();
        for task in tasks.values_mut() {
            if task.is_overdue(now) {
                task.set_status(TaskStatus::Done, now);
                closed.push(task.clone());
            }
        }
        closed.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(name: &str) -> CreateProject {
        CreateProject {
            name: name.to_string(),
            description: None,
        }
    }

    fn task_input(project_id: Uuid, title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: None,
            status: TaskStatus::Todo,
            deadline: None,
            project_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_project() {
        let repo = InMemoryRepository::new();

        let project = ProjectRepository::create(&repo, create_input("alpha"))
            .await
            .unwrap();
        assert_eq!(project.name, "alpha");

        let fetched = ProjectRepository::get_by_id(&repo, project.id)
            .await
            .unwrap();
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().id, project.id);
    }

    #[tokio::test]
    async fn test_duplicate_name_error() {
        let repo = InMemoryRepository::new();

        ProjectRepository::create(&repo, create_input("alpha"))
            .await
            .unwrap();

        let result = ProjectRepository::create(&repo, create_input("alpha")).await;
        assert!(matches!(result, Err(TodoError::DuplicateProjectName(_))));
    }

    #[tokio::test]
    async fn test_duplicate_check_is_case_sensitive() {
        let repo = InMemoryRepository::new();

        ProjectRepository::create(&repo, create_input("Launch"))
            .await
            .unwrap();

        // Different case is a different name
        let result = ProjectRepository::create(&repo, create_input("launch")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_list_projects_ordered_by_creation() {
        let repo = InMemoryRepository::new();

        for name in ["first", "second", "third"] {
            ProjectRepository::create(&repo, create_input(name))
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let names: Vec<String> = ProjectRepository::list(&repo)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_cascade_delete_removes_tasks() {
        let repo = InMemoryRepository::new();

        let project = ProjectRepository::create(&repo, create_input("alpha"))
            .await
            .unwrap();
        let other = ProjectRepository::create(&repo, create_input("beta"))
            .await
            .unwrap();

        let task = TaskRepository::create(&repo, task_input(project.id, "one"))
            .await
            .unwrap();
        TaskRepository::create(&repo, task_input(project.id, "two"))
            .await
            .unwrap();
        let kept = TaskRepository::create(&repo, task_input(other.id, "keep"))
            .await
            .unwrap();

        let deleted = ProjectRepository::delete(&repo, project.id).await.unwrap();
        assert!(deleted);

        assert!(
            TaskRepository::get_by_id(&repo, task.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            TaskRepository::list_by_project(&repo, project.id)
                .await
                .unwrap()
                .is_empty()
        );

        // Unrelated project's tasks survive
        assert!(
            TaskRepository::get_by_id(&repo, kept.id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_delete_missing_project_returns_false() {
        let repo = InMemoryRepository::new();
        let deleted = ProjectRepository::delete(&repo, Uuid::now_v7()).await.unwrap();
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_count_by_project() {
        let repo = InMemoryRepository::new();
        let project = ProjectRepository::create(&repo, create_input("alpha"))
            .await
            .unwrap();

        assert_eq!(
            TaskRepository::count_by_project(&repo, project.id)
                .await
                .unwrap(),
            0
        );

        TaskRepository::create(&repo, task_input(project.id, "one"))
            .await
            .unwrap();
        TaskRepository::create(&repo, task_input(project.id, "two"))
            .await
            .unwrap();

        assert_eq!(
            TaskRepository::count_by_project(&repo, project.id)
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_close_overdue_is_idempotent() {
        let repo = InMemoryRepository::new();
        let project = ProjectRepository::create(&repo, create_input("alpha"))
            .await
            .unwrap();

        let now = Utc::now();
        let yesterday = now.date_naive() - chrono::Duration::days(1);
        let tomorrow = now.date_naive() + chrono::Duration::days(1);

        let mut overdue = task_input(project.id, "late");
        overdue.deadline = Some(yesterday);
        TaskRepository::create(&repo, overdue).await.unwrap();

        let mut future = task_input(project.id, "on time");
        future.deadline = Some(tomorrow);
        TaskRepository::create(&repo, future).await.unwrap();

        let closed = TaskRepository::close_overdue(&repo, now).await.unwrap();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].title, "late");
        assert_eq!(closed[0].status, TaskStatus::Done);
        assert_eq!(closed[0].closed_at, Some(now));

        // Second run finds nothing left to close
        let closed_again = TaskRepository::close_overdue(&repo, now).await.unwrap();
        assert!(closed_again.is_empty());
    }

    #[tokio::test]
    async fn test_find_overdue_open_skips_done_tasks() {
        let repo = InMemoryRepository::new();
        let project = ProjectRepository::create(&repo, create_input("alpha"))
            .await
            .unwrap();

        let now = Utc::now();
        let mut input = task_input(project.id, "late but done");
        input.deadline = Some(now.date_naive() - chrono::Duration::days(1));
        input.status = TaskStatus::Done;
        TaskRepository::create(&repo, input).await.unwrap();

        let overdue = TaskRepository::find_overdue_open(&repo, now).await.unwrap();
        assert!(overdue.is_empty());
    }
}
