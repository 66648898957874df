use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::BaseRepository;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{TodoError, TodoResult},
    models::{CreateProject, NewTask, Project, Task, TaskChanges, TaskStatus, UpdateProject},
    repository::{ProjectRepository, TaskRepository},
};

pub struct PgProjectRepository {
    base: BaseRepository<entity::project::Entity>,
}

impl PgProjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn create(&self, input: CreateProject) -> TodoResult<Project> {
        let active_model: entity::project::ActiveModel = input.into();

        let model = self.base.insert(active_model).await?;

        tracing::info!(project_id = %model.id, "Created project");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> TodoResult<Option<Project>> {
        let model = self.base.find_by_id(id).await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self) -> TodoResult<Vec<Project>> {
        let models = entity::project::Entity::find()
            .order_by_asc(entity::project::Column::CreatedAt)
            .all(self.base.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, changes: UpdateProject) -> TodoResult<Project> {
        let model = self
            .base
            .find_by_id(id)
            .await?
            .ok_or(TodoError::ProjectNotFound(id))?;

        let mut project: Project = model.into();
        project.apply_update(changes);

        let active_model: entity::project::ActiveModel = project.into();
        let updated_model = self.base.update(active_model).await?;

        tracing::info!(project_id = %id, "Updated project");
        Ok(updated_model.into())
    }

    async fn delete(&self, id: Uuid) -> TodoResult<bool> {
        // Explicit two-step cascade in one transaction: the tasks go first,
        // then the project, or neither.
        let txn = self.base.db().begin().await?;

        entity::task::Entity::delete_many()
            .filter(entity::task::Column::ProjectId.eq(id))
            .exec(&txn)
            .await?;

        let result = entity::project::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        if result.rows_affected > 0 {
            tracing::info!(project_id = %id, "Deleted project and its tasks");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn count(&self) -> TodoResult<usize> {
        let count = entity::project::Entity::find()
            .count(self.base.db())
            .await?;

        Ok(count as usize)
    }

    async fn exists_by_name(&self, name: &str, exclude: Option<Uuid>) -> TodoResult<bool> {
        let mut query =
            entity::project::Entity::find().filter(entity::project::Column::Name.eq(name));

        if let Some(excluded_id) = exclude {
            query = query.filter(entity::project::Column::Id.ne(excluded_id));
        }

        let exists = query.one(self.base.db()).await?.is_some();
        Ok(exists)
    }
}

pub struct PgTaskRepository {
    base: BaseRepository<entity::task::Entity>,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, input: NewTask) -> TodoResult<Task> {
        let active_model: entity::task::ActiveModel = input.into();

        let model = self.base.insert(active_model).await?;

        tracing::info!(task_id = %model.id, project_id = %model.project_id, "Created task");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> TodoResult<Option<Task>> {
        let model = self.base.find_by_id(id).await?;
        Ok(model.map(Into::into))
    }

    async fn list_by_project(&self, project_id: Uuid) -> TodoResult<Vec<Task>> {
        let models = entity::task::Entity::find()
            .filter(entity::task::Column::ProjectId.eq(project_id))
            .order_by_asc(entity::task::Column::CreatedAt)
            .all(self.base.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, changes: TaskChanges) -> TodoResult<Task> {
        let model = self
            .base
            .find_by_id(id)
            .await?
            .ok_or(TodoError::TaskNotFound(id))?;

        let mut task: Task = model.into();
        task.apply_changes(changes, Utc::now());

        let active_model: entity::task::ActiveModel = task.into();
        let updated_model = self.base.update(active_model).await?;

        tracing::info!(task_id = %id, "Updated task");
        Ok(updated_model.into())
    }

    async fn delete(&self, id: Uuid) -> TodoResult<bool> {
        let rows_affected = self.base.delete_by_id(id).await?;

        if rows_affected > 0 {
            tracing::info!(task_id = %id, "Deleted task");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn count_by_project(&self, project_id: Uuid) -> TodoResult<usize> {
        let count = entity::task::Entity::find()
            .filter(entity::task::Column::ProjectId.eq(project_id))
            .count(self.base.db())
            .await?;

        Ok(count as usize)
    }

    async fn find_overdue_open(&self, now: DateTime<Utc>) -> TodoResult<Vec<Task>> {
        let models = entity::task::Entity::find()
            // A deadline marks the start of its day, so anything dated today
            // or earlier has passed
            .filter(entity::task::Column::Deadline.lte(now.date_naive()))
            .filter(entity::task::Column::Status.ne(TaskStatus::Done))
            .order_by_asc(entity::task::Column::CreatedAt)
            .all(self.base.db())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn close_overdue(&self, now: DateTime<Utc>) -> TodoResult<Vec<Task>> {
        // All matching tasks close in one transaction; an interrupted batch
        // leaves nothing half-closed.
        let txn = self.base.db().begin().await?;

        let models = entity::task::Entity::find()
            .filter(entity::task::Column::Deadline.lte(now.date_naive()))
            .filter(entity::task::Column::Status.ne(TaskStatus::Done))
            .order_by_asc(entity::task::Column::CreatedAt)
            .all(&txn)
            .await?;

        let mut closed = Vec::with_capacity(models.len());
        for model in models {
            let mut task: Task = model.into();
            task.set_status(TaskStatus::Done, now);

            let active_model: entity::task::ActiveModel = task.into();
            let updated = active_model.update(&txn).await?;
            closed.push(updated.into());
        }

        txn.commit().await?;

        Ok(closed)
    }
}
