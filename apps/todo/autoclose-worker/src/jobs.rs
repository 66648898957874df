//! Persistent scheduler-job metadata.
//!
//! The recurring job is keyed by a stable string id; a restarting worker
//! finds its own entry instead of registering a duplicate.

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel};

/// Stable identifier for the recurring autoclose job
pub const AUTOCLOSE_JOB_ID: &str = "autoclose_overdue";

pub mod entity {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    /// SeaORM Entity for the scheduler_jobs table
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "scheduler_jobs")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub interval_secs: i64,
        pub last_run_at: Option<DateTimeWithTimeZone>,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Store for job metadata rows
pub struct JobStore {
    db: DatabaseConnection,
}

impl JobStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetch-or-create the job row.
    ///
    /// An existing row wins: its stored interval is reused so a restart
    /// neither duplicates nor resets the persisted schedule.
    pub async fn ensure(
        &self,
        id: &str,
        default_interval_secs: u64,
    ) -> Result<entity::Model, DbErr> {
        if let Some(existing) = entity::Entity::find_by_id(id).one(&self.db).await? {
            return Ok(existing);
        }

        let now = Utc::now();
        let model = entity::ActiveModel {
            id: Set(id.to_string()),
            interval_secs: Set(default_interval_secs as i64),
            last_run_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        tracing::info!(job_id = id, interval_secs = default_interval_secs, "Registered scheduler job");
        model.insert(&self.db).await
    }

    /// Store an explicitly requested interval, creating the row if needed
    pub async fn set_interval(&self, id: &str, interval_secs: u64) -> Result<entity::Model, DbErr> {
        let job = self.ensure(id, interval_secs).await?;

        if job.interval_secs == interval_secs as i64 {
            return Ok(job);
        }

        let mut active = job.into_active_model();
        active.interval_secs = Set(interval_secs as i64);
        active.updated_at = Set(Utc::now().into());

        tracing::info!(job_id = id, interval_secs, "Updated scheduler job interval");
        active.update(&self.db).await
    }

    /// Get the job row, if registered
    pub async fn get(&self, id: &str) -> Result<Option<entity::Model>, DbErr> {
        entity::Entity::find_by_id(id).one(&self.db).await
    }

    /// Record a completed run
    pub async fn touch_last_run(&self, id: &str, now: DateTime<Utc>) -> Result<(), DbErr> {
        let Some(job) = entity::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(());
        };

        let mut active = job.into_active_model();
        active.last_run_at = Set(Some(now.into()));
        active.updated_at = Set(now.into());
        active.update(&self.db).await?;

        Ok(())
    }
}
