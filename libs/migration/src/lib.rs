pub use sea_orm_migration::prelude::*;

mod m20260315_000000_create_projects;
mod m20260315_000001_create_tasks;
mod m20260315_000002_create_scheduler_jobs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260315_000000_create_projects::Migration),
            Box::new(m20260315_000001_create_tasks::Migration),
            Box::new(m20260315_000002_create_scheduler_jobs::Migration),
        ]
    }
}
