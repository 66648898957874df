use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Recurring-job metadata. Jobs are keyed by a stable string id so a
        // restarting worker recognizes its own entry instead of duplicating it.
        manager
            .create_table(
                Table::create()
                    .table(SchedulerJobs::Table)
                    .if_not_exists()
                    .col(string(SchedulerJobs::Id).primary_key())
                    .col(big_integer(SchedulerJobs::IntervalSecs))
                    .col(timestamp_with_time_zone_null(SchedulerJobs::LastRunAt))
                    .col(
                        timestamp_with_time_zone(SchedulerJobs::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(SchedulerJobs::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SchedulerJobs::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum SchedulerJobs {
    Table,
    Id,
    IntervalSecs,
    LastRunAt,
    CreatedAt,
    UpdatedAt,
}
