//! Recurring autoclose scheduling.
//!
//! The sweep itself lives in the task service; this module wires it to a
//! job scheduler with persisted metadata, a non-overlap guard and graceful
//! shutdown.

use chrono::{DateTime, Utc};
use domain_todo::{PgProjectRepository, PgTaskRepository, TaskService};
use eyre::Result;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::jobs::{AUTOCLOSE_JOB_ID, JobStore};

/// Snapshot of the worker's persisted job and current backlog
#[derive(Debug, Serialize)]
pub struct WorkerStatus {
    pub job_id: &'static str,
    pub registered: bool,
    pub interval_secs: Option<i64>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub overdue_open_tasks: usize,
}

fn build_task_service(
    db: &DatabaseConnection,
    config: &Config,
) -> TaskService<PgProjectRepository, PgTaskRepository> {
    TaskService::new(
        PgProjectRepository::new(db.clone()),
        PgTaskRepository::new(db.clone()),
        config.limits,
    )
}

/// Run a single autoclose sweep and record it in the job metadata.
///
/// The sweep commits as one transaction; on failure no task is closed and
/// `last_run_at` is left untouched.
pub async fn run_once(db: &DatabaseConnection, config: &Config) -> Result<usize> {
    let service = build_task_service(db, config);

    let now = Utc::now();
    let closed = service.autoclose_overdue(now).await?;

    JobStore::new(db.clone())
        .touch_last_run(AUTOCLOSE_JOB_ID, now)
        .await?;

    Ok(closed)
}

/// Run the recurring schedule until SIGINT/SIGTERM.
///
/// The job row in scheduler_jobs is the source of truth for the interval;
/// `interval_override` (the --interval flag) rewrites it.
pub async fn run_scheduled(
    db: DatabaseConnection,
    config: Config,
    interval_override: Option<u64>,
) -> Result<()> {
    let store = JobStore::new(db.clone());

    let job_record = match interval_override {
        Some(secs) => store.set_interval(AUTOCLOSE_JOB_ID, secs).await?,
        None => {
            store
                .ensure(AUTOCLOSE_JOB_ID, config.autoclose_interval_secs)
                .await?
        }
    };
    let interval = Duration::from_secs(job_record.interval_secs as u64);

    info!(
        job_id = AUTOCLOSE_JOB_ID,
        interval_secs = interval.as_secs(),
        "Starting autoclose scheduler"
    );

    // At most one sweep runs at a time; ticks that arrive while a sweep is
    // still in flight are skipped
    let run_guard = Arc::new(Mutex::new(()));

    let mut sched = JobScheduler::new().await?;

    let job_db = db.clone();
    let job_config = config.clone();
    let job_guard = run_guard.clone();

    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let db = job_db.clone();
        let config = job_config.clone();
        let guard = job_guard.clone();

        Box::pin(async move {
            let Ok(_running) = guard.try_lock() else {
                warn!("Previous autoclose run still in progress, skipping this tick");
                return;
            };

            match run_once(&db, &config).await {
                Ok(closed) => {
                    info!(closed, "Autoclose run complete");
                }
                Err(e) => {
                    // Leave the schedule running; the next tick retries
                    error!(error = %e, "Autoclose run failed");
                }
            }
        })
    })?;

    sched.add(job).await?;
    sched.start().await?;

    shutdown_signal().await;

    info!("Stopping scheduler");
    sched.shutdown().await?;

    // Taking the guard proves no sweep is mid-flight
    let _quiesced = run_guard.lock().await;

    info!("Autoclose scheduler stopped");
    Ok(())
}

/// Report the persisted job entry and the size of the overdue backlog
pub async fn status(db: &DatabaseConnection, config: &Config) -> Result<WorkerStatus> {
    let job = JobStore::new(db.clone()).get(AUTOCLOSE_JOB_ID).await?;

    let service = build_task_service(db, config);
    let overdue = service.list_overdue(Utc::now()).await?;

    Ok(WorkerStatus {
        job_id: AUTOCLOSE_JOB_ID,
        registered: job.is_some(),
        interval_secs: job.as_ref().map(|j| j.interval_secs),
        last_run_at: job.and_then(|j| j.last_run_at.map(Into::into)),
        overdue_open_tasks: overdue.len(),
    })
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}
