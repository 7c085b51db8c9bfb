//! Background recompute scheduler.
//!
//! Registers a single cron job that runs the full refresh cycle on the
//! configured cadence. A failed cycle is logged and the previous snapshot
//! stays current; the retry is simply the next tick — staleness is an
//! acceptable degraded state, so there is no backoff machinery.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use stockdash_core::AppConfig;
use stockdash_store::SnapshotStore;

use crate::refresh::run_refresh_cycle;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    config: Arc<AppConfig>,
    store: Arc<SnapshotStore>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let cron = config.recompute_cron.clone();
    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let config = Arc::clone(&config);
        let store = Arc::clone(&store);
        Box::pin(async move {
            run_scheduled_refresh(config, store).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

async fn run_scheduled_refresh(config: Arc<AppConfig>, store: Arc<SnapshotStore>) {
    tracing::info!("scheduler: starting refresh cycle");
    let outcome = tokio::task::spawn_blocking(move || run_refresh_cycle(&config, &store)).await;
    match outcome {
        Ok(Ok(())) => tracing::info!("scheduler: refresh cycle complete"),
        Ok(Err(error)) => tracing::error!(
            %error,
            "scheduler: refresh failed; serving previous snapshot until next tick"
        ),
        Err(join_error) => tracing::error!(%join_error, "scheduler: refresh task panicked"),
    }
}
