//! Cron-driven heartbeat running alongside the dispatcher.

use std::time::Instant;

use anyhow::{Context, Result};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::info;

use crate::commands::format_uptime;

/// The uptime log job. `cron_expr` uses the six-field form with seconds.
pub fn heartbeat_job(cron_expr: &str, started_at: Instant) -> Result<Job> {
    Job::new_async(cron_expr, move |_uuid, _lock| {
        Box::pin(async move {
            info!(uptime = %format_uptime(started_at.elapsed()), "Heartbeat: bot is alive");
        })
    })
    .with_context(|| format!("Invalid heartbeat cron expression '{}'", cron_expr))
}

/// Schedule the heartbeat and start the scheduler. The returned handle
/// must be kept alive for as long as the job should run.
pub async fn start_heartbeat(cron_expr: &str, started_at: Instant) -> Result<JobScheduler> {
    let job = heartbeat_job(cron_expr, started_at)?;
    let scheduler = JobScheduler::new()
        .await
        .context("Failed to create job scheduler")?;
    scheduler
        .add(job)
        .await
        .context("Failed to add heartbeat job")?;
    scheduler
        .start()
        .await
        .context("Failed to start scheduler")?;

    info!("Heartbeat scheduled with cron: {}", cron_expr);
    Ok(scheduler)
}
