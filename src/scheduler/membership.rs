use chrono::Local;
use dioxus_logger::tracing;
use serenity::http::Http;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{
    error::AppError, scheduler::ready::ReadySignal, service::membership::MembershipSyncService,
    state::BotState,
};

/// Every two minutes, on the minute.
const CHALLENGE_SWEEP_CRON: &str = "0 */2 * * * *";

/// Registers the daily membership check and the challenge sweep.
///
/// Cron expressions are validated here; the scheduler itself starts in a
/// background task once the bot is ready. The returned handle is used to
/// shut the jobs down.
///
/// # Arguments
/// - `state` - Bot state shared with the jobs
/// - `discord_http` - Discord HTTP client used to apply roles
/// - `membership_cron` - Six-field cron expression, evaluated in local time
///
/// # Returns
/// - `Ok(JobScheduler)` - Scheduler with both jobs registered
/// - `Err(AppError::SchedulerErr)` - Invalid cron expression or scheduler failure
pub async fn start_scheduler(
    state: BotState,
    discord_http: Arc<Http>,
    membership_cron: &str,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    let job_state = state.clone();
    let membership_job = Job::new_async_tz(membership_cron, Local, move |_uuid, _lock| {
        let state = job_state.clone();
        let http = discord_http.clone();

        Box::pin(async move {
            if let Err(e) = run_membership_check(&state, &http).await {
                tracing::error!("Membership check failed: {}", e);
            }
        })
    })?;

    let sweep_state = state.clone();
    let sweep_job = Job::new_async(CHALLENGE_SWEEP_CRON, move |_uuid, _lock| {
        let state = sweep_state.clone();

        Box::pin(async move {
            if let Err(e) = state.verification.sweep_expired().await {
                tracing::error!("Failed to sweep expired verifications: {}", e);
            }
        })
    })?;

    scheduler.add(membership_job).await?;
    scheduler.add(sweep_job).await?;

    start_when_ready(state.ready.clone(), scheduler.clone());

    Ok(scheduler)
}

/// Starts `scheduler` in a background task once `ready` is raised.
fn start_when_ready(ready: ReadySignal, scheduler: JobScheduler) -> JoinHandle<()> {
    tokio::spawn(async move {
        ready.wait().await;

        match scheduler.start().await {
            Ok(()) => tracing::info!("Membership scheduler started"),
            Err(e) => tracing::error!("Failed to start membership scheduler: {}", e),
        }
    })
}

/// Runs one membership check against the live guild.
pub async fn run_membership_check(state: &BotState, discord_http: &Http) -> Result<(), AppError> {
    tracing::info!("Starting membership check for guild {}", state.guild_id);

    MembershipSyncService::new(
        &state.db,
        &state.galtinn,
        discord_http,
        &state.roles,
        state.guild_id,
    )
    .sync_all()
    .await?;

    Ok(())
}
