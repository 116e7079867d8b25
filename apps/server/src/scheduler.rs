//! Background scheduler for periodic snapshot capture.
//!
//! A capture happens at most once per market date and only outside the
//! trading session; the check itself runs on a fixed interval.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::main_lib::AppState;

/// Owns the scheduler task. Dropping the handle cancels it.
pub struct SchedulerHandle {
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Stops the scheduler and waits for the task to wind down.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            info!("Snapshot scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Starts the periodic snapshot check. The first check runs immediately.
pub fn start_snapshot_scheduler(state: Arc<AppState>, every: Duration) -> SchedulerHandle {
    let task = tokio::spawn(async move {
        info!("Snapshot scheduler started ({}s interval)", every.as_secs());

        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            run_scheduled_capture(&state).await;
        }
    });
    SchedulerHandle { task: Some(task) }
}

/// Runs a single scheduled check.
async fn run_scheduled_capture(state: &Arc<AppState>) {
    let analysis = state.position_service.analyze();
    match state.snapshot_service.maybe_capture(&analysis).await {
        Ok(Some(snapshot)) => {
            info!(
                "Scheduled snapshot {} captured (net worth {})",
                snapshot.key, snapshot.net_worth
            );
            if let Err(e) = state
                .goal_service
                .mark_achievements(analysis.net_worth, chrono::Utc::now())
                .await
            {
                warn!("Goal achievement check failed: {}", e);
            }
        }
        Ok(None) => debug!("Scheduled snapshot skipped: outside window or already captured"),
        Err(e) => warn!("Scheduled snapshot failed: {}", e),
    }
}
