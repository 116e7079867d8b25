use std::sync::Arc;

use crate::main_lib::AppState;

/// Runs a snapshot check in the background after a mutation. The request
/// never waits for it and its failures are only logged.
pub fn trigger_snapshot_capture(state: Arc<AppState>) {
    tokio::spawn(async move {
        let analysis = state.position_service.analyze();
        match state.snapshot_service.maybe_capture(&analysis).await {
            Ok(Some(snapshot)) => {
                tracing::info!("Captured snapshot {} after mutation", snapshot.key);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Snapshot capture after mutation failed: {}", e),
        }
        if let Err(e) = state
            .goal_service
            .mark_achievements(analysis.net_worth, chrono::Utc::now())
            .await
        {
            tracing::warn!("Goal achievement check failed: {}", e);
        }
    });
}
