use std::sync::Arc;

use crate::{
    api::shared::trigger_snapshot_capture,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{extract::State, routing::post, Json, Router};
use marginwatch_core::sync::{SyncReport, SyncServiceTrait};

fn sync_service(state: &AppState) -> ApiResult<Arc<dyn SyncServiceTrait>> {
    state
        .sync_service
        .clone()
        .ok_or_else(|| ApiError::NotImplemented("Sync is not configured".to_string()))
}

async fn push(State(state): State<Arc<AppState>>) -> ApiResult<Json<SyncReport>> {
    let report = sync_service(&state)?.push_all().await?;
    if !report.all_succeeded() {
        tracing::warn!("Sync push failed for {:?}", report.failed());
    }
    Ok(Json(report))
}

async fn pull(State(state): State<Arc<AppState>>) -> ApiResult<Json<SyncReport>> {
    let report = sync_service(&state)?.pull_all().await?;
    if !report.all_succeeded() {
        tracing::warn!("Sync pull failed for {:?}", report.failed());
    }
    trigger_snapshot_capture(state);
    Ok(Json(report))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sync/push", post(push))
        .route("/sync/pull", post(pull))
}
