use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use marginwatch_core::snapshots::{Snapshot, SnapshotKey};

async fn list_snapshots(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Snapshot>>> {
    Ok(Json(state.snapshot_service.list()?))
}

async fn latest_snapshot(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Option<Snapshot>>> {
    Ok(Json(state.snapshot_service.latest()?))
}

/// Captures now, regardless of the capture window.
async fn capture_snapshot(State(state): State<Arc<AppState>>) -> ApiResult<Json<Snapshot>> {
    let analysis = state.position_service.analyze();
    let snapshot = state.snapshot_service.force_capture(&analysis).await?;
    Ok(Json(snapshot))
}

async fn delete_snapshot(
    Path(key): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let key: SnapshotKey = key.parse()?;
    state.snapshot_service.delete(key).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/snapshots", get(list_snapshots))
        .route("/snapshots/latest", get(latest_snapshot))
        .route("/snapshots/capture", post(capture_snapshot))
        .route("/snapshots/{key}", delete(delete_snapshot))
}
