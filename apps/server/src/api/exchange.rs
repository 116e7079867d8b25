use std::sync::Arc;

use crate::{api::shared::trigger_snapshot_capture, error::ApiResult, main_lib::AppState};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use marginwatch_core::exchange::{ExportBundle, ImportSummary};

async fn export_data(State(state): State<Arc<AppState>>) -> ApiResult<Json<ExportBundle>> {
    Ok(Json(state.exchange_service.export()?))
}

/// Takes the raw document so format errors come back as import failures
/// rather than generic body rejections.
async fn import_data(
    State(state): State<Arc<AppState>>,
    body: String,
) -> ApiResult<Json<ImportSummary>> {
    let summary = state.exchange_service.import_json(&body).await?;
    tracing::info!(
        "Imported {} positions, {} debts, {} snapshots, {} goals",
        summary.positions,
        summary.debts,
        summary.snapshots,
        summary.goals
    );
    trigger_snapshot_capture(state);
    Ok(Json(summary))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/export", get(export_data))
        .route("/import", post(import_data))
}
