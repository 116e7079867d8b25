use std::sync::Arc;

use crate::{api::shared::trigger_snapshot_capture, error::ApiResult, main_lib::AppState};
use axum::{extract::State, routing::post, Json, Router};
use marginwatch_core::market_data::PriceRefreshReport;

async fn refresh_prices(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PriceRefreshReport>> {
    let report = state.market_data_service.refresh_prices().await?;
    if report.has_failures() {
        tracing::warn!(
            "Price refresh kept {} stale value(s)",
            report.failed.len()
        );
    }
    if !report.updated.is_empty() {
        trigger_snapshot_capture(state);
    }
    Ok(Json(report))
}

async fn refresh_rates(State(state): State<Arc<AppState>>) -> ApiResult<Json<PriceRefreshReport>> {
    let report = state.market_data_service.refresh_rates().await?;
    if !report.updated.is_empty() {
        trigger_snapshot_capture(state);
    }
    Ok(Json(report))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/market-data/refresh-prices", post(refresh_prices))
        .route("/market-data/refresh-rates", post(refresh_rates))
}
