use std::sync::Arc;

use crate::{api::shared::trigger_snapshot_capture, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use marginwatch_core::{
    positions::{
        CryptoPosition, DebtItem, ForeignEquityPosition, LocalEquityPosition, PositionKind,
        PositionState,
    },
    risk::AnalysisResult,
    settings::{PortfolioSettings, SettingsUpdate},
};

async fn get_state(State(state): State<Arc<AppState>>) -> Json<PositionState> {
    Json(state.position_service.get_state())
}

async fn get_analysis(State(state): State<Arc<AppState>>) -> Json<AnalysisResult> {
    Json(state.position_service.analyze())
}

async fn get_settings(State(state): State<Arc<AppState>>) -> Json<PortfolioSettings> {
    Json(state.position_service.get_state().settings)
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SettingsUpdate>,
) -> ApiResult<Json<PortfolioSettings>> {
    let updated = state.position_service.update_settings(payload).await?;
    trigger_snapshot_capture(state);
    Ok(Json(updated.settings))
}

async fn upsert_local_equity(
    State(state): State<Arc<AppState>>,
    Json(position): Json<LocalEquityPosition>,
) -> ApiResult<Json<LocalEquityPosition>> {
    let stored = state.position_service.upsert_local_equity(position).await?;
    trigger_snapshot_capture(state);
    Ok(Json(stored))
}

async fn upsert_foreign_equity(
    State(state): State<Arc<AppState>>,
    Json(position): Json<ForeignEquityPosition>,
) -> ApiResult<Json<ForeignEquityPosition>> {
    let stored = state.position_service.upsert_foreign_equity(position).await?;
    trigger_snapshot_capture(state);
    Ok(Json(stored))
}

async fn upsert_crypto(
    State(state): State<Arc<AppState>>,
    Json(position): Json<CryptoPosition>,
) -> ApiResult<Json<CryptoPosition>> {
    let stored = state.position_service.upsert_crypto(position).await?;
    trigger_snapshot_capture(state);
    Ok(Json(stored))
}

async fn upsert_debt(
    State(state): State<Arc<AppState>>,
    Json(debt): Json<DebtItem>,
) -> ApiResult<Json<DebtItem>> {
    let stored = state.position_service.upsert_debt(debt).await?;
    trigger_snapshot_capture(state);
    Ok(Json(stored))
}

async fn delete_position(
    Path((kind, id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let kind: PositionKind = kind.parse()?;
    state.position_service.delete(kind, &id).await?;
    trigger_snapshot_capture(state);
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_debt(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.position_service.delete(PositionKind::Debt, &id).await?;
    trigger_snapshot_capture(state);
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/state", get(get_state))
        .route("/analysis", get(get_analysis))
        .route("/settings", get(get_settings).put(update_settings))
        .route(
            "/positions/local",
            post(upsert_local_equity).put(upsert_local_equity),
        )
        .route(
            "/positions/foreign",
            post(upsert_foreign_equity).put(upsert_foreign_equity),
        )
        .route("/positions/crypto", post(upsert_crypto).put(upsert_crypto))
        .route("/positions/{kind}/{id}", delete(delete_position))
        .route("/debts", post(upsert_debt).put(upsert_debt))
        .route("/debts/{id}", delete(delete_debt))
}
