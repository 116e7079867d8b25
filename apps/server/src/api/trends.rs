use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use marginwatch_core::trends::{
    growth_projection, max_drawdown, wave_analysis, Drawdown, GrowthProjection, TimeRange,
    WaveAnalysis,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub range: Option<String>,
}

impl RangeQuery {
    pub fn time_range(&self) -> ApiResult<TimeRange> {
        match self.range.as_deref() {
            Some(raw) => Ok(raw.parse()?),
            None => Ok(TimeRange::default()),
        }
    }
}

async fn get_wave(State(state): State<Arc<AppState>>) -> ApiResult<Json<Option<WaveAnalysis>>> {
    let series = state.snapshot_service.list()?;
    Ok(Json(wave_analysis(&series)))
}

async fn get_growth(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Option<GrowthProjection>>> {
    let range = query.time_range()?;
    let series = state.snapshot_service.list()?;
    Ok(Json(growth_projection(
        &series,
        range,
        state.snapshot_service.now(),
    )))
}

async fn get_drawdown(State(state): State<Arc<AppState>>) -> ApiResult<Json<Option<Drawdown>>> {
    let series = state.snapshot_service.list()?;
    Ok(Json(max_drawdown(&series)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/trends/wave", get(get_wave))
        .route("/trends/growth", get(get_growth))
        .route("/trends/drawdown", get(get_drawdown))
}
