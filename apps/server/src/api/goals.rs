use std::sync::Arc;

use crate::{
    api::{shared::trigger_snapshot_capture, trends::RangeQuery},
    error::ApiResult,
    main_lib::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use marginwatch_core::goals::{Goal, GoalOutlook, NewGoal};
use marginwatch_core::trends::growth_projection;
use rust_decimal::Decimal;

async fn get_goals(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Goal>>> {
    let goals = state.goal_service.get_goals()?;
    Ok(Json(goals))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Json(goal): Json<NewGoal>,
) -> ApiResult<Json<Goal>> {
    let g = state.goal_service.create_goal(goal).await?;
    trigger_snapshot_capture(state.clone());
    Ok(Json(g))
}

async fn update_goal(
    State(state): State<Arc<AppState>>,
    Json(goal): Json<Goal>,
) -> ApiResult<Json<Goal>> {
    let g = state.goal_service.update_goal(goal).await?;
    trigger_snapshot_capture(state.clone());
    Ok(Json(g))
}

async fn delete_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let _ = state.goal_service.delete_goal(id).await?;
    trigger_snapshot_capture(state);
    Ok(StatusCode::NO_CONTENT)
}

/// Progress and ETA of every goal, projected with the growth rate of the
/// requested range (one month by default).
async fn get_goal_progress(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Vec<GoalOutlook>>> {
    let range = query.time_range()?;
    let now = state.snapshot_service.now();
    let net_worth = state.position_service.analyze().net_worth;
    let series = state.snapshot_service.list()?;
    let daily_rate = growth_projection(&series, range, now)
        .map(|g| g.daily_rate)
        .unwrap_or(Decimal::ZERO);

    let outlook = state
        .goal_service
        .outlook(net_worth, daily_rate, now.date_naive())?;
    Ok(Json(outlook))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals", get(get_goals).post(create_goal).put(update_goal))
        .route("/goals/progress", get(get_goal_progress))
        .route("/goals/{id}", delete(delete_goal))
}
