use std::sync::Arc;

use crate::main_lib::AppState;
use axum::{extract::State, routing::post, Json, Router};
use marginwatch_core::advisor::{Advice, AdvisoryRequest};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdviceRequestBody {
    question: Option<String>,
}

/// Always answers; advisor failures come back as the fallback text.
async fn get_advice(
    State(state): State<Arc<AppState>>,
    body: Option<Json<AdviceRequestBody>>,
) -> Json<Advice> {
    let question = body.and_then(|Json(b)| b.question);
    let request = AdvisoryRequest {
        analysis: state.position_service.analyze(),
        state: state.position_service.get_state(),
        question,
    };
    Json(state.advisory_service.advise(&request).await)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/advice", post(get_advice))
}
