use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::positions::PositionState;
use crate::risk::AnalysisResult;

/// Shown whenever no advisor can answer.
pub const FALLBACK_ADVICE: &str =
    "Advice is unavailable right now. Review the risk alerts and keep leverage within your own limits.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryRequest {
    pub analysis: AnalysisResult,
    pub state: PositionState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advice {
    pub text: String,
    /// True when `text` is the static fallback
    pub fallback: bool,
}

impl Advice {
    pub fn fallback() -> Self {
        Self {
            text: FALLBACK_ADVICE.to_string(),
            fallback: true,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvisoryError {
    #[error("Advisor is not authenticated")]
    Unauthenticated,

    #[error("Advisor unavailable: {0}")]
    Unavailable(String),

    #[error("Advisor returned no text")]
    Empty,
}
