use async_trait::async_trait;

use super::advisor_model::{AdvisoryError, AdvisoryRequest};

/// A generator of free-text advice for the current portfolio.
#[async_trait]
pub trait AdvisorTrait: Send + Sync {
    async fn advise(&self, request: &AdvisoryRequest) -> Result<String, AdvisoryError>;
}
