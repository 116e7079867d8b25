//! Unit tests for the advisory service.

use super::*;
use crate::positions::{LocalEquityPosition, PositionState};
use crate::risk;
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

struct FailingAdvisor(AdvisoryError);

#[async_trait]
impl AdvisorTrait for FailingAdvisor {
    async fn advise(&self, _request: &AdvisoryRequest) -> Result<String, AdvisoryError> {
        Err(self.0.clone())
    }
}

struct CannedAdvisor(&'static str);

#[async_trait]
impl AdvisorTrait for CannedAdvisor {
    async fn advise(&self, _request: &AdvisoryRequest) -> Result<String, AdvisoryError> {
        Ok(self.0.to_string())
    }
}

fn request(state: PositionState, question: Option<&str>) -> AdvisoryRequest {
    AdvisoryRequest {
        analysis: risk::analyze(&state),
        state,
        question: question.map(str::to_string),
    }
}

fn stressed_state() -> PositionState {
    let mut state = PositionState::default();
    state.upsert_local_equity(LocalEquityPosition {
        id: "a".to_string(),
        symbol: "2330".to_string(),
        name: "TSMC".to_string(),
        cost_price: dec!(500),
        current_price: dec!(350),
        shares: dec!(1000),
        is_margin: true,
        pledge_rate: Decimal::ZERO,
        loan_amount: Decimal::ZERO,
    });
    state
}

#[tokio::test]
async fn test_unconfigured_service_returns_fallback() {
    let service = AdvisoryService::new(None);
    assert!(!service.is_configured());
    let advice = service.advise(&request(PositionState::default(), None)).await;
    assert_eq!(advice, Advice::fallback());
    assert_eq!(advice.text, FALLBACK_ADVICE);
}

#[tokio::test]
async fn test_advisor_errors_degrade_to_fallback() {
    for error in [
        AdvisoryError::Unauthenticated,
        AdvisoryError::Unavailable("503".to_string()),
    ] {
        let service = AdvisoryService::new(Some(Arc::new(FailingAdvisor(error))));
        let advice = service.advise(&request(PositionState::default(), None)).await;
        assert!(advice.fallback);
    }
}

#[tokio::test]
async fn test_blank_advice_is_treated_as_failure() {
    let service = AdvisoryService::new(Some(Arc::new(CannedAdvisor("   "))));
    assert!(service.advise(&request(PositionState::default(), None)).await.fallback);

    let service = AdvisoryService::new(Some(Arc::new(CannedAdvisor("Hold."))));
    let advice = service.advise(&request(PositionState::default(), None)).await;
    assert_eq!(advice.text, "Hold.");
    assert!(!advice.fallback);
}

#[tokio::test]
async fn test_digest_lists_alerts() {
    // 350000 market value against a 300000 loan: maintenance 116.67%
    let req = request(stressed_state(), Some("Should I add margin?"));
    assert!(!req.analysis.alerts.is_empty());

    let text = RiskDigestAdvisor.advise(&req).await.unwrap();
    assert!(text.contains("critical"));
    assert!(text.contains("Should I add margin?"));
}

#[tokio::test]
async fn test_digest_for_empty_portfolio() {
    let text = RiskDigestAdvisor
        .advise(&request(PositionState::default(), None))
        .await
        .unwrap();
    assert!(text.contains("No positions are near their margin limits."));
}
