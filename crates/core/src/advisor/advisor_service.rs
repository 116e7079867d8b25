use async_trait::async_trait;
use log::warn;
use std::fmt::Write;
use std::sync::Arc;

use super::advisor_model::{Advice, AdvisoryError, AdvisoryRequest};
use super::advisor_traits::AdvisorTrait;
use crate::risk::{AlertSeverity, Leverage};

/// Wraps an optional advisor so callers always get text back.
pub struct AdvisoryService {
    advisor: Option<Arc<dyn AdvisorTrait>>,
}

impl AdvisoryService {
    pub fn new(advisor: Option<Arc<dyn AdvisorTrait>>) -> Self {
        Self { advisor }
    }

    pub fn is_configured(&self) -> bool {
        self.advisor.is_some()
    }

    /// Never fails: any advisor error degrades to the fallback text.
    pub async fn advise(&self, request: &AdvisoryRequest) -> Advice {
        let Some(advisor) = &self.advisor else {
            return Advice::fallback();
        };
        match advisor.advise(request).await {
            Ok(text) if !text.trim().is_empty() => Advice {
                text,
                fallback: false,
            },
            Ok(_) => {
                warn!("Advisor failed: {}", AdvisoryError::Empty);
                Advice::fallback()
            }
            Err(e) => {
                warn!("Advisor failed: {}", e);
                Advice::fallback()
            }
        }
    }
}

/// Offline advisor that turns the analysis into a short risk digest.
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskDigestAdvisor;

#[async_trait]
impl AdvisorTrait for RiskDigestAdvisor {
    async fn advise(&self, request: &AdvisoryRequest) -> Result<String, AdvisoryError> {
        let analysis = &request.analysis;
        let mut out = String::new();

        let _ = writeln!(
            out,
            "Net worth {} with gross assets {} and debts {}.",
            analysis.net_worth.round_dp(0),
            analysis.gross_assets.round_dp(0),
            analysis.total_debt.round_dp(0)
        );
        match analysis.real_leverage {
            Leverage::Saturated => {
                let _ = writeln!(
                    out,
                    "Net worth is not positive, so leverage is unbounded. Reduce exposure first."
                );
            }
            Leverage::Ratio(r) => {
                let _ = writeln!(out, "Overall leverage is {}x.", r.round_dp(2));
            }
        }

        let critical = analysis
            .alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Critical)
            .count();
        if analysis.alerts.is_empty() {
            let _ = writeln!(out, "No positions are near their margin limits.");
        } else {
            let _ = writeln!(
                out,
                "{} risk alert(s), {} critical:",
                analysis.alerts.len(),
                critical
            );
            for alert in &analysis.alerts {
                let _ = writeln!(out, "- {}", alert.message);
            }
        }

        if let Some(question) = request.question.as_deref().filter(|q| !q.trim().is_empty()) {
            let _ = writeln!(
                out,
                "Question \"{}\" needs an online advisor; the digest above covers the numbers.",
                question.trim()
            );
        }
        Ok(out.trim_end().to_string())
    }
}
