//! Advisory text for the current portfolio, degrading to a fixed message.

mod advisor_model;
mod advisor_service;
mod advisor_traits;

pub use advisor_model::*;
pub use advisor_service::{AdvisoryService, RiskDigestAdvisor};
pub use advisor_traits::AdvisorTrait;

#[cfg(test)]
mod advisor_service_tests;
