//! Risk aggregation - leverage, exposure, utilization and liquidation distance.
//!
//! `analyze` is a pure function of the position store: the same state always
//! yields the same `AnalysisResult`, with no side effects.

mod risk_calculator;
mod risk_model;

pub use risk_calculator::*;
pub use risk_model::*;

#[cfg(test)]
mod risk_calculator_tests;
