//! Read-only analytics over the snapshot series.

mod trends_calculator;
mod trends_model;

pub use trends_calculator::*;
pub use trends_model::*;
