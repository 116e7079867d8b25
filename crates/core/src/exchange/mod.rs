//! Export and import of all user data as a single JSON bundle.

mod exchange_model;
mod exchange_service;

pub use exchange_model::{ExportBundle, ImportSummary, EXPORT_FORMAT_VERSION};
pub use exchange_service::{export_bundle, parse_bundle, validate_bundle, ExchangeService};

#[cfg(test)]
mod exchange_service_tests;
