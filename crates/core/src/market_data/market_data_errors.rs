use thiserror::Error;

/// Failure of a price or rate lookup.
///
/// A failed lookup never clears a known value: callers keep the last price
/// and report the failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Rate limited: {provider}")]
    RateLimited { provider: String },

    #[error("Timeout: {provider}")]
    Timeout { provider: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    /// The feed answered with something that is not a usable price.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No feed is configured or it refused the request (e.g. unauthenticated).
    #[error("Feed unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::RateLimited { .. } | FetchError::Timeout { .. } | FetchError::Provider { .. }
        )
    }
}
