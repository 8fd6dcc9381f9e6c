use thiserror::Error;

/// Appended to every error shown to the user; rate limiting is not
/// distinguished from other transport failures.
pub const RATE_LIMIT_HINT: &str =
    "If using DEMO_KEY, you may have hit the rate limit. Try again in a few minutes or get your own API key.";

/// Errors surfaced by feed ingestion and object lookup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NeoError {
    /// Transport failure or non-success response while fetching the feed
    #[error("{0}")]
    Ingestion(String),

    /// Transport failure or unknown identifier during lookup
    #[error("{0}")]
    Lookup(String),

    /// Response is missing fields or carries invalid values
    #[error("Malformed data: {0}")]
    MalformedData(String),
}

impl NeoError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        NeoError::MalformedData(msg.into())
    }
}
