//! Error types for rate fetching and conversion.

use thiserror::Error;

/// Failure taxonomy of a rate request.
///
/// Both variants carry a human-readable message. `Upstream` displays the
/// provider message verbatim so callers can surface it as-is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// Transport failure or a non-2xx status from the proxy.
    #[error("Network error: {0}")]
    Network(String),

    /// Well-formed response where the provider reported a failure or left out
    /// expected fields.
    #[error("{0}")]
    Upstream(String),
}

pub type Result<T, E = ConversionError> = std::result::Result<T, E>;

impl From<reqwest::Error> for ConversionError {
    fn from(err: reqwest::Error) -> Self {
        ConversionError::Network(err.to_string())
    }
}
