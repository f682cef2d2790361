//! Tokengate error types.

use thiserror::Error;

/// Errors that can occur during license validation.
#[derive(Debug, Error)]
pub enum TokengateError {
    /// Configuration is invalid (malformed endpoint URL, bad settings).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Validator has been shut down or was never initialized.
    #[error("Validator not initialized")]
    NotInitialized,

    /// Transport failure after exhausting all retry attempts.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Server replied with a non-200 HTTP status.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code returned by the server.
        status: u16,
        /// Raw response body, kept as diagnostic text.
        body: String,
    },

    /// Server rejected the license, or the verdict field was unreadable.
    #[error("{0}")]
    LicenseInvalid(String),
}

impl TokengateError {
    /// Short machine-readable code for the error class.
    ///
    /// Host adapters that marshal results across an FFI boundary key on
    /// this rather than the display text.
    pub fn code(&self) -> &'static str {
        match self {
            TokengateError::ConfigError(_) => "CONFIG_ERROR",
            TokengateError::NotInitialized => "NOT_INITIALIZED",
            TokengateError::NetworkError(_) => "NETWORK_ERROR",
            TokengateError::HttpStatus { .. } => "HTTP_STATUS_ERROR",
            TokengateError::LicenseInvalid(_) => "LICENSE_INVALID",
        }
    }
}
