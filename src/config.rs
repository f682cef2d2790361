//! Tokengate configuration.

use std::time::Duration;

/// Default validation endpoint baked into released builds.
pub const DEFAULT_ENDPOINT_URL: &str = "https://api.tokengate.dev/v1/license/validate";

/// Configuration for a [`crate::validator::LicenseValidator`].
///
/// The defaults match released builds: the production endpoint, 30-second
/// network timeouts, and a 3-attempt retry budget with 1-second base
/// backoff. Hosts normally only override `endpoint_url` (staging servers)
/// and the platform identity fields.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Absolute URL of the validation endpoint.
    pub endpoint_url: String,

    /// Platform identifier sent with every request (e.g., "MT5").
    pub platform: String,

    /// Client version string sent with every request.
    pub version: String,

    /// User-Agent product identifier (e.g., "hostapp-pro").
    pub user_agent_product: String,

    /// Connect/send/receive timeout for each transport attempt.
    pub timeout: Duration,

    /// Maximum transport attempts per validation (first try included).
    pub max_attempts: u32,

    /// Base delay for exponential backoff between attempts.
    pub retry_base_delay: Duration,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            platform: "MT5".to_string(),
            version: "1.0.0".to_string(),
            user_agent_product: "tokengate".to_string(),
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            retry_base_delay: Duration::from_secs(1),
        }
    }
}

impl ValidatorConfig {
    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), crate::TokengateError> {
        if self.endpoint_url.is_empty() {
            return Err(crate::TokengateError::ConfigError(
                "endpoint_url cannot be empty".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(crate::TokengateError::ConfigError(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.platform.is_empty() {
            return Err(crate::TokengateError::ConfigError(
                "platform cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the User-Agent string sent with every request.
    ///
    /// Format: `<product>/tokengate-<crate-version>`
    pub fn user_agent(&self) -> String {
        format!(
            "{}/tokengate-{}",
            self.user_agent_product,
            env!("CARGO_PKG_VERSION")
        )
    }
}
