//! Endpoint resolution from configured URL strings.

use crate::TokengateError;
use url::Url;

/// Resolved network destination for validation requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Server hostname.
    pub host: String,

    /// Request path, including the query string when present.
    pub path: String,

    /// TCP port; explicit URL port or the scheme default (80/443).
    pub port: u16,

    /// Whether the exchange uses TLS (`https` scheme).
    pub secure: bool,
}

impl Endpoint {
    /// Parse an absolute URL into an [`Endpoint`].
    ///
    /// Only `http` and `https` schemes are accepted. An explicit port in
    /// the URL overrides the scheme default. Callers that keep an active
    /// endpoint must leave it untouched when this returns an error.
    pub fn resolve(raw: &str) -> Result<Self, TokengateError> {
        let parsed = Url::parse(raw)
            .map_err(|e| TokengateError::ConfigError(format!("Failed to parse URL: {}", e)))?;

        let secure = match parsed.scheme() {
            "https" => true,
            "http" => false,
            other => {
                return Err(TokengateError::ConfigError(format!(
                    "Unsupported URL scheme: {}",
                    other
                )))
            }
        };

        let host = parsed
            .host_str()
            .ok_or_else(|| TokengateError::ConfigError("URL has no host".to_string()))?
            .to_string();
        if host.is_empty() {
            return Err(TokengateError::ConfigError("URL has no host".to_string()));
        }

        let port = parsed
            .port()
            .unwrap_or(if secure { 443 } else { 80 });

        let mut path = parsed.path().to_string();
        if let Some(query) = parsed.query() {
            path.push('?');
            path.push_str(query);
        }

        Ok(Self {
            host,
            path,
            port,
            secure,
        })
    }

    /// Rebuild the full URL string for this endpoint.
    pub fn url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}:{}{}", scheme, self.host, self.port, self.path)
    }
}
