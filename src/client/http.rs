//! Reqwest-based transport for the validation endpoint.
//!
//! One transport call is exactly one HTTP exchange: connect, POST the
//! payload, read the full body. Retrying is the caller's concern.

use crate::config::ValidatorConfig;
use crate::endpoint::Endpoint;
use crate::TokengateError;
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use std::error::Error as _;
use tracing::debug;

/// Raw result of a completed HTTP exchange.
///
/// Any status code counts as transport success; interpreting the status
/// happens one level up.
#[derive(Debug, Clone)]
pub struct WireResponse {
    /// HTTP status code.
    pub status: u16,

    /// Full response body.
    pub body: String,
}

/// A single encrypted POST exchange against a resolved endpoint.
///
/// Implemented by [`ReqwestTransport`] in production and by counting or
/// scripted fakes in tests.
pub trait Transport: Send {
    /// POST `body` to the endpoint and read the entire response.
    fn post(&self, endpoint: &Endpoint, body: &str) -> Result<WireResponse, TokengateError>;
}

/// Production transport backed by one persistent blocking reqwest client.
///
/// The client is built once at validator initialization and reused for
/// every request; connect/send/receive are each bounded by the configured
/// timeout and TLS connections require version 1.2 or newer.
pub struct ReqwestTransport {
    client: Client,
    user_agent: String,
}

impl ReqwestTransport {
    /// Build the persistent HTTP client from config.
    pub fn new(config: &ValidatorConfig) -> Result<Self, TokengateError> {
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .build()
            .map_err(|e| {
                TokengateError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            user_agent: config.user_agent(),
        })
    }
}

impl Transport for ReqwestTransport {
    fn post(&self, endpoint: &Endpoint, body: &str) -> Result<WireResponse, TokengateError> {
        let url = endpoint.url();
        debug!(%url, "dispatching validation request");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .body(body.to_string())
            .send()
            .map_err(|e| TokengateError::NetworkError(classify_send_error(&e)))?;

        let status = response.status().as_u16();

        let body = response.text().map_err(|e| {
            TokengateError::NetworkError(format!("Failed to read response: {}", e))
        })?;

        debug!(status, bytes = body.len(), "validation response received");

        Ok(WireResponse { status, body })
    }
}

/// Map a reqwest send error to the distinct last-error texts the host
/// surfaces to users.
fn classify_send_error(e: &reqwest::Error) -> String {
    if is_tls_error(e) {
        return format!("TLS/SSL certificate error: {}", e);
    }
    if e.is_connect() {
        return format!("Failed to connect to server: {}", e);
    }
    if e.is_timeout() {
        return format!("Request timed out: {}", e);
    }
    format!("Failed to send request: {}", e)
}

/// reqwest does not expose a TLS error class; walk the source chain and
/// sniff for handshake/certificate wording instead.
fn is_tls_error(e: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(e);
    while let Some(err) = source {
        let text = err.to_string().to_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("handshake") {
            return true;
        }
        source = err.source();
    }
    false
}
