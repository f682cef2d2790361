//! License validator - the main public API for tokengate.
//!
//! The `LicenseValidator` owns the whole validation pipeline:
//! - token cache check (zero network on a hit)
//! - request construction and the retried HTTPS exchange
//! - verdict interpretation and cache update
//!
//! Construction is initialization: the persistent HTTP client is built
//! and the default endpoint resolved in `new`. `shutdown` tears the
//! session down; afterwards `validate` fails cleanly with
//! `NotInitialized`.

use crate::cache::{CachedToken, TokenCache, DEFAULT_TTL_SECS};
use crate::client::http::{ReqwestTransport, Transport};
use crate::client::retry::with_retry;
use crate::clock::{Clock, SystemClock};
use crate::config::ValidatorConfig;
use crate::endpoint::Endpoint;
use crate::protocol::request::ValidationRequest;
use crate::protocol::scan::Verdict;
use crate::TokengateError;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// License validation result.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// The access token proving entitlement.
    pub token: String,

    /// Seconds until the token expires.
    pub ttl_seconds: i64,

    /// Whether this result came from the cache.
    pub from_cache: bool,
}

/// The active transport session: the persistent HTTP client plus the
/// endpoint it currently targets. Dropped on shutdown.
struct Session {
    transport: Box<dyn Transport>,
    endpoint: Endpoint,
}

/// Main license validator for tokengate.
///
/// Create one instance per process and reuse it for all validation
/// calls. The session lock is held across the entire network exchange,
/// so no two `validate` calls hit the wire concurrently; concurrent
/// callers serialize and the later one usually lands on the cache.
pub struct LicenseValidator {
    config: ValidatorConfig,
    cache: TokenCache,
    session: Mutex<Option<Session>>,
}

impl LicenseValidator {
    /// Create a validator with the given configuration.
    ///
    /// Builds the persistent HTTP client and resolves the configured
    /// default endpoint once.
    ///
    /// # Errors
    /// Returns an error if configuration validation, HTTP client
    /// creation, or default endpoint resolution fails.
    pub fn new(config: ValidatorConfig) -> Result<Self, TokengateError> {
        config.validate()?;
        let transport = Box::new(ReqwestTransport::new(&config)?);
        Self::with_parts(config, Arc::new(SystemClock), transport)
    }

    /// Create a validator with a custom clock (for testing).
    #[cfg(any(test, feature = "test-seams"))]
    pub fn new_with_clock(
        config: ValidatorConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TokengateError> {
        config.validate()?;
        let transport = Box::new(ReqwestTransport::new(&config)?);
        Self::with_parts(config, clock, transport)
    }

    /// Create a validator with a custom clock and transport.
    #[cfg(any(test, feature = "test-seams"))]
    pub fn with_transport(
        config: ValidatorConfig,
        clock: Arc<dyn Clock>,
        transport: Box<dyn Transport>,
    ) -> Result<Self, TokengateError> {
        config.validate()?;
        Self::with_parts(config, clock, transport)
    }

    fn with_parts(
        config: ValidatorConfig,
        clock: Arc<dyn Clock>,
        transport: Box<dyn Transport>,
    ) -> Result<Self, TokengateError> {
        let endpoint = Endpoint::resolve(&config.endpoint_url)?;

        Ok(Self {
            config,
            cache: TokenCache::new(clock),
            session: Mutex::new(Some(Session {
                transport,
                endpoint,
            })),
        })
    }

    /// Validate a license key, returning an access token.
    ///
    /// A fresh cached token short-circuits the call with zero network
    /// activity. Otherwise the request is POSTed to the active endpoint
    /// with up to 3 attempts, and a valid verdict caches the returned
    /// token for its TTL (default 900 s when the server omits one).
    ///
    /// An `endpoint_override`, when supplied and resolvable, replaces
    /// the active endpoint for this and subsequent calls; an unresolvable
    /// override is non-fatal and the prior endpoint is kept.
    ///
    /// # Errors
    /// - `NotInitialized` - validator was shut down
    /// - `NetworkError` - every transport attempt failed
    /// - `HttpStatus` - server replied with a non-200 status
    /// - `LicenseInvalid` - server rejected the license (clears the cache)
    pub fn validate(
        &self,
        license_key: &str,
        account_id: &str,
        broker: &str,
        device_id: &str,
        endpoint_override: Option<&str>,
    ) -> Result<ValidationResult, TokengateError> {
        let mut guard = self.lock_session();
        let session = match guard.as_mut() {
            Some(session) => session,
            None => {
                self.cache.set_last_error("Validator not initialized");
                return Err(TokengateError::NotInitialized);
            }
        };

        // Cache hit: no network access.
        if let CachedToken::Fresh(token) = self.cache.get() {
            debug!("returning cached token");
            return Ok(ValidationResult {
                token,
                ttl_seconds: self.cache.remaining_ttl(),
                from_cache: true,
            });
        }

        // Endpoint override is sticky but non-fatal on parse failure.
        if let Some(url) = endpoint_override {
            if !url.is_empty() {
                match Endpoint::resolve(url) {
                    Ok(endpoint) => session.endpoint = endpoint,
                    Err(e) => {
                        warn!(error = %e, "endpoint override rejected, keeping active endpoint");
                        self.cache.set_last_error(&e.to_string());
                    }
                }
            }
        }

        let request =
            ValidationRequest::new(&self.config, license_key, account_id, broker, device_id);
        let body = request.to_json().map_err(|e| {
            self.cache.set_last_error(&e.to_string());
            e
        })?;

        let response = with_retry(self.config.max_attempts, self.config.retry_base_delay, || {
            session.transport.post(&session.endpoint, &body)
        })
        .map_err(|e| {
            self.cache.set_last_error(&e.to_string());
            e
        })?;

        if response.status != 200 {
            let err = TokengateError::HttpStatus {
                status: response.status,
                body: response.body,
            };
            self.cache.set_last_error(&err.to_string());
            return Err(err);
        }

        let verdict = Verdict::from_body(&response.body);
        if !verdict.valid {
            let message = if verdict.message.is_empty() {
                "License invalid".to_string()
            } else {
                verdict.message
            };
            self.cache.invalidate();
            self.cache.set_last_error(&message);
            return Err(TokengateError::LicenseInvalid(message));
        }

        let ttl = verdict.ttl_seconds.unwrap_or(DEFAULT_TTL_SECS);
        self.cache.store(&verdict.token, ttl);
        self.cache.set_last_error("");

        Ok(ValidationResult {
            token: verdict.token,
            ttl_seconds: self.cache.remaining_ttl(),
            from_cache: false,
        })
    }

    /// Replace the active endpoint. Best-effort: a no-op on empty input,
    /// a parse failure keeps the prior endpoint and records the error.
    pub fn set_endpoint(&self, url: &str) {
        if url.is_empty() {
            return;
        }

        let mut guard = self.lock_session();
        let Some(session) = guard.as_mut() else {
            return;
        };

        match Endpoint::resolve(url) {
            Ok(endpoint) => session.endpoint = endpoint,
            Err(e) => {
                warn!(error = %e, "endpoint change rejected, keeping active endpoint");
                self.cache.set_last_error(&e.to_string());
            }
        }
    }

    /// Tear down the session and clear the cache. Idempotent; later
    /// `validate` calls fail with `NotInitialized`.
    pub fn shutdown(&self) {
        let mut guard = self.lock_session();
        *guard = None;
        self.cache.clear();
    }

    /// Whether the validator still holds an active session.
    pub fn is_initialized(&self) -> bool {
        self.lock_session().is_some()
    }

    /// Query the cached token without touching the network.
    pub fn cached_token(&self) -> CachedToken {
        self.cache.get()
    }

    /// True iff a cached token exists and has not expired.
    pub fn is_token_valid(&self) -> bool {
        self.cache.is_fresh()
    }

    /// Remaining lifetime of the cached token in whole seconds.
    pub fn token_ttl(&self) -> i64 {
        self.cache.remaining_ttl()
    }

    /// Drop the cached token and reset the last-error text.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// The last error recorded by any failing operation.
    ///
    /// Overwritten by every failure; read it immediately after the call
    /// that failed, before another thread's operation replaces it.
    pub fn last_error(&self) -> String {
        self.cache.last_error()
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}
