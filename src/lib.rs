//! # Tokengate
//!
//! **License validation and access-token caching for trading-platform plugins.**
//!
//! Tokengate proves entitlement to a remote license authority over HTTPS,
//! receives a short-lived access token, and caches it so repeated
//! validation calls avoid redundant network round-trips. It is built for
//! host applications (MT5 expert advisors and similar plugins) that
//! cannot perform arbitrary networking or TLS themselves.
//!
//! ## Features
//!
//! - **Token caching with expiry** — repeated validations are served from
//!   memory until the server-supplied TTL elapses
//! - **Bounded retry with backoff** — 3 transport attempts at 0/1/2 s,
//!   30-second timeouts, TLS 1.2+ enforced
//! - **Sticky endpoint override** — point a single call (and the ones
//!   after it) at a staging server without rebuilding the validator
//! - **Thread-safe** — one validator instance can be shared freely; all
//!   validation attempts serialize on an internal lock
//!
//! ## Quickstart
//!
//! ```no_run
//! use tokengate::{LicenseValidator, ValidatorConfig};
//!
//! fn main() -> Result<(), tokengate::TokengateError> {
//!     let validator = LicenseValidator::new(ValidatorConfig::default())?;
//!
//!     let result = validator.validate("LICENSE-KEY", "12345678", "BrokerX", "device-01", None)?;
//!     println!("token {} (ttl {}s, cached: {})", result.token, result.ttl_seconds, result.from_cache);
//!     Ok(())
//! }
//! ```
//!
//! ## Response handling
//!
//! The server reply is read with a deliberately minimal scanner that
//! extracts only `valid`, `token`, `ttlSeconds`, and `message`. It has no
//! nested-structure awareness and does not escape-decode what it extracts;
//! see [`protocol::scan`] for the documented limitations.
//!
//! ## Concurrency
//!
//! All calls are synchronous and blocking. The network exchange and the
//! retry backoff sleeps block the calling thread, bounded by the 30 s
//! per-attempt timeout and the 3-attempt ceiling. No cancellation is
//! exposed.

#![deny(missing_docs)]
#![doc(html_root_url = "https://docs.rs/tokengate/0.1.0")]

// Core modules
pub mod cache;
pub mod clock;
pub mod config;
pub mod endpoint;
pub mod errors;

// Protocol layer
pub mod protocol;

// Client layer
pub mod client;

// Validator (main public API)
pub mod validator;

// Re-exports for public API
pub use cache::{CachedToken, TokenCache, DEFAULT_TTL_SECS};
pub use clock::{Clock, SystemClock};
pub use config::{ValidatorConfig, DEFAULT_ENDPOINT_URL};
pub use endpoint::Endpoint;
pub use errors::TokengateError;
pub use validator::{LicenseValidator, ValidationResult};

#[cfg(any(test, feature = "test-seams"))]
pub use clock::MockClock;
