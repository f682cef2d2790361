//! In-memory token cache with expiry semantics.
//!
//! Holds the one token the validator is allowed to hand out, its expiry
//! instant, and the shared last-error text. Lifetime is the validator's
//! lifetime; nothing is persisted to disk.

use crate::clock::Clock;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// TTL applied when the server omits one or sends a non-positive value.
pub const DEFAULT_TTL_SECS: i64 = 900;

/// Three-way result of a cache query, distinguishing "never cached"
/// from "cached but stale".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedToken {
    /// A token is present and its expiry is still in the future.
    Fresh(String),

    /// Nothing has been cached since the last clear.
    NotPresent,

    /// A token was cached but its TTL has elapsed.
    Expired,
}

#[derive(Debug, Default)]
struct CacheState {
    token: String,
    expires_at: Option<DateTime<Utc>>,
    last_error: String,
}

/// Process-lifetime token cache guarded by a single exclusive lock.
///
/// Every operation holds the lock for the full check-and-act, so a
/// freshness check and the read it guards cannot interleave with a
/// concurrent store or clear.
pub struct TokenCache {
    clock: Arc<dyn Clock>,
    state: Mutex<CacheState>,
}

impl TokenCache {
    /// Create an empty cache reading time from the given clock.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(CacheState::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        // A poisoned lock means another thread panicked mid-update; the
        // cached token is plain data, so recover the guard.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// True iff a token is present and not yet expired.
    pub fn is_fresh(&self) -> bool {
        let state = self.lock();
        Self::fresh_at(&state, self.clock.now_utc())
    }

    /// Query the cached token.
    pub fn get(&self) -> CachedToken {
        let state = self.lock();
        if state.token.is_empty() {
            return CachedToken::NotPresent;
        }
        if Self::fresh_at(&state, self.clock.now_utc()) {
            CachedToken::Fresh(state.token.clone())
        } else {
            CachedToken::Expired
        }
    }

    /// Seconds until the cached token expires, truncated to whole
    /// seconds; 0 when absent or expired.
    pub fn remaining_ttl(&self) -> i64 {
        let state = self.lock();
        let now = self.clock.now_utc();
        match state.expires_at {
            Some(expiry) if !state.token.is_empty() && now < expiry => {
                (expiry - now).num_seconds()
            }
            _ => 0,
        }
    }

    /// Cache a token for `ttl_seconds`, replacing any prior token.
    ///
    /// Non-positive TTLs are normalized to [`DEFAULT_TTL_SECS`].
    pub fn store(&self, token: &str, ttl_seconds: i64) {
        let ttl = if ttl_seconds <= 0 {
            DEFAULT_TTL_SECS
        } else {
            ttl_seconds
        };
        let mut state = self.lock();
        state.token = token.to_string();
        state.expires_at = Some(self.clock.now_utc() + chrono::Duration::seconds(ttl));
        debug!(ttl_seconds = ttl, "token cached");
    }

    /// Drop the cached token and its expiry, keeping the last-error text.
    ///
    /// Used when the server explicitly rejects the license: the rejection
    /// message must remain readable after the token is gone.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        state.token.clear();
        state.expires_at = None;
    }

    /// Reset token, expiry, and last-error to empty.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.token.clear();
        state.expires_at = None;
        state.last_error.clear();
    }

    /// Read the shared last-error text.
    pub fn last_error(&self) -> String {
        self.lock().last_error.clone()
    }

    /// Overwrite the shared last-error text.
    pub fn set_last_error(&self, message: &str) {
        self.lock().last_error = message.to_string();
    }

    fn fresh_at(state: &CacheState, now: DateTime<Utc>) -> bool {
        match state.expires_at {
            Some(expiry) => !state.token.is_empty() && now < expiry,
            None => false,
        }
    }
}
