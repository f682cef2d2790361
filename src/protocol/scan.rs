//! Best-effort scanner for the validation response body.
//!
//! The response is read with a substring scanner rather than a full JSON
//! parser: only three flat keys are ever consulted, and the scanner keeps
//! the client independent of the server's surrounding payload shape.
//!
//! Known limitations:
//! - no nested-structure awareness: a key inside a nested object or array
//!   matches the same as a top-level key
//! - first occurrence wins for repeated keys
//! - extracted strings are not escape-decoded, and a value containing an
//!   escaped quote is truncated at that quote

use tracing::warn;

/// Extract the raw text of a named value from a JSON body.
///
/// Locates the first literal `"<key>":`, skips spaces and tabs, then
/// returns either the substring up to the next quote (string values) or
/// the run of characters up to the first `,`, `}`, `]`, or space
/// (everything else). Returns an empty string when the key is absent.
pub fn extract_value(json: &str, key: &str) -> String {
    let marker = format!("\"{}\":", key);
    let Some(pos) = json.find(&marker) else {
        return String::new();
    };

    let rest = &json[pos + marker.len()..];
    let rest = rest.trim_start_matches([' ', '\t']);

    if let Some(stripped) = rest.strip_prefix('"') {
        match stripped.find('"') {
            Some(end) => stripped[..end].to_string(),
            None => String::new(),
        }
    } else {
        let end = rest.find([',', '}', ']', ' ']).unwrap_or(rest.len());
        rest[..end].to_string()
    }
}

/// Parsed fields of a validation response.
///
/// Absent keys yield defaults rather than errors; the orchestrator
/// decides what a missing `valid` or `token` means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// True iff the `valid` field is literally `true`.
    pub valid: bool,

    /// Access token, empty when absent.
    pub token: String,

    /// Token lifetime in seconds; `None` when absent or malformed.
    pub ttl_seconds: Option<i64>,

    /// Server-provided rejection message, empty when absent.
    pub message: String,
}

impl Verdict {
    /// Scan a response body for the three expected fields.
    pub fn from_body(body: &str) -> Self {
        let valid = extract_value(body, "valid") == "true";
        let token = extract_value(body, "token");
        let message = extract_value(body, "message");

        let ttl_raw = extract_value(body, "ttlSeconds");
        let ttl_seconds = if ttl_raw.is_empty() {
            None
        } else {
            match ttl_raw.parse::<i64>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(ttl = %ttl_raw, "malformed ttlSeconds field, falling back to default");
                    None
                }
            }
        };

        Self {
            valid,
            token,
            ttl_seconds,
            message,
        }
    }
}
