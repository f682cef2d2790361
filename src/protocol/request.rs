//! Validation request payload.

use crate::config::ValidatorConfig;
use crate::TokengateError;
use serde::Serialize;

/// Fixed-shape request payload for the validation endpoint.
///
/// Field declaration order is the wire key order; keep it matching the
/// endpoint contract.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    /// License key entered by the user.
    pub license_key: String,

    /// Trading account identifier.
    pub account_id: String,

    /// Broker name the account is held with.
    pub broker: String,

    /// Stable device fingerprint.
    pub device_id: String,

    /// Platform identifier from config (e.g., "MT5").
    pub platform: String,

    /// Client version from config.
    pub version: String,
}

impl ValidationRequest {
    /// Build a request from raw caller inputs.
    ///
    /// Missing inputs are sent as empty strings rather than rejected;
    /// the server decides whether an empty field matters.
    pub fn new(
        config: &ValidatorConfig,
        license_key: &str,
        account_id: &str,
        broker: &str,
        device_id: &str,
    ) -> Self {
        Self {
            license_key: license_key.to_string(),
            account_id: account_id.to_string(),
            broker: broker.to_string(),
            device_id: device_id.to_string(),
            platform: config.platform.clone(),
            version: config.version.clone(),
        }
    }

    /// Serialize to the JSON body sent over the wire.
    ///
    /// serde_json escapes quote, backslash, and every byte below 0x20
    /// (short escapes for \b \f \n \r \t, `\u00XX` otherwise), which is
    /// exactly the escaping the endpoint expects. No other rewriting is
    /// performed.
    pub fn to_json(&self) -> Result<String, TokengateError> {
        serde_json::to_string(self)
            .map_err(|e| TokengateError::ConfigError(format!("Failed to serialize request: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ValidatorConfig {
        ValidatorConfig {
            platform: "MT5".to_string(),
            version: "1.0.0".to_string(),
            ..ValidatorConfig::default()
        }
    }

    #[test]
    fn key_order_is_fixed() {
        let req = ValidationRequest::new(&config(), "KEY1", "ACC1", "BROKERX", "DEV1");
        let json = req.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"licenseKey":"KEY1","accountId":"ACC1","broker":"BROKERX","deviceId":"DEV1","platform":"MT5","version":"1.0.0"}"#
        );
    }

    #[test]
    fn empty_inputs_become_empty_strings() {
        let req = ValidationRequest::new(&config(), "", "", "", "");
        let json = req.to_json().unwrap();
        assert!(json.contains(r#""licenseKey":"""#));
        assert!(json.contains(r#""accountId":"""#));
    }

    #[test]
    fn control_characters_are_escaped() {
        let req = ValidationRequest::new(&config(), "a\"b\nc", "t\tab", "back\\slash", "\u{1}");
        let json = req.to_json().unwrap();

        assert!(json.contains(r#"a\"b\nc"#));
        assert!(json.contains(r#"t\tab"#));
        assert!(json.contains(r#"back\\slash"#));
        assert!(json.contains(r#"\u0001"#));
        // No raw newline may survive into the payload.
        assert!(!json.contains('\n'));
    }
}
