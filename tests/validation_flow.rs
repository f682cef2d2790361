//! End-to-end validation flows against a local mock server.

use httpmock::prelude::*;
use std::time::Duration;
use tokengate::{CachedToken, LicenseValidator, TokengateError, ValidatorConfig};

fn config_for(server: &MockServer) -> ValidatorConfig {
    ValidatorConfig {
        endpoint_url: server.url("/v1/license/validate"),
        retry_base_delay: Duration::ZERO,
        ..ValidatorConfig::default()
    }
}

#[test]
fn validates_and_serves_second_call_from_cache() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/license/validate");
        then.status(200)
            .body(r#"{"valid":true,"token":"tok-abc","ttlSeconds":60}"#);
    });

    let validator = LicenseValidator::new(config_for(&server)).unwrap();

    let first = validator
        .validate("KEY1", "ACC1", "BROKERX", "DEV1", None)
        .unwrap();
    assert_eq!(first.token, "tok-abc");
    assert!(!first.from_cache);
    assert!(first.ttl_seconds >= 59 && first.ttl_seconds <= 60);

    let second = validator
        .validate("KEY1", "ACC1", "BROKERX", "DEV1", None)
        .unwrap();
    assert_eq!(second.token, "tok-abc");
    assert!(second.from_cache);

    // The cache hit performed zero network calls.
    mock.assert_hits(1);
    assert!(validator.is_token_valid());
}

#[test]
fn request_payload_has_fixed_shape_and_key_order() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/license/validate")
            .header("content-type", "application/json")
            .body(r#"{"licenseKey":"KEY1","accountId":"ACC1","broker":"BROKERX","deviceId":"DEV1","platform":"MT5","version":"1.0.0"}"#);
        then.status(200)
            .body(r#"{"valid":true,"token":"tok","ttlSeconds":60}"#);
    });

    let validator = LicenseValidator::new(config_for(&server)).unwrap();
    validator
        .validate("KEY1", "ACC1", "BROKERX", "DEV1", None)
        .unwrap();

    mock.assert();
}

#[test]
fn rejection_clears_previously_cached_token() {
    let server = MockServer::start();
    let mut grant = server.mock(|when, then| {
        when.method(POST).path("/v1/license/validate");
        then.status(200)
            .body(r#"{"valid":true,"token":"tok-abc","ttlSeconds":1}"#);
    });

    let validator = LicenseValidator::new(config_for(&server)).unwrap();
    validator
        .validate("KEY1", "ACC1", "BROKERX", "DEV1", None)
        .unwrap();
    assert!(validator.is_token_valid());

    // Let the 1-second token lapse, then have the server reject.
    std::thread::sleep(Duration::from_millis(1200));
    grant.delete();
    server.mock(|when, then| {
        when.method(POST).path("/v1/license/validate");
        then.status(200)
            .body(r#"{"valid":false,"message":"License revoked"}"#);
    });

    let result = validator.validate("KEY1", "ACC1", "BROKERX", "DEV1", None);
    match result {
        Err(TokengateError::LicenseInvalid(message)) => assert_eq!(message, "License revoked"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(validator.cached_token(), CachedToken::NotPresent);
    assert_eq!(validator.last_error(), "License revoked");
}

#[test]
fn non_200_status_surfaces_code_and_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/license/validate");
        then.status(403).body("forbidden");
    });

    let validator = LicenseValidator::new(config_for(&server)).unwrap();
    let result = validator.validate("KEY1", "ACC1", "BROKERX", "DEV1", None);

    match result {
        Err(TokengateError::HttpStatus { status, body }) => {
            assert_eq!(status, 403);
            assert_eq!(body, "forbidden");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    // Non-200 is a transport success: exactly one attempt, no retries.
    mock.assert_hits(1);
    assert!(validator.last_error().contains("HTTP 403"));
    assert_eq!(validator.cached_token(), CachedToken::NotPresent);
}

#[test]
fn zero_ttl_response_defaults_to_900() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/license/validate");
        then.status(200)
            .body(r#"{"valid":true,"token":"tok-abc","ttlSeconds":0}"#);
    });

    let validator = LicenseValidator::new(config_for(&server)).unwrap();
    let result = validator
        .validate("KEY1", "ACC1", "BROKERX", "DEV1", None)
        .unwrap();

    assert!(result.ttl_seconds >= 899 && result.ttl_seconds <= 900);
}

#[test]
fn unreachable_server_reports_network_error() {
    // Nothing listens on the discard port.
    let config = ValidatorConfig {
        endpoint_url: "http://127.0.0.1:9/validate".to_string(),
        retry_base_delay: Duration::ZERO,
        timeout: Duration::from_millis(300),
        ..ValidatorConfig::default()
    };

    let validator = LicenseValidator::new(config).unwrap();
    let result = validator.validate("KEY1", "ACC1", "BROKERX", "DEV1", None);

    assert!(matches!(result, Err(TokengateError::NetworkError(_))));
    assert!(!validator.last_error().is_empty());
    assert_eq!(validator.cached_token(), CachedToken::NotPresent);
}

#[test]
fn set_endpoint_redirects_subsequent_validations() {
    let production = MockServer::start();
    let staging = MockServer::start();
    let old_mock = production.mock(|when, then| {
        when.method(POST).path("/v1/license/validate");
        then.status(200)
            .body(r#"{"valid":true,"token":"tok-old","ttlSeconds":60}"#);
    });
    let new_mock = staging.mock(|when, then| {
        when.method(POST).path("/other/validate");
        then.status(200)
            .body(r#"{"valid":true,"token":"tok-new","ttlSeconds":60}"#);
    });

    let validator = LicenseValidator::new(config_for(&production)).unwrap();
    validator.set_endpoint(&staging.url("/other/validate"));

    let result = validator
        .validate("KEY1", "ACC1", "BROKERX", "DEV1", None)
        .unwrap();
    assert_eq!(result.token, "tok-new");
    old_mock.assert_hits(0);
    new_mock.assert_hits(1);
}

#[test]
fn shutdown_blocks_further_validation() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/license/validate");
        then.status(200)
            .body(r#"{"valid":true,"token":"tok-abc","ttlSeconds":60}"#);
    });

    let validator = LicenseValidator::new(config_for(&server)).unwrap();
    validator
        .validate("KEY1", "ACC1", "BROKERX", "DEV1", None)
        .unwrap();

    validator.shutdown();
    assert_eq!(validator.cached_token(), CachedToken::NotPresent);

    let result = validator.validate("KEY1", "ACC1", "BROKERX", "DEV1", None);
    assert!(matches!(result, Err(TokengateError::NotInitialized)));
}
