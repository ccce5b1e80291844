use super::*;
use crate::error::ErrorCode;

#[test]
fn configuration_errors_are_flagged() {
    assert!(LookupError::EmptyQuery.is_configuration());
    assert!(LookupError::NotConfigured("GOOGLE_PLACES_API_KEY").is_configuration());
    assert!(!LookupError::Status(503).is_configuration());
    assert!(!LookupError::NoMatch("cafe".into()).is_configuration());
}

#[test]
fn only_transport_failures_are_retryable() {
    assert!(LookupError::Request("timeout".into()).retryable());
    assert!(LookupError::Status(502).retryable());
    assert!(!LookupError::Status(404).retryable());
    assert!(!LookupError::Parse("eof".into()).retryable());
}

#[test]
fn error_codes_and_messages() {
    let err = LookupError::NotConfigured("GOOGLE_PLACES_API_KEY");
    assert_eq!(err.error_code(), "E_NOT_CONFIGURED");
    assert_eq!(err.to_string(), "GOOGLE_PLACES_API_KEY is not configured");
    assert_eq!(LookupError::Status(429).error_code(), "E_UPSTREAM_STATUS");
}

#[test]
fn data_source_serializes_snake_case() {
    assert_eq!(serde_json::to_value(DataSource::Live).unwrap(), "live");
    assert_eq!(serde_json::to_value(DataSource::Mock).unwrap(), "mock");
}
