//! Unit tests for the transport contract.

use std::sync::Arc;
use std::time::Duration;

use http::{Method, StatusCode};
use rstest::rstest;
use serde_json::json;

use super::{
    DefaultSettings, MockTransport, Transport, TransportRegistry, TransportRequest,
    TransportResponse, UnknownTransport,
};

fn sample_defaults() -> DefaultSettings {
    DefaultSettings {
        method: Some(Method::POST),
        data_type: Some(String::from("json")),
        headers: std::iter::once((String::from("Accept"), String::from("application/json")))
            .collect(),
        timeout: Some(Duration::from_secs(30)),
    }
}

#[rstest]
fn merge_fills_unset_request_fields() {
    let mut request = TransportRequest::new("api/items");
    sample_defaults().merge_into(&mut request);

    assert_eq!(request.method, Some(Method::POST), "method mismatch");
    assert_eq!(
        request.data_type,
        Some(String::from("json")),
        "data type mismatch"
    );
    assert_eq!(
        request.timeout,
        Some(Duration::from_secs(30)),
        "timeout mismatch"
    );
    assert_eq!(
        request.headers.get("Accept").map(String::as_str),
        Some("application/json"),
        "default header missing"
    );
}

#[rstest]
fn merge_keeps_explicit_request_fields() {
    let mut request = TransportRequest::new("api/items")
        .with_method(Method::DELETE)
        .with_data_type("text")
        .with_header("Accept", "text/plain")
        .with_timeout(Duration::from_secs(1));
    sample_defaults().merge_into(&mut request);

    assert_eq!(request.method, Some(Method::DELETE), "method was overwritten");
    assert_eq!(
        request.data_type,
        Some(String::from("text")),
        "data type was overwritten"
    );
    assert_eq!(
        request.timeout,
        Some(Duration::from_secs(1)),
        "timeout was overwritten"
    );
    assert_eq!(
        request.headers.get("Accept").map(String::as_str),
        Some("text/plain"),
        "explicit header was overwritten"
    );
}

#[rstest]
fn header_lookup_is_case_insensitive() {
    let response = TransportResponse::new(
        StatusCode::OK,
        json!([]),
        std::iter::once((String::from("Content-Type"), String::from("application/json")))
            .collect(),
    );

    assert_eq!(
        response.header("content-type"),
        Some("application/json"),
        "lower-case lookup failed"
    );
    assert_eq!(
        response.header("CONTENT-TYPE"),
        Some("application/json"),
        "upper-case lookup failed"
    );
    assert_eq!(response.header("X-Missing"), None, "absent header found");
}

fn mock_with_data_type(data_type: &str) -> MockTransport {
    let settings = DefaultSettings {
        data_type: Some(data_type.to_owned()),
        ..DefaultSettings::default()
    };
    let mut mock = MockTransport::new();
    mock.expect_default_settings().return_const(settings);
    mock
}

#[rstest]
fn first_registration_becomes_default() {
    let registry = TransportRegistry::new();
    registry.register("first", Arc::new(mock_with_data_type("first")));
    registry.register("second", Arc::new(mock_with_data_type("second")));

    let transport = registry.get(None).expect("default should resolve");
    assert_eq!(
        transport.default_settings().data_type,
        Some(String::from("first")),
        "default slot mismatch"
    );
}

#[rstest]
fn lookup_by_name_resolves_that_transport() {
    let registry = TransportRegistry::new();
    registry.register("first", Arc::new(mock_with_data_type("first")));
    registry.register("second", Arc::new(mock_with_data_type("second")));

    let transport = registry.get(Some("second")).expect("named should resolve");
    assert_eq!(
        transport.default_settings().data_type,
        Some(String::from("second")),
        "named slot mismatch"
    );
}

#[rstest]
fn set_default_switches_the_default_slot() {
    let registry = TransportRegistry::new();
    registry.register("first", Arc::new(mock_with_data_type("first")));
    registry.register("second", Arc::new(mock_with_data_type("second")));
    registry
        .set_default("second")
        .expect("registered name should become default");

    let transport = registry.get(None).expect("default should resolve");
    assert_eq!(
        transport.default_settings().data_type,
        Some(String::from("second")),
        "default slot did not switch"
    );
}

#[rstest]
fn set_default_rejects_unknown_names() {
    let registry = TransportRegistry::new();
    let result = registry.set_default("ghost");
    assert_eq!(
        result,
        Err(UnknownTransport {
            name: String::from("ghost"),
        }),
        "expected UnknownTransport"
    );
}

#[rstest]
fn empty_registry_resolves_nothing() {
    let registry = TransportRegistry::new();
    assert!(registry.get(None).is_none(), "default slot should be empty");
    assert!(
        registry.get(Some("anything")).is_none(),
        "named slot should be empty"
    );
}
