//! Building synthetic responses from canned specifications.

use http::StatusCode;
use serde_json::Value;

use super::config::ResponseSpec;
use crate::transport::{TransportRequest, TransportResponse};

/// Payload used when an error spec supplies no payload of its own.
const FAKE_ERROR_MESSAGE: &str = "fake ajax error";

/// Which handler a synthesized response must be delivered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Deliver through the success handler.
    Success,
    /// Deliver through the error handler.
    Error,
}

/// Builds the synthetic response for a matched or default spec.
///
/// Classification is error iff the spec says `is_error` or the status
/// falls outside `[200, 300)`; a code the `http` crate cannot represent
/// counts as a 500. A missing payload defaults to an empty result set on
/// success and a generic error message on failure. The response records
/// the request URL and is marked as faked for test introspection.
pub(crate) fn synthesize(
    spec: &ResponseSpec,
    request: &TransportRequest,
) -> (Outcome, TransportResponse) {
    let code = spec.status.unwrap_or(200);
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let is_error = spec.is_error || !status.is_success();

    let data = if is_error {
        spec.data
            .clone()
            .unwrap_or_else(|| Value::String(FAKE_ERROR_MESSAGE.to_owned()))
    } else {
        spec.data.clone().unwrap_or_else(|| Value::Array(Vec::new()))
    };

    let response = TransportResponse::new(status, data, spec.headers.clone())
        .synthesized_for(request.url.clone());
    let outcome = if is_error {
        Outcome::Error
    } else {
        Outcome::Success
    };

    (outcome, response)
}
