//! Response shape delivered to request handlers.

use std::collections::HashMap;

use http::StatusCode;
use serde_json::Value;

/// The response a transport delivers to a request's handlers.
///
/// Real and synthesized responses share this shape, so code under test
/// cannot distinguish a faked outcome from a live one. The diagnostic
/// fields exist for test introspection only.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Response payload; JSON where the transport could parse it.
    pub data: Value,
    /// True when the response was synthesized rather than fetched.
    pub faked: bool,
    /// URL of the request that produced this response.
    pub request_url: Option<String>,
    headers: HashMap<String, String>,
}

impl TransportResponse {
    /// Creates a live response with the given status, payload, and headers.
    #[must_use]
    pub const fn new(status: StatusCode, data: Value, headers: HashMap<String, String>) -> Self {
        Self {
            status,
            data,
            faked: false,
            request_url: None,
            headers,
        }
    }

    /// Records the request URL that produced this response.
    #[must_use]
    pub fn with_request_url(mut self, url: impl Into<String>) -> Self {
        self.request_url = Some(url.into());
        self
    }

    /// Marks the response as synthesized for the given request URL.
    #[must_use]
    pub fn synthesized_for(mut self, url: impl Into<String>) -> Self {
        self.faked = true;
        self.with_request_url(url)
    }

    /// Looks up a header value by name, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// All headers carried by the response.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}
