//! Request descriptor and default-settings merging.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::Method;
use serde_json::Value;

use super::response::TransportResponse;

/// Callback invoked with the response that completed a request.
pub type ResponseHandler = Arc<dyn Fn(&TransportResponse) + Send + Sync>;

/// An outgoing HTTP-style request as the caller hands it to a transport.
///
/// Cloning is shallow for the handler slots: clones share the same
/// callback objects. Code that needs to adjust a request works on a clone
/// and never mutates the caller's value.
#[derive(Clone, Default)]
pub struct TransportRequest {
    /// Target URL.
    pub url: String,
    /// HTTP method; resolved against transport defaults when unset.
    pub method: Option<Method>,
    /// Expected payload type, e.g. `json`.
    pub data_type: Option<String>,
    /// Request body.
    pub payload: Option<Value>,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Per-request timeout; the transport's own policy applies when unset.
    pub timeout: Option<Duration>,
    /// Invoked when the request completes successfully.
    pub success: Option<ResponseHandler>,
    /// Invoked when the request fails.
    pub error: Option<ResponseHandler>,
}

impl TransportRequest {
    /// Creates a request for `url` with everything else unset.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the expected payload type.
    #[must_use]
    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets a per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Installs the success handler.
    #[must_use]
    pub fn on_success(mut self, handler: impl Fn(&TransportResponse) + Send + Sync + 'static) -> Self {
        self.success = Some(Arc::new(handler));
        self
    }

    /// Installs the error handler.
    #[must_use]
    pub fn on_error(mut self, handler: impl Fn(&TransportResponse) + Send + Sync + 'static) -> Self {
        self.error = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for TransportRequest {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TransportRequest")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("data_type", &self.data_type)
            .field("payload", &self.payload)
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .field("has_success_handler", &self.success.is_some())
            .field("has_error_handler", &self.error.is_some())
            .finish()
    }
}

/// Baseline request settings a transport applies when the caller is silent.
///
/// The interceptor captures these once at construction and merges them
/// under every intercepted request; the request's explicit fields always
/// win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultSettings {
    /// Method applied when the request does not name one.
    pub method: Option<Method>,
    /// Payload type applied when the request does not name one.
    pub data_type: Option<String>,
    /// Headers inserted only for keys the request does not already carry.
    pub headers: HashMap<String, String>,
    /// Timeout applied when the request does not carry one.
    pub timeout: Option<Duration>,
}

impl DefaultSettings {
    /// Overlays `request` on top of these defaults.
    ///
    /// Fields the request sets explicitly are kept; unset fields are
    /// filled from the defaults, and default headers are inserted only
    /// where the request lacks the key.
    pub fn merge_into(&self, request: &mut TransportRequest) {
        if request.method.is_none() {
            request.method.clone_from(&self.method);
        }
        if request.data_type.is_none() {
            request.data_type.clone_from(&self.data_type);
        }
        if request.timeout.is_none() {
            request.timeout = self.timeout;
        }
        for (name, value) in &self.headers {
            request
                .headers
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
    }
}
