//! Live transport backed by a blocking `reqwest` client.

use std::collections::HashMap;
use std::thread;

use http::{Method, StatusCode};
use serde_json::Value;

use super::Transport;
use super::request::{DefaultSettings, TransportRequest};
use super::response::TransportResponse;

/// Transport that performs real HTTP requests.
///
/// Each request runs on its own thread, so completion is asynchronous
/// relative to `send` — the same schedule callers see from any live
/// network transport. Responses with a 2xx status go to the success
/// handler; any other status, and connection-level failures, go to the
/// error handler.
pub struct BlockingHttpTransport {
    client: reqwest::blocking::Client,
    defaults: DefaultSettings,
}

impl BlockingHttpTransport {
    /// Creates a transport with empty default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_defaults(DefaultSettings::default())
    }

    /// Creates a transport whose `default_settings` are `defaults`.
    #[must_use]
    pub fn with_defaults(defaults: DefaultSettings) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            defaults,
        }
    }
}

impl Default for BlockingHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for BlockingHttpTransport {
    fn send(&self, request: TransportRequest) {
        let client = self.client.clone();
        let _detached = thread::spawn(move || execute(&client, &request));
    }

    fn default_settings(&self) -> DefaultSettings {
        self.defaults.clone()
    }
}

fn execute(client: &reqwest::blocking::Client, request: &TransportRequest) {
    let method = request.method.clone().unwrap_or(Method::GET);
    let mut builder = client.request(method, &request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    if let Some(timeout) = request.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(payload) = &request.payload {
        builder = builder.json(payload);
    }

    match builder.send() {
        Ok(raw) => deliver(request, into_response(raw, &request.url)),
        Err(error) => {
            tracing::debug!("transport request to {} failed: {error}", request.url);
            let response = TransportResponse::new(
                StatusCode::SERVICE_UNAVAILABLE,
                Value::String(error.to_string()),
                HashMap::new(),
            )
            .with_request_url(&request.url);
            if let Some(handler) = &request.error {
                handler(&response);
            }
        }
    }
}

fn into_response(raw: reqwest::blocking::Response, request_url: &str) -> TransportResponse {
    let status = raw.status();
    let headers = raw
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|text| (name.as_str().to_owned(), text.to_owned()))
        })
        .collect();
    let body = raw.text().unwrap_or_default();
    let data = serde_json::from_str::<Value>(&body).unwrap_or_else(|_| Value::String(body));

    TransportResponse::new(status, data, headers).with_request_url(request_url)
}

fn deliver(request: &TransportRequest, response: TransportResponse) {
    let handler = if response.status.is_success() {
        &request.success
    } else {
        &request.error
    };
    if let Some(callback) = handler {
        callback(&response);
    }
}
