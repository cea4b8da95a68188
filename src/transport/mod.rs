//! Pluggable transport contract and implementations.
//!
//! A [`Transport`] carries an HTTP-style [`TransportRequest`] to completion
//! and reports the outcome through the request's own handlers. Transports
//! are registered by name in a [`TransportRegistry`] so that collaborating
//! code — the interceptor included — can locate them without global state.

pub mod http;
pub mod registry;
pub mod request;
pub mod response;

pub use http::BlockingHttpTransport;
pub use registry::{TransportRegistry, UnknownTransport};
pub use request::{DefaultSettings, ResponseHandler, TransportRequest};
pub use response::TransportResponse;

/// A transport that can carry an HTTP-style request to completion.
///
/// Implementations deliver exactly one outcome per request through the
/// request's `success` or `error` handler. A live transport completes on
/// its own schedule; a fake may complete synchronously before `send`
/// returns.
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    /// Carries the request to completion, invoking one of its handlers.
    fn send(&self, request: TransportRequest);

    /// Settings merged under every request routed through this transport.
    fn default_settings(&self) -> DefaultSettings {
        DefaultSettings::default()
    }
}

#[cfg(test)]
mod tests;
