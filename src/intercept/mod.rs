//! Fake-transport interception for deterministic tests.
//!
//! A [`TransportInterceptor`] wraps a base [`crate::transport::Transport`]
//! and answers requests from canned responses, synchronously and without a
//! network. Requests that no canned response covers either pass through to
//! the base transport or, when server requests are blocked, fail with a
//! fixed recognizable 503.
//!
//! ```
//! use std::sync::Arc;
//!
//! use serde_json::json;
//! use shunt::transport::{BlockingHttpTransport, TransportRegistry, TransportRequest};
//! use shunt::intercept::TransportInterceptor;
//!
//! let registry = TransportRegistry::new();
//! registry.register("live", Arc::new(BlockingHttpTransport::new()));
//!
//! let interceptor = TransportInterceptor::new(&registry)
//!     .expect("a transport is registered");
//! interceptor.enable_with(vec![json!({"id": 1, "name": "Bob"})]);
//! ```

pub mod config;
pub mod error;
pub mod interceptor;
pub mod matcher;
mod synthesis;

pub use config::{
    AdapterConfig, AfterHook, BLOCKED_MESSAGE, BeforeHook, InterceptConfig, ResponseSpec,
};
pub use error::InterceptError;
pub use interceptor::TransportInterceptor;
pub use matcher::{MatchError, UrlMatcher, regex_url_matcher};
