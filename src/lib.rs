//! Shunt library crate providing fake-transport interception.
//!
//! The library wraps a pluggable HTTP-style transport with an interceptor
//! that answers requests synchronously from canned responses, blocks
//! accidental server traffic on demand, and passes everything else through
//! to the real transport with observation hooks attached.

pub mod intercept;
pub mod transport;

pub use intercept::{
    AdapterConfig, InterceptConfig, InterceptError, MatchError, ResponseSpec,
    TransportInterceptor,
};
pub use transport::{
    BlockingHttpTransport, DefaultSettings, Transport, TransportRegistry, TransportRequest,
    TransportResponse,
};
