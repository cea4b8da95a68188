//! Errors surfaced while setting up interception.

use thiserror::Error;

/// Errors surfaced while constructing or configuring the interceptor.
///
/// These are programmer errors: they indicate misuse of the interceptor,
/// not a failure being simulated, so they are returned eagerly instead of
/// travelling through a request's error handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InterceptError {
    /// No transport was registered under the requested name.
    #[error("no transport registered to intercept under {name:?}")]
    MissingTransport {
        /// The adapter name that failed to resolve; `None` means the
        /// registry's default slot was empty.
        name: Option<String>,
    },

    /// Dynamic configuration was neither a JSON object nor an array.
    #[error("test adapter config must be a JSON object or an array of results, got {found}")]
    InvalidConfigShape {
        /// Description of the JSON shape that was supplied instead.
        found: String,
    },
}
