//! Canned responses, interception configuration, and per-call resolution.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use super::error::InterceptError;
use super::matcher::{MatchError, UrlMatcher};
use crate::transport::{DefaultSettings, TransportRequest, TransportResponse};

/// Message delivered when a blocked request falls through to the forced
/// failure response.
pub const BLOCKED_MESSAGE: &str = "Server requests are blocked by configuration";

/// Hook invoked before an intercepted request is carried out.
///
/// Receives the caller's original request and the canned response that
/// will answer it, if any.
pub type BeforeHook = Arc<dyn Fn(&TransportRequest, Option<&ResponseSpec>) + Send + Sync>;

/// Hook invoked after a request completes, before the caller's own
/// handler runs.
///
/// Receives the caller's original request, the canned response that
/// answered it (if any; `None` on a pass-through), and the response that
/// was delivered.
pub type AfterHook =
    Arc<dyn Fn(&TransportRequest, Option<&ResponseSpec>, &TransportResponse) + Send + Sync>;

/// A canned response specification.
///
/// In a `responses` list the `url` field is the pattern matched against
/// the request URL; on a default response it stays unset. Specs are
/// read-only once configured: the interceptor never mutates them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResponseSpec {
    /// URL pattern; a spec without one never matches.
    pub url: Option<String>,
    /// Payload returned on success, or the error payload on failure.
    pub data: Option<Value>,
    /// HTTP-like status code; 200 when unset.
    pub status: Option<u16>,
    /// Headers carried by the synthesized response.
    pub headers: HashMap<String, String>,
    /// Forces the error path even for a success status.
    #[serde(alias = "isError")]
    pub is_error: bool,
}

impl ResponseSpec {
    /// Creates an empty spec: success, status 200, no payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the URL pattern this spec answers.
    #[must_use]
    pub fn for_url(mut self, pattern: impl Into<String>) -> Self {
        self.url = Some(pattern.into());
        self
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Sets the status code.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Forces the error path regardless of status.
    #[must_use]
    pub const fn as_error(mut self) -> Self {
        self.is_error = true;
        self
    }

    /// The canonical failure installed on the fallback path when server
    /// requests are blocked.
    #[must_use]
    pub fn blocked() -> Self {
        Self::new()
            .with_status(StatusCode::SERVICE_UNAVAILABLE.as_u16())
            .with_data(Value::String(BLOCKED_MESSAGE.to_owned()))
    }
}

/// Full interception configuration.
#[derive(Clone, Default)]
pub struct AdapterConfig {
    /// Canned responses tried in order; the first match wins.
    pub responses: Vec<ResponseSpec>,
    /// Response used when nothing in `responses` matches.
    pub default_response: Option<ResponseSpec>,
    /// Matcher predicate; the regex matcher applies when unset.
    pub url_matcher: Option<UrlMatcher>,
    /// Forces a failing fallback so no unmatched request reaches the
    /// server.
    pub block_server_requests: bool,
    /// Runs before each intercepted request.
    pub before: Option<BeforeHook>,
    /// Runs after a successful completion, before the caller's handler.
    pub after_success: Option<AfterHook>,
    /// Runs after a failed completion, before the caller's handler.
    pub after_error: Option<AfterHook>,
}

impl AdapterConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a canned response to the ordered list.
    #[must_use]
    pub fn with_response(mut self, spec: ResponseSpec) -> Self {
        self.responses.push(spec);
        self
    }

    /// Sets the response used when nothing in the list matches.
    #[must_use]
    pub fn with_default_response(mut self, spec: ResponseSpec) -> Self {
        self.default_response = Some(spec);
        self
    }

    /// Replaces the matcher predicate.
    #[must_use]
    pub fn with_url_matcher(
        mut self,
        matcher: impl Fn(&str, &str) -> Result<bool, MatchError> + Send + Sync + 'static,
    ) -> Self {
        self.url_matcher = Some(Arc::new(matcher));
        self
    }

    /// Blocks unmatched requests from reaching the server.
    #[must_use]
    pub const fn blocking_server_requests(mut self) -> Self {
        self.block_server_requests = true;
        self
    }

    /// Installs the before hook.
    #[must_use]
    pub fn with_before(
        mut self,
        hook: impl Fn(&TransportRequest, Option<&ResponseSpec>) + Send + Sync + 'static,
    ) -> Self {
        self.before = Some(Arc::new(hook));
        self
    }

    /// Installs the after-success hook.
    #[must_use]
    pub fn with_after_success(
        mut self,
        hook: impl Fn(&TransportRequest, Option<&ResponseSpec>, &TransportResponse)
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.after_success = Some(Arc::new(hook));
        self
    }

    /// Installs the after-error hook.
    #[must_use]
    pub fn with_after_error(
        mut self,
        hook: impl Fn(&TransportRequest, Option<&ResponseSpec>, &TransportResponse)
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.after_error = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for AdapterConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AdapterConfig")
            .field("responses", &self.responses)
            .field("default_response", &self.default_response)
            .field("has_url_matcher", &self.url_matcher.is_some())
            .field("block_server_requests", &self.block_server_requests)
            .field("has_before", &self.before.is_some())
            .field("has_after_success", &self.after_success.is_some())
            .field("has_after_error", &self.after_error.is_some())
            .finish()
    }
}

/// Interception configuration as supplied by test code.
///
/// The two accepted shapes are kept as an explicit union: a bare JSON
/// array means "return these rows as the 200 body of every request", and
/// everything else is a full [`AdapterConfig`]. The union is resolved to
/// one canonical shape on every intercepted call.
#[derive(Debug, Clone)]
pub enum InterceptConfig {
    /// Return these rows as the successful body of every request.
    Shorthand(Vec<Value>),
    /// A full configuration.
    Full(AdapterConfig),
}

impl Default for InterceptConfig {
    fn default() -> Self {
        Self::Full(AdapterConfig::default())
    }
}

impl From<AdapterConfig> for InterceptConfig {
    fn from(config: AdapterConfig) -> Self {
        Self::Full(config)
    }
}

impl From<Vec<Value>> for InterceptConfig {
    fn from(rows: Vec<Value>) -> Self {
        Self::Shorthand(rows)
    }
}

impl From<ResponseSpec> for InterceptConfig {
    fn from(spec: ResponseSpec) -> Self {
        Self::Full(AdapterConfig::new().with_response(spec))
    }
}

/// Deserializable subset of [`AdapterConfig`]; matcher and hooks are not
/// expressible in JSON.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JsonConfig {
    responses: OneOrMany,
    #[serde(alias = "defaultResponse")]
    default_response: Option<ResponseSpec>,
    #[serde(alias = "blockServerRequests")]
    block_server_requests: bool,
}

/// A `responses` field may be a list or a bare single spec.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    /// A single canned response.
    One(ResponseSpec),
    /// An ordered list of canned responses.
    Many(Vec<ResponseSpec>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl From<OneOrMany> for Vec<ResponseSpec> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(spec) => vec![spec],
            OneOrMany::Many(specs) => specs,
        }
    }
}

impl InterceptConfig {
    /// Parses dynamic JSON configuration.
    ///
    /// Arrays become the shorthand form; objects become a full
    /// configuration; `null` is an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InterceptError::InvalidConfigShape`] for any other JSON
    /// shape, or when an object's fields do not deserialize.
    pub fn from_value(value: Value) -> Result<Self, InterceptError> {
        match value {
            Value::Array(rows) => Ok(Self::Shorthand(rows)),
            Value::Null => Ok(Self::default()),
            Value::Object(_) => {
                let parsed: JsonConfig =
                    serde_json::from_value(value).map_err(|error| {
                        InterceptError::InvalidConfigShape {
                            found: format!("an object that failed to parse: {error}"),
                        }
                    })?;
                let mut config = AdapterConfig::new();
                config.responses = parsed.responses.into();
                config.default_response = parsed.default_response;
                config.block_server_requests = parsed.block_server_requests;
                Ok(Self::Full(config))
            }
            other => Err(InterceptError::InvalidConfigShape {
                found: json_type_name(&other).to_owned(),
            }),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Effective configuration snapshot for one intercepted call.
pub(crate) struct ResolvedConfig {
    pub(crate) responses: Vec<ResponseSpec>,
    pub(crate) default_response: Option<ResponseSpec>,
    pub(crate) url_matcher: Option<UrlMatcher>,
    pub(crate) before: Option<BeforeHook>,
    pub(crate) after_success: Option<AfterHook>,
    pub(crate) after_error: Option<AfterHook>,
    pub(crate) default_settings: DefaultSettings,
}

/// Resolves the stored configuration into the canonical per-call shape.
///
/// Runs fresh on every intercepted call, so runtime changes to the
/// configuration or the blocking flag take effect immediately. The
/// blocking override installs the canonical 503 failure only when no
/// default response was supplied explicitly, and only on the fallback
/// path: matched responses always win over the default.
pub(crate) fn resolve(
    raw: &InterceptConfig,
    instance_blocks: bool,
    default_settings: &DefaultSettings,
) -> ResolvedConfig {
    let config = match raw {
        InterceptConfig::Shorthand(rows) => AdapterConfig::new()
            .with_default_response(ResponseSpec::new().with_data(Value::Array(rows.clone()))),
        InterceptConfig::Full(full) => full.clone(),
    };

    let mut default_response = config.default_response;
    if (instance_blocks || config.block_server_requests) && default_response.is_none() {
        default_response = Some(ResponseSpec::blocked());
    }

    ResolvedConfig {
        responses: config.responses,
        default_response,
        url_matcher: config.url_matcher,
        before: config.before,
        after_success: config.after_success,
        after_error: config.after_error,
        default_settings: default_settings.clone(),
    }
}
