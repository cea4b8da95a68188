//! The interceptor orchestrating fake and pass-through request handling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use serde_json::Value;

use super::config::{self, InterceptConfig, ResolvedConfig, ResponseSpec};
use super::error::InterceptError;
use super::matcher;
use super::synthesis::{self, Outcome};
use crate::transport::{
    DefaultSettings, Transport, TransportRegistry, TransportRequest, TransportResponse,
};

/// Intercepts a base transport and answers requests from canned responses.
///
/// The interceptor is a decorator: it implements [`Transport`] itself and
/// wraps the base transport located in the registry at construction.
/// Install it wherever the application would install its transport. While
/// disabled, every call forwards to the base transport verbatim; while
/// enabled, canned responses are tried in order and the first whose URL
/// pattern matches the request wins, otherwise the configured default
/// response applies, and with neither the request passes through to the
/// base transport with the observation hooks still attached.
///
/// The canned path is deliberately synchronous: a matching request
/// completes before `send` returns, so tests can assert on the result
/// without waiting. Setting `set_block_server_requests(true)` forces a
/// recognizable 503 failure onto the fallback path, which lets a test
/// prove that no real traffic escaped.
pub struct TransportInterceptor {
    base: Arc<dyn Transport>,
    default_settings: DefaultSettings,
    config: RwLock<InterceptConfig>,
    enabled: AtomicBool,
    block_server_requests: AtomicBool,
}

impl TransportInterceptor {
    /// Wraps the registry's default transport with an empty configuration.
    ///
    /// The base transport's default settings are captured here, once, for
    /// merging under every intercepted request. Construction does not
    /// intercept anything: the interceptor starts disabled.
    ///
    /// # Errors
    ///
    /// Returns [`InterceptError::MissingTransport`] when the registry has
    /// no default transport.
    pub fn new(registry: &TransportRegistry) -> Result<Self, InterceptError> {
        Self::build(registry, None, InterceptConfig::default())
    }

    /// Wraps the registry's default transport with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`InterceptError::MissingTransport`] when the registry has
    /// no default transport.
    pub fn with_config(
        registry: &TransportRegistry,
        config: impl Into<InterceptConfig>,
    ) -> Result<Self, InterceptError> {
        Self::build(registry, None, config.into())
    }

    /// Wraps the transport registered under `name` with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`InterceptError::MissingTransport`] when nothing is
    /// registered under `name`.
    pub fn for_adapter(
        registry: &TransportRegistry,
        name: &str,
        config: impl Into<InterceptConfig>,
    ) -> Result<Self, InterceptError> {
        Self::build(registry, Some(name), config.into())
    }

    fn build(
        registry: &TransportRegistry,
        name: Option<&str>,
        config: InterceptConfig,
    ) -> Result<Self, InterceptError> {
        let base = registry
            .get(name)
            .ok_or_else(|| InterceptError::MissingTransport {
                name: name.map(str::to_owned),
            })?;
        let default_settings = base.default_settings();

        Ok(Self {
            base,
            default_settings,
            config: RwLock::new(config),
            enabled: AtomicBool::new(false),
            block_server_requests: AtomicBool::new(false),
        })
    }

    /// Switches interception on. Idempotent: enabling an enabled
    /// interceptor changes nothing.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
        tracing::debug!("transport interception enabled");
    }

    /// Replaces the configuration and switches interception on.
    pub fn enable_with(&self, config: impl Into<InterceptConfig>) {
        self.set_config(config);
        self.enable();
    }

    /// Switches interception off, restoring verbatim pass-through. Safe
    /// to call when already disabled.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        tracing::debug!("transport interception disabled");
    }

    /// Whether calls are currently intercepted.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Replaces the configuration; observed by the next call.
    pub fn set_config(&self, config: impl Into<InterceptConfig>) {
        *self.write_config() = config.into();
    }

    /// Replaces the configuration from dynamic JSON.
    ///
    /// # Errors
    ///
    /// Returns [`InterceptError::InvalidConfigShape`] when `value` is
    /// neither a JSON object nor an array of results.
    pub fn set_config_value(&self, value: Value) -> Result<(), InterceptError> {
        let parsed = InterceptConfig::from_value(value)?;
        *self.write_config() = parsed;
        Ok(())
    }

    /// Whether the instance-level blocking override is active.
    #[must_use]
    pub fn blocks_server_requests(&self) -> bool {
        self.block_server_requests.load(Ordering::SeqCst)
    }

    /// Sets the instance-level blocking override, independent of any one
    /// configuration; observed by the next call.
    pub fn set_block_server_requests(&self, block: bool) {
        self.block_server_requests.store(block, Ordering::SeqCst);
    }

    fn write_config(&self) -> RwLockWriteGuard<'_, InterceptConfig> {
        self.config.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot_config(&self) -> InterceptConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn intercepted_send(&self, origin: TransportRequest) {
        let raw = self.snapshot_config();
        let resolved =
            config::resolve(&raw, self.blocks_server_requests(), &self.default_settings);

        let mut request = origin.clone();
        resolved.default_settings.merge_into(&mut request);

        let spec = matcher::match_response(
            &request.url,
            &resolved.responses,
            resolved.url_matcher.as_ref(),
        )
        .cloned()
        .or_else(|| resolved.default_response.clone());

        wrap_handlers(&mut request, &origin, spec.as_ref(), &resolved);

        if let Some(hook) = &resolved.before {
            hook(&origin, spec.as_ref());
        }

        match spec {
            None => {
                tracing::trace!("no canned response for {}; passing through", request.url);
                self.base.send(request);
            }
            Some(found) => {
                let (outcome, response) = synthesis::synthesize(&found, &request);
                tracing::trace!(
                    "answering {} with canned response, status {}",
                    request.url,
                    response.status
                );
                let handler = match outcome {
                    Outcome::Success => &request.success,
                    Outcome::Error => &request.error,
                };
                if let Some(callback) = handler {
                    callback(&response);
                }
            }
        }
    }
}

impl Transport for TransportInterceptor {
    fn send(&self, request: TransportRequest) {
        if self.is_enabled() {
            self.intercepted_send(request);
        } else {
            self.base.send(request);
        }
    }

    fn default_settings(&self) -> DefaultSettings {
        self.default_settings.clone()
    }
}

/// Replaces the request's handler slots with wrappers that run the
/// configured after hooks first and the caller's original handler second.
///
/// The wrappers close over the caller's request and the matched spec, so
/// they behave the same whether the response arrives synchronously from
/// synthesis or later from the base transport on the pass-through path.
fn wrap_handlers(
    request: &mut TransportRequest,
    origin: &TransportRequest,
    spec: Option<&ResponseSpec>,
    resolved: &ResolvedConfig,
) {
    let after_success = resolved.after_success.clone();
    let caller_success = origin.success.clone();
    let success_origin = origin.clone();
    let success_spec = spec.cloned();
    request.success = Some(Arc::new(move |response: &TransportResponse| {
        if let Some(hook) = &after_success {
            hook(&success_origin, success_spec.as_ref(), response);
        }
        if let Some(callback) = &caller_success {
            callback(response);
        }
    }));

    let after_error = resolved.after_error.clone();
    let caller_error = origin.error.clone();
    let error_origin = origin.clone();
    let error_spec = spec.cloned();
    request.error = Some(Arc::new(move |response: &TransportResponse| {
        if let Some(hook) = &after_error {
            hook(&error_origin, error_spec.as_ref(), response);
        }
        if let Some(callback) = &caller_error {
            callback(response);
        }
    }));
}
