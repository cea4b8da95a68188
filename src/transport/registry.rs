//! Named transport registration and lookup.
//!
//! Transports are located through an explicit registry value injected
//! wherever lookup is needed, rather than process-wide state, so parallel
//! tests cannot interfere with one another through shared globals.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use super::Transport;

/// Raised when `set_default` names a transport that was never registered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no transport registered under name {name:?}")]
pub struct UnknownTransport {
    /// The name that failed to resolve.
    pub name: String,
}

/// Registry of named transports with a designated default.
///
/// Clones share the same underlying table, so one registry can be handed
/// to application code and test code alike.
#[derive(Clone, Default)]
pub struct TransportRegistry {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    default_name: Option<String>,
    transports: HashMap<String, Arc<dyn Transport>>,
}

impl TransportRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a transport under `name`.
    ///
    /// The first registration becomes the default until `set_default`
    /// says otherwise. Registering an existing name replaces it.
    pub fn register(&self, name: impl Into<String>, transport: Arc<dyn Transport>) {
        let key = name.into();
        let mut inner = self.write_inner();
        if inner.default_name.is_none() {
            inner.default_name = Some(key.clone());
        }
        inner.transports.insert(key, transport);
    }

    /// Designates the default transport by name.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownTransport`] when `name` was never registered.
    pub fn set_default(&self, name: &str) -> Result<(), UnknownTransport> {
        let mut inner = self.write_inner();
        if inner.transports.contains_key(name) {
            inner.default_name = Some(name.to_owned());
            Ok(())
        } else {
            Err(UnknownTransport {
                name: name.to_owned(),
            })
        }
    }

    /// Looks up a transport by name, or the default when `name` is `None`.
    #[must_use]
    pub fn get(&self, name: Option<&str>) -> Option<Arc<dyn Transport>> {
        let inner = self.read_inner();
        let key = name.map_or_else(|| inner.default_name.clone(), |value| Some(value.to_owned()))?;
        inner.transports.get(&key).cloned()
    }

    fn read_inner(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
