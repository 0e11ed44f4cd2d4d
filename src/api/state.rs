//! Application state for the RCTI engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::store::InMemoryDeductionStore;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded fleet configuration and the deduction store.
#[derive(Clone)]
pub struct AppState {
    /// The loaded fleet configuration.
    config: Arc<ConfigLoader>,
    /// The deduction store backing the scheduler.
    store: Arc<InMemoryDeductionStore>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader
    /// and an empty store.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(InMemoryDeductionStore::new()),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a reference to the deduction store.
    pub fn store(&self) -> &InMemoryDeductionStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
