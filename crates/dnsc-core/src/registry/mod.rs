//! Plugin-based provider registry
//!
//! The registry allows provider adapters to be registered dynamically at
//! runtime, so the binary never hard-codes an if-else chain over providers.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dnsc_core::registry::ProviderRegistry;
//!
//! let registry = ProviderRegistry::new();
//! dnsc_provider_azure::register(&registry);
//! dnsc_provider_namecheap::register(&registry);
//!
//! let adapter = registry.create_provider(&config.provider)?;
//! ```
//!
//! ## Registration
//!
//! Provider crates register themselves through a `register` function:
//!
//! ```rust,ignore
//! pub fn register(registry: &ProviderRegistry) {
//!     registry.register_provider("azure", Box::new(AzureFactory));
//! }
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::traits::{RecordAdapter, RecordAdapterFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Provider registry for plugin-based adapter creation
///
/// Maps provider type names to factory objects.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered adapter factories
    providers: RwLock<HashMap<String, Box<dyn RecordAdapterFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter factory
    ///
    /// # Parameters
    ///
    /// - `name`: Provider type name (e.g., "azure", "namecheap")
    /// - `factory`: Factory object for creating adapter instances
    ///
    /// Registering an existing name replaces the previous factory.
    pub fn register_provider(
        &self,
        name: impl Into<String>,
        factory: Box<dyn RecordAdapterFactory>,
    ) {
        let mut providers = self.providers.write().unwrap_or_else(PoisonError::into_inner);
        providers.insert(name.into(), factory);
    }

    /// Create an adapter from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn RecordAdapter>)`: Created adapter instance
    /// - `Err(Error)`: If the provider type is not registered or creation fails
    pub fn create_provider(&self, config: &ProviderConfig) -> Result<Box<dyn RecordAdapter>> {
        let provider_type = config.type_name();
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);

        let factory = providers.get(provider_type).ok_or_else(|| {
            Error::config(format!(
                "Unknown provider type: {} (registered: {})",
                provider_type,
                sorted_names(&providers).join(", ")
            ))
        })?;

        factory.create(config)
    }

    /// List all registered provider types, sorted
    pub fn list_providers(&self) -> Vec<String> {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        sorted_names(&providers)
    }

    /// Check if a provider type is registered
    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        providers.contains_key(name)
    }
}

fn sorted_names(providers: &HashMap<String, Box<dyn RecordAdapterFactory>>) -> Vec<String> {
    let mut names: Vec<String> = providers.keys().cloned().collect();
    names.sort();
    names
}
