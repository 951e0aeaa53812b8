//! Selecting a generator backend by the `provider` name in [`RuntimeConfig`].

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{LlmProvider, ProviderError};
use crate::config::RuntimeConfig;

/// Builds providers of one type.
pub trait ProviderFactory: Send + Sync {
    /// Name used in the `provider` config field.
    fn provider_type(&self) -> &'static str;

    /// Check the configuration without building anything.
    fn validate_config(&self, config: &RuntimeConfig) -> Result<(), ProviderError>;

    fn create(&self, config: &RuntimeConfig) -> Result<Arc<dyn LlmProvider>, ProviderError>;

    fn description(&self) -> &'static str {
        "Analysis generator"
    }
}

/// Factories keyed by provider type.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<&'static str, Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every provider compiled into this build.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "anthropic")]
        registry.register(Arc::new(super::AnthropicProviderFactory));
        registry
    }

    /// Add a factory; a later registration of the same type wins.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        tracing::debug!(provider = factory.provider_type(), "provider registered");
        self.factories.insert(factory.provider_type(), factory);
    }

    fn lookup(&self, provider_type: &str) -> Result<&Arc<dyn ProviderFactory>, ProviderError> {
        self.factories.get(provider_type).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "unknown provider '{}' (available: {})",
                provider_type,
                self.available_types().join(", ")
            ))
        })
    }

    pub fn validate(&self, provider_type: &str, config: &RuntimeConfig) -> Result<(), ProviderError> {
        self.lookup(provider_type)?.validate_config(config)
    }

    /// Validate, then build, the provider named `provider_type`.
    pub fn create(
        &self,
        provider_type: &str,
        config: &RuntimeConfig,
    ) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        let factory = self.lookup(provider_type)?;
        factory.validate_config(config)?;
        factory.create(config)
    }

    pub fn available_types(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    pub fn has_provider(&self, provider_type: &str) -> bool {
        self.factories.contains_key(provider_type)
    }

    /// `(type, description)` for every registered provider.
    pub fn describe(&self) -> Vec<(&'static str, &'static str)> {
        self.factories
            .values()
            .map(|f| (f.provider_type(), f.description()))
            .collect()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}
