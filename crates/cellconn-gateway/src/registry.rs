//! Registry of vendor clients keyed by provider identity

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use cellconn_core::{CellularClient, ClientResult, CredentialSet, ProviderIdentity};
use tracing::info;

/// Builds a vendor client from the credentials resolved for one call
pub type ClientFactory =
    dyn Fn(&CredentialSet) -> ClientResult<Arc<dyn CellularClient>> + Send + Sync;

enum ClientSlot {
    /// One client instance reused across calls
    Shared(Arc<dyn CellularClient>),
    /// A fresh client per call, built from the current credentials
    Factory(Arc<ClientFactory>),
}

/// Maps each [`ProviderIdentity`] to the client that serves it.
///
/// Built once at startup and read-only afterwards.
#[derive(Default)]
pub struct ClientRegistry {
    slots: HashMap<ProviderIdentity, ClientSlot>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared client for the provider it reports
    pub fn register_client(&mut self, client: Arc<dyn CellularClient>) {
        let provider = client.provider();
        info!(%provider, "Registering shared vendor client");
        self.slots.insert(provider, ClientSlot::Shared(client));
    }

    /// Register a factory building a fresh client per call
    pub fn register_factory<F>(&mut self, provider: ProviderIdentity, factory: F)
    where
        F: Fn(&CredentialSet) -> ClientResult<Arc<dyn CellularClient>> + Send + Sync + 'static,
    {
        info!(%provider, "Registering vendor client factory");
        self.slots
            .insert(provider, ClientSlot::Factory(Arc::new(factory)));
    }

    /// Remove the client for a provider. Returns whether one was registered.
    pub fn unregister(&mut self, provider: ProviderIdentity) -> bool {
        let removed = self.slots.remove(&provider).is_some();
        if removed {
            info!(%provider, "Unregistered vendor client");
        }
        removed
    }

    pub fn is_registered(&self, provider: ProviderIdentity) -> bool {
        self.slots.contains_key(&provider)
    }

    /// Registered providers, in a stable order
    pub fn providers(&self) -> Vec<ProviderIdentity> {
        let mut providers: Vec<_> = self.slots.keys().copied().collect();
        providers.sort_by_key(|p| p.to_string());
        providers
    }

    /// Get the client for `provider`, building it from `credentials` when a
    /// factory is registered. `None` when nothing is registered.
    pub fn client_for(
        &self,
        provider: ProviderIdentity,
        credentials: &CredentialSet,
    ) -> Option<ClientResult<Arc<dyn CellularClient>>> {
        self.slots.get(&provider).map(|slot| match slot {
            ClientSlot::Shared(client) => Ok(client.clone()),
            ClientSlot::Factory(factory) => factory(credentials),
        })
    }
}

impl fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("providers", &self.providers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use cellconn_core::ClientError;

    use super::*;

    fn unavailable(_: &CredentialSet) -> ClientResult<Arc<dyn CellularClient>> {
        Err(ClientError::Internal("account unavailable".to_string()))
    }

    #[test]
    fn unregister_removes_the_slot() {
        let mut registry = ClientRegistry::new();
        registry.register_factory(ProviderIdentity::Jasper, unavailable);
        registry.register_factory(ProviderIdentity::Ericsson, unavailable);
        assert!(registry.is_registered(ProviderIdentity::Jasper));

        assert!(registry.unregister(ProviderIdentity::Jasper));
        assert!(!registry.is_registered(ProviderIdentity::Jasper));
        assert!(!registry.unregister(ProviderIdentity::Jasper));
        assert_eq!(registry.providers(), vec![ProviderIdentity::Ericsson]);

        let credentials = CredentialSet::new("jasper");
        assert!(registry
            .client_for(ProviderIdentity::Jasper, &credentials)
            .is_none());
        assert!(matches!(
            registry.client_for(ProviderIdentity::Ericsson, &credentials),
            Some(Err(ClientError::Internal(_)))
        ));
    }

    #[test]
    fn debug_lists_providers() {
        let mut registry = ClientRegistry::new();
        registry.register_factory(ProviderIdentity::Ericsson, unavailable);
        let debug = format!("{:?}", registry);
        assert!(debug.contains("Ericsson"), "{}", debug);
    }
}
