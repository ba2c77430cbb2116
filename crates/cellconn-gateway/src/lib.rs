//! cellconn-gateway - Provider dispatch for cellular connectivity
//!
//! This crate provides the [`Dispatcher`] that resolves the active provider
//! from the configured credentials on every call and routes each uniform
//! operation to the matching vendor client, plus the [`ConnectivityService`]
//! facade callers use.
//!
//! # Architecture
//!
//! ```text
//! caller
//!   │
//!   ▼
//! ConnectivityService ──► Dispatcher ──► CredentialProvider::provide()
//!                             │                  │
//!                             │    ProviderIdentity (per call)
//!                             ▼                  │
//!                       ClientRegistry ◄─────────┘
//!                        │           │
//!                        ▼           ▼
//!                  JasperClient  EricssonClient
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use cellconn_gateway::{ClientRegistry, ConnectivityService, StaticCredentialProvider};
//!
//! let mut registry = ClientRegistry::new();
//! registry.register_client(Arc::new(jasper_client));
//!
//! let credentials = Arc::new(StaticCredentialProvider::new(CredentialSet::new("jasper")));
//! let service = ConnectivityService::new(credentials, registry);
//!
//! let terminals = service.list_terminals().await?;
//! ```

pub mod credentials;
mod dispatcher;
pub mod error;
mod registry;
mod service;

pub use credentials::{FileCredentialProvider, StaticCredentialProvider};
pub use dispatcher::{Dispatcher, ProviderInfo};
pub use error::{GatewayError, GatewayResult};
pub use registry::{ClientFactory, ClientRegistry};
pub use service::ConnectivityService;

// Re-export core types for convenience
pub use cellconn_core::{
    CellularClient, ClientError, CredentialProvider, CredentialSet, Iccid, ProviderIdentity,
};
