//! cellconn-sim - Simulated vendor backends
//!
//! In-memory stand-ins for the Jasper and Ericsson connectivity APIs. Each
//! vendor account is a [`SimNetwork`]; clients are built per call from the
//! resolved credentials and reject accounts the network was not configured
//! for, which makes credential validation observable.
//!
//! # Example
//!
//! ```ignore
//! use cellconn_sim::{config::VendorSimConfig, JasperClient, SimNetwork};
//!
//! let network = Arc::new(SimNetwork::new(VendorSimConfig::jasper_demo()));
//! registry.register_factory(ProviderIdentity::Jasper, JasperClient::factory(network));
//! ```

pub mod config;
mod ericsson;
mod jasper;
mod network;

pub use ericsson::EricssonClient;
pub use jasper::JasperClient;
pub use network::{SimNetwork, SmsRecord};

// Re-export for convenience
pub use cellconn_core::{CellularClient, ClientError, ClientResult};
