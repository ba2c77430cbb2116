//! cellconn-core - Core traits and types for cellular connectivity providers
//!
//! This crate provides the fundamental abstractions that allow different
//! vendor connectivity APIs (Jasper, Ericsson, ...) to be driven through one
//! uniform interface.

pub mod client;
pub mod error;
pub mod models;
pub mod provider;

pub use client::{Capabilities, CellularClient, StateEncoding, TargetSimState, VendorAck};
pub use error::{ClientError, ClientResult};
pub use models::*;
pub use provider::{CredentialError, CredentialProvider, CredentialSet, ProviderIdentity};
