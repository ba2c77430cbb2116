//! Credential providers
//!
//! - [`StaticCredentialProvider`] keeps a replaceable credential set in memory
//! - [`FileCredentialProvider`] re-reads a TOML file on every call

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cellconn_core::{CredentialError, CredentialProvider, CredentialSet};
use parking_lot::RwLock;
use tracing::info;

/// In-memory credentials that can be swapped at runtime
pub struct StaticCredentialProvider {
    credentials: RwLock<CredentialSet>,
}

impl StaticCredentialProvider {
    pub fn new(credentials: CredentialSet) -> Self {
        Self {
            credentials: RwLock::new(credentials),
        }
    }

    /// Replace the credentials; the next uniform call uses them
    pub fn replace(&self, credentials: CredentialSet) {
        info!(
            provider = %credentials.api_registration_provider,
            "Replacing configured credentials"
        );
        *self.credentials.write() = credentials;
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn provide(&self) -> Result<CredentialSet, CredentialError> {
        Ok(self.credentials.read().clone())
    }
}

/// Credentials stored in a TOML file.
///
/// ```toml
/// api_registration_provider = "ericsson"
/// base_url = "https://dcp.example.com"
/// username = "ops"
/// api_key = "..."
/// ```
pub struct FileCredentialProvider {
    path: PathBuf,
}

impl FileCredentialProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialProvider for FileCredentialProvider {
    async fn provide(&self) -> Result<CredentialSet, CredentialError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CredentialError::Unavailable(format!(
                "Failed to read credentials file '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            CredentialError::Invalid(format!(
                "Failed to parse credentials file '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}
