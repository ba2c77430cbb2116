//! Provider identity and credential resolution

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Vendor backend governing the active credential set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderIdentity {
    Jasper,
    Ericsson,
}

impl ProviderIdentity {
    pub const ALL: [ProviderIdentity; 2] = [ProviderIdentity::Jasper, ProviderIdentity::Ericsson];
}

impl fmt::Display for ProviderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProviderIdentity::Jasper => "jasper",
            ProviderIdentity::Ericsson => "ericsson",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ProviderIdentity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jasper" => Ok(ProviderIdentity::Jasper),
            "ericsson" => Ok(ProviderIdentity::Ericsson),
            _ => Err(format!("Unknown provider: '{}'", s)),
        }
    }
}

/// Credentials of the currently configured vendor account.
///
/// `api_registration_provider` is kept as the raw configured tag so that an
/// unrecognized provider surfaces at dispatch time instead of at load time.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSet {
    pub api_registration_provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl CredentialSet {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            api_registration_provider: provider.into(),
            ..Default::default()
        }
    }

    pub fn with_account(mut self, username: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Parse the configured provider tag
    pub fn provider(&self) -> Result<ProviderIdentity, String> {
        self.api_registration_provider.parse()
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("api_registration_provider", &self.api_registration_provider)
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Failure to resolve the active credential set
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    #[error("Credentials unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid credential configuration: {0}")]
    Invalid(String),
}

/// Resolves the currently configured vendor account.
///
/// Called once per uniform operation; implementations must not assume the
/// result is cached by the caller.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn provide(&self) -> Result<CredentialSet, CredentialError>;
}
