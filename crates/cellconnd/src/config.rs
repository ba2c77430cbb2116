//! Daemon configuration (TOML)
//!
//! ```toml
//! # Credentials file, re-read on every call (switch providers live)...
//! credentials_file = "credentials.toml"
//!
//! [server]
//! port = 18090
//!
//! # ...or inline credentials instead
//! # [credentials]
//! # api_registration_provider = "ericsson"
//! # username = "ops"
//! # api_key = "secret"
//!
//! [simulator.jasper]
//! latency_ms = 20
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use cellconn_core::CredentialSet;
use cellconn_sim::config::SimConfig;
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 18090;

#[derive(Debug, Default, Deserialize)]
pub struct DaemonConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub credentials: Option<CredentialSet>,
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,
    #[serde(default)]
    pub simulator: SimConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Where the credentials come from
#[derive(Debug, PartialEq)]
pub enum CredentialSource {
    Inline(CredentialSet),
    File(PathBuf),
}

impl DaemonConfig {
    /// Load from a file; a relative `credentials_file` is resolved against
    /// the config file's directory
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;

        if let (Some(file), Some(dir)) = (config.credentials_file.as_mut(), path.parent()) {
            if file.is_relative() {
                *file = dir.join(&*file);
            }
        }
        Ok(config)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Inline credentials and a credentials file are mutually exclusive.
    /// With neither, the simulated Jasper account is used.
    pub fn credential_source(&self) -> anyhow::Result<CredentialSource> {
        match (&self.credentials, &self.credentials_file) {
            (Some(_), Some(_)) => anyhow::bail!(
                "Both [credentials] and credentials_file are set; configure only one"
            ),
            (Some(credentials), None) => Ok(CredentialSource::Inline(credentials.clone())),
            (None, Some(path)) => Ok(CredentialSource::File(path.clone())),
            (None, None) => Ok(CredentialSource::Inline(CredentialSet::new("jasper"))),
        }
    }
}
