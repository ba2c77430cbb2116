//! cellconnd - Cellular connectivity daemon
//!
//! Serves one REST API over whichever SIM management platform the configured
//! credentials point at (Jasper or Ericsson, both simulated in-process).
//!
//! Usage:
//!   cellconnd [OPTIONS] [config.toml]
//!
//! If no config file is provided, the built-in demo accounts and Jasper
//! credentials are used.

mod config;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use cellconn_api::{create_router, AppState};
use cellconn_core::{CredentialProvider, ProviderIdentity};
use cellconn_gateway::{
    ClientRegistry, ConnectivityService, FileCredentialProvider, StaticCredentialProvider,
};
use cellconn_sim::config::SimConfig;
use cellconn_sim::{EricssonClient, JasperClient, SimNetwork};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{CredentialSource, DaemonConfig};

/// Parsed command-line arguments
struct Args {
    /// Daemon config file (TOML)
    config_path: Option<String>,
    /// Overrides `[server] port`
    port: Option<u16>,
    /// Overrides the configured credentials with a credentials file
    credentials_file: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut result = Args {
        config_path: None,
        port: None,
        credentials_file: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                match args.get(i + 1).map(|p| p.parse::<u16>()) {
                    Some(Ok(port)) => result.port = Some(port),
                    Some(Err(_)) => tracing::error!("Invalid port: {}", args[i + 1]),
                    None => tracing::error!("Missing argument for --port"),
                }
                i += 2;
            }
            "--credentials" | "-c" => {
                if i + 1 < args.len() {
                    result.credentials_file = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    tracing::error!("Missing argument for --credentials");
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                // Positional argument = config file
                result.config_path = Some(arg.to_string());
                i += 1;
            }
            _ => {
                tracing::warn!("Unknown argument: {}", args[i]);
                i += 1;
            }
        }
    }

    result
}

fn print_help() {
    eprintln!(
        r#"cellconnd - Cellular connectivity daemon

Usage: cellconnd [OPTIONS] [config.toml]

Options:
  -p, --port <port>          Listen port (default 18090)
  -c, --credentials <path>   Credentials file, re-read on every request
  -h, --help                 Print this help message

Examples:
  # Demo accounts, Jasper credentials
  cellconnd

  # Run with config file
  cellconnd cellconnd.toml

  # Switch providers at runtime by editing the credentials file
  cellconnd --credentials credentials.toml
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cellconnd=info,cellconn_api=info,cellconn_gateway=debug,cellconn_sim=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting cellconnd (cellular connectivity daemon)");

    let args = parse_args();

    let mut config = match args.config_path {
        Some(ref path) => {
            tracing::info!("Loading config from: {}", path);
            DaemonConfig::load(Path::new(path))?
        }
        None => {
            tracing::info!("No config file provided, using demo accounts");
            DaemonConfig::default()
        }
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(path) = args.credentials_file {
        config.credentials = None;
        config.credentials_file = Some(path.into());
    }

    let credentials = credential_provider(config.credential_source()?);
    let registry = simulated_registry(config.simulator);
    let service = ConnectivityService::new(credentials, registry);

    match service.provider_info().await {
        Ok(info) => tracing::info!(
            provider = %info.provider,
            locale = info.capabilities.locale,
            "Active provider"
        ),
        Err(e) => tracing::warn!("Active provider not usable yet: {}", e),
    }

    let app = create_router(AppState::new(service));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.server.host))?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("cellconnd stopped");
    Ok(())
}

fn credential_provider(source: CredentialSource) -> Arc<dyn CredentialProvider> {
    match source {
        CredentialSource::Inline(credentials) => {
            tracing::info!(
                provider = %credentials.api_registration_provider,
                "Using inline credentials"
            );
            Arc::new(StaticCredentialProvider::new(credentials))
        }
        CredentialSource::File(path) => {
            tracing::info!("Using credentials file: {}", path.display());
            Arc::new(FileCredentialProvider::new(path))
        }
    }
}

/// One simulated account per vendor; clients are built per call from the
/// credentials resolved for that call
fn simulated_registry(config: SimConfig) -> ClientRegistry {
    let jasper = Arc::new(SimNetwork::new(config.jasper));
    let ericsson = Arc::new(SimNetwork::new(config.ericsson));
    tracing::info!(
        jasper_terminals = jasper.config().terminals.len(),
        ericsson_terminals = ericsson.config().terminals.len(),
        "Simulated vendor accounts ready"
    );

    let mut registry = ClientRegistry::new();
    registry.register_factory(ProviderIdentity::Jasper, JasperClient::factory(jasper));
    registry.register_factory(ProviderIdentity::Ericsson, EricssonClient::factory(ericsson));
    registry
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
