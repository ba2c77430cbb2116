//! Simulated Ericsson client
//!
//! Ericsson has one global SIM state catalog, expects status codes when a
//! state changes, delivers SMS by MSISDN asynchronously and supports locale
//! changes through polled service requests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cellconn_core::{
    Capabilities, CellularClient, ClientError, ClientResult, CredentialSet, Iccid, LocaleInfo,
    ProviderIdentity, ServiceRequestState, SessionInfo, SimState, StateEncoding,
    SubscriptionPackage, SubscriptionStatus, TargetSimState, Terminal, VendorAck,
};
use tracing::debug;

use crate::network::SimNetwork;

const PACKAGES: [(&str, &str); 4] = [
    ("Default", "Pay as you go"),
    ("IoT-S", "10 MB per month"),
    ("IoT-M", "100 MB per month"),
    ("IoT-L", "1 GB per month"),
];

const LOCALES: [&str; 4] = ["en-GB", "sv-SE", "de-DE", "es-ES"];

fn parse_status(state: &str) -> ClientResult<SubscriptionStatus> {
    state
        .parse::<SubscriptionStatus>()
        .map_err(ClientError::InvalidRequest)
}

/// Ericsson client bound to one credential set
pub struct EricssonClient {
    network: Arc<SimNetwork>,
    credentials: CredentialSet,
    capabilities: Capabilities,
}

impl EricssonClient {
    pub fn new(network: Arc<SimNetwork>, credentials: CredentialSet) -> Self {
        Self {
            network,
            credentials,
            capabilities: Capabilities {
                locale: true,
                async_sms: true,
                state_encoding: StateEncoding::StatusCode,
            },
        }
    }

    /// Factory for a client registry, see [`crate::JasperClient::factory`]
    pub fn factory(
        network: Arc<SimNetwork>,
    ) -> impl Fn(&CredentialSet) -> ClientResult<Arc<dyn CellularClient>> + Send + Sync + 'static
    {
        move |credentials: &CredentialSet| {
            Ok(Arc::new(EricssonClient::new(network.clone(), credentials.clone()))
                as Arc<dyn CellularClient>)
        }
    }
}

#[async_trait]
impl CellularClient for EricssonClient {
    fn provider(&self) -> ProviderIdentity {
        ProviderIdentity::Ericsson
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn list_terminals(&self) -> ClientResult<Vec<Iccid>> {
        self.network.enter(&self.credentials).await?;
        Ok(self.network.iccids())
    }

    async fn get_terminal(&self, iccid: &Iccid) -> ClientResult<Terminal> {
        self.network.enter(&self.credentials).await?;
        self.network.read(iccid, |r| r.terminal.clone())
    }

    async fn get_sessions(&self, iccid: &Iccid) -> ClientResult<Vec<SessionInfo>> {
        self.network.enter(&self.credentials).await?;
        self.network.read(iccid, |r| r.sessions.clone())
    }

    /// Fire-and-forget: the vendor answers with an empty body
    async fn reconnect_terminal(&self, iccid: &Iccid) -> ClientResult<VendorAck> {
        self.network.enter(&self.credentials).await?;
        self.network.reattach(iccid)?;
        Ok(VendorAck::Submitted)
    }

    /// Global catalog; the ICCID is not consulted
    async fn get_available_sim_states(&self, _iccid: &Iccid) -> ClientResult<Vec<SimState>> {
        self.network.enter(&self.credentials).await?;
        Ok(SubscriptionStatus::ALL
            .into_iter()
            .map(SimState::from)
            .collect())
    }

    async fn get_valid_target_states(
        &self,
        _iccid: &Iccid,
        current_state: &str,
    ) -> ClientResult<Vec<SimState>> {
        self.network.enter(&self.credentials).await?;
        let current = parse_status(current_state)?;
        Ok(current
            .targets()
            .iter()
            .copied()
            .map(SimState::from)
            .collect())
    }

    async fn update_sim_state(
        &self,
        iccid: &Iccid,
        target: &TargetSimState,
    ) -> ClientResult<VendorAck> {
        let TargetSimState::Status(target) = *target else {
            return Err(ClientError::InvalidRequest(
                "Ericsson expects subscription status codes".to_string(),
            ));
        };
        self.network.enter(&self.credentials).await?;

        self.network.write(iccid, |record| {
            let current = record.terminal.status.parse::<SubscriptionStatus>();
            match current {
                Ok(current) if current.targets().contains(&target) => {
                    debug!(iccid = %iccid, from = %current, to = %target, "Subscription status changed");
                    record.terminal.status = target.name().to_string();
                    VendorAck::Accepted
                }
                _ => VendorAck::Rejected {
                    reason: format!(
                        "cannot move from '{}' to {}",
                        record.terminal.status,
                        target.code()
                    ),
                },
            }
        })
    }

    async fn get_available_packages(
        &self,
        iccid: &Iccid,
        current_subscription: &str,
    ) -> ClientResult<Vec<SubscriptionPackage>> {
        self.network.enter(&self.credentials).await?;
        self.network.read(iccid, |_| ())?;
        Ok(PACKAGES
            .into_iter()
            .filter(|(name, _)| *name != current_subscription)
            .map(|(name, description)| SubscriptionPackage {
                name: name.to_string(),
                description: Some(description.to_string()),
            })
            .collect())
    }

    async fn update_subscription_package(
        &self,
        iccid: &Iccid,
        package: &str,
    ) -> ClientResult<VendorAck> {
        self.network.enter(&self.credentials).await?;
        let known = PACKAGES.iter().any(|(name, _)| *name == package);
        self.network.write(iccid, |record| {
            if known {
                record.terminal.rate_plan = Some(package.to_string());
                VendorAck::Accepted
            } else {
                VendorAck::Rejected {
                    reason: format!("unknown subscription package '{}'", package),
                }
            }
        })
    }

    /// Addressed by MSISDN; resolves once the vendor reports the delivery
    async fn send_sms(&self, _iccid: &Iccid, msisdn: &str, text: &str) -> ClientResult<VendorAck> {
        self.network.enter(&self.credentials).await?;
        if msisdn.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "msisdn is required for SMS delivery".to_string(),
            ));
        }
        if self.network.find_by_msisdn(msisdn).is_none() {
            return Err(ClientError::TerminalNotFound(msisdn.to_string()));
        }

        let delay = self.network.config().sms_delay_ms;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.network.push_sms(msisdn, text);
        debug!(msisdn = %msisdn, "SMS delivery confirmed");
        Ok(VendorAck::Accepted)
    }

    async fn validate_credentials(&self) -> ClientResult<bool> {
        match self.network.enter(&self.credentials).await {
            Ok(()) => Ok(true),
            Err(ClientError::Auth(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn get_locale(&self, iccid: &Iccid) -> ClientResult<LocaleInfo> {
        self.network.enter(&self.credentials).await?;
        self.network.read(iccid, |r| LocaleInfo {
            current: r.locale.clone(),
            available: LOCALES.iter().map(|l| l.to_string()).collect(),
        })
    }

    async fn set_locale(&self, iccid: &Iccid, locale: &str) -> ClientResult<String> {
        self.network.enter(&self.credentials).await?;
        if !LOCALES.contains(&locale) {
            return Err(ClientError::InvalidRequest(format!(
                "unsupported locale '{}'",
                locale
            )));
        }
        self.network.read(iccid, |_| ())?;
        let request_id = self.network.create_locale_request(iccid, locale);
        debug!(iccid = %iccid, locale = %locale, request_id = %request_id, "Locale change requested");
        Ok(request_id)
    }

    async fn get_locale_change_status(&self, request_id: &str) -> ClientResult<ServiceRequestState> {
        self.network.enter(&self.credentials).await?;
        self.network.poll_locale_request(request_id)
    }
}
