//! Simulated Jasper client
//!
//! Jasper addresses SIMs by ICCID everywhere, offers a per-terminal state
//! list, takes state names verbatim and has no locale support.

use std::sync::Arc;

use async_trait::async_trait;
use cellconn_core::{
    Capabilities, CellularClient, ClientError, ClientResult, CredentialSet, Iccid,
    ProviderIdentity, SessionInfo, SimState, StateEncoding, SubscriptionPackage, TargetSimState,
    Terminal, VendorAck,
};
use tracing::debug;

use crate::network::SimNetwork;

const STATES: [&str; 6] = [
    "Inventory",
    "TestReady",
    "ActivationReady",
    "Activated",
    "Deactivated",
    "Retired",
];

const RATE_PLANS: [&str; 3] = ["Basic", "Standard", "Expensive"];

const MAX_SMS_LEN: usize = 160;

fn transitions(state: &str) -> Option<&'static [&'static str]> {
    let targets: &'static [&'static str] = match state {
        "Inventory" => &["TestReady", "ActivationReady", "Activated"],
        "TestReady" => &["ActivationReady", "Activated", "Inventory"],
        "ActivationReady" => &["Activated", "Deactivated"],
        "Activated" => &["Deactivated"],
        "Deactivated" => &["Activated", "Retired"],
        "Retired" => &[],
        _ => return None,
    };
    Some(targets)
}

/// Jasper client bound to one credential set
pub struct JasperClient {
    network: Arc<SimNetwork>,
    credentials: CredentialSet,
    capabilities: Capabilities,
}

impl JasperClient {
    pub fn new(network: Arc<SimNetwork>, credentials: CredentialSet) -> Self {
        Self {
            network,
            credentials,
            capabilities: Capabilities {
                locale: false,
                async_sms: false,
                state_encoding: StateEncoding::Name,
            },
        }
    }

    /// Factory for a client registry: one client per call, bound to the
    /// credentials resolved for that call
    pub fn factory(
        network: Arc<SimNetwork>,
    ) -> impl Fn(&CredentialSet) -> ClientResult<Arc<dyn CellularClient>> + Send + Sync + 'static
    {
        move |credentials: &CredentialSet| {
            Ok(Arc::new(JasperClient::new(network.clone(), credentials.clone()))
                as Arc<dyn CellularClient>)
        }
    }

    /// States offered for a terminal, in catalog order
    fn states_for(&self, iccid: &Iccid) -> ClientResult<Vec<&'static str>> {
        let allowed = self.network.read(iccid, |r| r.allowed_states.clone())?;
        Ok(STATES
            .into_iter()
            .filter(|s| allowed.as_ref().map_or(true, |a| a.iter().any(|x| x == s)))
            .collect())
    }
}

#[async_trait]
impl CellularClient for JasperClient {
    fn provider(&self) -> ProviderIdentity {
        ProviderIdentity::Jasper
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

    async fn reconnect_terminal(&self, iccid: &Iccid) -> ClientResult<VendorAck> {
        self.network.enter(&self.credentials).await?;
        self.network.reattach(iccid)?;
        Ok(VendorAck::Accepted)
    }

    async fn get_available_sim_states(&self, iccid: &Iccid) -> ClientResult<Vec<SimState>> {
        self.network.enter(&self.credentials).await?;
        Ok(self
            .states_for(iccid)?
            .into_iter()
            .map(SimState::named)
            .collect())
    }

    async fn get_valid_target_states(
        &self,
        iccid: &Iccid,
        current_state: &str,
    ) -> ClientResult<Vec<SimState>> {
        self.network.enter(&self.credentials).await?;
        let offered = self.states_for(iccid)?;
        let targets = transitions(current_state).ok_or_else(|| {
            ClientError::InvalidRequest(format!("unknown SIM state '{}'", current_state))
        })?;
        Ok(targets
            .iter()
            .filter(|t| offered.contains(*t))
            .map(|t| SimState::named(*t))
            .collect())
    }

    async fn update_sim_state(
        &self,
        iccid: &Iccid,
        target: &TargetSimState,
    ) -> ClientResult<VendorAck> {
        let TargetSimState::Name(target) = target else {
            return Err(ClientError::InvalidRequest(
                "Jasper expects SIM state names".to_string(),
            ));
        };
        self.network.enter(&self.credentials).await?;

        let offered = self.states_for(iccid)?;
        if !offered.contains(&target.as_str()) {
            return Ok(VendorAck::Rejected {
                reason: format!("state '{}' is not available for this SIM", target),
            });
        }

        self.network.write(iccid, |record| {
            let current = record.terminal.status.clone();
            let legal = transitions(&current).is_some_and(|t| t.contains(&target.as_str()));
            if legal {
                debug!(iccid = %iccid, from = %current, to = %target, "SIM state changed");
                record.terminal.status = target.clone();
                VendorAck::Accepted
            } else {
                VendorAck::Rejected {
                    reason: format!("cannot move from '{}' to '{}'", current, target),
                }
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
        Ok(RATE_PLANS
            .into_iter()
            .filter(|p| *p != current_subscription)
            .map(SubscriptionPackage::named)
            .collect())
    }

    async fn update_subscription_package(
        &self,
        iccid: &Iccid,
        package: &str,
    ) -> ClientResult<VendorAck> {
        self.network.enter(&self.credentials).await?;
        if !RATE_PLANS.contains(&package) {
            self.network.read(iccid, |_| ())?;
            return Ok(VendorAck::Rejected {
                reason: format!("unknown rate plan '{}'", package),
            });
        }
        self.network.write(iccid, |record| {
            record.terminal.rate_plan = Some(package.to_string());
        })?;
        Ok(VendorAck::Accepted)
    }

    /// Synchronous, addressed by ICCID; the MSISDN is not used
    async fn send_sms(&self, iccid: &Iccid, _msisdn: &str, text: &str) -> ClientResult<VendorAck> {
        self.network.enter(&self.credentials).await?;
        self.network.read(iccid, |_| ())?;
        if text.chars().count() > MAX_SMS_LEN {
            return Ok(VendorAck::Rejected {
                reason: format!("message longer than {} characters", MAX_SMS_LEN),
            });
        }
        self.network.push_sms(iccid.as_str(), text);
        Ok(VendorAck::Accepted)
    }

    /// Jasper has no validation endpoint: list terminals and treat an auth
    /// failure as invalid credentials
    async fn validate_credentials(&self) -> ClientResult<bool> {
        match self.list_terminals().await {
            Ok(_) => Ok(true),
            Err(ClientError::Auth(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
