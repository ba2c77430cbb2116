//! Dispatcher - routes uniform operations to the active vendor client
//!
//! Every operation re-resolves the credentials, so switching the configured
//! provider takes effect on the next call. Nothing is cached between calls.

use std::sync::Arc;

use cellconn_core::{
    Capabilities, CellularClient, ClientError, CredentialProvider, Iccid, LocaleInfo,
    ProviderIdentity, ServiceRequestState, SessionInfo, SimState, StateEncoding,
    SubscriptionPackage, SubscriptionStatus, TargetSimState, Terminal, VendorAck,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{GatewayError, GatewayResult};
use crate::registry::ClientRegistry;

/// Active provider and what it supports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub provider: ProviderIdentity,
    pub capabilities: Capabilities,
}

/// Client selected for one call
struct Route {
    provider: ProviderIdentity,
    client: Arc<dyn CellularClient>,
}

impl Route {
    /// Normalize a vendor error for `operation`
    fn fault(&self, operation: &'static str) -> impl FnOnce(ClientError) -> GatewayError {
        let provider = self.provider;
        move |err| match err {
            ClientError::NotSupported(_) => GatewayError::UnsupportedOperation {
                operation,
                provider,
            },
            source => GatewayError::Vendor { provider, source },
        }
    }

    /// Fail fast when the client does not advertise locale support
    fn require_locale(&self, operation: &'static str) -> GatewayResult<()> {
        if self.client.capabilities().locale {
            Ok(())
        } else {
            Err(GatewayError::UnsupportedOperation {
                operation,
                provider: self.provider,
            })
        }
    }

    fn acknowledge(&self, operation: &'static str, iccid: &Iccid, ack: VendorAck) -> bool {
        match ack {
            VendorAck::Accepted | VendorAck::Submitted => true,
            VendorAck::Rejected { reason } => {
                warn!(
                    provider = %self.provider,
                    operation,
                    iccid = %iccid,
                    %reason,
                    "Vendor rejected command"
                );
                false
            }
        }
    }
}

/// Resolves the active provider per call and adapts each uniform operation
/// to the selected vendor client.
pub struct Dispatcher {
    credentials: Arc<dyn CredentialProvider>,
    registry: ClientRegistry,
}

impl Dispatcher {
    pub fn new(credentials: Arc<dyn CredentialProvider>, registry: ClientRegistry) -> Self {
        Self {
            credentials,
            registry,
        }
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    /// Resolve credentials, provider identity and client for one operation.
    ///
    /// Runs before any vendor call.
    async fn route(&self, operation: &'static str, iccid: Option<&Iccid>) -> GatewayResult<Route> {
        let credentials = self
            .credentials
            .provide()
            .await
            .map_err(|e| GatewayError::Configuration(e.to_string()))?;

        let provider = credentials.provider().map_err(|_| {
            GatewayError::Configuration(format!(
                "Could not find a service for '{}' provider",
                credentials.api_registration_provider
            ))
        })?;

        let client = self
            .registry
            .client_for(provider, &credentials)
            .ok_or_else(|| {
                GatewayError::Configuration(format!("no client for provider '{}'", provider))
            })?
            .map_err(|e| {
                GatewayError::Configuration(format!(
                    "failed to create client for provider '{}': {}",
                    provider, e
                ))
            })?;

        debug!(
            %provider,
            operation,
            iccid = iccid.map(Iccid::as_str),
            "Dispatching"
        );
        Ok(Route { provider, client })
    }

    /// Active provider and its capabilities
    pub async fn provider_info(&self) -> GatewayResult<ProviderInfo> {
        let route = self.route("provider_info", None).await?;
        Ok(ProviderInfo {
            provider: route.provider,
            capabilities: route.client.capabilities().clone(),
        })
    }

    // =========================================================================
    // Terminals
    // =========================================================================

    pub async fn list_terminals(&self) -> GatewayResult<Vec<Iccid>> {
        const OP: &str = "list_terminals";
        let route = self.route(OP, None).await?;
        route.client.list_terminals().await.map_err(route.fault(OP))
    }

    pub async fn get_terminal(&self, iccid: &Iccid) -> GatewayResult<Terminal> {
        const OP: &str = "get_terminal";
        let route = self.route(OP, Some(iccid)).await?;
        route.client.get_terminal(iccid).await.map_err(route.fault(OP))
    }

    pub async fn get_sessions(&self, iccid: &Iccid) -> GatewayResult<Vec<SessionInfo>> {
        const OP: &str = "get_sessions";
        let route = self.route(OP, Some(iccid)).await?;
        route.client.get_sessions(iccid).await.map_err(route.fault(OP))
    }

    /// Fire-and-forget vendors report [`VendorAck::Submitted`], which counts
    /// as success.
    pub async fn reconnect_terminal(&self, iccid: &Iccid) -> GatewayResult<bool> {
        const OP: &str = "reconnect_terminal";
        let route = self.route(OP, Some(iccid)).await?;
        let ack = route
            .client
            .reconnect_terminal(iccid)
            .await
            .map_err(route.fault(OP))?;
        Ok(route.acknowledge(OP, iccid, ack))
    }

    // =========================================================================
    // SIM states and packages
    // =========================================================================

    /// Vendors with a global state catalog ignore `iccid`.
    pub async fn get_available_sim_states(&self, iccid: &Iccid) -> GatewayResult<Vec<SimState>> {
        const OP: &str = "get_available_sim_states";
        let route = self.route(OP, Some(iccid)).await?;
        route
            .client
            .get_available_sim_states(iccid)
            .await
            .map_err(route.fault(OP))
    }

    pub async fn get_valid_target_states(
        &self,
        iccid: &Iccid,
        current_state: &str,
    ) -> GatewayResult<Vec<SimState>> {
        const OP: &str = "get_valid_target_states";
        let route = self.route(OP, Some(iccid)).await?;
        route
            .client
            .get_valid_target_states(iccid, current_state)
            .await
            .map_err(route.fault(OP))
    }

    /// Status-code vendors get `target_state` translated into a
    /// [`SubscriptionStatus`] first; an unknown name is a validation error and
    /// no vendor call is made.
    pub async fn update_sim_state(&self, iccid: &Iccid, target_state: &str) -> GatewayResult<bool> {
        const OP: &str = "update_sim_state";
        let route = self.route(OP, Some(iccid)).await?;

        let target = match route.client.capabilities().state_encoding {
            StateEncoding::Name => TargetSimState::Name(target_state.to_string()),
            StateEncoding::StatusCode => {
                let status = target_state.parse::<SubscriptionStatus>().map_err(|e| {
                    GatewayError::Validation(format!(
                        "cannot map state '{}' for provider '{}': {}",
                        target_state, route.provider, e
                    ))
                })?;
                TargetSimState::Status(status)
            }
        };

        let ack = route
            .client
            .update_sim_state(iccid, &target)
            .await
            .map_err(route.fault(OP))?;
        Ok(route.acknowledge(OP, iccid, ack))
    }

    pub async fn get_available_packages(
        &self,
        iccid: &Iccid,
        current_subscription: &str,
    ) -> GatewayResult<Vec<SubscriptionPackage>> {
        const OP: &str = "get_available_packages";
        let route = self.route(OP, Some(iccid)).await?;
        route
            .client
            .get_available_packages(iccid, current_subscription)
            .await
            .map_err(route.fault(OP))
    }

    pub async fn update_subscription_package(
        &self,
        iccid: &Iccid,
        package: &str,
    ) -> GatewayResult<bool> {
        const OP: &str = "update_subscription_package";
        let route = self.route(OP, Some(iccid)).await?;
        let ack = route
            .client
            .update_subscription_package(iccid, package)
            .await
            .map_err(route.fault(OP))?;
        Ok(route.acknowledge(OP, iccid, ack))
    }

    // =========================================================================
    // Messaging
    // =========================================================================

    /// Completes only once the vendor has answered, including vendors that
    /// deliver asynchronously.
    pub async fn send_sms(&self, iccid: &Iccid, msisdn: &str, text: &str) -> GatewayResult<bool> {
        const OP: &str = "send_sms";
        let route = self.route(OP, Some(iccid)).await?;
        let ack = route
            .client
            .send_sms(iccid, msisdn, text)
            .await
            .map_err(route.fault(OP))?;
        Ok(route.acknowledge(OP, iccid, ack))
    }

    // =========================================================================
    // Account
    // =========================================================================

    /// Any vendor fault means "invalid". Configuration errors still propagate.
    pub async fn validate_credentials(&self) -> GatewayResult<bool> {
        let route = self.route("validate_credentials", None).await?;
        match route.client.validate_credentials().await {
            Ok(valid) => Ok(valid),
            Err(e) => {
                warn!(provider = %route.provider, error = %e, "Credential validation failed");
                Ok(false)
            }
        }
    }

    // =========================================================================
    // Locale
    // =========================================================================

    pub async fn get_locale(&self, iccid: &Iccid) -> GatewayResult<LocaleInfo> {
        const OP: &str = "get_locale";
        let route = self.route(OP, Some(iccid)).await?;
        route.require_locale(OP)?;
        route.client.get_locale(iccid).await.map_err(route.fault(OP))
    }

    /// Returns the vendor's service request id for polling
    pub async fn set_locale(&self, iccid: &Iccid, locale: &str) -> GatewayResult<String> {
        const OP: &str = "set_locale";
        let route = self.route(OP, Some(iccid)).await?;
        route.require_locale(OP)?;
        route
            .client
            .set_locale(iccid, locale)
            .await
            .map_err(route.fault(OP))
    }

    pub async fn get_locale_change_status(
        &self,
        request_id: &str,
    ) -> GatewayResult<ServiceRequestState> {
        const OP: &str = "get_locale_change_status";
        let route = self.route(OP, None).await?;
        route.require_locale(OP)?;
        route
            .client
            .get_locale_change_status(request_id)
            .await
            .map_err(route.fault(OP))
    }
}
