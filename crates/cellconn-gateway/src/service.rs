//! Uniform connectivity service - the facade callers depend on

use std::sync::Arc;

use cellconn_core::{
    CredentialProvider, Iccid, LocaleInfo, ServiceRequestState, SessionInfo, SimState,
    SubscriptionPackage, Terminal,
};

use crate::dispatcher::{Dispatcher, ProviderInfo};
use crate::error::GatewayResult;
use crate::registry::ClientRegistry;

/// One stable API over whichever vendor client is active.
///
/// Cheap to clone; clones share the same dispatcher.
#[derive(Clone)]
pub struct ConnectivityService {
    dispatcher: Arc<Dispatcher>,
}

impl ConnectivityService {
    pub fn new(credentials: Arc<dyn CredentialProvider>, registry: ClientRegistry) -> Self {
        Self::from_dispatcher(Arc::new(Dispatcher::new(credentials, registry)))
    }

    pub fn from_dispatcher(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub async fn provider_info(&self) -> GatewayResult<ProviderInfo> {
        self.dispatcher.provider_info().await
    }

    pub async fn list_terminals(&self) -> GatewayResult<Vec<Iccid>> {
        self.dispatcher.list_terminals().await
    }

    pub async fn get_terminal(&self, iccid: &Iccid) -> GatewayResult<Terminal> {
        self.dispatcher.get_terminal(iccid).await
    }

    pub async fn get_sessions(&self, iccid: &Iccid) -> GatewayResult<Vec<SessionInfo>> {
        self.dispatcher.get_sessions(iccid).await
    }

    pub async fn get_available_sim_states(&self, iccid: &Iccid) -> GatewayResult<Vec<SimState>> {
        self.dispatcher.get_available_sim_states(iccid).await
    }

    pub async fn get_valid_target_states(
        &self,
        iccid: &Iccid,
        current_state: &str,
    ) -> GatewayResult<Vec<SimState>> {
        self.dispatcher
            .get_valid_target_states(iccid, current_state)
            .await
    }

    pub async fn get_available_packages(
        &self,
        iccid: &Iccid,
        current_subscription: &str,
    ) -> GatewayResult<Vec<SubscriptionPackage>> {
        self.dispatcher
            .get_available_packages(iccid, current_subscription)
            .await
    }

    pub async fn update_sim_state(&self, iccid: &Iccid, target_state: &str) -> GatewayResult<bool> {
        self.dispatcher.update_sim_state(iccid, target_state).await
    }

    pub async fn update_subscription_package(
        &self,
        iccid: &Iccid,
        package: &str,
    ) -> GatewayResult<bool> {
        self.dispatcher
            .update_subscription_package(iccid, package)
            .await
    }

    pub async fn reconnect_terminal(&self, iccid: &Iccid) -> GatewayResult<bool> {
        self.dispatcher.reconnect_terminal(iccid).await
    }

    pub async fn send_sms(&self, iccid: &Iccid, msisdn: &str, text: &str) -> GatewayResult<bool> {
        self.dispatcher.send_sms(iccid, msisdn, text).await
    }

    pub async fn validate_credentials(&self) -> GatewayResult<bool> {
        self.dispatcher.validate_credentials().await
    }

    pub async fn get_locale(&self, iccid: &Iccid) -> GatewayResult<LocaleInfo> {
        self.dispatcher.get_locale(iccid).await
    }

    pub async fn set_locale(&self, iccid: &Iccid, locale: &str) -> GatewayResult<String> {
        self.dispatcher.set_locale(iccid, locale).await
    }

    pub async fn get_locale_change_status(
        &self,
        request_id: &str,
    ) -> GatewayResult<ServiceRequestState> {
        self.dispatcher.get_locale_change_status(request_id).await
    }
}
