//! CellularClient trait - the capability set every vendor client implements

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};
use crate::models::{
    Iccid, LocaleInfo, ServiceRequestState, SessionInfo, SimState, SubscriptionPackage,
    SubscriptionStatus, Terminal,
};
use crate::provider::ProviderIdentity;

/// How a vendor expects the target of a SIM state change to be expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateEncoding {
    /// The uniform state name is sent as-is
    #[default]
    Name,
    /// The name must be translated into a [`SubscriptionStatus`] code
    StatusCode,
}

/// Target of a SIM state change, already in the vendor's encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSimState {
    Name(String),
    Status(SubscriptionStatus),
}

impl TargetSimState {
    /// Uniform name of the target state
    pub fn name(&self) -> &str {
        match self {
            TargetSimState::Name(name) => name,
            TargetSimState::Status(status) => status.name(),
        }
    }
}

/// Outcome reported by a vendor for a command (state change, SMS, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VendorAck {
    /// Vendor confirmed the command
    Accepted,
    /// Fire-and-forget call, vendor returned no payload
    Submitted,
    /// Vendor answered without a fault but refused the command
    Rejected { reason: String },
}

impl VendorAck {
    pub fn is_success(&self) -> bool {
        !matches!(self, VendorAck::Rejected { .. })
    }
}

/// Optional features of a vendor client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Locale get/set and service request polling
    pub locale: bool,
    /// SMS delivery completes asynchronously on the vendor side
    pub async_sms: bool,
    pub state_encoding: StateEncoding,
}

/// The core trait that all vendor clients implement.
///
/// Operations take the union of the parameters any vendor needs; a client
/// ignores what it does not use (e.g. a vendor with a global SIM state
/// catalog ignores the ICCID in [`get_available_sim_states`]).
///
/// Locale operations are optional: clients without locale support leave the
/// default implementations, which report [`ClientError::NotSupported`].
///
/// [`get_available_sim_states`]: CellularClient::get_available_sim_states
#[async_trait]
pub trait CellularClient: Send + Sync {
    // =========================================================================
    // Identity
    // =========================================================================

    /// Vendor this client talks to
    fn provider(&self) -> ProviderIdentity;

    /// Optional features of this client
    fn capabilities(&self) -> &Capabilities;

    // =========================================================================
    // Terminals
    // =========================================================================

    /// List the ICCIDs of all terminals on the account
    async fn list_terminals(&self) -> ClientResult<Vec<Iccid>>;

    /// Get details of one terminal
    async fn get_terminal(&self, iccid: &Iccid) -> ClientResult<Terminal>;

    /// Get the data sessions of one terminal
    async fn get_sessions(&self, iccid: &Iccid) -> ClientResult<Vec<SessionInfo>>;

    /// Reconnect a terminal to the network
    async fn reconnect_terminal(&self, iccid: &Iccid) -> ClientResult<VendorAck>;

    // =========================================================================
    // SIM states and packages
    // =========================================================================

    /// All SIM states the vendor knows for this terminal
    async fn get_available_sim_states(&self, iccid: &Iccid) -> ClientResult<Vec<SimState>>;

    /// States reachable from `current_state`
    async fn get_valid_target_states(
        &self,
        iccid: &Iccid,
        current_state: &str,
    ) -> ClientResult<Vec<SimState>>;

    /// Change the SIM state
    async fn update_sim_state(
        &self,
        iccid: &Iccid,
        target: &TargetSimState,
    ) -> ClientResult<VendorAck>;

    /// Packages the terminal may switch to from `current_subscription`
    async fn get_available_packages(
        &self,
        iccid: &Iccid,
        current_subscription: &str,
    ) -> ClientResult<Vec<SubscriptionPackage>>;

    /// Move the terminal to another package
    async fn update_subscription_package(
        &self,
        iccid: &Iccid,
        package: &str,
    ) -> ClientResult<VendorAck>;

    // =========================================================================
    // Messaging
    // =========================================================================

    /// Send an SMS to the terminal.
    ///
    /// Vendors address the SIM either by ICCID or by MSISDN; both are passed.
    async fn send_sms(&self, iccid: &Iccid, msisdn: &str, text: &str) -> ClientResult<VendorAck>;

    // =========================================================================
    // Account
    // =========================================================================

    /// Check that the configured credentials are accepted by the vendor
    async fn validate_credentials(&self) -> ClientResult<bool>;

    // =========================================================================
    // Locale (optional)
    // =========================================================================

    /// Get current and available locales
    async fn get_locale(&self, iccid: &Iccid) -> ClientResult<LocaleInfo> {
        let _ = iccid;
        Err(ClientError::NotSupported("get_locale".to_string()))
    }

    /// Request a locale change, returning the service request id
    async fn set_locale(&self, iccid: &Iccid, locale: &str) -> ClientResult<String> {
        let _ = (iccid, locale);
        Err(ClientError::NotSupported("set_locale".to_string()))
    }

    /// Poll a locale change request
    async fn get_locale_change_status(&self, request_id: &str) -> ClientResult<ServiceRequestState> {
        let _ = request_id;
        Err(ClientError::NotSupported(
            "get_locale_change_status".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Minimal {
        capabilities: Capabilities,
    }

    #[async_trait]
    impl CellularClient for Minimal {
        fn provider(&self) -> ProviderIdentity {
            ProviderIdentity::Jasper
        }

        fn capabilities(&self) -> &Capabilities {
            &self.capabilities
        }

        async fn list_terminals(&self) -> ClientResult<Vec<Iccid>> {
            Ok(vec![])
        }

        async fn get_terminal(&self, iccid: &Iccid) -> ClientResult<Terminal> {
            Err(ClientError::TerminalNotFound(iccid.to_string()))
        }

        async fn get_sessions(&self, _iccid: &Iccid) -> ClientResult<Vec<SessionInfo>> {
            Ok(vec![])
        }

        async fn reconnect_terminal(&self, _iccid: &Iccid) -> ClientResult<VendorAck> {
            Ok(VendorAck::Submitted)
        }

        async fn get_available_sim_states(&self, _iccid: &Iccid) -> ClientResult<Vec<SimState>> {
            Ok(vec![])
        }

        async fn get_valid_target_states(
            &self,
            _iccid: &Iccid,
            _current_state: &str,
        ) -> ClientResult<Vec<SimState>> {
            Ok(vec![])
        }

        async fn update_sim_state(
            &self,
            _iccid: &Iccid,
            _target: &TargetSimState,
        ) -> ClientResult<VendorAck> {
            Ok(VendorAck::Accepted)
        }

        async fn get_available_packages(
            &self,
            _iccid: &Iccid,
            _current_subscription: &str,
        ) -> ClientResult<Vec<SubscriptionPackage>> {
            Ok(vec![])
        }

        async fn update_subscription_package(
            &self,
            _iccid: &Iccid,
            _package: &str,
        ) -> ClientResult<VendorAck> {
            Ok(VendorAck::Accepted)
        }

        async fn send_sms(
            &self,
            _iccid: &Iccid,
            _msisdn: &str,
            _text: &str,
        ) -> ClientResult<VendorAck> {
            Ok(VendorAck::Accepted)
        }

        async fn validate_credentials(&self) -> ClientResult<bool> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn locale_defaults_report_not_supported() {
        let client = Minimal {
            capabilities: Capabilities::default(),
        };
        let iccid = Iccid::from("8912");

        assert!(matches!(
            client.get_locale(&iccid).await,
            Err(ClientError::NotSupported(op)) if op == "get_locale"
        ));
        assert!(matches!(
            client.set_locale(&iccid, "sv-SE").await,
            Err(ClientError::NotSupported(op)) if op == "set_locale"
        ));
        assert!(matches!(
            client.get_locale_change_status("req-1").await,
            Err(ClientError::NotSupported(_))
        ));
    }

    #[test]
    fn rejected_ack_is_not_success() {
        assert!(VendorAck::Accepted.is_success());
        assert!(VendorAck::Submitted.is_success());
        assert!(!VendorAck::Rejected {
            reason: "barred".into()
        }
        .is_success());
    }

    #[test]
    fn target_name_for_status_code() {
        let target = TargetSimState::Status(SubscriptionStatus::Pause);
        assert_eq!(target.name(), "Pause");
    }
}
