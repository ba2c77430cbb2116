//! Simulator configuration
//!
//! One [`VendorSimConfig`] describes a simulated vendor account: the
//! credentials it accepts, artificial latency and the terminals on it.

use serde::{Deserialize, Serialize};

/// Configuration for both simulated vendors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default = "VendorSimConfig::jasper_demo")]
    pub jasper: VendorSimConfig,
    #[serde(default = "VendorSimConfig::ericsson_demo")]
    pub ericsson: VendorSimConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            jasper: VendorSimConfig::jasper_demo(),
            ericsson: VendorSimConfig::ericsson_demo(),
        }
    }
}

/// A simulated vendor account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorSimConfig {
    /// Accepted username (any when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Accepted API key (any when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Simulated latency of every call in milliseconds
    #[serde(default)]
    pub latency_ms: u64,
    /// Extra delay before an asynchronous SMS delivery is confirmed
    #[serde(default = "default_sms_delay")]
    pub sms_delay_ms: u64,
    /// Terminals on the account
    #[serde(default)]
    pub terminals: Vec<TerminalConfig>,
}

fn default_sms_delay() -> u64 {
    50
}

/// A terminal on a simulated account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalConfig {
    pub iccid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msisdn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imsi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imei: Option<String>,
    /// Initial SIM state in the vendor's vocabulary
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Restricts the states offered for this terminal (vendor catalog when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_states: Option<Vec<String>>,
    /// Whether the terminal starts with an open data session
    #[serde(default)]
    pub online: bool,
}

impl TerminalConfig {
    pub fn new(iccid: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            iccid: iccid.into(),
            msisdn: None,
            imsi: None,
            imei: None,
            status: status.into(),
            rate_plan: None,
            locale: None,
            allowed_states: None,
            online: false,
        }
    }
}

impl VendorSimConfig {
    /// Demo Jasper account with a handful of terminals
    pub fn jasper_demo() -> Self {
        Self {
            sms_delay_ms: default_sms_delay(),
            terminals: vec![
                TerminalConfig {
                    msisdn: Some("46700100001".to_string()),
                    imsi: Some("240011000000001".to_string()),
                    rate_plan: Some("Basic".to_string()),
                    online: true,
                    ..TerminalConfig::new("89460100000000000001", "Activated")
                },
                TerminalConfig {
                    msisdn: Some("46700100002".to_string()),
                    rate_plan: Some("Standard".to_string()),
                    ..TerminalConfig::new("89460100000000000002", "Deactivated")
                },
                TerminalConfig {
                    allowed_states: Some(vec![
                        "Inventory".to_string(),
                        "TestReady".to_string(),
                        "Activated".to_string(),
                    ]),
                    ..TerminalConfig::new("89460100000000000003", "Inventory")
                },
            ],
            ..Default::default()
        }
    }

    /// Demo Ericsson account with a handful of terminals
    pub fn ericsson_demo() -> Self {
        Self {
            sms_delay_ms: default_sms_delay(),
            terminals: vec![
                TerminalConfig {
                    msisdn: Some("46700200001".to_string()),
                    imsi: Some("240021000000001".to_string()),
                    rate_plan: Some("IoT-S".to_string()),
                    locale: Some("en-GB".to_string()),
                    online: true,
                    ..TerminalConfig::new("89460200000000000001", "Active")
                },
                TerminalConfig {
                    msisdn: Some("46700200002".to_string()),
                    rate_plan: Some("IoT-M".to_string()),
                    locale: Some("sv-SE".to_string()),
                    ..TerminalConfig::new("89460200000000000002", "Pause")
                },
            ],
            ..Default::default()
        }
    }
}
