//! Terminal (SIM/device) models

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ICCID of a physical or virtual SIM.
///
/// Opaque to the gateway: no checksum or length validation is applied, the
/// vendor is the authority on which identifiers exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iccid(String);

impl Iccid {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iccid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iccid {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Iccid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Iccid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Terminal details as reported by the active vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terminal {
    /// SIM identifier
    pub iccid: Iccid,
    /// Phone number assigned to the SIM
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msisdn: Option<String>,
    /// Subscriber identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imsi: Option<String>,
    /// Device identity reported by the network
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imei: Option<String>,
    /// Vendor-specific SIM state name
    pub status: String,
    /// Current subscription package / rate plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_plan: Option<String>,
    /// Data usage in the current billing cycle, in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_bytes: Option<u64>,
    /// When the SIM was activated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<DateTime<Utc>>,
}

/// A data session of a terminal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// SIM the session belongs to
    pub iccid: Iccid,
    /// IP address assigned for the session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Access point name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// `None` while the session is still open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_used: Option<u64>,
}

impl SessionInfo {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iccid_serializes_as_plain_string() {
        let iccid = Iccid::from("8912345678901234567");
        let json = serde_json::to_string(&iccid).unwrap();
        assert_eq!(json, "\"8912345678901234567\"");
        let back: Iccid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, iccid);
    }

    #[test]
    fn terminal_skips_missing_fields() {
        let terminal = Terminal {
            iccid: "8912".into(),
            msisdn: None,
            imsi: None,
            imei: None,
            status: "Active".to_string(),
            rate_plan: None,
            usage_bytes: None,
            activated_at: None,
        };
        let json = serde_json::to_value(&terminal).unwrap();
        assert_eq!(json, serde_json::json!({ "iccid": "8912", "status": "Active" }));
    }
}
