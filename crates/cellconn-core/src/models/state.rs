//! SIM lifecycle state models

use serde::{Deserialize, Serialize};

/// A named state in a vendor-specific SIM lifecycle.
///
/// State vocabularies differ between vendors; the name is carried as-is and
/// only the vendor decides which transitions are legal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimState {
    pub name: String,
}

impl SimState {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Subscription status codes accepted by status-code based vendors
/// (Ericsson) when changing SIM state.
///
/// # Transitions
///
/// ```text
/// Test ──► Active ◄──► Pause
///            │           │
///            ▼           ▼
///       Deactivated ──► Terminated
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionStatus {
    Active,
    Deactivated,
    Pause,
    Terminated,
    Test,
}

impl SubscriptionStatus {
    pub const ALL: [SubscriptionStatus; 5] = [
        SubscriptionStatus::Active,
        SubscriptionStatus::Deactivated,
        SubscriptionStatus::Pause,
        SubscriptionStatus::Terminated,
        SubscriptionStatus::Test,
    ];

    /// Wire code sent to the vendor
    pub fn code(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "ACTIVE",
            SubscriptionStatus::Deactivated => "DEACTIVATED",
            SubscriptionStatus::Pause => "PAUSE",
            SubscriptionStatus::Terminated => "TERMINATED",
            SubscriptionStatus::Test => "TEST",
        }
    }

    /// Display name used as the uniform state identifier
    pub fn name(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "Active",
            SubscriptionStatus::Deactivated => "Deactivated",
            SubscriptionStatus::Pause => "Pause",
            SubscriptionStatus::Terminated => "Terminated",
            SubscriptionStatus::Test => "Test",
        }
    }

    /// Statuses reachable from this one
    pub fn targets(&self) -> &'static [SubscriptionStatus] {
        use SubscriptionStatus::*;
        match self {
            Test => &[Active],
            Active => &[Pause, Deactivated],
            Pause => &[Active, Terminated],
            Deactivated => &[Terminated],
            Terminated => &[],
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = String;

    /// Accepts either the display name or the wire code, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        SubscriptionStatus::ALL
            .into_iter()
            .find(|status| {
                status.name().eq_ignore_ascii_case(trimmed)
                    || status.code().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| format!("Unknown subscription status: '{}'", s))
    }
}

impl From<SubscriptionStatus> for SimState {
    fn from(status: SubscriptionStatus) -> Self {
        SimState::named(status.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_by_name_and_code() {
        assert_eq!("Active".parse::<SubscriptionStatus>(), Ok(SubscriptionStatus::Active));
        assert_eq!("PAUSE".parse::<SubscriptionStatus>(), Ok(SubscriptionStatus::Pause));
        assert_eq!(" terminated ".parse::<SubscriptionStatus>(), Ok(SubscriptionStatus::Terminated));
    }

    #[test]
    fn parse_unknown_fails() {
        let err = "Disconnected".parse::<SubscriptionStatus>().unwrap_err();
        assert!(err.contains("Disconnected"));
    }

    #[test]
    fn terminated_is_final() {
        assert!(SubscriptionStatus::Terminated.targets().is_empty());
    }

    #[test]
    fn serde_uses_wire_code() {
        let json = serde_json::to_string(&SubscriptionStatus::Deactivated).unwrap();
        assert_eq!(json, "\"DEACTIVATED\"");
    }
}
