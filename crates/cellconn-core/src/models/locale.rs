//! Locale and service request models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current and available locales of a terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleInfo {
    pub current: String,
    pub available: Vec<String>,
}

/// Status of an asynchronous vendor job (e.g. a locale change)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceRequestStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl ServiceRequestStatus {
    /// Whether polling can stop
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ServiceRequestStatus::Completed | ServiceRequestStatus::Failed
        )
    }
}

impl std::fmt::Display for ServiceRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ServiceRequestStatus::Pending => "pending",
            ServiceRequestStatus::InProgress => "in_progress",
            ServiceRequestStatus::Completed => "completed",
            ServiceRequestStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Polled state of a service request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequestState {
    pub request_id: String,
    pub status: ServiceRequestStatus,
    /// Vendor-provided detail (failure reason, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
