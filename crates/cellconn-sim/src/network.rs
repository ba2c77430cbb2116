//! In-memory state of a simulated vendor account

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use cellconn_core::{
    ClientError, ClientResult, CredentialSet, Iccid, ServiceRequestState, ServiceRequestStatus,
    SessionInfo, Terminal,
};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::config::{TerminalConfig, VendorSimConfig};

/// Session history kept per terminal
pub const MAX_SESSIONS: usize = 32;
/// Accepted messages kept in the outbox
pub const MAX_OUTBOX: usize = 1024;
/// Locale requests kept before finished ones are pruned
pub const MAX_LOCALE_REQUESTS: usize = 256;

/// An SMS accepted by the simulated vendor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsRecord {
    /// ICCID or MSISDN, depending on how the vendor addresses SIMs
    pub to: String,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

pub(crate) struct TerminalRecord {
    pub terminal: Terminal,
    pub sessions: Vec<SessionInfo>,
    pub locale: String,
    pub allowed_states: Option<Vec<String>>,
}

struct LocaleRequest {
    iccid: Iccid,
    locale: String,
    status: ServiceRequestStatus,
    updated_at: DateTime<Utc>,
}

/// A simulated vendor account.
///
/// Holds what the real vendor would hold server-side. Clients built on top of
/// it keep no state of their own.
pub struct SimNetwork {
    config: VendorSimConfig,
    terminals: RwLock<BTreeMap<Iccid, TerminalRecord>>,
    outbox: RwLock<Vec<SmsRecord>>,
    locale_requests: RwLock<HashMap<String, LocaleRequest>>,
}

impl SimNetwork {
    pub fn new(config: VendorSimConfig) -> Self {
        let terminals = config
            .terminals
            .iter()
            .map(|t| (Iccid::new(&t.iccid), Self::record_from_config(t)))
            .collect();

        Self {
            config,
            terminals: RwLock::new(terminals),
            outbox: RwLock::new(Vec::new()),
            locale_requests: RwLock::new(HashMap::new()),
        }
    }

    fn record_from_config(config: &TerminalConfig) -> TerminalRecord {
        let iccid = Iccid::new(&config.iccid);
        let now = Utc::now();
        let sessions = if config.online {
            vec![Self::open_session(&iccid, 1, now)]
        } else {
            Vec::new()
        };

        TerminalRecord {
            terminal: Terminal {
                iccid,
                msisdn: config.msisdn.clone(),
                imsi: config.imsi.clone(),
                imei: config.imei.clone(),
                status: config.status.clone(),
                rate_plan: config.rate_plan.clone(),
                usage_bytes: Some(0),
                activated_at: Some(now),
            },
            sessions,
            locale: config.locale.clone().unwrap_or_else(|| "en-GB".to_string()),
            allowed_states: config.allowed_states.clone(),
        }
    }

    fn open_session(iccid: &Iccid, n: usize, started_at: DateTime<Utc>) -> SessionInfo {
        SessionInfo {
            iccid: iccid.clone(),
            ip_address: Some(format!("10.64.{}.{}", n / 250, n % 250 + 1)),
            apn: Some("iot.demo".to_string()),
            started_at: Some(started_at),
            ended_at: None,
            bytes_used: Some(0),
        }
    }

    pub fn config(&self) -> &VendorSimConfig {
        &self.config
    }

    /// Check the account credentials, then apply the configured latency
    pub(crate) async fn enter(&self, credentials: &CredentialSet) -> ClientResult<()> {
        if let Some(expected) = &self.config.username {
            if credentials.username.as_ref() != Some(expected) {
                return Err(ClientError::Auth("unknown user".to_string()));
            }
        }
        if let Some(expected) = &self.config.api_key {
            if credentials.api_key.as_ref() != Some(expected) {
                return Err(ClientError::Auth("invalid api key".to_string()));
            }
        }
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }
        Ok(())
    }

    pub(crate) fn iccids(&self) -> Vec<Iccid> {
        self.terminals.read().keys().cloned().collect()
    }

    /// Run `f` on the terminal record, or fail with `TerminalNotFound`
    pub(crate) fn read<T>(
        &self,
        iccid: &Iccid,
        f: impl FnOnce(&TerminalRecord) -> T,
    ) -> ClientResult<T> {
        let terminals = self.terminals.read();
        let record = terminals
            .get(iccid)
            .ok_or_else(|| ClientError::TerminalNotFound(iccid.to_string()))?;
        Ok(f(record))
    }

    pub(crate) fn write<T>(
        &self,
        iccid: &Iccid,
        f: impl FnOnce(&mut TerminalRecord) -> T,
    ) -> ClientResult<T> {
        let mut terminals = self.terminals.write();
        let record = terminals
            .get_mut(iccid)
            .ok_or_else(|| ClientError::TerminalNotFound(iccid.to_string()))?;
        Ok(f(record))
    }

    pub(crate) fn find_by_msisdn(&self, msisdn: &str) -> Option<Iccid> {
        self.terminals
            .read()
            .values()
            .find(|r| r.terminal.msisdn.as_deref() == Some(msisdn))
            .map(|r| r.terminal.iccid.clone())
    }

    /// Close open sessions and start a new one
    pub(crate) fn reattach(&self, iccid: &Iccid) -> ClientResult<()> {
        self.write(iccid, |record| {
            let now = Utc::now();
            for session in record.sessions.iter_mut().filter(|s| s.is_open()) {
                session.ended_at = Some(now);
            }
            let n = record.sessions.len() + 1;
            let session = Self::open_session(&record.terminal.iccid, n, now);
            record.sessions.push(session);
            let excess = record.sessions.len().saturating_sub(MAX_SESSIONS);
            record.sessions.drain(..excess);
        })?;
        debug!(iccid = %iccid, "Terminal reattached");
        Ok(())
    }

    pub(crate) fn push_sms(&self, to: &str, text: &str) {
        let mut outbox = self.outbox.write();
        outbox.push(SmsRecord {
            to: to.to_string(),
            text: text.to_string(),
            sent_at: Utc::now(),
        });
        let excess = outbox.len().saturating_sub(MAX_OUTBOX);
        outbox.drain(..excess);
    }

    /// Most recent accepted messages, oldest first
    pub fn sent_sms(&self) -> Vec<SmsRecord> {
        self.outbox.read().clone()
    }

    pub(crate) fn create_locale_request(&self, iccid: &Iccid, locale: &str) -> String {
        let request_id = format!("sr-{}", uuid::Uuid::new_v4());
        let mut requests = self.locale_requests.write();
        if requests.len() >= MAX_LOCALE_REQUESTS {
            requests.retain(|_, r| {
                !matches!(
                    r.status,
                    ServiceRequestStatus::Completed | ServiceRequestStatus::Failed
                )
            });
            debug!(remaining = requests.len(), "Pruned finished locale requests");
        }
        requests.insert(
            request_id.clone(),
            LocaleRequest {
                iccid: iccid.clone(),
                locale: locale.to_string(),
                status: ServiceRequestStatus::Pending,
                updated_at: Utc::now(),
            },
        );
        request_id
    }

    /// Poll a locale request. Each poll advances it one step:
    /// `Pending` → `InProgress` → `Completed`, applying the locale on completion.
    pub(crate) fn poll_locale_request(&self, request_id: &str) -> ClientResult<ServiceRequestState> {
        let mut requests = self.locale_requests.write();
        let request = requests
            .get_mut(request_id)
            .ok_or_else(|| ClientError::RequestNotFound(request_id.to_string()))?;

        let state = ServiceRequestState {
            request_id: request_id.to_string(),
            status: request.status,
            message: None,
            updated_at: Some(request.updated_at),
        };

        let next = match request.status {
            ServiceRequestStatus::Pending => Some(ServiceRequestStatus::InProgress),
            ServiceRequestStatus::InProgress => Some(ServiceRequestStatus::Completed),
            ServiceRequestStatus::Completed | ServiceRequestStatus::Failed => None,
        };

        if let Some(next) = next {
            request.updated_at = Utc::now();
            request.status = next;
            if next == ServiceRequestStatus::Completed {
                let locale = request.locale.clone();
                let applied = self.write(&request.iccid, |record| record.locale = locale);
                if applied.is_err() {
                    request.status = ServiceRequestStatus::Failed;
                }
            }
        }

        Ok(state)
    }
}
