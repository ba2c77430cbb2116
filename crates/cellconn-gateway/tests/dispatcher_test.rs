//! Dispatcher behaviour against recording fake vendor clients
//!
//! Covers routing and argument pass-through, configuration failures,
//! capability gaps, credential validation and asynchronous SMS delivery.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cellconn_core::{
    Capabilities, CellularClient, ClientError, ClientResult, CredentialSet, Iccid, LocaleInfo,
    ProviderIdentity, ServiceRequestState, ServiceRequestStatus, SessionInfo, SimState,
    StateEncoding, SubscriptionPackage, SubscriptionStatus, TargetSimState, Terminal, VendorAck,
};
use cellconn_gateway::{
    ClientRegistry, ConnectivityService, Dispatcher, GatewayError, StaticCredentialProvider,
};
use parking_lot::Mutex;
use tokio::sync::oneshot;

// =============================================================================
// Recording Client
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    ListTerminals,
    GetTerminal(String),
    GetSessions(String),
    AvailableStates(String),
    TargetStates(String, String),
    Packages(String, String),
    UpdateState(String, TargetSimState),
    UpdatePackage(String, String),
    Reconnect(String),
    Sms(String, String, String),
    Validate,
    GetLocale(String),
    SetLocale(String, String),
    LocaleStatus(String),
}

/// Fake vendor client that records every call it receives
struct RecordingClient {
    provider: ProviderIdentity,
    capabilities: Capabilities,
    calls: Mutex<Vec<Call>>,
    /// Error returned by every operation when set
    fault: Option<ClientError>,
    command_ack: VendorAck,
    /// When set, `send_sms` waits for this before answering
    sms_gate: Mutex<Option<oneshot::Receiver<VendorAck>>>,
}

impl RecordingClient {
    fn new(provider: ProviderIdentity) -> Self {
        Self {
            provider,
            capabilities: Capabilities::default(),
            calls: Mutex::new(Vec::new()),
            fault: None,
            command_ack: VendorAck::Accepted,
            sms_gate: Mutex::new(None),
        }
    }

    fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    fn failing(mut self, fault: ClientError) -> Self {
        self.fault = Some(fault);
        self
    }

    fn acking(mut self, ack: VendorAck) -> Self {
        self.command_ack = ack;
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) -> ClientResult<()> {
        self.calls.lock().push(call);
        match &self.fault {
            Some(fault) => Err(fault.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CellularClient for RecordingClient {
    fn provider(&self) -> ProviderIdentity {
        self.provider
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn list_terminals(&self) -> ClientResult<Vec<Iccid>> {
        self.record(Call::ListTerminals)?;
        Ok(vec![Iccid::from("8912000000000000001")])
    }

    async fn get_terminal(&self, iccid: &Iccid) -> ClientResult<Terminal> {
        self.record(Call::GetTerminal(iccid.to_string()))?;
        Ok(Terminal {
            iccid: iccid.clone(),
            msisdn: Some("46700000001".to_string()),
            imsi: None,
            imei: None,
            status: "Active".to_string(),
            rate_plan: Some("Basic".to_string()),
            usage_bytes: None,
            activated_at: None,
        })
    }

    async fn get_sessions(&self, iccid: &Iccid) -> ClientResult<Vec<SessionInfo>> {
        self.record(Call::GetSessions(iccid.to_string()))?;
        Ok(vec![])
    }

    async fn reconnect_terminal(&self, iccid: &Iccid) -> ClientResult<VendorAck> {
        self.record(Call::Reconnect(iccid.to_string()))?;
        Ok(self.command_ack.clone())
    }

    async fn get_available_sim_states(&self, iccid: &Iccid) -> ClientResult<Vec<SimState>> {
        self.record(Call::AvailableStates(iccid.to_string()))?;
        Ok(vec![SimState::named("Active"), SimState::named("Disconnected")])
    }

    async fn get_valid_target_states(
        &self,
        iccid: &Iccid,
        current_state: &str,
    ) -> ClientResult<Vec<SimState>> {
        self.record(Call::TargetStates(
            iccid.to_string(),
            current_state.to_string(),
        ))?;
        Ok(vec![SimState::named("Disconnected")])
    }

    async fn update_sim_state(
        &self,
        iccid: &Iccid,
        target: &TargetSimState,
    ) -> ClientResult<VendorAck> {
        self.record(Call::UpdateState(iccid.to_string(), target.clone()))?;
        Ok(self.command_ack.clone())
    }

    async fn get_available_packages(
        &self,
        iccid: &Iccid,
        current_subscription: &str,
    ) -> ClientResult<Vec<SubscriptionPackage>> {
        self.record(Call::Packages(
            iccid.to_string(),
            current_subscription.to_string(),
        ))?;
        Ok(vec![SubscriptionPackage::named("Expensive")])
    }

    async fn update_subscription_package(
        &self,
        iccid: &Iccid,
        package: &str,
    ) -> ClientResult<VendorAck> {
        self.record(Call::UpdatePackage(iccid.to_string(), package.to_string()))?;
        Ok(self.command_ack.clone())
    }

    async fn send_sms(&self, iccid: &Iccid, msisdn: &str, text: &str) -> ClientResult<VendorAck> {
        self.record(Call::Sms(
            iccid.to_string(),
            msisdn.to_string(),
            text.to_string(),
        ))?;
        let gate = self.sms_gate.lock().take();
        match gate {
            Some(rx) => rx
                .await
                .map_err(|_| ClientError::Internal("sms gate dropped".to_string())),
            None => Ok(self.command_ack.clone()),
        }
    }

    async fn validate_credentials(&self) -> ClientResult<bool> {
        self.record(Call::Validate)?;
        Ok(true)
    }

    async fn get_locale(&self, iccid: &Iccid) -> ClientResult<LocaleInfo> {
        self.record(Call::GetLocale(iccid.to_string()))?;
        Ok(LocaleInfo {
            current: "en-GB".to_string(),
            available: vec!["en-GB".to_string(), "sv-SE".to_string()],
        })
    }

    async fn set_locale(&self, iccid: &Iccid, locale: &str) -> ClientResult<String> {
        self.record(Call::SetLocale(iccid.to_string(), locale.to_string()))?;
        Ok("req-42".to_string())
    }

    async fn get_locale_change_status(&self, request_id: &str) -> ClientResult<ServiceRequestState> {
        self.record(Call::LocaleStatus(request_id.to_string()))?;
        Ok(ServiceRequestState {
            request_id: request_id.to_string(),
            status: ServiceRequestStatus::Completed,
            message: None,
            updated_at: None,
        })
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

const ICCID: &str = "8912000000000000001";

fn locale_capable() -> Capabilities {
    Capabilities {
        locale: true,
        async_sms: true,
        state_encoding: StateEncoding::Name,
    }
}

fn service_with(
    provider_tag: &str,
    clients: Vec<Arc<RecordingClient>>,
) -> (ConnectivityService, Arc<StaticCredentialProvider>) {
    let credentials = Arc::new(StaticCredentialProvider::new(CredentialSet::new(
        provider_tag,
    )));
    let mut registry = ClientRegistry::new();
    for client in clients {
        registry.register_client(client);
    }
    (
        ConnectivityService::new(credentials.clone(), registry),
        credentials,
    )
}

/// Run every uniform operation and collect the errors
async fn run_all(service: &ConnectivityService) -> Vec<Option<GatewayError>> {
    let iccid = Iccid::from(ICCID);
    vec![
        service.list_terminals().await.err(),
        service.get_terminal(&iccid).await.err(),
        service.get_sessions(&iccid).await.err(),
        service.get_available_sim_states(&iccid).await.err(),
        service.get_valid_target_states(&iccid, "Active").await.err(),
        service.get_available_packages(&iccid, "Basic").await.err(),
        service.update_sim_state(&iccid, "Active").await.err(),
        service
            .update_subscription_package(&iccid, "Expensive")
            .await
            .err(),
        service.reconnect_terminal(&iccid).await.err(),
        service.send_sms(&iccid, "46700000001", "ping").await.err(),
        service.validate_credentials().await.err(),
        service.get_locale(&iccid).await.err(),
        service.set_locale(&iccid, "sv-SE").await.err(),
        service.get_locale_change_status("req-42").await.err(),
        service.provider_info().await.err(),
    ]
}

// =============================================================================
// Routing
// =============================================================================

#[tokio::test]
async fn routes_every_operation_with_arguments_unchanged() {
    let client =
        Arc::new(RecordingClient::new(ProviderIdentity::Jasper).with_capabilities(locale_capable()));
    let (service, _) = service_with("jasper", vec![client.clone()]);

    let errors = run_all(&service).await;
    assert!(errors.iter().all(Option::is_none), "{:?}", errors);

    assert_eq!(
        client.calls(),
        vec![
            Call::ListTerminals,
            Call::GetTerminal(ICCID.to_string()),
            Call::GetSessions(ICCID.to_string()),
            Call::AvailableStates(ICCID.to_string()),
            Call::TargetStates(ICCID.to_string(), "Active".to_string()),
            Call::Packages(ICCID.to_string(), "Basic".to_string()),
            Call::UpdateState(ICCID.to_string(), TargetSimState::Name("Active".to_string())),
            Call::UpdatePackage(ICCID.to_string(), "Expensive".to_string()),
            Call::Reconnect(ICCID.to_string()),
            Call::Sms(
                ICCID.to_string(),
                "46700000001".to_string(),
                "ping".to_string()
            ),
            Call::Validate,
            Call::GetLocale(ICCID.to_string()),
            Call::SetLocale(ICCID.to_string(), "sv-SE".to_string()),
            Call::LocaleStatus("req-42".to_string()),
        ]
    );
}

#[tokio::test]
async fn results_are_returned_unchanged() {
    let client = Arc::new(RecordingClient::new(ProviderIdentity::Jasper));
    let (service, _) = service_with("jasper", vec![client]);
    let iccid = Iccid::from("8912345");

    let states = service.get_available_sim_states(&iccid).await.unwrap();
    assert_eq!(
        states,
        vec![SimState::named("Active"), SimState::named("Disconnected")]
    );

    let terminal = service.get_terminal(&iccid).await.unwrap();
    assert_eq!(terminal.iccid, iccid);
    assert_eq!(terminal.rate_plan.as_deref(), Some("Basic"));
}

#[tokio::test]
async fn available_sim_states_are_idempotent() {
    let client = Arc::new(RecordingClient::new(ProviderIdentity::Jasper));
    let (service, _) = service_with("jasper", vec![client]);
    let iccid = Iccid::from(ICCID);

    let first = service.get_available_sim_states(&iccid).await.unwrap();
    let second = service.get_available_sim_states(&iccid).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn provider_is_resolved_on_every_call() {
    let jasper = Arc::new(RecordingClient::new(ProviderIdentity::Jasper));
    let ericsson = Arc::new(RecordingClient::new(ProviderIdentity::Ericsson));
    let (service, credentials) = service_with("jasper", vec![jasper.clone(), ericsson.clone()]);

    service.list_terminals().await.unwrap();
    credentials.replace(CredentialSet::new("ericsson"));
    service.list_terminals().await.unwrap();

    assert_eq!(jasper.calls(), vec![Call::ListTerminals]);
    assert_eq!(ericsson.calls(), vec![Call::ListTerminals]);
    assert_eq!(
        service.provider_info().await.unwrap().provider,
        ProviderIdentity::Ericsson
    );
}

#[tokio::test]
async fn service_over_shared_dispatcher() {
    let client = Arc::new(RecordingClient::new(ProviderIdentity::Ericsson));
    let credentials = Arc::new(StaticCredentialProvider::new(CredentialSet::new(
        "ericsson",
    )));
    let mut registry = ClientRegistry::new();
    registry.register_client(client.clone());

    let dispatcher = Arc::new(Dispatcher::new(credentials, registry));
    assert!(dispatcher.registry().is_registered(ProviderIdentity::Ericsson));
    assert!(!dispatcher.registry().is_registered(ProviderIdentity::Jasper));

    let service = ConnectivityService::from_dispatcher(dispatcher);
    service.list_terminals().await.unwrap();
    assert_eq!(client.calls(), vec![Call::ListTerminals]);
}

/// Collects formatted log output
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn dispatch_log_carries_provider_operation_and_iccid() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let client = Arc::new(RecordingClient::new(ProviderIdentity::Jasper));
    let (service, _) = service_with("jasper", vec![client]);
    service.get_terminal(&Iccid::from(ICCID)).await.unwrap();
    service.list_terminals().await.unwrap();

    let output = logs.contents();
    let dispatched: Vec<&str> = output
        .lines()
        .filter(|line| line.contains("Dispatching"))
        .collect();
    assert_eq!(dispatched.len(), 2, "{}", output);

    assert!(dispatched[0].contains("provider=jasper"), "{}", dispatched[0]);
    assert!(dispatched[0].contains("operation=\"get_terminal\""), "{}", dispatched[0]);
    assert!(
        dispatched[0].contains(&format!("iccid=\"{}\"", ICCID)),
        "{}",
        dispatched[0]
    );

    assert!(dispatched[1].contains("operation=\"list_terminals\""), "{}", dispatched[1]);
    assert!(!dispatched[1].contains("iccid="), "{}", dispatched[1]);
}

#[tokio::test]
async fn factory_builds_client_from_current_credentials() {
    let seen = Arc::new(Mutex::new(Vec::<Option<String>>::new()));
    let seen_by_factory = seen.clone();

    let mut registry = ClientRegistry::new();
    registry.register_factory(ProviderIdentity::Ericsson, move |creds: &CredentialSet| {
        seen_by_factory.lock().push(creds.username.clone());
        Ok(Arc::new(RecordingClient::new(ProviderIdentity::Ericsson)) as Arc<dyn CellularClient>)
    });

    let credentials = Arc::new(StaticCredentialProvider::new(
        CredentialSet::new("ericsson").with_account("first", "k1"),
    ));
    let service = ConnectivityService::new(credentials.clone(), registry);

    service.list_terminals().await.unwrap();
    credentials.replace(CredentialSet::new("ericsson").with_account("second", "k2"));
    service.list_terminals().await.unwrap();

    assert_eq!(
        *seen.lock(),
        vec![Some("first".to_string()), Some("second".to_string())]
    );
}

#[tokio::test]
async fn factory_failure_is_configuration_error() {
    let mut registry = ClientRegistry::new();
    registry.register_factory(ProviderIdentity::Jasper, |_creds: &CredentialSet| {
        Err(ClientError::InvalidRequest("missing api key".to_string()))
    });
    let credentials = Arc::new(StaticCredentialProvider::new(CredentialSet::new("jasper")));
    let service = ConnectivityService::new(credentials, registry);

    let err = service.list_terminals().await.unwrap_err();
    assert!(matches!(err, GatewayError::Configuration(msg) if msg.contains("missing api key")));
}

// =============================================================================
// Configuration errors
// =============================================================================

#[tokio::test]
async fn unrecognized_provider_fails_every_operation_before_any_vendor_call() {
    let client =
        Arc::new(RecordingClient::new(ProviderIdentity::Jasper).with_capabilities(locale_capable()));
    let (service, _) = service_with("telenor", vec![client.clone()]);

    for err in run_all(&service).await {
        assert!(
            matches!(&err, Some(GatewayError::Configuration(msg)) if msg.contains("telenor")),
            "{:?}",
            err
        );
    }
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn unregistered_provider_is_configuration_error() {
    let client = Arc::new(RecordingClient::new(ProviderIdentity::Jasper));
    let (service, _) = service_with("ericsson", vec![client.clone()]);

    let err = service.list_terminals().await.unwrap_err();
    assert!(
        matches!(&err, GatewayError::Configuration(msg) if msg == "no client for provider 'ericsson'")
    );
    assert!(err.is_permanent());
    assert!(client.calls().is_empty());
}

// =============================================================================
// Capability gaps
// =============================================================================

#[tokio::test]
async fn locale_operations_unsupported_without_locale_capability() {
    let client = Arc::new(RecordingClient::new(ProviderIdentity::Jasper));
    let (service, _) = service_with("jasper", vec![client.clone()]);
    let iccid = Iccid::from(ICCID);

    let errors = vec![
        service.get_locale(&iccid).await.unwrap_err(),
        service.set_locale(&iccid, "sv-SE").await.unwrap_err(),
        service.get_locale_change_status("req-1").await.unwrap_err(),
    ];
    let operations: Vec<_> = errors
        .iter()
        .map(|err| match err {
            GatewayError::UnsupportedOperation {
                operation,
                provider: ProviderIdentity::Jasper,
            } => *operation,
            other => panic!("unexpected error: {:?}", other),
        })
        .collect();

    assert_eq!(
        operations,
        vec!["get_locale", "set_locale", "get_locale_change_status"]
    );
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn client_not_supported_is_normalized() {
    let client = Arc::new(
        RecordingClient::new(ProviderIdentity::Ericsson)
            .failing(ClientError::NotSupported("list_terminals".to_string())),
    );
    let (service, _) = service_with("ericsson", vec![client]);

    let err = service.list_terminals().await.unwrap_err();
    assert!(matches!(
        err,
        GatewayError::UnsupportedOperation {
            operation: "list_terminals",
            provider: ProviderIdentity::Ericsson,
        }
    ));
}

// =============================================================================
// Vendor faults and outcomes
// =============================================================================

#[tokio::test]
async fn vendor_faults_propagate_unchanged() {
    let client = Arc::new(
        RecordingClient::new(ProviderIdentity::Jasper)
            .failing(ClientError::Transport("connection reset".to_string())),
    );
    let (service, _) = service_with("jasper", vec![client]);

    let err = service
        .get_sessions(&Iccid::from(ICCID))
        .await
        .unwrap_err();
    match err {
        GatewayError::Vendor { provider, source } => {
            assert_eq!(provider, ProviderIdentity::Jasper);
            assert!(matches!(source, ClientError::Transport(msg) if msg == "connection reset"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn validate_credentials_converts_faults_to_false() {
    let failing = Arc::new(
        RecordingClient::new(ProviderIdentity::Jasper)
            .failing(ClientError::Auth("401 Unauthorized".to_string())),
    );
    let (service, _) = service_with("jasper", vec![failing]);
    assert!(!service.validate_credentials().await.unwrap());

    let transport = Arc::new(
        RecordingClient::new(ProviderIdentity::Jasper)
            .failing(ClientError::Transport("dns failure".to_string())),
    );
    let (service, _) = service_with("jasper", vec![transport]);
    assert!(!service.validate_credentials().await.unwrap());

    let healthy = Arc::new(RecordingClient::new(ProviderIdentity::Jasper));
    let (service, _) = service_with("jasper", vec![healthy]);
    assert!(service.validate_credentials().await.unwrap());
}

#[tokio::test]
async fn validate_credentials_still_reports_misconfiguration() {
    let (service, _) = service_with("jasper", vec![]);
    assert!(matches!(
        service.validate_credentials().await,
        Err(GatewayError::Configuration(_))
    ));
}

#[tokio::test]
async fn fire_and_forget_reconnect_counts_as_success() {
    let client =
        Arc::new(RecordingClient::new(ProviderIdentity::Ericsson).acking(VendorAck::Submitted));
    let (service, _) = service_with("ericsson", vec![client]);

    assert!(service
        .reconnect_terminal(&Iccid::from(ICCID))
        .await
        .unwrap());
}

#[tokio::test]
async fn rejected_commands_report_failure() {
    let client = Arc::new(RecordingClient::new(ProviderIdentity::Jasper).acking(
        VendorAck::Rejected {
            reason: "SIM barred".to_string(),
        },
    ));
    let (service, _) = service_with("jasper", vec![client]);
    let iccid = Iccid::from(ICCID);

    assert!(!service.update_sim_state(&iccid, "Active").await.unwrap());
    assert!(!service
        .update_subscription_package(&iccid, "Basic")
        .await
        .unwrap());
    assert!(!service.reconnect_terminal(&iccid).await.unwrap());
    assert!(!service.send_sms(&iccid, "4670", "hi").await.unwrap());
}

// =============================================================================
// State translation
// =============================================================================

fn status_code_client() -> Arc<RecordingClient> {
    Arc::new(
        RecordingClient::new(ProviderIdentity::Ericsson).with_capabilities(Capabilities {
            locale: true,
            async_sms: true,
            state_encoding: StateEncoding::StatusCode,
        }),
    )
}

#[tokio::test]
async fn status_code_vendor_receives_translated_state() {
    let client = status_code_client();
    let (service, _) = service_with("ericsson", vec![client.clone()]);

    assert!(service
        .update_sim_state(&Iccid::from(ICCID), "pause")
        .await
        .unwrap());
    assert_eq!(
        client.calls(),
        vec![Call::UpdateState(
            ICCID.to_string(),
            TargetSimState::Status(SubscriptionStatus::Pause)
        )]
    );
}

#[tokio::test]
async fn untranslatable_state_is_validation_error() {
    let client = status_code_client();
    let (service, _) = service_with("ericsson", vec![client.clone()]);

    let err = service
        .update_sim_state(&Iccid::from(ICCID), "Disconnected")
        .await
        .unwrap_err();
    assert!(matches!(&err, GatewayError::Validation(msg) if msg.contains("Disconnected")));
    assert_eq!(err.status_code(), 400);
    assert!(client.calls().is_empty());
}

// =============================================================================
// Asynchronous SMS
// =============================================================================

#[tokio::test]
async fn send_sms_waits_for_async_vendor_result() {
    let client = status_code_client();
    let (tx, rx) = oneshot::channel();
    *client.sms_gate.lock() = Some(rx);
    let (service, _) = service_with("ericsson", vec![client.clone()]);

    let task = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .send_sms(&Iccid::from(ICCID), "46700000001", "wake up")
                .await
        })
    };

    // The vendor has not answered yet, so the uniform call must still be pending
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!task.is_finished());
    assert_eq!(client.calls().len(), 1);

    tx.send(VendorAck::Rejected {
        reason: "unreachable".to_string(),
    })
    .unwrap();
    let delivered = task.await.unwrap().unwrap();
    assert!(!delivered);
}

#[tokio::test]
async fn send_sms_reports_success_after_delayed_vendor_answer() {
    let client = status_code_client();
    let (tx, rx) = oneshot::channel();
    *client.sms_gate.lock() = Some(rx);
    let (service, _) = service_with("ericsson", vec![client]);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        let _ = tx.send(VendorAck::Accepted);
    });

    let delivered = service
        .send_sms(&Iccid::from(ICCID), "46700000001", "wake up")
        .await
        .unwrap();
    assert!(delivered);
}
