//! Integration tests for the gated download flow driven through AppController
//!
//! These tests verify:
//! - An incomplete form never reaches the registration endpoint
//! - An accepted registration releases exactly one export of the requested format
//! - A rejected or unreachable registration keeps the form and exports nothing
//! - The submitting phase is visible while the request is pending

use makemyqrcode::models::{AppSettings, ExportFormat, GatePhase, Registration};
use makemyqrcode::services::{
    MemoryClipboard, MemoryFileSink, RegistrationClient, RegistrationError, RegistrationReceipt,
    SubmitOutcome,
};
use makemyqrcode::{AppController, Metrics, StateManager};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Copy)]
enum Reply {
    Accept,
    Reject,
    Unreachable,
}

struct CountingClient {
    calls: AtomicUsize,
    reply: Reply,
    delay: Duration,
    last: Mutex<Option<Registration>>,
}

impl CountingClient {
    fn new(reply: Reply) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            reply,
            delay: Duration::ZERO,
            last: Mutex::new(None),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RegistrationClient for CountingClient {
    async fn register(
        &self,
        registration: &Registration,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(registration.clone());
        tokio::time::sleep(self.delay).await;

        match self.reply {
            Reply::Accept => Ok(RegistrationReceipt {
                success: Some(true),
                ..RegistrationReceipt::default()
            }),
            Reply::Reject => Err(RegistrationError::Rejected {
                status: 400,
                message: Some("Invalid email format".to_string()),
            }),
            Reply::Unreachable => Err(RegistrationError::MalformedResponse(
                "expected value at line 1 column 1".to_string(),
            )),
        }
    }
}

struct Harness {
    controller: Arc<AppController<CountingClient>>,
    client: Arc<CountingClient>,
    files: Arc<MemoryFileSink>,
}

fn harness(client: CountingClient) -> Harness {
    let settings = AppSettings {
        export_delay_ms: 5,
        ..AppSettings::default()
    };
    let client = Arc::new(client);
    let files = Arc::new(MemoryFileSink::new());
    let controller = AppController::new(
        StateManager::new(),
        &settings,
        files.clone(),
        Arc::new(MemoryClipboard::new()),
        client.clone(),
        Arc::new(Metrics::new()),
    )
    .unwrap();
    controller.set_url("https://makemyqrcode.com");

    Harness {
        controller: Arc::new(controller),
        client,
        files,
    }
}

fn fill_form<C: RegistrationClient>(controller: &AppController<C>) {
    controller.set_name("Ada Lovelace");
    assert!(controller.set_phone("+441234567890"));
    controller.set_email("ada@example.com");
}

#[tokio::test]
async fn test_incomplete_form_never_calls_endpoint() {
    let h = harness(CountingClient::new(Reply::Accept));
    assert!(h.controller.request_download(ExportFormat::Png));
    h.controller.set_name("Ada Lovelace");

    let outcome = h.controller.submit_registration().await;

    assert_eq!(outcome, SubmitOutcome::Invalid("All fields are required".to_string()));
    assert_eq!(h.client.calls(), 0);
    assert!(h.files.files().is_empty());

    let gate = h.controller.snapshot().gate;
    assert_eq!(gate.phase, GatePhase::FormOpen);
    assert_eq!(gate.error.as_deref(), Some("All fields are required"));
}

#[tokio::test]
async fn test_accepted_registration_exports_once() {
    let h = harness(CountingClient::new(Reply::Accept));
    assert!(h.controller.request_download(ExportFormat::Png));
    fill_form(&h.controller);

    let outcome = h.controller.submit_registration().await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Exported {
            format: Some(ExportFormat::Png),
            file: Some(_)
        }
    ));
    assert_eq!(h.client.calls(), 1);
    assert_eq!(h.files.file_names(), vec!["makemyqrcode-com.png".to_string()]);

    let sent = h.client.last.lock().unwrap().clone().unwrap();
    assert_eq!(sent.number, "+441234567890");

    let state = h.controller.snapshot();
    assert_eq!(state.gate.phase, GatePhase::Closed);
    assert!(state.gate.form.name.is_empty());
    assert!(state.gate.pending.is_none());
    assert!(state.downloading.is_none());
}

#[tokio::test]
async fn test_second_request_overwrites_pending_format() {
    let h = harness(CountingClient::new(Reply::Accept));
    h.controller.request_download(ExportFormat::Png);
    h.controller.request_download(ExportFormat::Svg);
    fill_form(&h.controller);

    h.controller.submit_registration().await;

    assert_eq!(h.files.file_names(), vec!["makemyqrcode-com.svg".to_string()]);
}

#[tokio::test]
async fn test_rejected_registration_keeps_form() {
    let h = harness(CountingClient::new(Reply::Reject));
    h.controller.request_download(ExportFormat::Svg);
    fill_form(&h.controller);

    let outcome = h.controller.submit_registration().await;

    assert_eq!(outcome, SubmitOutcome::Rejected("Invalid email format".to_string()));
    assert!(h.files.files().is_empty());

    let gate = h.controller.snapshot().gate;
    assert_eq!(gate.phase, GatePhase::FormOpen);
    assert_eq!(gate.form.name, "Ada Lovelace");
    assert_eq!(gate.form.phone, "+441234567890");
    assert_eq!(gate.form.email, "ada@example.com");
    assert_eq!(gate.error.as_deref(), Some("Invalid email format"));
}

#[tokio::test]
async fn test_unreachable_endpoint_shows_connectivity_error() {
    let h = harness(CountingClient::new(Reply::Unreachable));
    h.controller.request_download(ExportFormat::Png);
    fill_form(&h.controller);

    let outcome = h.controller.submit_registration().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Unreachable("Failed to connect to server".to_string())
    );
    assert!(h.files.files().is_empty());
    assert_eq!(h.controller.snapshot().gate.phase, GatePhase::FormOpen);
}

#[tokio::test]
async fn test_submitting_phase_while_pending() {
    let mut client = CountingClient::new(Reply::Accept);
    client.delay = Duration::from_millis(200);
    let h = harness(client);
    h.controller.request_download(ExportFormat::Svg);
    fill_form(&h.controller);

    let controller = h.controller.clone();
    let task = tokio::spawn(async move { controller.submit_registration().await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.controller.snapshot().gate.phase, GatePhase::Submitting);

    // A second submit while one is in flight is ignored
    assert_eq!(h.controller.submit_registration().await, SubmitOutcome::Ignored);

    task.await.unwrap();
    assert_eq!(h.client.calls(), 1);
    assert_eq!(h.files.files().len(), 1);
}

#[tokio::test]
async fn test_cancel_then_request_again() {
    let h = harness(CountingClient::new(Reply::Accept));
    h.controller.request_download(ExportFormat::Png);
    h.controller.set_name("Ada Lovelace");
    h.controller.cancel_download();

    let gate = h.controller.snapshot().gate;
    assert_eq!(gate.phase, GatePhase::Closed);
    assert!(gate.pending.is_none());
    assert_eq!(gate.form.name, "Ada Lovelace");

    assert_eq!(h.controller.submit_registration().await, SubmitOutcome::Ignored);
    assert_eq!(h.client.calls(), 0);
}
