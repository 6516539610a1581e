// Gated download flow
//
// Downloads go through the registration form: a requested format is held
// while the user fills in name, phone and email, the form is POSTed, and
// only an accepted registration releases the pending export.

use std::sync::Arc;
use std::time::Duration;

use super::export::{ExportPipeline, ExportedFile};
use super::registration::RegistrationClient;
use crate::metrics::Metrics;
use crate::models::{ExportFormat, GateRejection};
use crate::state::StateManager;

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Registration accepted and the pending export ran. `file` is `None`
    /// when nothing was pending or there was no drawing to export.
    Exported {
        format: Option<ExportFormat>,
        file: Option<ExportedFile>,
    },

    /// Registration accepted but writing the file failed
    ExportFailed(String),

    /// Missing fields, no request made
    Invalid(String),

    /// The endpoint answered with an error
    Rejected(String),

    /// No usable answer from the endpoint
    Unreachable(String),

    /// Form was not open, or a submission is already running
    Ignored,
}

pub struct GatedDownloadFlow<C: RegistrationClient> {
    state: StateManager,
    exporter: ExportPipeline,
    client: Arc<C>,
    export_delay: Duration,
    metrics: Arc<Metrics>,
}

impl<C: RegistrationClient> GatedDownloadFlow<C> {
    pub fn new(
        state: StateManager,
        exporter: ExportPipeline,
        client: Arc<C>,
        export_delay: Duration,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            state,
            exporter,
            client,
            export_delay,
            metrics,
        }
    }

    /// Hold `format` and open the form. A second request before submitting
    /// replaces the held format.
    pub fn request_download(&self, format: ExportFormat) {
        self.state.update(|state| state.gate.request_download(format));
        tracing::debug!("Download as {} requested, registration form open", format);
    }

    /// Close the form and forget the held format
    pub fn cancel(&self) {
        self.state.update(|state| state.gate.cancel());
    }

    /// Validate, register, and on acceptance run the held export
    pub async fn submit(&self) -> SubmitOutcome {
        let mut started = Err(GateRejection::NotOpen);
        self.state.update(|state| started = state.gate.begin_submit());

        let registration = match started {
            Ok(registration) => registration,
            Err(GateRejection::Validation(message)) => {
                tracing::debug!("Registration form incomplete");
                return SubmitOutcome::Invalid(message);
            }
            Err(GateRejection::NotOpen) => {
                tracing::debug!("Submit ignored, registration form not open");
                return SubmitOutcome::Ignored;
            }
        };

        match self.client.register(&registration).await {
            Ok(receipt) => {
                self.metrics.record_registration_accepted();
                tracing::info!(
                    user_id = ?receipt.user_id,
                    "Registration accepted: {}",
                    receipt.message.as_deref().unwrap_or("ok")
                );

                let mut pending = None;
                self.state
                    .update(|state| pending = state.gate.complete_success());

                let Some(format) = pending else {
                    return SubmitOutcome::Exported {
                        format: None,
                        file: None,
                    };
                };

                tokio::time::sleep(self.export_delay).await;

                match self.exporter.export(format).await {
                    Ok(file) => SubmitOutcome::Exported {
                        format: Some(format),
                        file,
                    },
                    Err(e) => SubmitOutcome::ExportFailed(e.to_string()),
                }
            }
            Err(e) => {
                if e.is_rejection() {
                    self.metrics.record_registration_rejected();
                    tracing::warn!("Registration rejected: {}", e);
                } else {
                    self.metrics.record_registration_transport_error();
                    tracing::error!("Registration request failed: {}", e);
                }

                let message = e.user_message();
                self.state
                    .update(|state| state.gate.complete_failure(message.clone()));

                if e.is_rejection() {
                    SubmitOutcome::Rejected(message)
                } else {
                    SubmitOutcome::Unreachable(message)
                }
            }
        }
    }
}
