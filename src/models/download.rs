// Download gate model: the contact form that must be submitted before an
// export is released.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

use super::qr_config::ParseOptionError;

/// Base name shared by every exported file
pub const EXPORT_BASENAME: &str = "makemyqrcode-com";

/// Message shown when the form is submitted with an empty field
pub const MSG_FIELDS_REQUIRED: &str = "All fields are required";

static PHONE_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[0-9]*$").expect("Invalid phone regex"));

/// File formats the export pipeline can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Svg,
    Png,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }

    /// `makemyqrcode-com.<ext>`
    pub fn file_name(&self) -> String {
        format!("{}.{}", EXPORT_BASENAME, self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(ParseOptionError {
                kind: "export format",
                value: s.to_string(),
            }),
        }
    }
}

/// Where the gate currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatePhase {
    #[default]
    Closed,
    FormOpen,
    Submitting,
}

/// Editable form values. Survive a failed submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl RegistrationForm {
    /// Apply a phone edit if it matches the accepted input pattern.
    ///
    /// Returns false and keeps the previous value otherwise.
    pub fn set_phone(&mut self, value: &str) -> bool {
        if PHONE_INPUT.is_match(value) {
            self.phone = value.to_string();
            true
        } else {
            false
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.phone.is_empty() && !self.email.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// JSON body sent to the registration endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub number: String,
    pub email: String,
}

impl From<&RegistrationForm> for Registration {
    fn from(form: &RegistrationForm) -> Self {
        Self {
            name: form.name.clone(),
            number: form.phone.clone(),
            email: form.email.clone(),
        }
    }
}

/// Reasons the gate refuses to start a submission
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateRejection {
    #[error("{0}")]
    Validation(String),

    #[error("Registration form is not open")]
    NotOpen,
}

/// State machine guarding downloads behind the registration form.
///
/// `Closed -> FormOpen -> Submitting -> Closed` on success, or back to
/// `FormOpen` with an error on failure. At most one format is pending;
/// requesting again overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DownloadGate {
    pub phase: GatePhase,
    pub pending: Option<ExportFormat>,
    pub form: RegistrationForm,
    pub error: Option<String>,
}

impl DownloadGate {
    pub fn is_open(&self) -> bool {
        self.phase != GatePhase::Closed
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == GatePhase::Submitting
    }

    pub fn request_download(&mut self, format: ExportFormat) {
        self.pending = Some(format);
        if self.phase == GatePhase::Closed {
            self.phase = GatePhase::FormOpen;
        }
    }

    /// Close the form, dropping the pending format and any error.
    /// Typed values are kept.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.error = None;
        self.phase = GatePhase::Closed;
    }

    /// Validate the form and move to `Submitting`
    pub fn begin_submit(&mut self) -> Result<Registration, GateRejection> {
        if self.phase != GatePhase::FormOpen {
            return Err(GateRejection::NotOpen);
        }

        if !self.form.is_complete() {
            let message = MSG_FIELDS_REQUIRED.to_string();
            self.error = Some(message.clone());
            return Err(GateRejection::Validation(message));
        }

        self.error = None;
        self.phase = GatePhase::Submitting;
        Ok(Registration::from(&self.form))
    }

    /// Registration accepted: clear and close, handing back the pending format
    pub fn complete_success(&mut self) -> Option<ExportFormat> {
        self.form.clear();
        self.error = None;
        self.phase = GatePhase::Closed;
        self.pending.take()
    }

    /// Registration failed: reopen with the message, fields untouched.
    ///
    /// A form closed while the request was in flight stays closed.
    pub fn complete_failure(&mut self, message: impl Into<String>) {
        if self.phase != GatePhase::Submitting {
            return;
        }
        self.error = Some(message.into());
        self.phase = GatePhase::FormOpen;
    }
}
