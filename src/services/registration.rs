// Registration client
//
// POSTs the registration form to `{base_url}/api/register`. The response
// body is read as JSON on both success and failure; a body that does not
// parse is treated the same as no response at all.

use anyhow::Context;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::models::Registration;

/// Shown when the endpoint rejects without an `error` message
pub const MSG_REGISTRATION_FAILED: &str = "Registration failed";

/// Shown when no usable response came back
pub const MSG_CONNECTION_FAILED: &str = "Failed to connect to server";

/// Parsed body of an accepted registration
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RegistrationReceipt {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    status: String,
}

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Registration rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },

    #[error("Registration request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed registration response: {0}")]
    MalformedResponse(String),
}

impl RegistrationError {
    /// Text shown inline in the registration form
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            Self::Rejected { .. } => MSG_REGISTRATION_FAILED.to_string(),
            Self::Transport(_) | Self::MalformedResponse(_) => MSG_CONNECTION_FAILED.to_string(),
        }
    }

    /// True when the endpoint answered, as opposed to a connectivity problem
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Submits registrations to the external endpoint
pub trait RegistrationClient: Send + Sync {
    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<RegistrationReceipt, RegistrationError>> + Send;
}

/// `reqwest`-backed client for the registration endpoint
#[derive(Debug, Clone)]
pub struct HttpRegistrationClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRegistrationClient {
    /// Build a client for `base_url`. Without a timeout a hung connection
    /// keeps the request pending.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("makemyqrcode/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("building http client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Probe `GET /api/health`; true when it answers `{"status": "ok"}`
    pub async fn health(&self) -> Result<bool, RegistrationError> {
        let resp = self.http.get(self.endpoint("/api/health")).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            tracing::warn!("Health probe returned {}", status);
            return Ok(false);
        }

        let health: HealthBody = serde_json::from_str(&body)
            .map_err(|e| RegistrationError::MalformedResponse(e.to_string()))?;
        Ok(health.status == "ok")
    }
}

impl RegistrationClient for HttpRegistrationClient {
    async fn register(
        &self,
        registration: &Registration,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        let url = self.endpoint("/api/register");
        tracing::debug!("POST {}", url);

        let resp = self.http.post(&url).json(registration).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let err: ErrorBody = serde_json::from_str(&body)
                .map_err(|e| RegistrationError::MalformedResponse(e.to_string()))?;
            return Err(RegistrationError::Rejected {
                status: status.as_u16(),
                message: err.error,
            });
        }

        serde_json::from_str(&body).map_err(|e| RegistrationError::MalformedResponse(e.to_string()))
    }
}
