use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Application settings from `makemyqrcode.yaml` and `MAKEMYQR_*` env vars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Base URL of the registration service
    pub api_base_url: String,

    /// Directory downloads are written into
    pub output_dir: Utf8PathBuf,

    /// Pause between an accepted registration and the export it releases
    pub export_delay_ms: u64,

    /// How long the "copied" flag stays up after a clipboard copy
    pub copy_reset_ms: u64,

    /// Registration request timeout. None waits forever.
    pub request_timeout_secs: Option<u64>,

    /// Initial viewport width for choosing the display target
    pub viewport_width: u32,

    pub debug_mode: bool,
    pub log_dir: Utf8PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            output_dir: Utf8PathBuf::from("."),
            export_delay_ms: 100,
            copy_reset_ms: 2000,
            request_timeout_secs: None,
            viewport_width: 1280,
            debug_mode: false,
            log_dir: Utf8PathBuf::from("logs"),
        }
    }
}

impl AppSettings {
    pub fn export_delay(&self) -> Duration {
        Duration::from_millis(self.export_delay_ms)
    }

    pub fn copy_reset(&self) -> Duration {
        Duration::from_millis(self.copy_reset_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
