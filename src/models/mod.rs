//! Data models for the QR designer.
//!
//! - [`QrConfig`]: everything the user can customise (URL, colours, shapes, logo)
//! - [`catalog`]: static colour presets, logo icons and shape catalogs
//! - [`DownloadGate`]: the registration form that guards downloads
//! - [`AppState`]: the session state held by [`StateManager`](crate::state::StateManager)
//! - [`AppSettings`]: settings loaded by [`ConfigManager`](crate::config::ConfigManager)

pub mod app_state;
pub mod catalog;
pub mod download;
pub mod qr_config;
pub mod settings;

pub use app_state::{AppState, DESKTOP_BREAKPOINT, ViewportKind};
pub use catalog::{ColorPreset, LogoPreset, PresetStyle, ShapeOption, SvgTemplate};
pub use download::{
    DownloadGate, ExportFormat, GatePhase, GateRejection, Registration, RegistrationForm,
};
pub use qr_config::{
    Color, ColorParseError, CornerDotType, CornerSquareType, DotType, ErrorCorrectionLevel,
    LogoSource, ParseOptionError, QrConfig, QrShape, UploadedImage,
};
pub use settings::AppSettings;
