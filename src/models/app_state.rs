use super::download::{DownloadGate, ExportFormat};
use super::qr_config::QrConfig;

/// Viewport width at and above which the desktop display target is used
pub const DESKTOP_BREAKPOINT: u32 = 1024;

/// Which of the two display targets hosts the drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewportKind {
    Mobile,
    Desktop,
}

impl ViewportKind {
    pub fn for_width(width: u32) -> Self {
        if width >= DESKTOP_BREAKPOINT {
            Self::Desktop
        } else {
            Self::Mobile
        }
    }
}

/// Single source of truth for the designer session.
///
/// Wrapped in `Arc<RwLock<AppState>>` by [`crate::state::StateManager`].
/// Mutate only through [`update()`](crate::state::StateManager::update) so
/// that change events are emitted and the rendered drawing follows the
/// latest configuration.
#[derive(Clone, Debug)]
pub struct AppState {
    // What the user is designing
    pub config: QrConfig,

    // Display
    pub viewport_width: u32,

    // In-flight work
    pub downloading: Option<ExportFormat>,
    pub copying: bool,

    // Registration gate
    pub gate: DownloadGate,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            config: QrConfig::default(),
            viewport_width: 1280,
            downloading: None,
            copying: false,
            gate: DownloadGate::default(),
        }
    }
}

impl AppState {
    pub fn viewport(&self) -> ViewportKind {
        ViewportKind::for_width(self.viewport_width)
    }

    /// Downloads need some content and no export already running
    pub fn can_download(&self) -> bool {
        self.config.has_content() && self.downloading.is_none()
    }

    pub fn is_busy(&self) -> bool {
        self.downloading.is_some() || self.copying || self.gate.is_submitting()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = AppState::default();
        assert_eq!(state.viewport(), ViewportKind::Desktop);
        assert!(!state.can_download());
        assert!(!state.is_busy());
    }

    #[test]
    fn test_breakpoint() {
        assert_eq!(ViewportKind::for_width(1023), ViewportKind::Mobile);
        assert_eq!(ViewportKind::for_width(1024), ViewportKind::Desktop);
        assert_eq!(ViewportKind::for_width(0), ViewportKind::Mobile);
    }

    #[test]
    fn test_can_download() {
        let mut state = AppState::default();
        state.config.url = "https://rust-lang.org".into();
        assert!(state.can_download());

        state.downloading = Some(ExportFormat::Svg);
        assert!(!state.can_download());
        assert!(state.is_busy());
    }
}
