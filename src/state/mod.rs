// State management module
//
// StateManager wraps AppState in Arc<RwLock<T>> and broadcasts change events
// so the render session and any front end can follow the configuration.

use crate::models::catalog::ColorPreset;
use crate::models::{
    AppState, Color, CornerDotType, CornerSquareType, DotType, ErrorCorrectionLevel, ExportFormat,
    GatePhase, LogoSource, QrConfig, UploadedImage, ViewportKind,
};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when state is modified
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// Any field of the QR configuration changed
    ConfigurationChanged { has_content: bool },

    /// The viewport was resized
    ViewportChanged { width: u32, kind: ViewportKind },

    ExportStarted { format: ExportFormat },
    ExportFinished { format: ExportFormat },

    CopyStarted,
    CopyFinished,

    /// The registration gate moved to another phase
    GateChanged { phase: GatePhase },

    /// The gate's inline error appeared, changed or was cleared
    GateError { message: Option<String> },

    /// A registration form field was edited
    FormEdited,
}

/// Thread-safe state manager with event emission
///
/// - Provides thread-safe access to [`AppState`] via `Arc<RwLock<T>>`
/// - Detects state changes and emits [`StateChange`] events
/// - Supports subscribing to state changes via tokio broadcast channels
///
/// Configuration edits are applied as whole-record updates under the write
/// lock, so subscribers never see a half-applied change.
pub struct StateManager {
    state: Arc<RwLock<AppState>>,

    /// Multiple subscribers can listen for state changes
    state_tx: broadcast::Sender<StateChange>,
}

impl StateManager {
    /// Create a new StateManager with default state and a 100 event buffer
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(state: AppState) -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(state)),
            state_tx,
        }
    }

    /// Clone of the current state, safe to use without holding locks
    pub fn snapshot(&self) -> AppState {
        self.state.read().unwrap().clone()
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let ready = state_manager.read(|state| state.can_download());
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppState) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// Captures the old state, applies `update_fn`, diffs the two and
    /// broadcasts one event per changed concern.
    ///
    /// # Returns
    /// The StateChange events that were emitted
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut AppState),
    {
        let mut state = self.state.write().unwrap();
        let old_state = state.clone();

        update_fn(&mut state);

        let changes = self.detect_changes(&old_state, &state);

        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.state_tx.send(change.clone());
        }

        changes
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    fn detect_changes(&self, old: &AppState, new: &AppState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if old.config != new.config {
            changes.push(StateChange::ConfigurationChanged {
                has_content: new.config.has_content(),
            });
        }

        if old.viewport_width != new.viewport_width {
            changes.push(StateChange::ViewportChanged {
                width: new.viewport_width,
                kind: new.viewport(),
            });
        }

        if old.downloading != new.downloading {
            if let Some(format) = old.downloading {
                changes.push(StateChange::ExportFinished { format });
            }
            if let Some(format) = new.downloading {
                changes.push(StateChange::ExportStarted { format });
            }
        }

        if old.copying != new.copying {
            changes.push(if new.copying {
                StateChange::CopyStarted
            } else {
                StateChange::CopyFinished
            });
        }

        if old.gate.phase != new.gate.phase {
            changes.push(StateChange::GateChanged {
                phase: new.gate.phase,
            });
        }

        if old.gate.error != new.gate.error {
            changes.push(StateChange::GateError {
                message: new.gate.error.clone(),
            });
        }

        if old.gate.form != new.gate.form {
            changes.push(StateChange::FormEdited);
        }

        changes
    }

    // Convenience methods for common configuration edits

    pub fn set_url(&self, url: impl Into<String>) -> Vec<StateChange> {
        let url = url.into();
        self.update(|state| state.config.url = url)
    }

    pub fn reset_url(&self) -> Vec<StateChange> {
        self.update(|state| state.config.url.clear())
    }

    pub fn set_foreground(&self, color: Color) -> Vec<StateChange> {
        self.update(|state| state.config.fg_color = color)
    }

    pub fn set_background(&self, color: Color) -> Vec<StateChange> {
        self.update(|state| state.config.bg_color = color)
    }

    pub fn set_level(&self, level: ErrorCorrectionLevel) -> Vec<StateChange> {
        self.update(|state| state.config.level = level)
    }

    pub fn set_include_margin(&self, include: bool) -> Vec<StateChange> {
        self.update(|state| state.config.include_margin = include)
    }

    pub fn set_dot_type(&self, dot_type: DotType) -> Vec<StateChange> {
        self.update(|state| state.config.dot_type = dot_type)
    }

    pub fn set_corner_square_type(&self, corner: Option<CornerSquareType>) -> Vec<StateChange> {
        self.update(|state| state.config.corner_square_type = corner)
    }

    pub fn set_corner_dot_type(&self, corner: Option<CornerDotType>) -> Vec<StateChange> {
        self.update(|state| state.config.corner_dot_type = corner)
    }

    /// Colours and body style change together
    pub fn apply_color_preset(&self, preset: &ColorPreset) -> Vec<StateChange> {
        self.update(|state| {
            state.config.fg_color = preset.fg;
            state.config.bg_color = preset.bg;
            state.config.dot_type = preset.style.dot_type();
        })
    }

    /// Replaces any preset selection
    pub fn upload_logo(&self, image: UploadedImage) -> Vec<StateChange> {
        self.update(|state| state.config.logo = LogoSource::Uploaded(image))
    }

    /// Replaces any uploaded image
    pub fn select_logo_preset(&self, id: impl Into<String>) -> Vec<StateChange> {
        let id = id.into();
        self.update(|state| state.config.logo = LogoSource::Preset(id))
    }

    pub fn remove_logo(&self) -> Vec<StateChange> {
        self.update(|state| state.config.logo = LogoSource::None)
    }

    pub fn replace_config(&self, config: QrConfig) -> Vec<StateChange> {
        self.update(|state| state.config = config)
    }

    pub fn set_viewport_width(&self, width: u32) -> Vec<StateChange> {
        self.update(|state| state.viewport_width = width)
    }

    // In-flight flags

    /// Mark an export as running. Returns false if one already is.
    pub fn begin_export(&self, format: ExportFormat) -> bool {
        let mut started = false;
        self.update(|state| {
            if state.downloading.is_none() {
                state.downloading = Some(format);
                started = true;
            }
        });
        started
    }

    pub fn finish_export(&self) -> Vec<StateChange> {
        self.update(|state| state.downloading = None)
    }

    /// Mark a clipboard copy as running. Returns false if one already is.
    pub fn begin_copy(&self) -> bool {
        let mut started = false;
        self.update(|state| {
            if !state.copying {
                state.copying = true;
                started = true;
            }
        });
        started
    }

    pub fn finish_copy(&self) -> Vec<StateChange> {
        self.update(|state| state.copying = false)
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
        }
    }
}
