// App Controller - single entry point for every designer interaction
//
// This module contains the AppController which coordinates between:
// - StateManager (configuration, viewport, in-flight flags, gate)
// - RenderSession (live drawing in the mobile or desktop target)
// - ExportPipeline (SVG/PNG files, clipboard)
// - GatedDownloadFlow (registration before download)
//
// Every edit goes through `mutate`, which applies it to the state and then
// brings the render session up to date before returning, so the drawing
// always reflects the latest configuration.

use crate::metrics::Metrics;
use crate::models::catalog::{
    CORNER_DOT_OPTIONS, CORNER_SQUARE_OPTIONS, DOT_TYPE_OPTIONS, LOGO_PRESETS, find_color_preset,
    find_logo_preset,
};
use crate::models::{
    AppSettings, AppState, Color, CornerDotType, CornerSquareType, DotType, ErrorCorrectionLevel,
    ExportFormat, QrConfig, UploadedImage,
};
use crate::services::{
    ClipboardSink, Drawing, ExportError, ExportPipeline, FileSink, GatedDownloadFlow,
    RegistrationClient, RenderSession, StyledQrRenderer, SubmitOutcome,
};
use crate::state::{StateChange, StateManager};
use anyhow::{Context, Result, bail};
use camino::Utf8Path;
use std::sync::{Arc, Mutex};

/// A catalog entry paired with its icon in the current foreground colour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogIcon {
    pub id: &'static str,
    pub name: &'static str,
    pub data_url: String,
}

/// Headless controller for the QR designer
///
/// # Example
/// ```ignore
/// let controller = AppController::new(
///     StateManager::new(),
///     &settings,
///     Arc::new(DirectorySink::new(&settings.output_dir)),
///     Arc::new(SystemClipboard),
///     Arc::new(HttpRegistrationClient::new(&settings.api_base_url, None)?),
///     Arc::new(Metrics::new()),
/// )?;
/// controller.set_url("https://example.com");
/// controller.request_download(ExportFormat::Png);
/// ```
pub struct AppController<C: RegistrationClient> {
    state_manager: StateManager,
    session: Arc<Mutex<RenderSession<StyledQrRenderer>>>,
    exporter: ExportPipeline,
    gate: GatedDownloadFlow<C>,
    metrics: Arc<Metrics>,
}

impl<C: RegistrationClient> AppController<C> {
    /// Create the controller and render the current configuration once
    pub fn new(
        state_manager: StateManager,
        settings: &AppSettings,
        files: Arc<dyn FileSink>,
        clipboard: Arc<dyn ClipboardSink>,
        client: Arc<C>,
        metrics: Arc<Metrics>,
    ) -> Result<Self> {
        let (config, width) = state_manager.read(|s| (s.config.clone(), s.viewport_width));

        let session = Arc::new(Mutex::new(RenderSession::new(width)));
        session
            .lock()
            .unwrap()
            .apply_config(&config)
            .context("Failed to render initial configuration")?;
        metrics.record_render();

        let exporter = ExportPipeline::new(
            state_manager.clone(),
            session.clone(),
            files,
            clipboard,
            settings.copy_reset(),
            metrics.clone(),
        );
        let gate = GatedDownloadFlow::new(
            state_manager.clone(),
            exporter.clone(),
            client,
            settings.export_delay(),
            metrics.clone(),
        );

        tracing::info!("Controller ready, viewport width {}", width);

        Ok(Self {
            state_manager,
            session,
            exporter,
            gate,
            metrics,
        })
    }

    pub fn state(&self) -> &StateManager {
        &self.state_manager
    }

    pub fn snapshot(&self) -> AppState {
        self.state_manager.snapshot()
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn session(&self) -> &Arc<Mutex<RenderSession<StyledQrRenderer>>> {
        &self.session
    }

    /// Apply an edit and resynchronize the render session
    fn mutate<F>(&self, edit: F) -> Vec<StateChange>
    where
        F: FnOnce(&StateManager) -> Vec<StateChange>,
    {
        let changes = edit(&self.state_manager);
        self.metrics.record_state_broadcasts(changes.len());

        for change in &changes {
            match change {
                StateChange::ConfigurationChanged { .. } => self.rebuild(),
                StateChange::ViewportChanged { width, .. } => {
                    if self.session.lock().unwrap().resize(*width) {
                        self.metrics.record_rehome();
                    }
                }
                _ => {}
            }
        }
        changes
    }

    fn rebuild(&self) {
        let config = self.state_manager.read(|s| s.config.clone());
        let mut session = self.session.lock().unwrap();
        match session.apply_config(&config) {
            Ok(()) => self.metrics.record_render(),
            Err(e) => {
                self.metrics.record_render_failure();
                tracing::error!("Failed to render configuration: {}", e);
            }
        }
    }

    // Configuration edits

    pub fn set_url(&self, url: impl Into<String>) {
        let url = url.into();
        self.mutate(|s| s.set_url(url));
    }

    pub fn reset_url(&self) {
        self.mutate(|s| s.reset_url());
    }

    pub fn set_foreground(&self, color: Color) {
        self.mutate(|s| s.set_foreground(color));
    }

    pub fn set_background(&self, color: Color) {
        self.mutate(|s| s.set_background(color));
    }

    pub fn set_level(&self, level: ErrorCorrectionLevel) {
        self.mutate(|s| s.set_level(level));
    }

    pub fn set_include_margin(&self, include: bool) {
        self.mutate(|s| s.set_include_margin(include));
    }

    pub fn set_dot_type(&self, dot_type: DotType) {
        self.mutate(|s| s.set_dot_type(dot_type));
    }

    pub fn set_corner_square_type(&self, corner: Option<CornerSquareType>) {
        self.mutate(|s| s.set_corner_square_type(corner));
    }

    pub fn set_corner_dot_type(&self, corner: Option<CornerDotType>) {
        self.mutate(|s| s.set_corner_dot_type(corner));
    }

    /// Replace the whole configuration in one step
    pub fn replace_config(&self, config: QrConfig) {
        self.mutate(|s| s.replace_config(config));
    }

    /// Apply a colour/style preset by id
    pub fn apply_color_preset(&self, id: &str) -> Result<()> {
        let Some(preset) = find_color_preset(id) else {
            bail!("Unknown color preset: {}", id);
        };
        self.mutate(|s| s.apply_color_preset(preset));
        tracing::debug!("Applied color preset {}", preset.name);
        Ok(())
    }

    // Logo

    pub fn select_logo_preset(&self, id: &str) -> Result<()> {
        if find_logo_preset(id).is_none() {
            bail!("Unknown logo preset: {}", id);
        }
        self.mutate(|s| s.select_logo_preset(id));
        Ok(())
    }

    pub fn upload_logo(&self, image: UploadedImage) {
        self.mutate(|s| s.upload_logo(image));
    }

    /// Read an image file and use it as the logo
    pub fn upload_logo_file(&self, path: &Utf8Path) -> Result<()> {
        let image = UploadedImage::from_path(path)?;
        tracing::info!("Uploaded logo {} ({}, {} bytes)", path, image.mime, image.bytes.len());
        self.upload_logo(image);
        Ok(())
    }

    pub fn remove_logo(&self) {
        self.mutate(|s| s.remove_logo());
    }

    // Viewport

    pub fn set_viewport_width(&self, width: u32) {
        self.mutate(|s| s.set_viewport_width(width));
    }

    // Download gate

    /// Whether the download controls are enabled
    pub fn can_download(&self) -> bool {
        self.state_manager.read(|s| s.can_download())
    }

    /// Open the registration form for `format`. Returns false when
    /// downloads are unavailable (no URL yet, or an export is running).
    pub fn request_download(&self, format: ExportFormat) -> bool {
        if !self.can_download() {
            tracing::debug!("Download as {} unavailable", format);
            return false;
        }
        self.gate.request_download(format);
        true
    }

    /// Close the registration form
    pub fn cancel_download(&self) {
        self.gate.cancel();
    }

    pub fn set_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.state_manager.update(|s| s.gate.form.name = name);
    }

    /// Edit the phone field. Input outside `+` and digits is dropped.
    pub fn set_phone(&self, phone: &str) -> bool {
        let mut accepted = false;
        self.state_manager
            .update(|s| accepted = s.gate.form.set_phone(phone));
        if !accepted {
            tracing::debug!("Ignored phone input {:?}", phone);
        }
        accepted
    }

    pub fn set_email(&self, email: impl Into<String>) {
        let email = email.into();
        self.state_manager.update(|s| s.gate.form.email = email);
    }

    pub async fn submit_registration(&self) -> SubmitOutcome {
        self.gate.submit().await
    }

    // Clipboard

    pub async fn copy_to_clipboard(&self) -> Result<bool, ExportError> {
        self.exporter.copy_to_clipboard().await
    }

    /// Copy of the drawing currently on screen
    pub fn rendered_drawing(&self) -> Option<Drawing> {
        self.session.lock().unwrap().visible_drawing().cloned()
    }

    // Catalog icons in the current foreground

    fn foreground(&self) -> Color {
        self.state_manager.read(|s| s.config.fg_color)
    }

    pub fn logo_preset_icons(&self) -> Vec<CatalogIcon> {
        let fg = self.foreground();
        LOGO_PRESETS
            .iter()
            .map(|preset| CatalogIcon {
                id: preset.id,
                name: preset.name,
                data_url: preset.template.to_data_url(fg),
            })
            .collect()
    }

    pub fn dot_type_icons(&self) -> Vec<CatalogIcon> {
        let fg = self.foreground();
        DOT_TYPE_OPTIONS
            .iter()
            .map(|option| CatalogIcon {
                id: option.id,
                name: option.name,
                data_url: option.icon_data_url(fg),
            })
            .collect()
    }

    pub fn corner_square_icons(&self) -> Vec<CatalogIcon> {
        let fg = self.foreground();
        CORNER_SQUARE_OPTIONS
            .iter()
            .map(|option| CatalogIcon {
                id: option.id,
                name: option.name,
                data_url: option.icon_data_url(fg),
            })
            .collect()
    }

    pub fn corner_dot_icons(&self) -> Vec<CatalogIcon> {
        let fg = self.foreground();
        CORNER_DOT_OPTIONS
            .iter()
            .map(|option| CatalogIcon {
                id: option.id,
                name: option.name,
                data_url: option.icon_data_url(fg),
            })
            .collect()
    }
}
