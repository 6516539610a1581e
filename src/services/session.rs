// Render session
//
// Keeps one renderer in sync with the configuration and hosts its drawing in
// exactly one of two display targets (mobile or desktop), chosen by the
// current viewport width.

use std::sync::Mutex;

use super::drawing::Drawing;
use super::render::{CANVAS_SIZE, build_render_options};
use super::renderer::{QrRenderer, RenderError};
use crate::models::{Color, QrConfig, ViewportKind};

/// Presentation style put on the hosted drawing
pub const DISPLAY_STYLE: &str = "width: 100%; height: 100%; border-radius: 12px;";

/// Painted behind a fully transparent background on screen
pub const DISPLAY_FALLBACK_BACKGROUND: &str = "#ffffff";

/// A container that can hold one drawing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTarget {
    kind: ViewportKind,
    drawing: Option<Drawing>,
}

impl DisplayTarget {
    pub fn new(kind: ViewportKind) -> Self {
        Self {
            kind,
            drawing: None,
        }
    }

    pub fn kind(&self) -> ViewportKind {
        self.kind
    }

    pub fn attach(&mut self, drawing: Drawing) {
        self.drawing = Some(drawing);
    }

    pub fn clear(&mut self) {
        self.drawing = None;
    }

    pub fn take(&mut self) -> Option<Drawing> {
        self.drawing.take()
    }

    pub fn drawing(&self) -> Option<&Drawing> {
        self.drawing.as_ref()
    }

    pub fn has_drawing(&self) -> bool {
        self.drawing.is_some()
    }

    /// Size the drawing to its container with a fixed logical viewbox
    fn decorate(&mut self, background: Color) {
        if let Some(drawing) = self.drawing.as_mut() {
            let mut style = DISPLAY_STYLE.to_string();
            if background.is_transparent() {
                style.push_str(&format!(" background-color: {};", DISPLAY_FALLBACK_BACKGROUND));
            }
            drawing.set_attribute("style", style);
            drawing.set_attribute("viewBox", format!("0 0 {} {}", CANVAS_SIZE, CANVAS_SIZE));
        }
    }
}

/// Live renderer plus the two display targets
pub struct RenderSession<R: QrRenderer> {
    renderer: Option<R>,
    mobile: DisplayTarget,
    desktop: DisplayTarget,
    viewport: ViewportKind,
    background: Color,
}

impl<R: QrRenderer> RenderSession<R> {
    pub fn new(viewport_width: u32) -> Self {
        Self {
            renderer: None,
            mobile: DisplayTarget::new(ViewportKind::Mobile),
            desktop: DisplayTarget::new(ViewportKind::Desktop),
            viewport: ViewportKind::for_width(viewport_width),
            background: Color::WHITE,
        }
    }

    /// Rebuild from `config` and attach to the current target.
    ///
    /// On failure both targets are cleared so no stale drawing stays visible.
    pub fn apply_config(&mut self, config: &QrConfig) -> Result<(), RenderError> {
        let options = build_render_options(config);
        self.background = config.bg_color;

        let result = match self.renderer.take() {
            Some(mut renderer) => renderer.update(&options).map(|()| renderer),
            None => R::create(&options),
        };

        match result {
            Ok(renderer) => {
                self.renderer = Some(renderer);
                self.place();
                Ok(())
            }
            Err(e) => {
                self.mobile.clear();
                self.desktop.clear();
                Err(e)
            }
        }
    }

    /// Follow a viewport resize. Moves the existing drawing across the
    /// breakpoint without rebuilding it; returns true if it moved.
    pub fn resize(&mut self, viewport_width: u32) -> bool {
        let kind = ViewportKind::for_width(viewport_width);
        if kind == self.viewport {
            return false;
        }
        self.viewport = kind;

        let (from, to) = match kind {
            ViewportKind::Desktop => (&mut self.mobile, &mut self.desktop),
            ViewportKind::Mobile => (&mut self.desktop, &mut self.mobile),
        };
        to.clear();
        match from.take() {
            Some(drawing) => to.attach(drawing),
            None => {
                if let Some(renderer) = &self.renderer {
                    renderer.append(to);
                }
            }
        }
        to.decorate(self.background);

        tracing::debug!("Re-homed drawing to {:?} target", kind);
        true
    }

    fn place(&mut self) {
        let Some(renderer) = &self.renderer else {
            return;
        };
        let (active, other) = match self.viewport {
            ViewportKind::Desktop => (&mut self.desktop, &mut self.mobile),
            ViewportKind::Mobile => (&mut self.mobile, &mut self.desktop),
        };
        other.clear();
        active.clear();
        renderer.append(active);
        active.decorate(self.background);
    }

    pub fn viewport(&self) -> ViewportKind {
        self.viewport
    }

    pub fn target(&self, kind: ViewportKind) -> &DisplayTarget {
        match kind {
            ViewportKind::Mobile => &self.mobile,
            ViewportKind::Desktop => &self.desktop,
        }
    }

    /// Desktop target if it holds a drawing, else the mobile one
    pub fn visible_drawing(&self) -> Option<&Drawing> {
        self.desktop.drawing().or_else(|| self.mobile.drawing())
    }
}

/// Anything the export pipeline can read the visible drawing from
pub trait DrawingSource: Send + Sync {
    fn current_drawing(&self) -> Option<Drawing>;
}

impl<R: QrRenderer> DrawingSource for Mutex<RenderSession<R>> {
    fn current_drawing(&self) -> Option<Drawing> {
        self.lock().unwrap().visible_drawing().cloned()
    }
}
