//! Services module - rendering, export and registration.
//!
//! Everything here is framework-agnostic: no window system, no event loop.
//! The [`ui`](crate::ui) layer wires these together behind
//! [`AppController`](crate::ui::AppController).
//!
//! # Components
//!
//! - [`resolve_logo`]: picks the image embedded in the symbol, recolouring
//!   preset icons to the current foreground.
//! - [`build_render_options`]: maps a [`QrConfig`](crate::models::QrConfig)
//!   onto renderer parameters (canvas, margin, dot/corner styling, logo).
//! - [`StyledQrRenderer`]: the [`QrRenderer`] that encodes the payload with
//!   the `qrcode` crate and draws styled modules into a [`Drawing`].
//! - [`RenderSession`]: keeps the renderer in sync with the configuration and
//!   hosts its drawing in the display target matching the viewport.
//! - [`ExportPipeline`]: SVG/PNG downloads and clipboard copies through
//!   injected [`FileSink`] and [`ClipboardSink`] capabilities.
//! - [`HttpRegistrationClient`]: POSTs the registration form.
//! - [`GatedDownloadFlow`]: holds a requested download until registration
//!   succeeds.
//!
//! # Usage Example
//!
//! ```ignore
//! use makemyqrcode::models::QrConfig;
//! use makemyqrcode::services::{RenderSession, StyledQrRenderer};
//!
//! let mut session = RenderSession::<StyledQrRenderer>::new(1280);
//! session.apply_config(&QrConfig {
//!     url: "https://example.com".into(),
//!     ..QrConfig::default()
//! })?;
//! let svg = session.visible_drawing().map(|d| d.serialize());
//! ```

pub mod drawing;
pub mod export;
pub mod gate;
pub mod logo;
pub mod registration;
pub mod render;
pub mod renderer;
pub mod session;

pub use drawing::Drawing;
pub use export::{
    ClipboardSink, DirectorySink, ExportError, ExportPipeline, ExportedFile, FileSink,
    MemoryClipboard, MemoryFileSink, RasterImage, SinkError, SystemClipboard, rasterize,
};
pub use gate::{GatedDownloadFlow, SubmitOutcome};
pub use logo::{ImageSource, resolve_logo};
pub use registration::{
    HttpRegistrationClient, RegistrationClient, RegistrationError, RegistrationReceipt,
};
pub use render::{RenderOptions, build_render_options};
pub use renderer::{QrRenderer, RenderError, StyledQrRenderer};
pub use session::{DisplayTarget, DrawingSource, RenderSession};
