//! Export pipeline.
//!
//! Reads the visible drawing and turns it into a downloadable file or a
//! clipboard image:
//!
//! - SVG: the drawing is cloned, given explicit 250x250 dimensions and
//!   serialized as text. No rasterization.
//! - PNG: the unscaled 1024x1024 drawing is serialized, parsed back with
//!   `usvg` and painted by `resvg` onto a 1024x1024 surface that was first
//!   filled with the configured background.
//! - Clipboard: same rasterization as PNG, handed to a [`ClipboardSink`].
//!
//! File and clipboard access go through the [`FileSink`] and
//! [`ClipboardSink`] capabilities so tests can substitute in-memory sinks.

use camino::{Utf8Path, Utf8PathBuf};
use resvg::{tiny_skia, usvg};
use std::borrow::Cow;
use std::fs;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;

use super::render::CANVAS_SIZE;
use super::session::DrawingSource;
use crate::metrics::Metrics;
use crate::models::{Color, ExportFormat};
use crate::state::StateManager;

/// Logical edge written on exported SVG files
pub const SVG_EXPORT_SIZE: &str = "250";

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to parse drawing: {0}")]
    Parse(#[from] usvg::Error),

    #[error("Failed to allocate {0}x{0} drawing surface")]
    Surface(u32),

    #[error("Failed to encode PNG: {0}")]
    Encode(String),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("Rasterization worker failed: {0}")]
    Worker(String),
}

/// Destination for downloaded files
#[cfg_attr(test, mockall::automock)]
pub trait FileSink: Send + Sync {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), SinkError>;
}

/// Destination for copied images
#[cfg_attr(test, mockall::automock)]
pub trait ClipboardSink: Send + Sync {
    fn set_image(&self, image: &RasterImage) -> Result<(), SinkError>;
}

/// Rasterized drawing: straight RGBA pixels plus the PNG encoding
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub png: Vec<u8>,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png", &self.png.len())
            .finish()
    }
}

/// A file handed to the [`FileSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub format: ExportFormat,
    pub file_name: String,
    pub size_bytes: usize,
}

/// Writes downloads into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: Utf8PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }
}

impl FileSink for DirectorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), SinkError> {
        let path = self.dir.join(file_name);
        let io_err = |source| SinkError::Io {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;
        fs::write(&path, bytes).map_err(io_err)?;

        tracing::info!("Wrote {} ({} bytes)", path, bytes.len());
        Ok(())
    }
}

/// Keeps downloads in memory
#[derive(Debug, Default)]
pub struct MemoryFileSink {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryFileSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files.lock().unwrap().clone()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl FileSink for MemoryFileSink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), SinkError> {
        self.files
            .lock()
            .unwrap()
            .push((file_name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Keeps copied images in memory. Can be made unavailable to exercise
/// failure handling.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    images: Mutex<Vec<RasterImage>>,
    unavailable: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            images: Mutex::default(),
            unavailable: true,
        }
    }

    pub fn images(&self) -> Vec<RasterImage> {
        self.images.lock().unwrap().clone()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_image(&self, image: &RasterImage) -> Result<(), SinkError> {
        if self.unavailable {
            return Err(SinkError::Clipboard("no clipboard in this session".into()));
        }
        self.images.lock().unwrap().push(image.clone());
        Ok(())
    }
}

/// The desktop clipboard
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_image(&self, image: &RasterImage) -> Result<(), SinkError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| SinkError::Clipboard(e.to_string()))?;
        clipboard
            .set_image(arboard::ImageData {
                width: image.width as usize,
                height: image.height as usize,
                bytes: Cow::Borrowed(&image.rgba),
            })
            .map_err(|e| SinkError::Clipboard(e.to_string()))
    }
}

/// Opaque backdrop for `background`, composited over white
fn backdrop(background: Color) -> tiny_skia::Color {
    let alpha = background.opacity();
    let mix = |channel: u8| (f32::from(channel) * alpha + 255.0 * (1.0 - alpha)).round() as u8;
    tiny_skia::Color::from_rgba8(mix(background.r), mix(background.g), mix(background.b), 255)
}

/// Paint `svg` onto a 1024x1024 surface filled with `background` first
pub fn rasterize(svg: &str, background: Color) -> Result<RasterImage, ExportError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &options)?;

    let mut pixmap =
        tiny_skia::Pixmap::new(CANVAS_SIZE, CANVAS_SIZE).ok_or(ExportError::Surface(CANVAS_SIZE))?;
    pixmap.fill(backdrop(background));

    let size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        CANVAS_SIZE as f32 / size.width(),
        CANVAS_SIZE as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let png = pixmap
        .encode_png()
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    let rgba = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let c = pixel.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    Ok(RasterImage {
        width: pixmap.width(),
        height: pixmap.height(),
        rgba,
        png,
    })
}

/// Turns the visible drawing into files and clipboard images
#[derive(Clone)]
pub struct ExportPipeline {
    state: StateManager,
    source: Arc<dyn DrawingSource>,
    files: Arc<dyn FileSink>,
    clipboard: Arc<dyn ClipboardSink>,
    copy_reset: Duration,
    metrics: Arc<Metrics>,
}

impl ExportPipeline {
    pub fn new(
        state: StateManager,
        source: Arc<dyn DrawingSource>,
        files: Arc<dyn FileSink>,
        clipboard: Arc<dyn ClipboardSink>,
        copy_reset: Duration,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            state,
            source,
            files,
            clipboard,
            copy_reset,
            metrics,
        }
    }

    /// Export the visible drawing as `format`.
    ///
    /// Returns `Ok(None)` without side effects when there is no drawing or
    /// another export is in flight. The `downloading` flag is set for the
    /// whole duration, rasterization included.
    pub async fn export(&self, format: ExportFormat) -> Result<Option<ExportedFile>, ExportError> {
        let Some(drawing) = self.source.current_drawing() else {
            tracing::warn!("Export as {} requested with no rendered drawing, ignoring", format);
            return Ok(None);
        };

        if !self.state.begin_export(format) {
            tracing::debug!("Export as {} ignored, another export is running", format);
            return Ok(None);
        }

        let background = self.state.read(|state| state.config.bg_color);
        let file_name = format.file_name();

        let result = match format {
            ExportFormat::Svg => {
                let mut clone = drawing;
                clone.set_attribute("width", SVG_EXPORT_SIZE);
                clone.set_attribute("height", SVG_EXPORT_SIZE);
                let text = clone.serialize();
                self.files
                    .save(&file_name, text.as_bytes())
                    .map(|()| text.len())
                    .map_err(ExportError::from)
            }
            ExportFormat::Png => match self.rasterize_off_thread(drawing.serialize(), background).await {
                Ok(raster) => self
                    .files
                    .save(&file_name, &raster.png)
                    .map(|()| raster.png.len())
                    .map_err(ExportError::from),
                Err(e) => Err(e),
            },
        };

        self.state.finish_export();

        match result {
            Ok(size_bytes) => {
                self.metrics.record_export(format);
                tracing::info!("Exported {} ({} bytes)", file_name, size_bytes);
                Ok(Some(ExportedFile {
                    format,
                    file_name,
                    size_bytes,
                }))
            }
            Err(e) => {
                self.metrics.record_export_failure();
                tracing::error!("Export of {} failed: {}", file_name, e);
                Err(e)
            }
        }
    }

    /// Copy the visible drawing to the clipboard as an image.
    ///
    /// Returns false when there was nothing to copy or a copy is already
    /// showing. On success the `copying` flag clears by itself after the
    /// reset delay; on failure it clears immediately.
    pub async fn copy_to_clipboard(&self) -> Result<bool, ExportError> {
        let Some(drawing) = self.source.current_drawing() else {
            tracing::warn!("Clipboard copy requested with no rendered drawing, ignoring");
            return Ok(false);
        };

        if !self.state.begin_copy() {
            tracing::debug!("Clipboard copy ignored, previous copy still pending");
            return Ok(false);
        }

        let background = self.state.read(|state| state.config.bg_color);
        let result = match self.rasterize_off_thread(drawing.serialize(), background).await {
            Ok(raster) => self.clipboard.set_image(&raster).map_err(ExportError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.metrics.record_clipboard_copy();
                tracing::info!("Copied drawing to clipboard");

                let state = self.state.clone();
                let delay = self.copy_reset;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    state.finish_copy();
                });
                Ok(true)
            }
            Err(e) => {
                self.metrics.record_clipboard_failure();
                tracing::error!("Clipboard copy failed: {}", e);
                self.state.finish_copy();
                Err(e)
            }
        }
    }

    async fn rasterize_off_thread(
        &self,
        svg: String,
        background: Color,
    ) -> Result<RasterImage, ExportError> {
        let started = Instant::now();
        let raster = tokio::task::spawn_blocking(move || rasterize(&svg, background))
            .await
            .map_err(|e| ExportError::Worker(e.to_string()))??;
        self.metrics.record_raster_time(started.elapsed());
        Ok(raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QrConfig;
    use crate::services::drawing::Drawing;
    use crate::services::renderer::{QrRenderer, StyledQrRenderer};
    use crate::services::session::RenderSession;

    struct Fixed(Option<Drawing>);

    impl DrawingSource for Fixed {
        fn current_drawing(&self) -> Option<Drawing> {
            self.0.clone()
        }
    }

    fn drawing() -> Drawing {
        let options = crate::services::render::build_render_options(&QrConfig::default());
        StyledQrRenderer::create(&options).unwrap().drawing().clone()
    }

    fn pipeline(
        source: Option<Drawing>,
        files: impl FileSink + 'static,
        clipboard: impl ClipboardSink + 'static,
    ) -> (ExportPipeline, StateManager) {
        let state = StateManager::new();
        let pipeline = ExportPipeline::new(
            state.clone(),
            Arc::new(Fixed(source)),
            Arc::new(files),
            Arc::new(clipboard),
            Duration::from_millis(10),
            Arc::new(Metrics::new()),
        );
        (pipeline, state)
    }

    #[test]
    fn test_backdrop_is_opaque() {
        let white = backdrop(Color::parse("#12345600").unwrap());
        assert_eq!(white, tiny_skia::Color::WHITE);

        let half = backdrop(Color::parse("#00000080").unwrap());
        assert_eq!(half.alpha(), 1.0);
    }

    #[test]
    fn test_rasterize_size_and_fill() {
        let raster = rasterize(&drawing().serialize(), Color::WHITE).unwrap();
        assert_eq!((raster.width, raster.height), (1024, 1024));
        assert_eq!(raster.rgba.len(), 1024 * 1024 * 4);
        // top-left corner sits in the quiet zone
        assert_eq!(&raster.rgba[..4], &[255, 255, 255, 255]);
        assert!(raster.png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[tokio::test]
    async fn test_svg_export_sets_dimensions() {
        let mut files = MockFileSink::new();
        files
            .expect_save()
            .withf(|name, bytes| {
                let text = std::str::from_utf8(bytes).unwrap();
                name.to_string() == "makemyqrcode-com.svg"
                    && text.contains(r#"width="250""#)
                    && text.contains(r#"height="250""#)
                    && text.contains(r#"viewBox="0 0 1024 1024""#)
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let (pipeline, state) = pipeline(Some(drawing()), files, MockClipboardSink::new());
        let exported = pipeline.export(ExportFormat::Svg).await.unwrap().unwrap();

        assert_eq!(exported.file_name, "makemyqrcode-com.svg");
        assert!(state.read(|s| s.downloading.is_none()));
    }

    #[tokio::test]
    async fn test_export_without_drawing_is_noop() {
        let mut files = MockFileSink::new();
        files.expect_save().never();

        let (pipeline, state) = pipeline(None, files, MockClipboardSink::new());
        assert_eq!(pipeline.export(ExportFormat::Png).await.unwrap(), None);
        assert!(state.read(|s| s.downloading.is_none()));
    }

    #[tokio::test]
    async fn test_sink_failure_clears_flag() {
        let mut files = MockFileSink::new();
        files.expect_save().returning(|_, _| {
            Err(SinkError::Io {
                path: "out/makemyqrcode-com.png".into(),
                source: std::io::Error::other("disk full"),
            })
        });

        let (pipeline, state) = pipeline(Some(drawing()), files, MockClipboardSink::new());
        let result = pipeline.export(ExportFormat::Png).await;

        assert!(matches!(result, Err(ExportError::Sink(SinkError::Io { .. }))));
        assert!(state.read(|s| s.downloading.is_none()));
    }

    #[tokio::test]
    async fn test_clipboard_failure_clears_flag() {
        let mut clipboard = MockClipboardSink::new();
        clipboard
            .expect_set_image()
            .times(1)
            .returning(|_| Err(SinkError::Clipboard("denied".into())));

        let (pipeline, state) = pipeline(Some(drawing()), MemoryFileSink::new(), clipboard);
        assert!(pipeline.copy_to_clipboard().await.is_err());
        assert!(!state.read(|s| s.copying));
    }

    #[tokio::test]
    async fn test_clipboard_flag_resets_after_delay() {
        let (pipeline, state) = pipeline(Some(drawing()), MemoryFileSink::new(), MemoryClipboard::new());

        assert!(pipeline.copy_to_clipboard().await.unwrap());
        assert!(state.read(|s| s.copying));

        // A second copy while the confirmation shows is ignored
        assert!(!pipeline.copy_to_clipboard().await.unwrap());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!state.read(|s| s.copying));
    }

    #[test]
    fn test_session_is_a_drawing_source() {
        let session = Mutex::new(RenderSession::<StyledQrRenderer>::new(1280));
        assert!(session.current_drawing().is_none());

        session.lock().unwrap().apply_config(&QrConfig::default()).unwrap();
        assert!(session.current_drawing().is_some());
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = Utf8PathBuf::try_from(dir.path().join("downloads")).unwrap();
        let sink = DirectorySink::new(out.clone());

        sink.save("makemyqrcode-com.svg", b"<svg/>").unwrap();
        assert_eq!(fs::read(out.join("makemyqrcode-com.svg")).unwrap(), b"<svg/>");
    }
}
