//! Integration tests for the export pipeline
//!
//! These tests verify:
//! - SVG downloads re-parse with 250x250 dimensions and the live content
//! - PNG downloads decode to 1024x1024 with an opaque background
//! - Export and copy are no-ops without a drawing
//! - The in-flight flags are cleared after every export

use makemyqrcode::Metrics;
use makemyqrcode::models::{Color, ExportFormat, QrConfig};
use makemyqrcode::services::{
    DrawingSource, ExportPipeline, MemoryClipboard, MemoryFileSink, RenderSession,
    StyledQrRenderer,
};
use makemyqrcode::StateManager;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct Fixture {
    state: StateManager,
    session: Arc<Mutex<RenderSession<StyledQrRenderer>>>,
    files: Arc<MemoryFileSink>,
    clipboard: Arc<MemoryClipboard>,
    pipeline: ExportPipeline,
}

fn fixture(config: Option<QrConfig>) -> Fixture {
    let state = StateManager::new();
    let session = Arc::new(Mutex::new(RenderSession::new(1280)));
    if let Some(config) = config {
        state.replace_config(config.clone());
        session.lock().unwrap().apply_config(&config).unwrap();
    }

    let files = Arc::new(MemoryFileSink::new());
    let clipboard = Arc::new(MemoryClipboard::new());
    let pipeline = ExportPipeline::new(
        state.clone(),
        session.clone(),
        files.clone(),
        clipboard.clone(),
        Duration::from_millis(20),
        Arc::new(Metrics::new()),
    );

    Fixture {
        state,
        session,
        files,
        clipboard,
        pipeline,
    }
}

fn config_with_background(bg: &str) -> QrConfig {
    QrConfig {
        url: "https://makemyqrcode.com".to_string(),
        bg_color: Color::parse(bg).unwrap(),
        ..QrConfig::default()
    }
}

#[tokio::test]
async fn test_svg_export_reparses_at_250() {
    let fx = fixture(Some(config_with_background("#ffffff")));
    let live = fx.session.current_drawing().unwrap();

    let exported = fx.pipeline.export(ExportFormat::Svg).await.unwrap().unwrap();
    assert_eq!(exported.file_name, "makemyqrcode-com.svg");

    let files = fx.files.files();
    assert_eq!(files.len(), 1);
    let text = String::from_utf8(files[0].1.clone()).unwrap();

    let tree = resvg::usvg::Tree::from_str(&text, &resvg::usvg::Options::default()).unwrap();
    assert_eq!(tree.size().width(), 250.0);
    assert_eq!(tree.size().height(), 250.0);

    // Same content as the live drawing, only the root size differs
    assert!(text.ends_with(&format!("{}</svg>", live.body())));
    assert_eq!(live.attribute("width"), Some("1024"));
}

#[tokio::test]
async fn test_png_export_is_opaque_1024() {
    let fx = fixture(Some(config_with_background("#fafafa")));

    let exported = fx.pipeline.export(ExportFormat::Png).await.unwrap().unwrap();
    assert_eq!(exported.file_name, "makemyqrcode-com.png");

    let files = fx.files.files();
    let decoded = image::load_from_memory_with_format(&files[0].1, image::ImageFormat::Png)
        .unwrap()
        .to_rgba8();

    assert_eq!(decoded.dimensions(), (1024, 1024));
    assert!(decoded.pixels().all(|p| p.0[3] == 255));
    assert_eq!(decoded.get_pixel(2, 2).0, [0xfa, 0xfa, 0xfa, 255]);
    assert!(fx.state.read(|s| s.downloading.is_none()));
}

#[tokio::test]
async fn test_transparent_background_exports_white() {
    let fx = fixture(Some(config_with_background("#00000000")));

    fx.pipeline.export(ExportFormat::Png).await.unwrap();

    let files = fx.files.files();
    let decoded = image::load_from_memory(&files[0].1).unwrap().to_rgba8();
    assert!(decoded.pixels().all(|p| p.0[3] == 255));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
}

#[tokio::test]
async fn test_no_drawing_is_silent_noop() {
    let fx = fixture(None);

    assert_eq!(fx.pipeline.export(ExportFormat::Svg).await.unwrap(), None);
    assert_eq!(fx.pipeline.export(ExportFormat::Png).await.unwrap(), None);
    assert!(!fx.pipeline.copy_to_clipboard().await.unwrap());

    assert!(fx.files.files().is_empty());
    assert!(fx.clipboard.images().is_empty());
    let state = fx.state.snapshot();
    assert!(state.downloading.is_none());
    assert!(!state.copying);
}

#[tokio::test]
async fn test_clipboard_receives_same_raster() {
    let fx = fixture(Some(config_with_background("#ffffff")));

    assert!(fx.pipeline.copy_to_clipboard().await.unwrap());
    fx.pipeline.export(ExportFormat::Png).await.unwrap();

    let images = fx.clipboard.images();
    assert_eq!(images.len(), 1);
    assert_eq!((images[0].width, images[0].height), (1024, 1024));
    assert_eq!(images[0].png, fx.files.files()[0].1);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!fx.state.read(|s| s.copying));
}

#[tokio::test]
async fn test_unavailable_clipboard_clears_flag() {
    let state = StateManager::new();
    let session = Arc::new(Mutex::new(RenderSession::<StyledQrRenderer>::new(1280)));
    session.lock().unwrap().apply_config(&QrConfig::default()).unwrap();

    let pipeline = ExportPipeline::new(
        state.clone(),
        session,
        Arc::new(MemoryFileSink::new()),
        Arc::new(MemoryClipboard::unavailable()),
        Duration::from_secs(2),
        Arc::new(Metrics::new()),
    );

    assert!(pipeline.copy_to_clipboard().await.is_err());
    assert!(!state.read(|s| s.copying));
}
