//! Integration tests for the render configuration builder and render session
//!
//! These tests verify:
//! - The parameter set built for a plain configuration
//! - Margin selection across every other configuration combination
//! - Preset logos following the foreground colour
//! - Re-homing the drawing across the viewport breakpoint

use makemyqrcode::models::{
    Color, CornerDotType, CornerSquareType, DotType, ErrorCorrectionLevel, LogoSource, QrConfig,
    ViewportKind,
};
use makemyqrcode::services::render::{CANVAS_SIZE, build_render_options};
use makemyqrcode::services::{RenderSession, StyledQrRenderer, resolve_logo};
use proptest::prelude::*;

fn plain_config() -> QrConfig {
    QrConfig {
        url: "https://example.com".to_string(),
        fg_color: Color::parse("#000000").unwrap(),
        bg_color: Color::parse("#FFFFFF").unwrap(),
        level: ErrorCorrectionLevel::H,
        include_margin: true,
        dot_type: DotType::Square,
        ..QrConfig::default()
    }
}

#[test]
fn test_plain_configuration_parameters() {
    let options = build_render_options(&plain_config());

    assert_eq!(options.width, CANVAS_SIZE);
    assert_eq!(options.height, CANVAS_SIZE);
    assert_eq!(options.data, "https://example.com");
    assert_eq!(options.margin, 40);
    assert_eq!(options.qr_options.error_correction_level, ErrorCorrectionLevel::H);
    assert_eq!(options.dots_options.color, Color::BLACK);
    assert_eq!(options.dots_options.dot_type, DotType::Square);
    assert_eq!(options.background_options.color, Color::WHITE);
    assert!(options.image.is_none());

    let json = serde_json::to_value(&options).unwrap();
    assert_eq!(json["margin"], 40);
    assert_eq!(json["dotsOptions"]["color"], "#000000");
    assert!(json.get("image").is_none());
}

#[test]
fn test_drawing_matches_configuration() {
    let mut session = RenderSession::<StyledQrRenderer>::new(1280);
    session.apply_config(&plain_config()).unwrap();

    let svg = session.visible_drawing().unwrap().serialize();
    let tree = resvg::usvg::Tree::from_str(&svg, &resvg::usvg::Options::default()).unwrap();
    assert_eq!(tree.size().width(), 1024.0);
    assert!(!svg.contains("<image"));
}

#[test]
fn test_foreground_recolours_preset_logo_only() {
    let mut config = plain_config();
    config.logo = LogoSource::Preset("instagram".to_string());

    let before = resolve_logo(&config).unwrap();
    assert!(before.href().contains("%23000000"));

    let mut recoloured = config.clone();
    recoloured.fg_color = Color::parse("#e1306c").unwrap();
    let after = resolve_logo(&recoloured).unwrap();

    assert!(after.href().contains("%23e1306c"));
    assert!(!after.href().contains("%23000000"));
    assert_eq!(recoloured.logo, config.logo);
    assert_eq!(recoloured.url, config.url);
}

#[test]
fn test_uploaded_logo_embedded() {
    let mut session = RenderSession::<StyledQrRenderer>::new(1280);
    let config = QrConfig {
        logo: LogoSource::Uploaded(makemyqrcode::models::UploadedImage::new(
            "image/png",
            vec![1, 2, 3],
        )),
        ..plain_config()
    };
    session.apply_config(&config).unwrap();

    let body = session.visible_drawing().unwrap().body().to_string();
    assert!(body.contains("data:image/png;base64,AQID"));
}

#[test]
fn test_rehome_across_breakpoint() {
    let mut session = RenderSession::<StyledQrRenderer>::new(1280);
    session.apply_config(&plain_config()).unwrap();
    let drawing = session.visible_drawing().cloned();

    assert!(session.resize(1023));
    assert_eq!(session.viewport(), ViewportKind::Mobile);
    assert!(!session.target(ViewportKind::Desktop).has_drawing());
    assert_eq!(session.target(ViewportKind::Mobile).drawing().cloned(), drawing);

    assert!(session.resize(1024));
    assert!(session.target(ViewportKind::Desktop).has_drawing());
    assert!(!session.target(ViewportKind::Mobile).has_drawing());
}

#[test]
fn test_rebuild_after_resize_lands_in_current_target() {
    let mut session = RenderSession::<StyledQrRenderer>::new(390);
    session.apply_config(&plain_config()).unwrap();
    session.resize(1440);

    let mut config = plain_config();
    config.dot_type = DotType::Dots;
    session.apply_config(&config).unwrap();

    assert!(session.target(ViewportKind::Desktop).has_drawing());
    assert!(!session.target(ViewportKind::Mobile).has_drawing());
}

fn any_level() -> impl Strategy<Value = ErrorCorrectionLevel> {
    prop::sample::select(vec![
        ErrorCorrectionLevel::L,
        ErrorCorrectionLevel::M,
        ErrorCorrectionLevel::Q,
        ErrorCorrectionLevel::H,
    ])
}

fn any_dot_type() -> impl Strategy<Value = DotType> {
    prop::sample::select(vec![
        DotType::Square,
        DotType::Rounded,
        DotType::Dots,
        DotType::Classy,
        DotType::ClassyRounded,
        DotType::ExtraRounded,
    ])
}

fn any_corner_square() -> impl Strategy<Value = Option<CornerSquareType>> {
    prop::sample::select(vec![
        None,
        Some(CornerSquareType::Square),
        Some(CornerSquareType::Dot),
        Some(CornerSquareType::ExtraRounded),
        Some(CornerSquareType::Classy),
    ])
}

fn any_corner_dot() -> impl Strategy<Value = Option<CornerDotType>> {
    prop::sample::select(vec![None, Some(CornerDotType::Square), Some(CornerDotType::Dot)])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn proptest_margin_depends_only_on_flag(
        include_margin in any::<bool>(),
        url in "[a-z]{0,40}",
        rgb in any::<(u8, u8, u8)>(),
        level in any_level(),
        dot_type in any_dot_type(),
        corner_square_type in any_corner_square(),
        corner_dot_type in any_corner_dot(),
        with_logo in any::<bool>(),
    ) {
        let config = QrConfig {
            url,
            fg_color: Color::rgb(rgb.0, rgb.1, rgb.2),
            level,
            include_margin,
            dot_type,
            corner_square_type,
            corner_dot_type,
            logo: if with_logo { LogoSource::Preset("globe".into()) } else { LogoSource::None },
            ..QrConfig::default()
        };

        let options = build_render_options(&config);
        prop_assert_eq!(options.margin, if include_margin { 40 } else { 10 });
        prop_assert_eq!(options.image.is_some(), with_logo);
    }
}
