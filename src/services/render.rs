//! Render configuration builder.
//!
//! Maps a [`QrConfig`] onto the parameter set consumed by a
//! [`QrRenderer`](super::renderer::QrRenderer). The parameter set mirrors
//! the usual "styled QR" option object (camelCase when serialized) so it can
//! be logged or diffed as JSON.

use serde::Serialize;

use super::logo::resolve_logo;
use crate::models::catalog::PLACEHOLDER_URL;
use crate::models::{
    Color, CornerDotType, CornerSquareType, DotType, ErrorCorrectionLevel, QrConfig,
};

/// Logical canvas edge in drawing units, independent of display size
pub const CANVAS_SIZE: u32 = 1024;

/// Quiet zone when the margin is enabled
pub const MARGIN_WIDE: u32 = 40;

/// Quiet zone when the margin is disabled
pub const MARGIN_NARROW: u32 = 10;

/// Fraction of the symbol area given to an embedded logo
pub const LOGO_IMAGE_SIZE: f32 = 0.28;

/// Inset between the cleared logo area and the logo itself
pub const LOGO_MARGIN: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawType {
    Svg,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrOptions {
    pub error_correction_level: ErrorCorrectionLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DotsOptions {
    pub color: Color,
    #[serde(rename = "type")]
    pub dot_type: DotType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackgroundOptions {
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CornersSquareOptions {
    pub color: Color,
    #[serde(rename = "type")]
    pub corner_type: CornerSquareType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CornersDotOptions {
    pub color: Color,
    #[serde(rename = "type")]
    pub corner_type: CornerDotType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    pub hide_background_dots: bool,
    pub image_size: f32,
    pub margin: u32,
}

/// Parameters for one rendered drawing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "type")]
    pub draw_type: DrawType,
    pub data: String,
    pub margin: u32,
    pub qr_options: QrOptions,
    pub dots_options: DotsOptions,
    pub background_options: BackgroundOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub image_options: ImageOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corners_square_options: Option<CornersSquareOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corners_dot_options: Option<CornersDotOptions>,
}

pub fn margin_for(include_margin: bool) -> u32 {
    if include_margin {
        MARGIN_WIDE
    } else {
        MARGIN_NARROW
    }
}

/// Build renderer parameters for `config`.
///
/// An empty URL renders the placeholder destination so a symbol always
/// exists. Corner overlays are omitted when their shape is "none".
pub fn build_render_options(config: &QrConfig) -> RenderOptions {
    let data = if config.url.is_empty() {
        PLACEHOLDER_URL.to_string()
    } else {
        config.url.clone()
    };

    RenderOptions {
        width: CANVAS_SIZE,
        height: CANVAS_SIZE,
        draw_type: DrawType::Svg,
        data,
        margin: margin_for(config.include_margin),
        qr_options: QrOptions {
            error_correction_level: config.level,
        },
        dots_options: DotsOptions {
            color: config.fg_color,
            dot_type: config.dot_type,
        },
        background_options: BackgroundOptions {
            color: config.bg_color,
        },
        image: resolve_logo(config).map(|source| source.href().to_string()),
        image_options: ImageOptions {
            hide_background_dots: true,
            image_size: LOGO_IMAGE_SIZE,
            margin: LOGO_MARGIN,
        },
        corners_square_options: config.corner_square_type.map(|corner_type| {
            CornersSquareOptions {
                color: config.fg_color,
                corner_type,
            }
        }),
        corners_dot_options: config
            .corner_dot_type
            .map(|corner_type| CornersDotOptions {
                color: config.fg_color,
                corner_type,
            }),
    }
}
