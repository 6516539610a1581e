// Static preset and shape catalogs.
//
// Every icon is a small 24x24 SVG whose colour is the `{fgColor}`
// placeholder, filled in with the current foreground colour on demand.

use super::qr_config::{Color, CornerDotType, CornerSquareType, DotType, QrShape};

/// Placeholder substituted with the foreground colour in icon templates
pub const COLOR_PLACEHOLDER: &str = "{fgColor}";

/// Destination used for rendering while the user has not entered one
pub const PLACEHOLDER_URL: &str = "https://example.com";

/// Parameterised SVG icon markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SvgTemplate(pub &'static str);

impl SvgTemplate {
    /// Substitute every placeholder occurrence with `fg`, keeping its
    /// alpha as `#rrggbbaa` when not opaque
    pub fn fill(&self, fg: Color) -> String {
        self.0.replace(COLOR_PLACEHOLDER, &fg.to_string())
    }

    /// Filled markup as a percent-encoded `data:image/svg+xml` URL
    pub fn to_data_url(&self, fg: Color) -> String {
        svg_data_url(&self.fill(fg))
    }
}

/// Wrap inline SVG markup in a self-contained data URL
pub fn svg_data_url(svg: &str) -> String {
    format!("data:image/svg+xml,{}", urlencoding::encode(svg))
}

/// Body style a colour preset selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetStyle {
    Squares,
    Dots,
}

impl PresetStyle {
    pub fn dot_type(&self) -> DotType {
        match self {
            Self::Squares => DotType::Square,
            Self::Dots => DotType::Dots,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub fg: Color,
    pub bg: Color,
    pub style: PresetStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub template: SvgTemplate,
}

/// A selectable shape with its preview icon.
///
/// Corner catalogs use `Option<T>` values, where `None` is the "no overlay"
/// entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeOption<T: 'static> {
    pub id: &'static str,
    pub name: &'static str,
    pub value: T,
    pub template: SvgTemplate,
}

impl<T> ShapeOption<T> {
    pub fn icon_data_url(&self, fg: Color) -> String {
        self.template.to_data_url(fg)
    }
}

pub fn find_color_preset(id: &str) -> Option<&'static ColorPreset> {
    COLOR_PRESETS.iter().find(|preset| preset.id == id)
}

pub fn find_logo_preset(id: &str) -> Option<&'static LogoPreset> {
    LOGO_PRESETS.iter().find(|preset| preset.id == id)
}

pub static COLOR_PRESETS: [ColorPreset; 8] = [
    ColorPreset {
        id: "black-white",
        name: "Black & White",
        fg: Color::rgb(0x00, 0x00, 0x00),
        bg: Color::rgb(0xff, 0xff, 0xff),
        style: PresetStyle::Squares,
    },
    ColorPreset {
        id: "grey-green",
        name: "Grey & Vibrant Green",
        fg: Color::rgb(0x4b, 0x55, 0x63),
        bg: Color::rgb(0xbe, 0xf2, 0x64),
        style: PresetStyle::Dots,
    },
    ColorPreset {
        id: "black-orange",
        name: "Black & Orange",
        fg: Color::rgb(0x00, 0x00, 0x00),
        bg: Color::rgb(0xf5, 0x9e, 0x0b),
        style: PresetStyle::Squares,
    },
    ColorPreset {
        id: "blue-orange",
        name: "Blue & Orange",
        fg: Color::rgb(0x3b, 0x82, 0xf6),
        bg: Color::rgb(0xf9, 0x73, 0x16),
        style: PresetStyle::Dots,
    },
    ColorPreset {
        id: "coral-teal",
        name: "Coral & Teal",
        fg: Color::rgb(0xfb, 0x71, 0x85),
        bg: Color::rgb(0x2d, 0xd4, 0xbf),
        style: PresetStyle::Squares,
    },
    ColorPreset {
        id: "blue-red",
        name: "Blue & Red",
        fg: Color::rgb(0x25, 0x63, 0xeb),
        bg: Color::rgb(0xef, 0x44, 0x44),
        style: PresetStyle::Dots,
    },
    ColorPreset {
        id: "black-yellow",
        name: "Black & Yellow",
        fg: Color::rgb(0x1f, 0x29, 0x37),
        bg: Color::rgb(0xfa, 0xcc, 0x15),
        style: PresetStyle::Squares,
    },
    ColorPreset {
        id: "violet-dahlia",
        name: "Ultra Violet & Blooming Dahlia",
        fg: Color::rgb(0x7c, 0x3a, 0xed),
        bg: Color::rgb(0xfd, 0xa4, 0xaf),
        style: PresetStyle::Dots,
    },
];

pub static LOGO_PRESETS: [LogoPreset; 8] = [
    LogoPreset {
        id: "globe",
        name: "Website",
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="{fgColor}" stroke-width="2"><circle cx="12" cy="12" r="10"/><path d="M2 12h20M12 2a15.3 15.3 0 0 1 4 10 15.3 15.3 0 0 1-4 10 15.3 15.3 0 0 1-4-10 15.3 15.3 0 0 1 4-10z"/></svg>"#,
        ),
    },
    LogoPreset {
        id: "facebook",
        name: "Facebook",
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><path d="M24 12.073c0-6.627-5.373-12-12-12s-12 5.373-12 12c0 5.99 4.388 10.954 10.125 11.854v-8.385H7.078v-3.47h3.047V9.43c0-3.007 1.792-4.669 4.533-4.669 1.312 0 2.686.235 2.686.235v2.953H15.83c-1.491 0-1.956.925-1.956 1.874v2.25h3.328l-.532 3.47h-2.796v8.385C19.612 23.027 24 18.062 24 12.073z"/></svg>"#,
        ),
    },
    LogoPreset {
        id: "instagram",
        name: "Instagram",
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="{fgColor}" stroke-width="2"><rect x="2" y="2" width="20" height="20" rx="5"/><path d="M16 11.37A4 4 0 1 1 12.63 8 4 4 0 0 1 16 11.37z"/><circle cx="17.5" cy="6.5" r="1"/></svg>"#,
        ),
    },
    LogoPreset {
        id: "twitter",
        name: "X / Twitter",
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><path d="M18.244 2.25h3.308l-7.227 8.26 8.502 11.24H16.17l-5.214-6.817L4.99 21.75H1.68l7.73-8.835L1.254 2.25H8.08l4.713 6.231zm-1.161 17.52h1.833L7.084 4.126H5.117z"/></svg>"#,
        ),
    },
    LogoPreset {
        id: "linkedin",
        name: "LinkedIn",
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><path d="M20.447 20.452h-3.554v-5.569c0-1.328-.027-3.037-1.852-3.037-1.853 0-2.136 1.445-2.136 2.939v5.667H9.351V9h3.414v1.561h.046c.477-.9 1.637-1.85 3.37-1.85 3.601 0 4.267 2.37 4.267 5.455v6.286zM5.337 7.433c-1.144 0-2.063-.926-2.063-2.065 0-1.138.92-2.063 2.063-2.063 1.14 0 2.064.925 2.064 2.063 0 1.139-.925 2.065-2.064 2.065zm1.782 13.019H3.555V9h3.564v11.452zM22.225 0H1.771C.792 0 0 .774 0 1.729v20.542C0 23.227.792 24 1.771 24h20.451C23.2 24 24 23.227 24 22.271V1.729C24 .774 23.2 0 22.222 0h.003z"/></svg>"#,
        ),
    },
    LogoPreset {
        id: "whatsapp",
        name: "WhatsApp",
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><path d="M17.472 14.382c-.297-.149-1.758-.867-2.03-.967-.273-.099-.471-.148-.67.15-.197.297-.767.966-.94 1.164-.173.199-.347.223-.644.075-.297-.15-1.255-.463-2.39-1.475-.883-.788-1.48-1.761-1.653-2.059-.173-.297-.018-.458.13-.606.134-.133.298-.347.446-.52.149-.174.198-.298.298-.497.099-.198.05-.371-.025-.52-.075-.149-.669-1.612-.916-2.207-.242-.579-.487-.5-.669-.51-.173-.008-.371-.01-.57-.01-.198 0-.52.074-.792.372-.272.297-1.04 1.016-1.04 2.479 0 1.462 1.065 2.875 1.213 3.074.149.198 2.096 3.2 5.077 4.487.709.306 1.262.489 1.694.625.712.227 1.36.195 1.871.118.571-.085 1.758-.719 2.006-1.413.248-.694.248-1.289.173-1.413-.074-.124-.272-.198-.57-.347m-5.421 7.403h-.004a9.87 9.87 0 01-5.031-1.378l-.361-.214-3.741.982.998-3.648-.235-.374a9.86 9.86 0 01-1.51-5.26c.001-5.45 4.436-9.884 9.888-9.884 2.64 0 5.122 1.03 6.988 2.898a9.825 9.825 0 012.893 6.994c-.003 5.45-4.437 9.884-9.885 9.884m8.413-18.297A11.815 11.815 0 0012.05 0C5.495 0 .16 5.335.157 11.892c0 2.096.547 4.142 1.588 5.945L.057 24l6.305-1.654a11.882 11.882 0 005.683 1.448h.005c6.554 0 11.89-5.335 11.893-11.893a11.821 11.821 0 00-3.48-8.413z"/></svg>"#,
        ),
    },
    LogoPreset {
        id: "youtube",
        name: "YouTube",
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><path d="M23.498 6.186a3.016 3.016 0 0 0-2.122-2.136C19.505 3.545 12 3.545 12 3.545s-7.505 0-9.377.505A3.017 3.017 0 0 0 .502 6.186C0 8.07 0 12 0 12s0 3.93.502 5.814a3.016 3.016 0 0 0 2.122 2.136c1.871.505 9.376.505 9.376.505s7.505 0 9.377-.505a3.015 3.015 0 0 0 2.122-2.136C24 15.93 24 12 24 12s0-3.93-.502-5.814zM9.545 15.568V8.432L15.818 12l-6.273 3.568z"/></svg>"#,
        ),
    },
    LogoPreset {
        id: "tiktok",
        name: "TikTok",
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><path d="M12.525.02c1.31-.02 2.61-.01 3.91-.02.08 1.53.63 3.09 1.75 4.17 1.12 1.11 2.7 1.62 4.24 1.79v4.03c-1.44-.05-2.89-.35-4.2-.97-.57-.26-1.1-.59-1.62-.93-.01 2.92.01 5.84-.02 8.75-.08 1.4-.54 2.79-1.35 3.94-1.31 1.92-3.58 3.17-5.91 3.21-1.43.08-2.86-.31-4.08-1.03-2.02-1.19-3.44-3.37-3.65-5.71-.02-.5-.03-1-.01-1.49.18-1.9 1.12-3.72 2.58-4.96 1.66-1.44 3.98-2.13 6.15-1.72.02 1.48-.04 2.96-.04 4.44-.99-.32-2.15-.23-3.02.37-.63.41-1.11 1.04-1.36 1.75-.21.51-.15 1.07-.14 1.61.24 1.64 1.82 3.02 3.5 2.87 1.12-.01 2.19-.66 2.77-1.61.19-.33.4-.67.41-1.06.1-1.79.06-3.57.07-5.36.01-4.03-.01-8.05.02-12.07z"/></svg>"#,
        ),
    },
];

pub static DOT_TYPE_OPTIONS: [ShapeOption<DotType>; 6] = [
    ShapeOption {
        id: "square",
        name: "Square",
        value: DotType::Square,
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><rect x="4" y="4" width="16" height="16"/></svg>"#,
        ),
    },
    ShapeOption {
        id: "rounded",
        name: "Rounded",
        value: DotType::Rounded,
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><rect x="4" y="4" width="16" height="16" rx="3"/></svg>"#,
        ),
    },
    ShapeOption {
        id: "dots",
        name: "Dots",
        value: DotType::Dots,
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><circle cx="12" cy="12" r="8"/></svg>"#,
        ),
    },
    ShapeOption {
        id: "classy",
        name: "Classy",
        value: DotType::Classy,
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><path d="M12 4L20 12L12 20L4 12Z"/></svg>"#,
        ),
    },
    ShapeOption {
        id: "classy-rounded",
        name: "Classy Rounded",
        value: DotType::ClassyRounded,
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><path d="M12 4C16 4 20 8 20 12C20 16 16 20 12 20C8 20 4 16 4 12C4 8 8 4 12 4Z"/></svg>"#,
        ),
    },
    ShapeOption {
        id: "extra-rounded",
        name: "Extra Rounded",
        value: DotType::ExtraRounded,
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><rect x="3" y="3" width="18" height="18" rx="6"/></svg>"#,
        ),
    },
];

pub static CORNER_SQUARE_OPTIONS: [ShapeOption<Option<CornerSquareType>>; 8] = [
    ShapeOption {
        id: "square",
        name: "Square",
        value: Some(CornerSquareType::Square),
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><rect x="3" y="3" width="18" height="18" stroke="{fgColor}" stroke-width="2" fill="none"/><rect x="7" y="7" width="10" height="10" fill="{fgColor}"/></svg>"#,
        ),
    },
    ShapeOption {
        id: "dot",
        name: "Dot",
        value: Some(CornerSquareType::Dot),
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><circle cx="12" cy="12" r="9" stroke="{fgColor}" stroke-width="2" fill="none"/><circle cx="12" cy="12" r="5" fill="{fgColor}"/></svg>"#,
        ),
    },
    ShapeOption {
        id: "extra-rounded",
        name: "Extra Rounded",
        value: Some(CornerSquareType::ExtraRounded),
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><rect x="3" y="3" width="18" height="18" rx="6" stroke="{fgColor}" stroke-width="2" fill="none"/><rect x="7" y="7" width="10" height="10" rx="3" fill="{fgColor}"/></svg>"#,
        ),
    },
    ShapeOption {
        id: "rounded",
        name: "Rounded",
        value: Some(CornerSquareType::Rounded),
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><rect x="3" y="3" width="18" height="18" rx="4" stroke="{fgColor}" stroke-width="2" fill="none"/><rect x="7" y="7" width="10" height="10" rx="2" fill="{fgColor}"/></svg>"#,
        ),
    },
    ShapeOption {
        id: "dots",
        name: "Dots",
        value: Some(CornerSquareType::Dots),
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><circle cx="12" cy="6" r="4"/><circle cx="6" cy="18" r="4"/><circle cx="18" cy="18" r="4"/></svg>"#,
        ),
    },
    ShapeOption {
        id: "classy",
        name: "Classy",
        value: Some(CornerSquareType::Classy),
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><path d="M3 3L12 3L12 12L3 12Z"/><path d="M12 12L21 12L21 21L12 21Z"/></svg>"#,
        ),
    },
    ShapeOption {
        id: "classy-rounded",
        name: "Classy Rounded",
        value: Some(CornerSquareType::ClassyRounded),
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><path d="M3 3C3 3 12 3 12 12C12 3 21 3 21 3" stroke="{fgColor}" stroke-width="3" fill="none"/></svg>"#,
        ),
    },
    ShapeOption {
        id: "none",
        name: "None",
        value: None,
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="{fgColor}" stroke-width="2"><line x1="6" y1="6" x2="18" y2="18"/><line x1="18" y1="6" x2="6" y2="18"/></svg>"#,
        ),
    },
];

pub static CORNER_DOT_OPTIONS: [ShapeOption<Option<CornerDotType>>; 3] = [
    ShapeOption {
        id: "square",
        name: "Square",
        value: Some(CornerDotType::Square),
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><rect x="6" y="6" width="12" height="12"/></svg>"#,
        ),
    },
    ShapeOption {
        id: "dot",
        name: "Dot",
        value: Some(CornerDotType::Dot),
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><circle cx="12" cy="12" r="6"/></svg>"#,
        ),
    },
    ShapeOption {
        id: "none",
        name: "None",
        value: None,
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="{fgColor}" stroke-width="2"><line x1="8" y1="8" x2="16" y2="16"/><line x1="16" y1="8" x2="8" y2="16"/></svg>"#,
        ),
    },
];

// Overall framing. Not consumed by the renderer.
pub static QR_SHAPE_OPTIONS: [ShapeOption<QrShape>; 2] = [
    ShapeOption {
        id: "square",
        name: "Square",
        value: QrShape::Square,
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><rect x="3" y="3" width="18" height="18" rx="2"/></svg>"#,
        ),
    },
    ShapeOption {
        id: "circle",
        name: "Circle",
        value: QrShape::Circle,
        template: SvgTemplate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{fgColor}"><circle cx="12" cy="12" r="10"/></svg>"#,
        ),
    },
];
