use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing a colour string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Colour must start with '#': {0}")]
    MissingHash(String),

    #[error("Colour must be #RRGGBB or #RRGGBBAA: {0}")]
    InvalidLength(String),

    #[error("Invalid hex digits in colour: {0}")]
    InvalidHex(String),
}

/// Errors produced when parsing one of the shape/level identifiers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} '{value}'")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseOptionError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// An sRGB colour with an alpha channel.
///
/// Parsed from `#RRGGBB` (opaque) or `#RRGGBBAA`. Displays as lowercase
/// `#rrggbb`; the alpha channel is carried separately because most
/// consumers want a fill plus an opacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parse a `#RRGGBB` or `#RRGGBBAA` string
    pub fn parse(value: &str) -> Result<Self, ColorParseError> {
        let trimmed = value.trim();
        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(value.to_string()))?;

        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorParseError::InvalidLength(value.to_string()));
        }
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex(value.to_string()));
        }

        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ColorParseError::InvalidHex(value.to_string()))
        };

        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 0xff },
        })
    }

    /// `#rrggbb` without the alpha channel
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 0xff
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Alpha as a 0..=1 opacity
    pub fn opacity(&self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "{}", self.to_hex())
        } else {
            write!(f, "{}{:02x}", self.to_hex(), self.a)
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// QR error-correction level, passed to the encoder verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    L,
    M,
    Q,
    #[default]
    H,
}

impl ErrorCorrectionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        }
    }
}

impl FromStr for ErrorCorrectionLevel {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            _ => Err(ParseOptionError::new("error correction level", s)),
        }
    }
}

/// Shape of the data modules (the QR "body")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotType {
    #[default]
    Square,
    Rounded,
    Dots,
    Classy,
    ClassyRounded,
    ExtraRounded,
}

impl DotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Rounded => "rounded",
            Self::Dots => "dots",
            Self::Classy => "classy",
            Self::ClassyRounded => "classy-rounded",
            Self::ExtraRounded => "extra-rounded",
        }
    }
}

impl FromStr for DotType {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "square" => Ok(Self::Square),
            "rounded" => Ok(Self::Rounded),
            "dots" => Ok(Self::Dots),
            "classy" => Ok(Self::Classy),
            "classy-rounded" => Ok(Self::ClassyRounded),
            "extra-rounded" => Ok(Self::ExtraRounded),
            _ => Err(ParseOptionError::new("dot type", s)),
        }
    }
}

/// Shape of the outer eye frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerSquareType {
    #[default]
    Square,
    Dot,
    ExtraRounded,
    Rounded,
    Dots,
    Classy,
    ClassyRounded,
}

impl CornerSquareType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Dot => "dot",
            Self::ExtraRounded => "extra-rounded",
            Self::Rounded => "rounded",
            Self::Dots => "dots",
            Self::Classy => "classy",
            Self::ClassyRounded => "classy-rounded",
        }
    }

    /// Parse an identifier, where `none` selects no overlay
    pub fn parse_optional(s: &str) -> Result<Option<Self>, ParseOptionError> {
        match s.trim() {
            "none" => Ok(None),
            "square" => Ok(Some(Self::Square)),
            "dot" => Ok(Some(Self::Dot)),
            "extra-rounded" => Ok(Some(Self::ExtraRounded)),
            "rounded" => Ok(Some(Self::Rounded)),
            "dots" => Ok(Some(Self::Dots)),
            "classy" => Ok(Some(Self::Classy)),
            "classy-rounded" => Ok(Some(Self::ClassyRounded)),
            _ => Err(ParseOptionError::new("corner square type", s)),
        }
    }
}

/// Shape of the inner eye ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerDotType {
    #[default]
    Square,
    Dot,
}

impl CornerDotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Dot => "dot",
        }
    }

    /// Parse an identifier, where `none` selects no overlay
    pub fn parse_optional(s: &str) -> Result<Option<Self>, ParseOptionError> {
        match s.trim() {
            "none" => Ok(None),
            "square" => Ok(Some(Self::Square)),
            "dot" => Ok(Some(Self::Dot)),
            _ => Err(ParseOptionError::new("corner dot type", s)),
        }
    }
}

/// Overall symbol framing. Catalogued but not used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QrShape {
    #[default]
    Square,
    Circle,
}

/// A user-supplied logo image, kept as raw bytes plus its MIME type
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Read an image file, guessing the MIME type from its extension
    pub fn from_path(path: &Utf8Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let bytes =
            fs::read(path).with_context(|| format!("Failed to read logo image: {}", path))?;
        let mime = mime_guess::from_path(path.as_std_path())
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        tracing::debug!("Loaded logo {} ({} bytes, {})", path, bytes.len(), mime);
        Ok(Self { mime, bytes })
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

impl fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedImage")
            .field("mime", &self.mime)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Where the embedded logo comes from. At most one source is active.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogoSource {
    #[default]
    None,
    Uploaded(UploadedImage),
    Preset(String),
}

impl LogoSource {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn preset_id(&self) -> Option<&str> {
        match self {
            Self::Preset(id) => Some(id),
            _ => None,
        }
    }
}

/// The full user configuration for the QR code being designed
#[derive(Debug, Clone, PartialEq)]
pub struct QrConfig {
    /// Text encoded into the symbol; empty means "no content yet"
    pub url: String,
    pub fg_color: Color,
    pub bg_color: Color,
    pub level: ErrorCorrectionLevel,
    pub include_margin: bool,
    pub dot_type: DotType,
    pub corner_square_type: Option<CornerSquareType>,
    pub corner_dot_type: Option<CornerDotType>,
    pub logo: LogoSource,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            fg_color: Color::BLACK,
            bg_color: Color::WHITE,
            level: ErrorCorrectionLevel::H,
            include_margin: true,
            dot_type: DotType::Square,
            corner_square_type: Some(CornerSquareType::Square),
            corner_dot_type: Some(CornerDotType::Square),
            logo: LogoSource::None,
        }
    }
}

impl QrConfig {
    pub fn has_content(&self) -> bool {
        !self.url.is_empty()
    }
}
