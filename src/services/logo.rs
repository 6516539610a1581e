// Logo resolution
//
// Turns the configured LogoSource into the image reference embedded in the
// drawing. Preset icons are re-coloured with the current foreground colour
// every time, so a colour change after picking a preset is picked up.

use crate::models::QrConfig;
use crate::models::catalog::find_logo_preset;

/// Image reference ready to be embedded in the drawing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Preset icon filled with the foreground colour, as an SVG data URL
    Templated { preset_id: String, href: String },

    /// Uploaded image passed through unchanged
    Uploaded { href: String },
}

impl ImageSource {
    pub fn href(&self) -> &str {
        match self {
            Self::Templated { href, .. } | Self::Uploaded { href } => href,
        }
    }
}

/// Resolve the logo to embed for `config`, if any.
///
/// A preset that is not in the catalog falls through to the uploaded image
/// slot, which is empty whenever a preset is selected.
pub fn resolve_logo(config: &QrConfig) -> Option<ImageSource> {
    use crate::models::LogoSource;

    match &config.logo {
        LogoSource::Preset(id) => match find_logo_preset(id) {
            Some(preset) => Some(ImageSource::Templated {
                preset_id: preset.id.to_string(),
                href: preset.template.to_data_url(config.fg_color),
            }),
            None => {
                tracing::debug!("Unknown logo preset '{}', no logo embedded", id);
                None
            }
        },
        LogoSource::Uploaded(image) => Some(ImageSource::Uploaded {
            href: image.to_data_url(),
        }),
        LogoSource::None => None,
    }
}
