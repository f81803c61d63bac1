//! Visual parameters for rendered QR images.

use serde::{Deserialize, Serialize};

use crate::render::{QrError, QrResult};

/// Default rendered width in pixels.
pub const DEFAULT_WIDTH: u32 = 256;

/// Default quiet-zone margin, in modules.
pub const DEFAULT_MARGIN: u32 = 2;

/// Default foreground (dark module) color.
pub const DEFAULT_DARK_COLOR: &str = "#000000";

/// Default background (light module) color.
pub const DEFAULT_LIGHT_COLOR: &str = "#FFFFFF";

/// Rendering options for a QR image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrOptions {
    /// Output width (and height) in pixels
    pub width: u32,
    /// Quiet zone around the symbol, in modules
    pub margin: u32,
    /// Foreground color as `#RRGGBB`
    pub dark_color: String,
    /// Background color as `#RRGGBB`
    pub light_color: String,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            margin: DEFAULT_MARGIN,
            dark_color: DEFAULT_DARK_COLOR.to_string(),
            light_color: DEFAULT_LIGHT_COLOR.to_string(),
        }
    }
}

impl QrOptions {
    /// Check that the options describe a drawable image.
    pub fn validate(&self) -> QrResult<()> {
        if self.width == 0 {
            return Err(QrError::InvalidOptions("width must be greater than zero".into()));
        }
        for (field, color) in [("dark_color", &self.dark_color), ("light_color", &self.light_color)] {
            if !is_hex_color(color) {
                return Err(QrError::InvalidOptions(format!(
                    "{} must be #RRGGBB, got {:?}",
                    field, color
                )));
            }
        }
        if self.dark_color.eq_ignore_ascii_case(&self.light_color) {
            return Err(QrError::InvalidOptions(
                "dark and light colors must differ".into(),
            ));
        }
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
