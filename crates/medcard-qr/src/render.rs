//! QR symbol rasterization to SVG.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use qrcode::{Color, EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::QrOptions;

/// Rendering errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QrError {
    #[error("Nothing to encode")]
    EmptyInput,

    #[error("QR encoding failed: {0}")]
    Encode(String),

    #[error("Invalid QR options: {0}")]
    InvalidOptions(String),
}

impl From<qrcode::types::QrError> for QrError {
    fn from(e: qrcode::types::QrError) -> Self {
        QrError::Encode(e.to_string())
    }
}

pub type QrResult<T> = Result<T, QrError>;

/// MIME type of every image produced by [`render_svg`].
pub const SVG_MIME_TYPE: &str = "image/svg+xml";

/// A rendered, embeddable QR image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrImage {
    /// SVG document
    pub svg: String,
    /// Pixel width (and height)
    pub width: u32,
    /// Symbol size in modules, excluding the margin
    pub modules: u32,
}

impl QrImage {
    /// MIME type of the image.
    pub fn mime_type(&self) -> &'static str {
        SVG_MIME_TYPE
    }

    /// Encode as a `data:` URL suitable for an image source attribute.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", SVG_MIME_TYPE, STANDARD.encode(self.svg.as_bytes()))
    }
}

/// Encode `text` as a QR symbol and rasterize it with the given options.
///
/// Error correction level M is used. The output is a square SVG of exactly
/// `options.width` pixels whose view box spans the symbol plus
/// `options.margin` light modules on each side, so output is byte-identical
/// for identical inputs.
pub fn render_svg(text: &str, options: &QrOptions) -> QrResult<QrImage> {
    if text.is_empty() {
        return Err(QrError::EmptyInput);
    }
    options.validate()?;

    let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::M)?;
    let size = code.width();
    let colors = code.to_colors();
    let margin = options.margin as usize;
    let extent = size + margin * 2;

    let mut path = String::new();
    for (y, row) in colors.chunks(size).enumerate() {
        let mut x = 0;
        while x < size {
            if row[x] != Color::Dark {
                x += 1;
                continue;
            }
            let start = x;
            while x < size && row[x] == Color::Dark {
                x += 1;
            }
            let run = x - start;
            path.push_str(&format!(
                "M{} {}h{}v1h-{}z",
                start + margin,
                y + margin,
                run,
                run
            ));
        }
    }

    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{w}" "#,
            r#"viewBox="0 0 {e} {e}" shape-rendering="crispEdges">"#,
            r#"<rect width="{e}" height="{e}" fill="{light}"/>"#,
            r#"<path fill="{dark}" d="{path}"/></svg>"#
        ),
        w = options.width,
        e = extent,
        light = options.light_color,
        dark = options.dark_color,
        path = path,
    );

    Ok(QrImage {
        svg,
        width: options.width,
        modules: size as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.org/emergency/abc123";

    #[test]
    fn test_render_dimensions() {
        let image = render_svg(URL, &QrOptions::default()).unwrap();
        assert_eq!(image.width, 256);
        assert!(image.modules >= 21);
        assert!(image.svg.contains(r#"width="256" height="256""#));

        let extent = image.modules + 4;
        assert!(image
            .svg
            .contains(&format!(r#"viewBox="0 0 {} {}""#, extent, extent)));
    }

    #[test]
    fn test_render_palette() {
        let options = QrOptions {
            dark_color: "#123456".into(),
            light_color: "#FAFAFA".into(),
            ..QrOptions::default()
        };
        let image = render_svg(URL, &options).unwrap();
        assert!(image.svg.contains(r##"fill="#123456""##));
        assert!(image.svg.contains(r##"fill="#FAFAFA""##));
    }

    #[test]
    fn test_margin_offsets_modules() {
        let image = render_svg(URL, &QrOptions::default()).unwrap();
        // Finder pattern occupies the top-left corner of the symbol
        assert!(image.svg.contains("M2 2h7v1h-7z"));

        let no_margin = QrOptions {
            margin: 0,
            ..QrOptions::default()
        };
        let image = render_svg(URL, &no_margin).unwrap();
        assert!(image.svg.contains("M0 0h7v1h-7z"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let first = render_svg(URL, &QrOptions::default()).unwrap();
        let second = render_svg(URL, &QrOptions::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_data_url(), second.to_data_url());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            render_svg("", &QrOptions::default()),
            Err(QrError::EmptyInput)
        );
    }

    #[test]
    fn test_invalid_options() {
        let options = QrOptions {
            width: 0,
            ..QrOptions::default()
        };
        assert!(matches!(
            render_svg(URL, &options),
            Err(QrError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_oversized_input() {
        let huge = "x".repeat(8000);
        assert!(matches!(
            render_svg(&huge, &QrOptions::default()),
            Err(QrError::Encode(_))
        ));
    }

    #[test]
    fn test_data_url() {
        let image = render_svg(URL, &QrOptions::default()).unwrap();
        let url = image.to_data_url();
        assert!(url.starts_with("data:image/svg+xml;base64,"));
        let decoded = STANDARD
            .decode(url.trim_start_matches("data:image/svg+xml;base64,"))
            .unwrap();
        assert_eq!(decoded, image.svg.into_bytes());
    }
}
