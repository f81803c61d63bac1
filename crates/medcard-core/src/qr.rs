//! Emergency QR payload derivation and encoding.

use std::fmt;

use async_trait::async_trait;
use medcard_qr::{QrImage, QrOptions, QrResult};
use thiserror::Error;

use crate::navigation::Route;

/// Payload derivation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayloadError {
    #[error("Profile has no ID to link to")]
    EmptyProfileId,
}

/// The URL encoded into the emergency QR image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QrPayload(String);

impl QrPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for QrPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build `<origin>/emergency/<profile_id>`.
///
/// A trailing `/` on the origin is ignored. The profile ID is used verbatim;
/// a blank one is rejected.
pub fn emergency_payload(origin: &str, profile_id: &str) -> Result<QrPayload, PayloadError> {
    if profile_id.trim().is_empty() {
        return Err(PayloadError::EmptyProfileId);
    }
    let path = Route::EmergencyView(profile_id.to_string()).path();
    Ok(QrPayload(format!("{}{}", origin.trim_end_matches('/'), path)))
}

/// Turns text into an embeddable QR image.
#[async_trait]
pub trait QrEncoder: Send + Sync {
    async fn encode(&self, text: &str, options: &QrOptions) -> QrResult<QrImage>;
}

/// [`QrEncoder`] producing SVG images.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgQrEncoder;

#[async_trait]
impl QrEncoder for SvgQrEncoder {
    async fn encode(&self, text: &str, options: &QrOptions) -> QrResult<QrImage> {
        medcard_qr::render_svg(text, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_payload_format() {
        let payload = emergency_payload("https://medcard.example.org", "abc123").unwrap();
        assert_eq!(payload.as_str(), "https://medcard.example.org/emergency/abc123");
    }

    #[test]
    fn test_payload_trailing_slash() {
        let payload = emergency_payload("https://medcard.example.org/", "abc123").unwrap();
        assert_eq!(payload.to_string(), "https://medcard.example.org/emergency/abc123");
    }

    #[test]
    fn test_payload_empty_id() {
        assert_eq!(
            emergency_payload("https://medcard.example.org", ""),
            Err(PayloadError::EmptyProfileId)
        );
        assert_eq!(
            emergency_payload("https://medcard.example.org", "   "),
            Err(PayloadError::EmptyProfileId)
        );
    }

    #[tokio::test]
    async fn test_svg_encoder() {
        let payload = emergency_payload("https://medcard.example.org", "abc123").unwrap();
        let image = SvgQrEncoder
            .encode(payload.as_str(), &QrOptions::default())
            .await
            .unwrap();
        assert_eq!(image.width, 256);
        assert!(image.svg.starts_with("<svg"));
    }

    proptest! {
        #[test]
        fn prop_payload_is_deterministic(id in "[A-Za-z0-9-]{1,40}") {
            let origin = "https://medcard.example.org";
            let first = emergency_payload(origin, &id).unwrap();
            let second = emergency_payload(origin, &id).unwrap();
            prop_assert_eq!(first.as_str().as_bytes(), second.as_str().as_bytes());
            prop_assert_eq!(first.into_string(), format!("{}/emergency/{}", origin, id));
        }
    }
}
