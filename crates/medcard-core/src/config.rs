//! Dashboard configuration.

use medcard_qr::{QrError, QrOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid origin: {0}")]
    InvalidOrigin(String),

    #[error("Invalid QR options: {0}")]
    Qr(#[from] QrError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for the profile dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Public origin the emergency view is served from
    /// (e.g., "https://medcard.example.org")
    pub origin: String,
    /// Visual parameters for the emergency QR code
    #[serde(default)]
    pub qr: QrOptions,
}

/// Trim surrounding whitespace and trailing `/` from an origin.
fn normalize_origin(origin: &str) -> String {
    origin.trim().trim_end_matches('/').to_string()
}

impl DashboardConfig {
    /// Create a config with default QR options. The origin is normalized.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: normalize_origin(&origin.into()),
            qr: QrOptions::default(),
        }
    }

    /// Parse, normalize and validate a JSON config document.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.origin = normalize_origin(&config.origin);
        config.validate()?;
        Ok(config)
    }

    /// Check the origin and QR options.
    pub fn validate(&self) -> ConfigResult<()> {
        let origin = self.origin.as_str();
        if origin.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidOrigin(format!(
                "{:?} contains whitespace",
                self.origin
            )));
        }
        if !(origin.starts_with("https://") || origin.starts_with("http://")) {
            return Err(ConfigError::InvalidOrigin(format!(
                "{:?} must start with http:// or https://",
                self.origin
            )));
        }
        if origin.trim_end_matches('/').ends_with(':') {
            return Err(ConfigError::InvalidOrigin(format!(
                "{:?} has no host",
                self.origin
            )));
        }
        self.qr.validate()?;
        Ok(())
    }
}
