//! Display states of the profile dashboard.

use medcard_qr::QrImage;

use crate::models::ProfileRecord;
use crate::qr::QrPayload;

/// The emergency QR code shown on a loaded dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct EmergencyQr {
    pub payload: QrPayload,
    pub image: QrImage,
}

/// Mutually exclusive dashboard states.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DashboardState {
    /// No session; the user was redirected to sign in
    Unauthenticated,
    /// Waiting for the profile lookup
    #[default]
    Loading,
    /// The lookup failed
    Error { message: String },
    /// The user has not created a profile yet
    EmptyProfile,
    /// Profile found; `qr` stays `None` until (or unless) encoding succeeds
    Loaded {
        profile: ProfileRecord,
        qr: Option<EmergencyQr>,
    },
}

impl DashboardState {
    pub fn profile(&self) -> Option<&ProfileRecord> {
        match self {
            DashboardState::Loaded { profile, .. } => Some(profile),
            _ => None,
        }
    }

    pub fn qr(&self) -> Option<&EmergencyQr> {
        match self {
            DashboardState::Loaded { qr, .. } => qr.as_ref(),
            _ => None,
        }
    }

    /// Short name, used in logs and across FFI.
    pub fn name(&self) -> &'static str {
        match self {
            DashboardState::Unauthenticated => "unauthenticated",
            DashboardState::Loading => "loading",
            DashboardState::Error { .. } => "error",
            DashboardState::EmptyProfile => "empty_profile",
            DashboardState::Loaded { .. } => "loaded",
        }
    }
}
