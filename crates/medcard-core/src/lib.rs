//! Medcard Core Library
//!
//! Emergency health-profile dashboard: a signed-in user's medical summary
//! plus a QR code linking first responders to a public emergency view.
//!
//! # Architecture
//!
//! ```text
//!            Session ──none──▶ redirect to sign-in
//!               │
//!               ▼
//!        Profile lookup (SQLite)
//!               │
//!     ┌─────────┼──────────────┐
//!     ▼         ▼              ▼
//!  Found     NotFound        Failed
//!     │         │              │
//!     │    "Create profile"   toast + error state
//!     ▼
//!  <origin>/emergency/<id> ──▶ QR encode (best effort)
//!     │
//!     ▼
//!  Render model ──▶ native shell
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer
//! - [`models`]: Domain types (ProfileRecord, EmergencyCard)
//! - [`store`]: Profile lookup boundary with explicit not-found outcome
//! - [`session`]: Injected user session
//! - [`navigation`]: Redirect targets
//! - [`notify`]: Toast notifications
//! - [`qr`]: Emergency link derivation and QR encoding
//! - [`config`]: Dashboard configuration
//! - [`dashboard`]: Screen controller and render model

pub mod config;
pub mod dashboard;
pub mod db;
pub mod models;
pub mod navigation;
pub mod notify;
pub mod qr;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use config::DashboardConfig;
pub use dashboard::{
    DashboardAction, DashboardContext, DashboardController, DashboardState, DashboardView,
};
pub use db::Database;
pub use models::{EmergencyCard, ProfileRecord};
pub use navigation::{Navigator, Route};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use qr::{emergency_payload, QrEncoder, QrPayload, SvgQrEncoder};
pub use session::{LocalSession, Session, SessionProvider};
pub use store::{ProfileLookup, ProfileStore, SqliteProfileStore};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MedcardError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Dashboard error: {0}")]
    DashboardError(String),
}

impl From<db::DbError> for MedcardError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => MedcardError::NotFound(what),
            db::DbError::Constraint(why) => MedcardError::InvalidInput(why),
            other => MedcardError::DatabaseError(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for MedcardError {
    fn from(e: config::ConfigError) -> Self {
        MedcardError::ConfigError(e.to_string())
    }
}

impl From<qr::PayloadError> for MedcardError {
    fn from(e: qr::PayloadError) -> Self {
        MedcardError::InvalidInput(e.to_string())
    }
}

impl From<dashboard::DashboardError> for MedcardError {
    fn from(e: dashboard::DashboardError) -> Self {
        MedcardError::DashboardError(e.to_string())
    }
}

impl From<std::io::Error> for MedcardError {
    fn from(e: std::io::Error) -> Self {
        MedcardError::DashboardError(format!("Runtime error: {}", e))
    }
}

impl<T> From<std::sync::PoisonError<T>> for MedcardError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MedcardError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
///
/// `config_json` is a [`DashboardConfig`] document, e.g.
/// `{"origin": "https://medcard.example.org"}`.
#[uniffi::export]
pub fn open_database(path: String, config_json: String) -> Result<Arc<MedcardCore>, MedcardError> {
    let config = DashboardConfig::from_json(&config_json)?;
    let db = Database::open(&path)?;
    MedcardCore::new(db, config)
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory(origin: String) -> Result<Arc<MedcardCore>, MedcardError> {
    let config = DashboardConfig::new(origin);
    config.validate()?;
    let db = Database::open_in_memory()?;
    MedcardCore::new(db, config)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct MedcardCore {
    db: Arc<Mutex<Database>>,
    config: DashboardConfig,
    runtime: Arc<tokio::runtime::Runtime>,
}

impl MedcardCore {
    fn new(db: Database, config: DashboardConfig) -> Result<Arc<Self>, MedcardError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
            config,
            runtime: Arc::new(runtime),
        }))
    }
}

#[uniffi::export]
impl MedcardCore {
    // =========================================================================
    // Profile Operations
    // =========================================================================

    /// Create the user's profile, or update it in place (keeping its ID).
    pub fn save_profile(&self, profile: FfiProfileRecord) -> Result<FfiProfileRecord, MedcardError> {
        let db = self.db.lock()?;
        let mut record: ProfileRecord = profile.into();
        if record.id.trim().is_empty() {
            record.id = uuid::Uuid::new_v4().to_string();
        }
        record.touch();
        let stored = db.upsert_profile(&record)?;
        tracing::info!(user_id = %stored.user_id, profile_id = %stored.id, "profile saved");
        Ok(stored.into())
    }

    /// Get the profile owned by a user.
    pub fn get_profile_for_user(
        &self,
        user_id: String,
    ) -> Result<Option<FfiProfileRecord>, MedcardError> {
        let db = self.db.lock()?;
        let profile = db.get_profile_by_user(&user_id)?;
        Ok(profile.map(|p| p.into()))
    }

    /// Get the public emergency card for a profile ID.
    pub fn get_emergency_card(
        &self,
        profile_id: String,
    ) -> Result<Option<FfiEmergencyCard>, MedcardError> {
        let db = self.db.lock()?;
        let card = db.get_emergency_card(&profile_id)?;
        Ok(card.map(|c| c.into()))
    }

    /// The emergency link encoded in a profile's QR code.
    pub fn emergency_link(&self, profile_id: String) -> Result<String, MedcardError> {
        Ok(emergency_payload(&self.config.origin, &profile_id)?.into_string())
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Create a dashboard for the given user; `None` means signed out.
    pub fn dashboard(&self, user_id: Option<String>, email: Option<String>) -> Arc<FfiDashboard> {
        let session = match user_id {
            Some(user_id) => {
                let mut session = Session::new(user_id);
                session.email = email;
                LocalSession::signed_in(session)
            }
            None => LocalSession::signed_out(),
        };

        let effects = Arc::new(EffectQueue::default());
        let ctx = DashboardContext {
            session: Arc::new(session),
            store: Arc::new(SqliteProfileStore::new(self.db.clone())),
            encoder: Arc::new(SvgQrEncoder),
            navigator: effects.clone(),
            notifier: effects.clone(),
        };

        Arc::new(FfiDashboard {
            controller: DashboardController::new(self.config.clone(), ctx),
            effects,
            runtime: self.runtime.clone(),
        })
    }
}

/// Collects redirects and notifications until the shell drains them.
#[derive(Default)]
struct EffectQueue {
    routes: Mutex<Vec<Route>>,
    notifications: Mutex<Vec<Notification>>,
}

impl EffectQueue {
    fn drain(&self) -> FfiEffects {
        let redirect = self
            .routes
            .lock()
            .map(|mut routes| routes.drain(..).last())
            .unwrap_or_default();
        let notifications = self
            .notifications
            .lock()
            .map(|mut notes| notes.drain(..).map(Into::into).collect())
            .unwrap_or_default();
        FfiEffects {
            redirect: redirect.map(|r| r.path()),
            notifications,
        }
    }
}

impl Navigator for EffectQueue {
    fn navigate(&self, route: Route) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route);
        }
    }
}

impl Notifier for EffectQueue {
    fn notify(&self, notification: Notification) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}

/// A mounted dashboard screen.
#[derive(uniffi::Object)]
pub struct FfiDashboard {
    controller: DashboardController,
    effects: Arc<EffectQueue>,
    runtime: Arc<tokio::runtime::Runtime>,
}

#[uniffi::export]
impl FfiDashboard {
    /// Run the mount pass (blocking) and return what to draw.
    pub fn mount(&self) -> FfiDashboardUpdate {
        let state = self.runtime.block_on(self.controller.mount());
        FfiDashboardUpdate {
            state: state.name().to_string(),
            view: self.controller.view().map(Into::into),
            effects: self.effects.drain(),
        }
    }

    /// Handle a button press.
    pub fn perform(&self, action: FfiDashboardAction) -> Result<FfiEffects, MedcardError> {
        self.runtime.block_on(self.controller.perform(action.into()))?;
        Ok(self.effects.drain())
    }

    /// Tear down; later results are discarded.
    pub fn unmount(&self) {
        self.controller.unmount();
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe profile record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProfileRecord {
    /// Empty when creating a new profile
    pub id: String,
    pub user_id: String,
    pub blood_group: Option<String>,
    pub allergies: Option<String>,
    pub chronic_conditions: Option<String>,
    pub medications: Option<String>,
    pub additional_notes: Option<String>,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relation: Option<String>,
}

impl From<ProfileRecord> for FfiProfileRecord {
    fn from(profile: ProfileRecord) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            blood_group: profile.blood_group,
            allergies: profile.allergies,
            chronic_conditions: profile.chronic_conditions,
            medications: profile.medications,
            additional_notes: profile.additional_notes,
            emergency_contact_name: profile.emergency_contact_name,
            emergency_contact_phone: profile.emergency_contact_phone,
            emergency_contact_relation: profile.emergency_contact_relation,
        }
    }
}

impl From<FfiProfileRecord> for ProfileRecord {
    fn from(profile: FfiProfileRecord) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        ProfileRecord {
            id: profile.id,
            user_id: profile.user_id,
            blood_group: profile.blood_group,
            allergies: profile.allergies,
            chronic_conditions: profile.chronic_conditions,
            medications: profile.medications,
            additional_notes: profile.additional_notes,
            emergency_contact_name: profile.emergency_contact_name,
            emergency_contact_phone: profile.emergency_contact_phone,
            emergency_contact_relation: profile.emergency_contact_relation,
            qr_code_url: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// FFI-safe emergency card.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEmergencyCard {
    pub profile_id: String,
    pub blood_group: Option<String>,
    pub allergies: Option<String>,
    pub chronic_conditions: Option<String>,
    pub medications: Option<String>,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relation: Option<String>,
}

impl From<EmergencyCard> for FfiEmergencyCard {
    fn from(card: EmergencyCard) -> Self {
        Self {
            profile_id: card.profile_id,
            blood_group: card.blood_group,
            allergies: card.allergies,
            chronic_conditions: card.chronic_conditions,
            medications: card.medications,
            emergency_contact_name: card.emergency_contact_name,
            emergency_contact_phone: card.emergency_contact_phone,
            emergency_contact_relation: card.emergency_contact_relation,
        }
    }
}

/// FFI-safe dashboard button.
#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiDashboardAction {
    SignOut,
    GoBack,
    EditProfile,
    CreateProfile,
    PreviewEmergencyView,
    MedicationReminders,
}

impl From<FfiDashboardAction> for DashboardAction {
    fn from(action: FfiDashboardAction) -> Self {
        match action {
            FfiDashboardAction::SignOut => DashboardAction::SignOut,
            FfiDashboardAction::GoBack => DashboardAction::GoBack,
            FfiDashboardAction::EditProfile => DashboardAction::EditProfile,
            FfiDashboardAction::CreateProfile => DashboardAction::CreateProfile,
            FfiDashboardAction::PreviewEmergencyView => DashboardAction::PreviewEmergencyView,
            FfiDashboardAction::MedicationReminders => DashboardAction::MedicationReminders,
        }
    }
}

impl From<DashboardAction> for FfiDashboardAction {
    fn from(action: DashboardAction) -> Self {
        match action {
            DashboardAction::SignOut => FfiDashboardAction::SignOut,
            DashboardAction::GoBack => FfiDashboardAction::GoBack,
            DashboardAction::EditProfile => FfiDashboardAction::EditProfile,
            DashboardAction::CreateProfile => FfiDashboardAction::CreateProfile,
            DashboardAction::PreviewEmergencyView => FfiDashboardAction::PreviewEmergencyView,
            DashboardAction::MedicationReminders => FfiDashboardAction::MedicationReminders,
        }
    }
}

/// FFI-safe labelled summary line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSummaryRow {
    pub label: String,
    pub value: String,
}

/// FFI-safe dashboard render model.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDashboardView {
    pub header_actions: Vec<FfiDashboardAction>,
    pub loading: bool,
    pub error: Option<String>,
    pub blood_group: Option<String>,
    pub medical: Vec<FfiSummaryRow>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_relation: Option<String>,
    pub qr_link: Option<String>,
    pub qr_image_data_url: Option<String>,
    pub primary_actions: Vec<FfiDashboardAction>,
}

impl From<DashboardView> for FfiDashboardView {
    fn from(view: DashboardView) -> Self {
        let (blood_group, medical, contact) = match view.summary {
            Some(summary) => (summary.blood_group, summary.medical, Some(summary.contact)),
            None => (None, Vec::new(), None),
        };
        let (contact_name, contact_phone, contact_relation) = match contact {
            Some(c) => (Some(c.name), Some(c.phone), c.relation),
            None => (None, None, None),
        };
        let (qr_link, qr_image_data_url) = match view.qr {
            Some(card) => (Some(card.link), Some(card.image_data_url)),
            None => (None, None),
        };

        Self {
            header_actions: view.header_actions.into_iter().map(Into::into).collect(),
            loading: view.loading,
            error: view.error,
            blood_group,
            medical: medical
                .into_iter()
                .map(|row| FfiSummaryRow {
                    label: row.label,
                    value: row.value,
                })
                .collect(),
            contact_name,
            contact_phone,
            contact_relation,
            qr_link,
            qr_image_data_url,
            primary_actions: view.primary_actions.into_iter().map(Into::into).collect(),
        }
    }
}

/// FFI-safe notification.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotification {
    pub is_error: bool,
    pub title: String,
    pub message: String,
}

impl From<Notification> for FfiNotification {
    fn from(notification: Notification) -> Self {
        Self {
            is_error: notification.level == NotificationLevel::Error,
            title: notification.title,
            message: notification.message,
        }
    }
}

/// Side effects the shell must carry out.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEffects {
    /// Path to navigate to, if any
    pub redirect: Option<String>,
    pub notifications: Vec<FfiNotification>,
}

/// Result of mounting a dashboard.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDashboardUpdate {
    pub state: String,
    /// `None` while unauthenticated
    pub view: Option<FfiDashboardView>,
    pub effects: FfiEffects,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core() -> Arc<MedcardCore> {
        open_database_in_memory("https://medcard.example.org".into()).unwrap()
    }

    fn new_profile(user_id: &str) -> FfiProfileRecord {
        FfiProfileRecord {
            id: String::new(),
            user_id: user_id.into(),
            blood_group: Some("O+".into()),
            allergies: None,
            chronic_conditions: None,
            medications: None,
            additional_notes: None,
            emergency_contact_name: "Jane Doe".into(),
            emergency_contact_phone: "+15551234567".into(),
            emergency_contact_relation: None,
        }
    }

    #[test]
    fn test_rejects_bad_origin() {
        assert!(matches!(
            open_database_in_memory("not a url".into()),
            Err(MedcardError::ConfigError(_))
        ));
    }

    #[test]
    fn test_save_and_link() {
        let core = core();
        let saved = core.save_profile(new_profile("user-1")).unwrap();
        assert_eq!(saved.id.len(), 36);

        let link = core.emergency_link(saved.id.clone()).unwrap();
        assert_eq!(link, format!("https://medcard.example.org/emergency/{}", saved.id));

        let card = core.get_emergency_card(saved.id).unwrap().unwrap();
        assert_eq!(card.blood_group, Some("O+".into()));
    }

    #[test]
    fn test_link_with_padded_origin() {
        let core = open_database_in_memory(" https://medcard.example.org/ ".into()).unwrap();
        assert_eq!(
            core.emergency_link("abc123".into()).unwrap(),
            "https://medcard.example.org/emergency/abc123"
        );
    }

    #[test]
    fn test_save_invalid_profile() {
        let core = core();
        let mut profile = new_profile("user-1");
        profile.emergency_contact_name = String::new();
        assert!(matches!(
            core.save_profile(profile),
            Err(MedcardError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_dashboard_signed_out() {
        let core = core();
        let update = core.dashboard(None, None).mount();
        assert_eq!(update.state, "unauthenticated");
        assert!(update.view.is_none());
        assert_eq!(update.effects.redirect.as_deref(), Some("/auth"));
    }

    #[test]
    fn test_dashboard_loaded() {
        let core = core();
        let saved = core.save_profile(new_profile("user-1")).unwrap();

        let dashboard = core.dashboard(Some("user-1".into()), None);
        let update = dashboard.mount();
        assert_eq!(update.state, "loaded");

        let view = update.view.unwrap();
        assert_eq!(view.blood_group, Some("O+".into()));
        assert_eq!(
            view.qr_link,
            Some(format!("https://medcard.example.org/emergency/{}", saved.id))
        );
        assert!(view.qr_image_data_url.unwrap().starts_with("data:image/svg+xml;base64,"));

        let effects = dashboard
            .perform(FfiDashboardAction::PreviewEmergencyView)
            .unwrap();
        assert_eq!(effects.redirect, Some(format!("/emergency/{}", saved.id)));
    }

    #[test]
    fn test_dashboard_sign_out() {
        let core = core();
        let dashboard = core.dashboard(Some("user-1".into()), None);
        assert_eq!(dashboard.mount().state, "empty_profile");

        let effects = dashboard.perform(FfiDashboardAction::SignOut).unwrap();
        assert_eq!(effects.redirect.as_deref(), Some("/auth"));
        assert_eq!(effects.notifications.len(), 1);
        assert!(!effects.notifications[0].is_error);
    }

    #[test]
    fn test_dashboard_after_unmount() {
        let core = core();
        let dashboard = core.dashboard(Some("user-1".into()), None);
        dashboard.unmount();
        assert!(matches!(
            dashboard.perform(FfiDashboardAction::GoBack),
            Err(MedcardError::DashboardError(_))
        ));
    }
}
