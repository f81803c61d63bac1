//! Dashboard screen controller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

use super::lifetime::Lifetime;
use super::state::{DashboardState, EmergencyQr};
use super::view::{DashboardAction, DashboardView};
use crate::config::DashboardConfig;
use crate::navigation::{Navigator, Route};
use crate::notify::{Notification, Notifier};
use crate::qr::{emergency_payload, QrEncoder};
use crate::session::SessionProvider;
use crate::store::{ProfileLookup, ProfileStore};

/// Message shown when the profile lookup fails.
pub const LOAD_FAILED_MESSAGE: &str = "Could not load your profile. Please try again later.";

/// Controller errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("No profile is loaded")]
    NoProfile,

    #[error("Dashboard has been unmounted")]
    Unmounted,
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// Collaborators the dashboard talks to.
#[derive(Clone)]
pub struct DashboardContext {
    pub session: Arc<dyn SessionProvider>,
    pub store: Arc<dyn ProfileStore>,
    pub encoder: Arc<dyn QrEncoder>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

/// Drives one dashboard instance from mount to teardown.
///
/// Each [`mount`](Self::mount) is a single forward pass: session check,
/// profile lookup, then QR generation for a found profile. Once
/// [`unmount`](Self::unmount) is called, pending work is abandoned and no
/// further state changes, notifications or redirects happen. A newer mount
/// pass supersedes an older one still in flight.
pub struct DashboardController {
    config: DashboardConfig,
    ctx: DashboardContext,
    state: watch::Sender<DashboardState>,
    lifetime: Lifetime,
    generation: AtomicU64,
}

impl DashboardController {
    pub fn new(config: DashboardConfig, ctx: DashboardContext) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        Self {
            config,
            ctx,
            state,
            lifetime: Lifetime::new(),
            generation: AtomicU64::new(0),
        }
    }

    /// Current display state.
    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Watch display state changes.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    /// Render model for the current state.
    pub fn view(&self) -> Option<DashboardView> {
        DashboardView::render(&self.state.borrow())
    }

    pub fn is_mounted(&self) -> bool {
        !self.lifetime.is_ended()
    }

    /// Run the mount pass and return the state it settled in.
    ///
    /// Call again when the session's user changes.
    pub async fn mount(&self) -> DashboardState {
        if self.lifetime.is_ended() {
            return self.state();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let session = match self.ctx.session.current() {
            Some(session) => session,
            None => {
                tracing::debug!("no active session, redirecting to sign-in");
                if self.set_state(generation, DashboardState::Unauthenticated) {
                    self.ctx.navigator.navigate(Route::SignIn);
                }
                return self.state();
            }
        };

        self.set_state(generation, DashboardState::Loading);

        let lookup = match self
            .lifetime
            .guard(self.ctx.store.fetch_profile_by_user(&session.user_id))
            .await
        {
            Some(lookup) => lookup,
            None => {
                tracing::debug!(user_id = %session.user_id, "unmounted during profile fetch");
                return self.state();
            }
        };

        match lookup {
            ProfileLookup::Found(profile) => {
                tracing::debug!(user_id = %session.user_id, profile_id = %profile.id, "profile loaded");
                let profile_id = profile.id.clone();
                if !self.set_state(generation, DashboardState::Loaded { profile, qr: None }) {
                    return self.state();
                }
                if let Some(emergency_qr) = self.generate_qr(&profile_id).await {
                    self.attach_qr(generation, &profile_id, emergency_qr);
                }
            }
            ProfileLookup::NotFound => {
                tracing::debug!(user_id = %session.user_id, "no profile yet");
                self.set_state(generation, DashboardState::EmptyProfile);
            }
            ProfileLookup::Failed(reason) => {
                tracing::error!(user_id = %session.user_id, error = %reason, "profile fetch failed");
                let state = DashboardState::Error {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                };
                if self.set_state(generation, state) {
                    self.ctx
                        .notifier
                        .notify(Notification::error("Error", LOAD_FAILED_MESSAGE));
                }
            }
        }

        self.state()
    }

    /// Tear down. Idempotent.
    pub fn unmount(&self) {
        self.lifetime.end();
    }

    /// Handle a button press.
    pub async fn perform(&self, action: DashboardAction) -> DashboardResult<()> {
        if self.lifetime.is_ended() {
            return Err(DashboardError::Unmounted);
        }

        let route = match action {
            DashboardAction::SignOut => {
                self.ctx.session.sign_out().await;
                self.ctx
                    .notifier
                    .notify(Notification::info("Signed out", "You have been signed out."));
                Route::SignIn
            }
            DashboardAction::GoBack => Route::Home,
            DashboardAction::EditProfile | DashboardAction::CreateProfile => Route::ProfileEdit,
            DashboardAction::PreviewEmergencyView => {
                let id = self
                    .state
                    .borrow()
                    .profile()
                    .filter(|p| p.has_public_id())
                    .map(|p| p.id.clone())
                    .ok_or(DashboardError::NoProfile)?;
                Route::EmergencyView(id)
            }
            DashboardAction::MedicationReminders => Route::MedicationReminders,
        };

        tracing::debug!(?action, path = %route.path(), "navigating");
        self.ctx.navigator.navigate(route);
        Ok(())
    }

    /// Derive the payload and encode it. Failures only drop the QR code.
    async fn generate_qr(&self, profile_id: &str) -> Option<EmergencyQr> {
        let payload = match emergency_payload(&self.config.origin, profile_id) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(error = %e, "skipping QR code");
                return None;
            }
        };

        let encoded = self
            .lifetime
            .guard(self.ctx.encoder.encode(payload.as_str(), &self.config.qr))
            .await?;

        match encoded {
            Ok(image) => Some(EmergencyQr { payload, image }),
            Err(e) => {
                tracing::warn!(profile_id = %profile_id, error = %e, "QR code generation failed");
                None
            }
        }
    }

    /// Attach a QR code if the same profile is still displayed.
    fn attach_qr(&self, generation: u64, profile_id: &str, emergency_qr: EmergencyQr) {
        if !self.is_current(generation) {
            return;
        }
        self.state.send_if_modified(|state| match state {
            DashboardState::Loaded { profile, qr } if profile.id == profile_id => {
                *qr = Some(emergency_qr);
                true
            }
            _ => false,
        });
    }

    /// Whether the pass started as `generation` may still write state.
    fn is_current(&self, generation: u64) -> bool {
        !self.lifetime.is_ended() && self.generation.load(Ordering::SeqCst) == generation
    }

    /// Replace the state unless unmounted or superseded by a newer mount.
    /// Returns whether it was applied.
    fn set_state(&self, generation: u64, next: DashboardState) -> bool {
        if !self.is_current(generation) {
            tracing::debug!(generation, state = next.name(), "dropping stale dashboard state");
            return false;
        }
        tracing::trace!(state = next.name(), "dashboard state");
        self.state.send_replace(next);
        true
    }
}
