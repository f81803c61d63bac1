//! Signed-in user session.
//!
//! The session is created when the user signs in and torn down at sign-out.
//! It is handed to the dashboard explicitly rather than read from global
//! state.

use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Source of the current session.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The active session, or `None` when signed out.
    fn current(&self) -> Option<Session>;

    /// End the active session.
    async fn sign_out(&self);
}

/// Session held in process memory.
#[derive(Debug, Default)]
pub struct LocalSession {
    inner: RwLock<Option<Session>>,
}

impl LocalSession {
    /// A provider with no active session.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// A provider with `session` already active.
    pub fn signed_in(session: Session) -> Self {
        Self {
            inner: RwLock::new(Some(session)),
        }
    }

    /// Start (or replace) the active session.
    pub fn start(&self, session: Session) {
        if let Ok(mut inner) = self.inner.write() {
            *inner = Some(session);
        }
    }
}

#[async_trait]
impl SessionProvider for LocalSession {
    fn current(&self) -> Option<Session> {
        self.inner.read().ok().and_then(|inner| inner.clone())
    }

    async fn sign_out(&self) {
        if let Ok(mut inner) = self.inner.write() {
            if let Some(session) = inner.take() {
                tracing::info!(user_id = %session.user_id, "signed out");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_out() {
        let provider = LocalSession::signed_out();
        assert!(provider.current().is_none());
    }

    #[test]
    fn test_start_replaces_session() {
        let provider = LocalSession::signed_in(Session::new("user-1"));
        provider.start(Session::new("user-2").with_email("b@example.org"));

        let current = provider.current().unwrap();
        assert_eq!(current.user_id, "user-2");
        assert_eq!(current.email, Some("b@example.org".into()));
    }

    #[tokio::test]
    async fn test_sign_out() {
        let provider = LocalSession::signed_in(Session::new("user-1"));
        provider.sign_out().await;
        assert!(provider.current().is_none());

        // Signing out twice is harmless
        provider.sign_out().await;
        assert!(provider.current().is_none());
    }
}
