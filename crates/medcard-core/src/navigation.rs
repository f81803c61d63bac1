//! Navigation targets reachable from the dashboard.

use serde::{Deserialize, Serialize};

/// A destination owned by another screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Sign-in page
    SignIn,
    /// Profile create/edit form
    ProfileEdit,
    /// Public emergency view for a profile ID
    EmergencyView(String),
    /// Medication reminder list
    MedicationReminders,
    /// Application home
    Home,
}

impl Route {
    /// Path of the route, relative to the application origin.
    pub fn path(&self) -> String {
        match self {
            Route::SignIn => "/auth".to_string(),
            Route::ProfileEdit => "/profile".to_string(),
            Route::EmergencyView(id) => format!("/emergency/{}", id),
            Route::MedicationReminders => "/medications".to_string(),
            Route::Home => "/".to_string(),
        }
    }
}

/// Receiver of redirects.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Route::SignIn.path(), "/auth");
        assert_eq!(Route::ProfileEdit.path(), "/profile");
        assert_eq!(Route::EmergencyView("abc123".into()).path(), "/emergency/abc123");
        assert_eq!(Route::MedicationReminders.path(), "/medications");
        assert_eq!(Route::Home.path(), "/");
    }
}
