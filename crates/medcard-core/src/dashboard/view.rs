//! Render model for the dashboard screen.
//!
//! Everything here is a pure function of [`DashboardState`]; the native
//! shell draws the result.

use serde::{Deserialize, Serialize};

use super::state::{DashboardState, EmergencyQr};
use crate::models::ProfileRecord;

/// Shown for optional medical fields the user left blank.
pub const NONE_REPORTED: &str = "None reported";

/// Buttons the dashboard exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DashboardAction {
    SignOut,
    GoBack,
    EditProfile,
    CreateProfile,
    PreviewEmergencyView,
    MedicationReminders,
}

impl DashboardAction {
    pub fn label(&self) -> &'static str {
        match self {
            DashboardAction::SignOut => "Sign Out",
            DashboardAction::GoBack => "Back",
            DashboardAction::EditProfile => "Edit Profile",
            DashboardAction::CreateProfile => "Create Profile",
            DashboardAction::PreviewEmergencyView => "Preview Emergency View",
            DashboardAction::MedicationReminders => "Medication Reminders",
        }
    }
}

/// One labelled line of the medical summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
}

impl SummaryRow {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// Emergency contact block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactView {
    pub name: String,
    pub phone: String,
    pub relation: Option<String>,
}

/// Profile section of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    /// Blood group, when recorded
    pub blood_group: Option<String>,
    /// Allergies, conditions, medications and (when present) notes
    pub medical: Vec<SummaryRow>,
    pub contact: ContactView,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl From<&ProfileRecord> for ProfileSummary {
    fn from(profile: &ProfileRecord) -> Self {
        let mut medical = vec![
            SummaryRow::new(
                "Allergies",
                present(&profile.allergies).unwrap_or(NONE_REPORTED),
            ),
            SummaryRow::new(
                "Chronic Conditions",
                present(&profile.chronic_conditions).unwrap_or(NONE_REPORTED),
            ),
            SummaryRow::new(
                "Current Medications",
                present(&profile.medications).unwrap_or(NONE_REPORTED),
            ),
        ];
        if let Some(notes) = present(&profile.additional_notes) {
            medical.push(SummaryRow::new("Additional Notes", notes));
        }

        Self {
            blood_group: present(&profile.blood_group).map(str::to_string),
            medical,
            contact: ContactView {
                name: profile.emergency_contact_name.clone(),
                phone: profile.emergency_contact_phone.clone(),
                relation: present(&profile.emergency_contact_relation).map(str::to_string),
            },
        }
    }
}

/// QR card contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCard {
    /// Link encoded in the image
    pub link: String,
    /// `data:` URL of the rendered image
    pub image_data_url: String,
}

impl From<&EmergencyQr> for QrCard {
    fn from(qr: &EmergencyQr) -> Self {
        Self {
            link: qr.payload.to_string(),
            image_data_url: qr.image.to_data_url(),
        }
    }
}

/// Everything the dashboard draws for one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    pub header_actions: Vec<DashboardAction>,
    pub loading: bool,
    pub error: Option<String>,
    pub summary: Option<ProfileSummary>,
    pub qr: Option<QrCard>,
    pub primary_actions: Vec<DashboardAction>,
}

impl DashboardView {
    /// Build the view for `state`. Nothing is rendered while unauthenticated.
    pub fn render(state: &DashboardState) -> Option<Self> {
        let mut view = Self {
            header_actions: vec![DashboardAction::GoBack, DashboardAction::SignOut],
            loading: false,
            error: None,
            summary: None,
            qr: None,
            primary_actions: Vec::new(),
        };

        match state {
            DashboardState::Unauthenticated => return None,
            DashboardState::Loading => view.loading = true,
            DashboardState::Error { message } => view.error = Some(message.clone()),
            DashboardState::EmptyProfile => {
                view.primary_actions = vec![DashboardAction::CreateProfile];
            }
            DashboardState::Loaded { profile, qr } => {
                view.summary = Some(ProfileSummary::from(profile));
                view.qr = qr.as_ref().map(QrCard::from);
                view.primary_actions = vec![
                    DashboardAction::EditProfile,
                    DashboardAction::PreviewEmergencyView,
                    DashboardAction::MedicationReminders,
                ];
            }
        }

        Some(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ProfileRecord {
        let mut profile =
            ProfileRecord::new("user-1".into(), "Jane Doe".into(), "+15551234567".into());
        profile.allergies = Some("Peanuts".into());
        profile
    }

    #[test]
    fn test_unauthenticated_renders_nothing() {
        assert!(DashboardView::render(&DashboardState::Unauthenticated).is_none());
    }

    #[test]
    fn test_loading() {
        let view = DashboardView::render(&DashboardState::Loading).unwrap();
        assert!(view.loading);
        assert!(view.summary.is_none());
        assert!(view.primary_actions.is_empty());
    }

    #[test]
    fn test_empty_profile_has_single_create_action() {
        let view = DashboardView::render(&DashboardState::EmptyProfile).unwrap();
        assert_eq!(view.primary_actions, vec![DashboardAction::CreateProfile]);
        assert!(view.summary.is_none());
        assert!(view.qr.is_none());
    }

    #[test]
    fn test_error_has_no_profile_content() {
        let state = DashboardState::Error {
            message: "Could not load your profile".into(),
        };
        let view = DashboardView::render(&state).unwrap();
        assert_eq!(view.error.as_deref(), Some("Could not load your profile"));
        assert!(view.summary.is_none());
        assert!(view.primary_actions.is_empty());
    }

    #[test]
    fn test_summary_fallbacks() {
        let summary = ProfileSummary::from(&profile());
        assert!(summary.blood_group.is_none());
        assert_eq!(summary.medical[0], SummaryRow::new("Allergies", "Peanuts"));
        assert_eq!(
            summary.medical[1],
            SummaryRow::new("Chronic Conditions", NONE_REPORTED)
        );
        assert_eq!(summary.medical.len(), 3);
        assert_eq!(summary.contact.name, "Jane Doe");
        assert!(summary.contact.relation.is_none());
    }

    #[test]
    fn test_blank_text_counts_as_absent() {
        let mut profile = profile();
        profile.blood_group = Some("  ".into());
        profile.additional_notes = Some(String::new());

        let summary = ProfileSummary::from(&profile);
        assert!(summary.blood_group.is_none());
        assert_eq!(summary.medical.len(), 3);
    }

    #[test]
    fn test_blood_group_is_independent() {
        let without = profile();
        let mut with = without.clone();
        with.blood_group = Some("AB-".into());

        let a = ProfileSummary::from(&without);
        let b = ProfileSummary::from(&with);
        assert_eq!(b.blood_group.as_deref(), Some("AB-"));
        assert_eq!(a.medical, b.medical);
        assert_eq!(a.contact, b.contact);
    }

    #[test]
    fn test_loaded_actions() {
        let state = DashboardState::Loaded {
            profile: profile(),
            qr: None,
        };
        let view = DashboardView::render(&state).unwrap();
        assert!(view.summary.is_some());
        assert!(view.qr.is_none());
        assert_eq!(
            view.primary_actions,
            vec![
                DashboardAction::EditProfile,
                DashboardAction::PreviewEmergencyView,
                DashboardAction::MedicationReminders,
            ]
        );
        assert_eq!(
            view.header_actions,
            vec![DashboardAction::GoBack, DashboardAction::SignOut]
        );
    }
}
