//! Medical profile models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a profile cannot be saved.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileValidationError {
    #[error("Profile ID is empty")]
    MissingId,

    #[error("Owner user ID is empty")]
    MissingOwner,

    #[error("Emergency contact {0} is required")]
    MissingContactField(&'static str),
}

/// A user's emergency medical profile. At most one exists per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileRecord {
    /// Opaque unique ID; addresses the public emergency view
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Blood group (e.g., "O+", "AB-")
    pub blood_group: Option<String>,
    pub allergies: Option<String>,
    pub chronic_conditions: Option<String>,
    pub medications: Option<String>,
    pub additional_notes: Option<String>,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    /// Relation to the user (e.g., "Spouse")
    pub emergency_contact_relation: Option<String>,
    /// Cached QR image reference. Never used to derive the QR payload.
    pub qr_code_url: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl ProfileRecord {
    /// Create a new profile with the required emergency contact.
    pub fn new(user_id: String, contact_name: String, contact_phone: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            blood_group: None,
            allergies: None,
            chronic_conditions: None,
            medications: None,
            additional_notes: None,
            emergency_contact_name: contact_name,
            emergency_contact_phone: contact_phone,
            emergency_contact_relation: None,
            qr_code_url: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Check the fields the editing flow must supply.
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if self.id.trim().is_empty() {
            return Err(ProfileValidationError::MissingId);
        }
        if self.user_id.trim().is_empty() {
            return Err(ProfileValidationError::MissingOwner);
        }
        if self.emergency_contact_name.trim().is_empty() {
            return Err(ProfileValidationError::MissingContactField("name"));
        }
        if self.emergency_contact_phone.trim().is_empty() {
            return Err(ProfileValidationError::MissingContactField("phone"));
        }
        Ok(())
    }

    /// Whether the record carries an ID usable for the emergency link.
    pub fn has_public_id(&self) -> bool {
        !self.id.trim().is_empty()
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ProfileRecord {
        ProfileRecord::new("user-1".into(), "Jane Doe".into(), "+15551234567".into())
    }

    #[test]
    fn test_new_profile() {
        let profile = profile();
        assert_eq!(profile.user_id, "user-1");
        assert_eq!(profile.emergency_contact_name, "Jane Doe");
        assert_eq!(profile.id.len(), 36); // UUID format
        assert!(profile.has_public_id());
        assert!(profile.blood_group.is_none());
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_validate_contact() {
        let mut profile = profile();
        profile.emergency_contact_phone = "   ".into();
        assert_eq!(
            profile.validate(),
            Err(ProfileValidationError::MissingContactField("phone"))
        );

        profile.emergency_contact_name = String::new();
        assert_eq!(
            profile.validate(),
            Err(ProfileValidationError::MissingContactField("name"))
        );
    }

    #[test]
    fn test_validate_ids() {
        let mut profile = profile();
        profile.user_id = String::new();
        assert_eq!(profile.validate(), Err(ProfileValidationError::MissingOwner));

        profile.id = String::new();
        assert_eq!(profile.validate(), Err(ProfileValidationError::MissingId));
        assert!(!profile.has_public_id());

        profile.id = "   ".into();
        assert_eq!(profile.validate(), Err(ProfileValidationError::MissingId));
        assert!(!profile.has_public_id());
    }
}
