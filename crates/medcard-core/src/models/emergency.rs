//! Public emergency view projection.

use serde::{Deserialize, Serialize};

use super::profile::ProfileRecord;

/// What a first responder sees after scanning the QR code.
///
/// Excludes the owner ID, additional notes, the cached QR reference and
/// timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmergencyCard {
    pub profile_id: String,
    pub blood_group: Option<String>,
    pub allergies: Option<String>,
    pub chronic_conditions: Option<String>,
    pub medications: Option<String>,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub emergency_contact_relation: Option<String>,
}

impl From<&ProfileRecord> for EmergencyCard {
    fn from(profile: &ProfileRecord) -> Self {
        Self {
            profile_id: profile.id.clone(),
            blood_group: profile.blood_group.clone(),
            allergies: profile.allergies.clone(),
            chronic_conditions: profile.chronic_conditions.clone(),
            medications: profile.medications.clone(),
            emergency_contact_name: profile.emergency_contact_name.clone(),
            emergency_contact_phone: profile.emergency_contact_phone.clone(),
            emergency_contact_relation: profile.emergency_contact_relation.clone(),
        }
    }
}
