//! Medical profile database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{EmergencyCard, ProfileRecord};

const PROFILE_COLUMNS: &str = r#"
    id, user_id, blood_group, allergies, chronic_conditions, medications,
    additional_notes, emergency_contact_name, emergency_contact_phone,
    emergency_contact_relation, qr_code_url, created_at, updated_at
"#;

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<ProfileRecord> {
    Ok(ProfileRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        blood_group: row.get(2)?,
        allergies: row.get(3)?,
        chronic_conditions: row.get(4)?,
        medications: row.get(5)?,
        additional_notes: row.get(6)?,
        emergency_contact_name: row.get(7)?,
        emergency_contact_phone: row.get(8)?,
        emergency_contact_relation: row.get(9)?,
        qr_code_url: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

impl Database {
    /// Insert a new profile. Fails if the user already has one.
    pub fn insert_profile(&self, profile: &ProfileRecord) -> DbResult<()> {
        profile
            .validate()
            .map_err(|e| DbError::Constraint(e.to_string()))?;

        if self.get_profile_by_user(&profile.user_id)?.is_some() {
            return Err(DbError::Constraint(format!(
                "user {} already has a profile",
                profile.user_id
            )));
        }

        self.conn.execute(
            r#"
            INSERT INTO medical_profiles (
                id, user_id, blood_group, allergies, chronic_conditions, medications,
                additional_notes, emergency_contact_name, emergency_contact_phone,
                emergency_contact_relation, qr_code_url, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                profile.id,
                profile.user_id,
                profile.blood_group,
                profile.allergies,
                profile.chronic_conditions,
                profile.medications,
                profile.additional_notes,
                profile.emergency_contact_name,
                profile.emergency_contact_phone,
                profile.emergency_contact_relation,
                profile.qr_code_url,
                profile.created_at,
                profile.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing profile. Ownership cannot change; `updated_at` is
    /// stored as given.
    pub fn update_profile(&self, profile: &ProfileRecord) -> DbResult<bool> {
        profile
            .validate()
            .map_err(|e| DbError::Constraint(e.to_string()))?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE medical_profiles SET
                blood_group = ?3,
                allergies = ?4,
                chronic_conditions = ?5,
                medications = ?6,
                additional_notes = ?7,
                emergency_contact_name = ?8,
                emergency_contact_phone = ?9,
                emergency_contact_relation = ?10,
                qr_code_url = ?11,
                updated_at = ?12
            WHERE id = ?1 AND user_id = ?2
            "#,
            params![
                profile.id,
                profile.user_id,
                profile.blood_group,
                profile.allergies,
                profile.chronic_conditions,
                profile.medications,
                profile.additional_notes,
                profile.emergency_contact_name,
                profile.emergency_contact_phone,
                profile.emergency_contact_relation,
                profile.qr_code_url,
                profile.updated_at,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Insert the profile, or update the user's existing one in place.
    ///
    /// When the user already has a profile its ID is kept, so previously
    /// printed QR codes stay valid. Returns the stored record.
    pub fn upsert_profile(&self, profile: &ProfileRecord) -> DbResult<ProfileRecord> {
        match self.get_profile_by_user(&profile.user_id)? {
            Some(existing) => {
                let mut merged = profile.clone();
                merged.id = existing.id;
                merged.created_at = existing.created_at;
                self.update_profile(&merged)?;
            }
            None => self.insert_profile(profile)?,
        }

        self.get_profile_by_user(&profile.user_id)?
            .ok_or_else(|| DbError::NotFound(format!("profile for user {}", profile.user_id)))
    }

    /// Get the profile owned by a user.
    pub fn get_profile_by_user(&self, user_id: &str) -> DbResult<Option<ProfileRecord>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM medical_profiles WHERE user_id = ?",
                    PROFILE_COLUMNS
                ),
                [user_id],
                profile_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a profile by its ID.
    pub fn get_profile(&self, id: &str) -> DbResult<Option<ProfileRecord>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM medical_profiles WHERE id = ?", PROFILE_COLUMNS),
                [id],
                profile_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get the public emergency card for a profile ID.
    pub fn get_emergency_card(&self, id: &str) -> DbResult<Option<EmergencyCard>> {
        Ok(self.get_profile(id)?.as_ref().map(EmergencyCard::from))
    }
}
