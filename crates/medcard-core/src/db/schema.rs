//! SQLite schema definition.

/// Complete database schema for medcard.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Medical Profiles
-- ============================================================================

CREATE TABLE IF NOT EXISTS medical_profiles (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL UNIQUE,                -- one profile per user
    blood_group TEXT,
    allergies TEXT,
    chronic_conditions TEXT,
    medications TEXT,
    additional_notes TEXT,
    emergency_contact_name TEXT NOT NULL,
    emergency_contact_phone TEXT NOT NULL,
    emergency_contact_relation TEXT,
    qr_code_url TEXT,                            -- cached image, never trusted
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_profiles_user_id ON medical_profiles(user_id);
"#;
