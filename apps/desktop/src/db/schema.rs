//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Key under which session progress is stored.
pub const STATE_KEY: &str = "biochem-quiz-state-v1";

/// Key under which study settings are stored.
pub const SETTINGS_KEY: &str = "biochem-quiz-settings-v1";

/// Complete schema for local SQLite database.
pub const SCHEMA: &str = r#"
-- Key-value storage for serialized snapshots
CREATE TABLE IF NOT EXISTS storage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);
"#;
