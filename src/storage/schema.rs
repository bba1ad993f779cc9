//! Database schema definitions.

/// SQL schema for creating all engine tables.
pub const SCHEMA: &str = r#"
-- Per-user, per-domain rating state. Rows are created lazily on first
-- update and never deleted.
CREATE TABLE IF NOT EXISTS domain_vibe_levels (
    user_id TEXT NOT NULL,
    domain TEXT NOT NULL,
    rating REAL NOT NULL DEFAULT 1000.0,
    rating_deviation REAL NOT NULL DEFAULT 350.0,
    volatility REAL NOT NULL DEFAULT 0.06,
    last_updated_at TEXT,
    created_at TEXT NOT NULL,
    PRIMARY KEY (user_id, domain)
);

CREATE INDEX IF NOT EXISTS idx_domain_vibe_levels_last_updated
    ON domain_vibe_levels(last_updated_at);

-- Append-only audit trail: one row per rating mutation.
CREATE TABLE IF NOT EXISTS vibe_level_changes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    domain TEXT NOT NULL,
    session_id TEXT,
    old_rating REAL NOT NULL,
    new_rating REAL NOT NULL,
    old_rd REAL NOT NULL,
    new_rd REAL NOT NULL,
    change_amount REAL NOT NULL,
    performance_score REAL NOT NULL,
    domain_impact REAL NOT NULL,
    points_awarded INTEGER NOT NULL,
    change_reason TEXT NOT NULL,
    metadata TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_vibe_level_changes_user ON vibe_level_changes(user_id, domain);
CREATE INDEX IF NOT EXISTS idx_vibe_level_changes_session ON vibe_level_changes(session_id);
"#;

/// SQL for schema version tracking (migrations)
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version
pub const CURRENT_VERSION: i32 = 1;
