pub const SCHEMA_VERSION: i32 = 1;

pub const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS blobs (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Migration scripts in order; entry `n` takes a database from version `n` to `n + 1`.
pub const MIGRATIONS: &[&str] = &[SCHEMA_V1];
