//! Database schema SQL for the SQLite mapping store.

/// One row per document id; the map is stored in its JSON form.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS entity_mappings (
    document_id TEXT PRIMARY KEY,
    mapping_json TEXT NOT NULL,
    entry_count INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;
