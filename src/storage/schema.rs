//! Database schema for the console's local key-value store

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Small JSON documents keyed by a fixed name (URL history, job list)
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
