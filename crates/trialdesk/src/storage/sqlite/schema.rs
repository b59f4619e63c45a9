//! SQL for the per-collection document tables.
//!
//! Table names come from `Entity::COLLECTION` constants, never from request
//! input.

/// DDL for one collection table and its listing index.
pub fn create_table(collection: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {collection} (
    id TEXT PRIMARY KEY,
    data TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_{collection}_created_at ON {collection}(created_at, id);
"#
    )
}

pub fn insert(collection: &str) -> String {
    format!(
        "INSERT INTO {collection} (id, data, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)"
    )
}

pub fn select_by_id(collection: &str) -> String {
    format!("SELECT data FROM {collection} WHERE id = ?1")
}

pub fn select_all(collection: &str) -> String {
    format!("SELECT data FROM {collection} ORDER BY created_at ASC, id ASC")
}

pub fn update(collection: &str) -> String {
    format!("UPDATE {collection} SET data = ?2, updated_at = ?3 WHERE id = ?1")
}

pub fn delete(collection: &str) -> String {
    format!("DELETE FROM {collection} WHERE id = ?1")
}
