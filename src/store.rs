//! Opening, rebuilding and initialising SQLite stores

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::writer::{split_statements, STATEMENT_DELIMITER};

/// Open (or create) a store with foreign key enforcement on
pub fn open_store(path: &Path) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Failed to open database {:?}", path))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Delete `path` if present and open a new, empty store in its place
pub fn create_fresh_store(path: &Path) -> Result<Connection> {
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove existing database {:?}", path))?;
    }
    open_store(path)
}

/// Run every statement of a DDL script against `conn`
pub fn apply_schema(conn: &Connection, script: &str) -> Result<()> {
    let statements = split_statements(script, STATEMENT_DELIMITER);
    debug!("Applying {} schema statements", statements.len());

    for stmt in statements {
        conn.execute_batch(stmt)
            .with_context(|| format!("Failed to apply schema statement: {}", stmt))?;
    }

    Ok(())
}

/// Open an existing store without write access
pub fn open_store_read_only(path: &Path) -> Result<Connection> {
    if !path.exists() {
        anyhow::bail!("Source database {:?} does not exist", path);
    }
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("Failed to open database {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_fresh_store_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.db");
        std::fs::write(&path, b"definitely not sqlite").unwrap();

        let conn = create_fresh_store(&path).unwrap();
        apply_schema(&conn, "CREATE TABLE t (x INTEGER);\n;\n").unwrap();
        let tables: i64 = conn
            .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn test_foreign_keys_are_enforced() {
        let dir = TempDir::new().unwrap();
        let conn = open_store(&dir.path().join("store.db")).unwrap();
        apply_schema(
            &conn,
            "CREATE TABLE parent (id INTEGER PRIMARY KEY);
             CREATE TABLE child (parent_id INTEGER REFERENCES parent(id));",
        )
        .unwrap();
        assert!(conn
            .execute("INSERT INTO child (parent_id) VALUES (7)", [])
            .is_err());
    }

    #[test]
    fn test_read_only_store_requires_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.db");
        assert!(open_store_read_only(&path).is_err());
        assert!(!path.exists());
    }
}
