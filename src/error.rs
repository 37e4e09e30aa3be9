use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to parse fixture {file:?}: {source}")]
    Fixture {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing fixture data: {0}")]
    MissingFixtureData(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown column {column} for table {table}")]
    UnknownColumn { table: String, column: String },

    #[error("Seed step {step} writes {table}, which it does not declare")]
    UndeclaredTable { step: String, table: String },

    #[error("Circular dependency detected at: {0}")]
    DependencyCycle(String),

    #[error("Table {child} is ordered before its parent {parent}")]
    OrderViolation { child: String, parent: String },

    #[error("Table {table} has {found} columns in the source store, expected {expected}")]
    ColumnMismatch {
        table: String,
        expected: usize,
        found: usize,
    },
}

impl SeedError {
    /// True when the store rejected a row for a uniqueness or integrity
    /// constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            SeedError::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

pub type Result<T> = std::result::Result<T, SeedError>;
