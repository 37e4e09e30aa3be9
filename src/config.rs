use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::error::SeedError;
use crate::schema::{get_table, DependencyResolver};
use crate::writer::generate_schema_script;

/// What to do when a row violates a uniqueness or integrity constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Fail the run
    Abort,
    /// Log the row, skip it and keep going
    Skip,
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictPolicy::Abort => write!(f, "abort"),
            ConflictPolicy::Skip => write!(f, "skip"),
        }
    }
}

/// Tables whose constraint violations are skipped unless configured otherwise
pub const DEFAULT_SKIP_TABLES: &[&str] = &["part_stats"];

/// Paths and policies for a seed/replicate run
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the JSON fixtures
    pub fixtures_dir: PathBuf,
    /// Source store, rebuilt by the seeder
    pub source_db: PathBuf,
    /// Destination store, rebuilt by the replicator
    pub destination_db: PathBuf,
    /// External DDL script; the generated schema is used when unset
    pub ddl_script: Option<PathBuf>,
    /// Owner of all per-user seed rows
    pub user_id: i64,
    conflict_policies: HashMap<&'static str, ConflictPolicy>,
}

impl Default for Config {
    fn default() -> Self {
        let conflict_policies = DEFAULT_SKIP_TABLES
            .iter()
            .map(|table| (*table, ConflictPolicy::Skip))
            .collect();

        Self {
            fixtures_dir: PathBuf::from("json_files"),
            source_db: PathBuf::from("arcaea_source.db"),
            destination_db: PathBuf::from("ArcaeaDB.db"),
            ddl_script: None,
            user_id: 1,
            conflict_policies,
        }
    }
}

impl Config {
    /// Config for the given paths with default user and policies
    pub fn new(
        fixtures_dir: impl Into<PathBuf>,
        source_db: impl Into<PathBuf>,
        destination_db: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fixtures_dir: fixtures_dir.into(),
            source_db: source_db.into(),
            destination_db: destination_db.into(),
            ..Self::default()
        }
    }

    /// Policy for `table`; tables without an explicit entry abort
    pub fn policy_for(&self, table: &str) -> ConflictPolicy {
        self.conflict_policies
            .get(table)
            .copied()
            .unwrap_or(ConflictPolicy::Abort)
    }

    pub fn set_policy(&mut self, table: &str, policy: ConflictPolicy) -> Result<(), SeedError> {
        let schema = get_table(table).ok_or_else(|| SeedError::UnknownTable(table.to_string()))?;
        self.conflict_policies.insert(schema.name, policy);
        Ok(())
    }

    /// Mark each of `tables` as [`ConflictPolicy::Skip`]
    pub fn skip_conflicts_on<S: AsRef<str>>(&mut self, tables: &[S]) -> Result<(), SeedError> {
        for table in tables {
            self.set_policy(table.as_ref(), ConflictPolicy::Skip)?;
        }
        Ok(())
    }

    /// Tables with an explicit policy, sorted by name
    pub fn policies(&self) -> Vec<(&'static str, ConflictPolicy)> {
        let mut policies: Vec<_> = self
            .conflict_policies
            .iter()
            .map(|(table, policy)| (*table, *policy))
            .collect();
        policies.sort_by_key(|(table, _)| *table);
        policies
    }

    /// DDL script applied to both stores
    pub fn schema_script(&self) -> Result<String> {
        match &self.ddl_script {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read DDL script {:?}", path)),
            None => {
                let tables = DependencyResolver::new().all_tables_ordered()?;
                Ok(generate_schema_script(&tables))
            }
        }
    }
}
