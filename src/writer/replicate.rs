use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use tracing::info;

use super::schema_gen::{insert_sql, select_sql};
use crate::error::SeedError;
use crate::schema::{get_table, DependencyResolver, TableSchema};
use crate::store::{apply_schema, create_fresh_store};
use crate::ui::{Phase, Ui};

/// Rows copied per table, in copy order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReplicationReport {
    pub tables: Vec<(&'static str, u64)>,
}

impl ReplicationReport {
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|(_, count)| count).sum()
    }

    pub fn rows_for(&self, table: &str) -> Option<u64> {
        self.tables
            .iter()
            .find(|(name, _)| *name == table)
            .map(|(_, count)| *count)
    }
}

/// Copies tables from a source store into a rebuilt destination file
pub struct Replicator<'a> {
    source: &'a Connection,
    destination: PathBuf,
    schema_script: String,
}

impl<'a> Replicator<'a> {
    pub fn new(source: &'a Connection, destination: impl Into<PathBuf>, schema_script: String) -> Self {
        Self {
            source,
            destination: destination.into(),
            schema_script,
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Replicate every declared table in dependency order
    pub fn replicate_all(&self, ui: &mut impl Ui) -> Result<ReplicationReport> {
        let tables = DependencyResolver::new().all_tables_ordered()?;
        let names: Vec<&str> = tables.iter().map(|t| t.name).collect();
        self.replicate(&names, ui)
    }

    /// Replicate `table_names` in the given order.
    ///
    /// The destination file is deleted and rebuilt from the schema script
    /// before anything is read. All rows go through one transaction that is
    /// committed after the last table; an error drops it uncommitted.
    pub fn replicate(&self, table_names: &[&str], ui: &mut impl Ui) -> Result<ReplicationReport> {
        let schemas = table_names
            .iter()
            .map(|name| get_table(name).ok_or_else(|| SeedError::UnknownTable(name.to_string())))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        DependencyResolver::new().verify_order(table_names)?;

        ui.set_phase(Phase::Replicating);
        info!("Replicating {} tables into {:?}", schemas.len(), self.destination);

        let mut dest = create_fresh_store(&self.destination)?;
        apply_schema(&dest, &self.schema_script)?;

        let tx = dest.transaction()?;
        let mut report = ReplicationReport::default();

        for schema in schemas {
            let count = self
                .copy_table(&tx, schema, ui)
                .with_context(|| format!("Failed to replicate table {}", schema.name))?;
            info!("{}: {} rows", schema.name, count);
            report.tables.push((schema.name, count));
        }

        tx.commit()?;
        ui.clear_progress();
        ui.log(format!(
            "Replicated {} rows across {} tables",
            report.total_rows(),
            report.tables.len()
        ));

        Ok(report)
    }

    fn copy_table(
        &self,
        tx: &rusqlite::Transaction,
        schema: &TableSchema,
        ui: &mut impl Ui,
    ) -> Result<u64> {
        let expected = schema.columns.len();
        let found = self.source_column_count(schema.name)?;
        if found != expected {
            return Err(SeedError::ColumnMismatch {
                table: schema.name.to_string(),
                expected,
                found,
            }
            .into());
        }

        let total: i64 = self.source.query_row(
            &format!("SELECT COUNT(*) FROM {}", schema.name),
            [],
            |row| row.get(0),
        )?;
        let total = total as u64;

        let mut select = self.source.prepare(&select_sql(schema))?;
        let mut insert = tx.prepare(&insert_sql(schema))?;
        let mut rows = select.query([])?;
        let mut count: u64 = 0;

        while let Some(row) = rows.next()? {
            let values = (0..expected)
                .map(|idx| row.get::<_, Value>(idx))
                .collect::<rusqlite::Result<Vec<Value>>>()?;
            insert.execute(params_from_iter(values.iter()))?;

            count += 1;
            ui.set_progress(count, total, schema.name);
        }

        Ok(count)
    }

    fn source_column_count(&self, table: &str) -> Result<usize> {
        let stmt = self.source.prepare(&format!("SELECT * FROM {}", table))?;
        Ok(stmt.column_count())
    }
}
