//! Populates the source store from JSON fixtures

pub mod steps;

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params_from_iter, Connection};
use tracing::{debug, info, warn};

use crate::config::{Config, ConflictPolicy};
use crate::error::SeedError;
use crate::fixtures::FixtureDir;
use crate::schema::{get_table, topological_sort};
use crate::store::{apply_schema, create_fresh_store};
use crate::ui::{Phase, Ui};
use crate::writer::{insert_sql, Row};

pub use steps::{SeedStep, STEPS};

/// Rows written to one table
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TableCount {
    pub inserted: u64,
    pub skipped: u64,
}

/// Per-table outcome of a seeding run, in first-write order
#[derive(Debug, Default, Clone)]
pub struct SeedReport {
    tables: Vec<(&'static str, TableCount)>,
}

impl SeedReport {
    fn entry(&mut self, table: &'static str) -> &mut TableCount {
        let idx = match self.tables.iter().position(|(name, _)| *name == table) {
            Some(idx) => idx,
            None => {
                self.tables.push((table, TableCount::default()));
                self.tables.len() - 1
            }
        };
        &mut self.tables[idx].1
    }

    pub fn get(&self, table: &str) -> Option<&TableCount> {
        self.tables
            .iter()
            .find(|(name, _)| *name == table)
            .map(|(_, count)| count)
    }

    pub fn tables(&self) -> &[(&'static str, TableCount)] {
        &self.tables
    }

    pub fn total_inserted(&self) -> u64 {
        self.tables.iter().map(|(_, c)| c.inserted).sum()
    }

    pub fn total_skipped(&self) -> u64 {
        self.tables.iter().map(|(_, c)| c.skipped).sum()
    }
}

/// What a step sees while it runs: the open transaction, the fixtures and
/// the per-table policies
pub struct SeedContext<'a> {
    conn: &'a Connection,
    fixtures: &'a FixtureDir,
    user_id: i64,
    policies: &'a HashMap<&'static str, ConflictPolicy>,
    step: &'static SeedStep,
    report: &'a mut SeedReport,
}

impl<'a> SeedContext<'a> {
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn fixtures(&self) -> &FixtureDir {
        self.fixtures
    }

    /// Insert one row. Returns `Ok(false)` when the row broke a constraint
    /// on a table whose policy is [`ConflictPolicy::Skip`].
    pub fn insert(&mut self, table: &str, row: Row) -> crate::error::Result<bool> {
        let schema = get_table(table).ok_or_else(|| SeedError::UnknownTable(table.to_string()))?;
        if !self.step.tables.contains(&schema.name) {
            return Err(SeedError::UndeclaredTable {
                step: self.step.name.to_string(),
                table: schema.name.to_string(),
            });
        }

        let params = row.to_params(schema)?;
        let mut stmt = self.conn.prepare_cached(&insert_sql(schema))?;

        match stmt.execute(params_from_iter(params.iter())) {
            Ok(_) => {
                self.report.entry(schema.name).inserted += 1;
                Ok(true)
            }
            Err(e) => {
                let err = SeedError::from(e);
                let policy = self
                    .policies
                    .get(schema.name)
                    .copied()
                    .unwrap_or(ConflictPolicy::Abort);

                if err.is_constraint_violation() && policy == ConflictPolicy::Skip {
                    warn!("{}: skipping row ({}): {:?}", schema.name, err, params);
                    self.report.entry(schema.name).skipped += 1;
                    Ok(false)
                } else {
                    Err(err)
                }
            }
        }
    }
}

/// Order steps so that a step runs after every step that writes a table it
/// references. Declaration order breaks ties.
pub fn plan_steps(steps: &'static [SeedStep]) -> crate::error::Result<Vec<&'static SeedStep>> {
    let mut owner: HashMap<&'static str, &'static str> = HashMap::new();
    for step in steps {
        for table in step.tables {
            get_table(table).ok_or_else(|| SeedError::UnknownTable(table.to_string()))?;
            owner.insert(*table, step.name);
        }
    }

    let names: Vec<&'static str> = steps.iter().map(|s| s.name).collect();
    let order = topological_sort(&names, |name| {
        let mut deps: Vec<&'static str> = Vec::new();
        let step = steps.iter().find(|s| s.name == name);
        for table in step.map(|s| s.tables).unwrap_or_default() {
            let parents = get_table(table)
                .map(|t| t.foreign_keys)
                .unwrap_or_default();
            for fk in parents {
                if let Some(&parent_step) = owner.get(fk.references_table) {
                    if parent_step != name && !deps.contains(&parent_step) {
                        deps.push(parent_step);
                    }
                }
            }
        }
        deps
    })?;

    Ok(order
        .into_iter()
        .filter_map(|name| steps.iter().find(|s| s.name == name))
        .collect())
}

/// Owns the source store connection for the duration of a seeding run
pub struct Seeder {
    conn: Connection,
    fixtures: FixtureDir,
    user_id: i64,
    policies: HashMap<&'static str, ConflictPolicy>,
}

impl Seeder {
    pub fn new(conn: Connection, config: &Config) -> Self {
        Self {
            conn,
            fixtures: FixtureDir::new(&config.fixtures_dir),
            user_id: config.user_id,
            policies: config.policies().into_iter().collect(),
        }
    }

    /// Rebuild the store at `path` from `schema_script` and seed into it
    pub fn create(path: &Path, schema_script: &str, config: &Config) -> Result<Self> {
        let conn = create_fresh_store(path)?;
        apply_schema(&conn, schema_script)?;
        Ok(Self::new(conn, config))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Run every step inside one transaction, committed once at the end.
    /// Any error drops the transaction, so a failed run commits nothing.
    pub fn run(&mut self, ui: &mut impl Ui) -> Result<SeedReport> {
        let steps = plan_steps(STEPS)?;
        ui.set_phase(Phase::Seeding);
        info!(
            "Seeding {} steps from {:?}",
            steps.len(),
            self.fixtures.root()
        );

        let mut policies: Vec<_> = self.policies.iter().collect();
        policies.sort_by_key(|(table, _)| **table);
        for (table, policy) in policies {
            debug!("{}: conflict policy {}", table, policy);
        }

        let tx = self.conn.transaction()?;
        let mut report = SeedReport::default();
        let total = steps.len() as u64;

        for (idx, step) in steps.into_iter().enumerate() {
            ui.set_progress(idx as u64, total, "fixtures");
            debug!("Step {} ({:?})", step.name, step.fixtures);

            let mut ctx = SeedContext {
                conn: &tx,
                fixtures: &self.fixtures,
                user_id: self.user_id,
                policies: &self.policies,
                step,
                report: &mut report,
            };
            (step.run)(&mut ctx).with_context(|| format!("Seed step {} failed", step.name))?;

            info!("{}: done", step.name);
        }

        tx.commit()?;
        ui.set_progress(total, total, "fixtures");
        ui.clear_progress();

        for (table, count) in report.tables() {
            if count.skipped > 0 {
                warn!("{}: {} rows skipped on conflict", table, count.skipped);
            }
        }
        ui.log(format!(
            "Seeded {} rows ({} skipped)",
            report.total_inserted(),
            report.total_skipped()
        ));

        Ok(report)
    }
}
