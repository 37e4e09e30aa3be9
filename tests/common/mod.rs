//! Helpers shared by the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::types::Value;
use rusqlite::Connection;
use tempfile::TempDir;

use arcaea_seed::schema::get_table;
use arcaea_seed::writer::select_sql;
use arcaea_seed::{Config, SeedReport, Seeder, SilentUi};

/// Sample fixture set bundled with the crate
pub fn bundled_fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Copy the bundled fixtures into `dir` so a test can edit them
pub fn copy_fixtures(dir: &Path) -> PathBuf {
    let target = dir.join("fixtures");
    fs::create_dir_all(&target).unwrap();
    for entry in fs::read_dir(bundled_fixtures()).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), target.join(entry.file_name())).unwrap();
    }
    target
}

/// Config pointing every path into `dir`
pub fn test_config(dir: &TempDir, fixtures: PathBuf) -> Config {
    Config::new(
        fixtures,
        dir.path().join("source.db"),
        dir.path().join("ArcaeaDB.db"),
    )
}

/// Seed a fresh source store from `config`
pub fn seed(config: &Config) -> anyhow::Result<(Seeder, SeedReport)> {
    let script = config.schema_script()?;
    let mut seeder = Seeder::create(&config.source_db, &script, config)?;
    let report = seeder.run(&mut SilentUi::new())?;
    Ok((seeder, report))
}

/// Every row of `table` in insertion order
pub fn table_rows(conn: &Connection, table: &str) -> Vec<Vec<Value>> {
    let schema = get_table(table).unwrap();
    let mut stmt = conn.prepare(&select_sql(schema)).unwrap();
    let width = schema.columns.len();
    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|idx| row.get::<_, Value>(idx))
                .collect::<rusqlite::Result<Vec<_>>>()
        })
        .unwrap();
    rows.map(|r| r.unwrap()).collect()
}

pub fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}
