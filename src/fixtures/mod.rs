//! JSON fixture files and their typed records

pub mod records;

pub use records::*;

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SeedError};

pub const PLAYER: &str = "player.json";
pub const LEVEL_EXP: &str = "level_exp.json";
pub const PARTNER_INFO: &str = "partner_info.json";
pub const PARTNER_STATUS: &str = "partner_status.json";
pub const PACK_INFO: &str = "pack_info.json";
pub const SONG_LIST: &str = "songlist";
pub const CHECKSUMS: &str = "checksums.json";
pub const RATING_INFO: &str = "rating_info.json";
pub const GAME_INFO: &str = "game_info.json";
pub const MAP_DATA: &str = "map_data.json";
pub const WORLD_ITEM: &str = "world_item.json";
pub const CORE_INFO: &str = "core_info.json";
pub const SCORES: &str = "scores.json";
pub const BACKUP_DATA: &str = "backup_data.json";

/// A directory of fixture files
#[derive(Debug, Clone)]
pub struct FixtureDir {
    root: PathBuf,
}

impl FixtureDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read a fixture file as text
    pub fn read(&self, file: &str) -> Result<String> {
        let path = self.path(file);
        fs::read_to_string(&path).map_err(|e| {
            SeedError::MissingFixtureData(format!("cannot read {:?}: {}", path, e))
        })
    }

    /// Parse a whole fixture file into `T`
    pub fn load<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let text = self.read(file)?;
        serde_json::from_str(&text).map_err(|source| SeedError::Fixture {
            file: self.path(file),
            source,
        })
    }
}

/// Compact a JSON backup document and drop its outer braces, leaving the
/// member list the save endpoint wraps itself
pub fn compact_backup(text: &str) -> std::result::Result<String, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let compact = value.to_string();
    Ok(compact
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .map(str::to_string)
        .unwrap_or(compact))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_reports_file_on_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LEVEL_EXP), "[0, 50, \"oops\"]").unwrap();
        let fixtures = FixtureDir::new(dir.path());

        match fixtures.load::<Vec<i64>>(LEVEL_EXP) {
            Err(SeedError::Fixture { file, .. }) => assert!(file.ends_with(LEVEL_EXP)),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_missing_fixture_data() {
        let dir = TempDir::new().unwrap();
        let fixtures = FixtureDir::new(dir.path());
        assert!(matches!(
            fixtures.load::<Vec<i64>>(LEVEL_EXP),
            Err(SeedError::MissingFixtureData(_))
        ));
    }

    #[test]
    fn test_compact_backup_keeps_key_order() {
        let text = "{\n  \"version\": 1,\n  \"scores\": [ {\"b\": 2, \"a\": 1} ]\n}\n";
        let compact = compact_backup(text).unwrap();
        assert_eq!(compact, r#""version":1,"scores":[{"b":2,"a":1}]"#);
    }
}
