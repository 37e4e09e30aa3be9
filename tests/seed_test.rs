//! Seeding the source store from the bundled fixtures

mod common;

use std::fs;

use rusqlite::Connection;
use tempfile::TempDir;

use arcaea_seed::{ConflictPolicy, SeedError};
use common::*;

// =============================================================================
// Bundled fixtures
// =============================================================================

#[test]
fn test_partners_seeded_in_fixture_order() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, bundled_fixtures());
    let (seeder, _) = seed(&config).unwrap();

    let conn = seeder.connection();
    let mut stmt = conn
        .prepare("SELECT part_id, part_name, skill_id FROM partner ORDER BY rowid")
        .unwrap();
    let partners: Vec<(i64, String, Option<String>)> = stmt
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(
        partners.iter().map(|p| p.0).collect::<Vec<_>>(),
        vec![0, 1, 5]
    );
    assert_eq!(partners[0].1, "Hikari");
    // Empty skill ids are stored as NULL
    assert_eq!(partners[1].2, None);
}

#[test]
fn test_report_matches_store() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, bundled_fixtures());
    let (seeder, report) = seed(&config).unwrap();
    let conn = seeder.connection();

    for (table, count) in report.tables() {
        assert_eq!(row_count(conn, table), count.inserted as i64, "{}", table);
    }
    assert_eq!(report.get("level_exp").unwrap().inserted, 20);
    assert_eq!(report.get("chart_info").unwrap().inserted, 10);
    assert_eq!(report.total_inserted(), 89);
}

#[test]
fn test_duplicate_partner_status_is_skipped() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, bundled_fixtures());
    assert_eq!(config.policy_for("part_stats"), ConflictPolicy::Skip);

    let (seeder, report) = seed(&config).unwrap();
    let stats = report.get("part_stats").unwrap();
    assert_eq!(stats.inserted, 3);
    assert_eq!(stats.skipped, 1);

    // First record for a partner wins
    let lv: i64 = seeder
        .connection()
        .query_row("SELECT lv FROM part_stats WHERE part_id = 1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(lv, 11);
}

#[test]
fn test_duplicate_aborts_when_policy_is_abort() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir, bundled_fixtures());
    config.set_policy("part_stats", ConflictPolicy::Abort).unwrap();

    let err = seed(&config).err().unwrap();
    assert!(err
        .chain()
        .filter_map(|e| e.downcast_ref::<SeedError>())
        .any(SeedError::is_constraint_violation));

    let conn = Connection::open(&config.source_db).unwrap();
    assert_eq!(row_count(&conn, "player"), 0);
}

#[test]
fn test_flags_and_derived_rows() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, bundled_fixtures());
    let (seeder, _) = seed(&config).unwrap();
    let conn = seeder.connection();

    let remote: Vec<(i64, Option<String>)> = conn
        .prepare("SELECT difficulty, remote_dl FROM chart_info WHERE song_id = 'sayonarahatsukoi' ORDER BY difficulty")
        .unwrap()
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert!(remote.iter().all(|(_, flag)| flag.is_none()));

    let beyond: Option<String> = conn
        .query_row(
            "SELECT remote_dl FROM chart_info WHERE song_id = 'grievouslady' AND difficulty = 3",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(beyond.as_deref(), Some("t"));

    let world_songs: Vec<String> = conn
        .prepare("SELECT item_name FROM world_song ORDER BY rowid")
        .unwrap()
        .query_map([], |r| r.get(0))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(world_songs, vec!["grievouslady", "grievouslady3"]);

    assert_eq!(row_count(conn, "single"), 1);
    assert_eq!(row_count(conn, "pack_purchase_info"), 2);
    assert_eq!(row_count(conn, "friend_list"), 0);
}

#[test]
fn test_scores_ranked_by_rating() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, bundled_fixtures());
    let (seeder, _) = seed(&config).unwrap();
    let conn = seeder.connection();

    let first: (i64, String) = conn
        .query_row(
            "SELECT played_date, song_id FROM score ORDER BY rowid LIMIT 1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(first, (1600000100, "grievouslady".to_string()));

    let recent_10: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM recent_score WHERE is_recent_10 = 't'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(recent_10, 3);
}

#[test]
fn test_backup_is_compacted() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, bundled_fixtures());
    let (seeder, _) = seed(&config).unwrap();

    let data: String = seeder
        .connection()
        .query_row("SELECT backup_data FROM data_backup", [], |r| r.get(0))
        .unwrap();
    assert!(data.starts_with("\"version\":1,\"scores\":["));
    assert!(data.ends_with("\"settings\":{\"is_hide_rating\":false}"));
    assert!(!data.contains('\n'));
}

// =============================================================================
// Broken fixtures
// =============================================================================

#[test]
fn test_missing_required_field_commits_nothing() {
    let dir = TempDir::new().unwrap();
    let fixtures = copy_fixtures(dir.path());
    fs::write(
        fixtures.join("partner_info.json"),
        r#"[{"character_id": 0, "char_type": 1, "skill_unlock_level": 1,
             "frag_1": 1, "frag_20": 1, "prog_1": 1, "prog_20": 1,
             "overdrive_1": 1, "overdrive_20": 1}]"#,
    )
    .unwrap();
    let config = test_config(&dir, fixtures);

    let err = seed(&config).err().unwrap();
    let fixture_err = err
        .chain()
        .filter_map(|e| e.downcast_ref::<SeedError>())
        .find(|e| matches!(e, SeedError::Fixture { .. }));
    assert!(fixture_err.is_some(), "unexpected error: {:?}", err);

    // The schema exists but no step's rows were committed
    let conn = Connection::open(&config.source_db).unwrap();
    assert_eq!(row_count(&conn, "player"), 0);
    assert_eq!(row_count(&conn, "level_exp"), 0);
    assert_eq!(row_count(&conn, "partner"), 0);
}

#[test]
fn test_missing_fixture_file() {
    let dir = TempDir::new().unwrap();
    let fixtures = copy_fixtures(dir.path());
    fs::remove_file(fixtures.join("core_info.json")).unwrap();
    let config = test_config(&dir, fixtures);

    let err = seed(&config).err().unwrap();
    assert!(err
        .chain()
        .filter_map(|e| e.downcast_ref::<SeedError>())
        .any(|e| matches!(e, SeedError::MissingFixtureData(_))));
}

#[test]
fn test_reseeding_replaces_source() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, bundled_fixtures());
    drop(seed(&config).unwrap());

    let (seeder, report) = seed(&config).unwrap();
    assert_eq!(row_count(seeder.connection(), "player"), 1);
    assert_eq!(report.get("part_stats").unwrap().skipped, 1);
}

#[test]
fn test_skipped_scores_do_not_use_recent_slots() {
    let dir = TempDir::new().unwrap();
    let fixtures = copy_fixtures(dir.path());

    // Twelve scores, best first; the second best shares a play time with
    // the best and collides on the score key
    let scores: Vec<serde_json::Value> = (0..12)
        .map(|idx| {
            let time_played: i64 = if idx == 1 {
                1_600_000_000_000
            } else {
                1_600_000_000_000 + idx * 60_000
            };
            serde_json::json!({
                "song_id": "ifi",
                "difficulty": 2,
                "score": 9_000_000 + idx,
                "shiny_perfect_count": 900,
                "perfect_count": 1000,
                "near_count": 5,
                "miss_count": 1,
                "rating": 12.0 - idx as f64 * 0.5,
                "clear_type": 1,
                "time_played": time_played,
            })
        })
        .collect();
    fs::write(
        fixtures.join("scores.json"),
        serde_json::to_string(&scores).unwrap(),
    )
    .unwrap();

    let mut config = test_config(&dir, fixtures);
    config.skip_conflicts_on(&["score"]).unwrap();
    let (seeder, report) = seed(&config).unwrap();
    let conn = seeder.connection();

    assert_eq!(report.get("score").unwrap().inserted, 11);
    assert_eq!(report.get("score").unwrap().skipped, 1);
    assert_eq!(row_count(conn, "recent_score"), 11);

    let recent_10: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM recent_score WHERE is_recent_10 = 't'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(recent_10, 10);
}
