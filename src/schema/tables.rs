//! Table schema definitions for the game server database

use super::types::*;

use super::types::ColumnType::{Flag, Integer, Real, Text};

// =============================================================================
// Game configuration
// =============================================================================

pub static GAME_INFO: TableSchema = TableSchema {
    name: "game_info",
    columns: &[
        Column::new("is_aprilfools", Flag),
        Column::required("max_stamina", Integer),
        Column::required("stamina_recover_tick", Integer),
        Column::required("core_exp", Integer),
        Column::new("world_ranking_enabled", Flag),
        Column::new("is_byd_chapter_unlocked", Flag),
    ],
    primary_key: &[],
    foreign_keys: &[],
};

pub static LEVEL_EXP: TableSchema = TableSchema {
    name: "level_exp",
    columns: &[
        Column::required("lv", Integer),
        Column::required("exp_val", Integer),
    ],
    primary_key: &["lv"],
    foreign_keys: &[],
};

pub static PARTNER: TableSchema = TableSchema {
    name: "partner",
    columns: &[
        Column::required("part_id", Integer),
        Column::new("skill_id", Text),
        Column::new("skill_id_uncap", Text),
        Column::required("char_type", Integer),
        Column::new("skill_requires_uncap", Flag),
        Column::new("skill_unlock_level", Integer),
        Column::required("part_name", Text),
        Column::new("frag_1", Real),
        Column::new("frag_20", Real),
        Column::new("prog_1", Real),
        Column::new("prog_20", Real),
        Column::new("overdrive_1", Real),
        Column::new("overdrive_20", Real),
    ],
    primary_key: &["part_id"],
    foreign_keys: &[],
};

pub static WORLD_MAP: TableSchema = TableSchema {
    name: "world_map",
    columns: &[
        Column::required("map_id", Text),
        Column::new("available_from", Integer),
        Column::new("available_to", Integer),
        Column::new("beyond_health", Integer),
        Column::new("chapter", Integer),
        Column::new("coordinate", Text),
        Column::new("custom_bg", Text),
        Column::new("is_beyond", Flag),
        Column::new("is_legacy", Flag),
        Column::new("is_repeatable", Flag),
        Column::new("require_id", Text),
        Column::new("require_type", Text),
        Column::new("require_value", Integer),
        Column::required("stamina_cost", Integer),
        Column::required("step_count", Integer),
    ],
    primary_key: &["map_id"],
    foreign_keys: &[],
};

pub static MAP_REWARD: TableSchema = TableSchema {
    name: "map_reward",
    columns: &[
        Column::required("map_id", Text),
        Column::new("reward_id", Text),
        Column::required("item_type", Text),
        Column::new("amount", Integer),
        Column::required("position", Integer),
    ],
    primary_key: &["map_id", "position"],
    foreign_keys: &[ForeignKey::new(&["map_id"], "world_map", &["map_id"])],
};

pub static MAP_AFFINITY: TableSchema = TableSchema {
    name: "map_affinity",
    columns: &[
        Column::required("map_id", Text),
        Column::required("part_id", Integer),
        Column::required("multiplier", Real),
    ],
    primary_key: &["map_id", "part_id"],
    foreign_keys: &[
        ForeignKey::new(&["map_id"], "world_map", &["map_id"]),
        ForeignKey::new(&["part_id"], "partner", &["part_id"]),
    ],
};

pub static PACK: TableSchema = TableSchema {
    name: "pack",
    columns: &[
        Column::required("pack_name", Text),
        Column::required("price", Integer),
        Column::required("orig_price", Integer),
        Column::new("discount_from", Integer).default("0"),
        Column::new("discount_to", Integer).default("0"),
    ],
    primary_key: &["pack_name"],
    foreign_keys: &[],
};

pub static PACK_ITEM: TableSchema = TableSchema {
    name: "pack_item",
    columns: &[
        Column::required("pack_name", Text),
        Column::required("item_id", Text),
        Column::required("item_type", Text),
        Column::new("is_available", Flag),
    ],
    primary_key: &["pack_name", "item_id", "item_type"],
    foreign_keys: &[ForeignKey::new(&["pack_name"], "pack", &["pack_name"])],
};

pub static SONG: TableSchema = TableSchema {
    name: "song",
    columns: &[
        Column::required("song_id", Text),
        Column::new("title_local_en", Text),
        Column::new("title_local_ko", Text),
        Column::new("title_local_ja", Text),
        Column::new("title_local_zh_hant", Text),
        Column::new("title_local_zh_hans", Text),
        Column::new("artist", Text),
        Column::new("bpm", Text),
        Column::new("bpm_base", Real),
        Column::required("pack_name", Text),
        Column::new("purchase", Text),
        Column::new("audio_preview", Integer),
        Column::new("audio_preview_end", Integer),
        Column::new("side", Integer),
        Column::new("world_unlock", Flag),
        Column::new("bg", Text),
        Column::new("date", Integer),
        Column::new("version", Text),
        Column::new("remote_dl", Flag),
        Column::required("checksum", Text),
    ],
    primary_key: &["song_id"],
    foreign_keys: &[ForeignKey::new(&["pack_name"], "pack", &["pack_name"])],
};

pub static CHART_INFO: TableSchema = TableSchema {
    name: "chart_info",
    columns: &[
        Column::required("song_id", Text),
        Column::required("difficulty", Integer),
        Column::new("chart_designer", Text),
        Column::new("jacket_designer", Text),
        Column::required("rating", Real),
        Column::new("remote_dl", Flag),
        Column::required("checksum", Text),
    ],
    primary_key: &["song_id", "difficulty"],
    foreign_keys: &[ForeignKey::new(&["song_id"], "song", &["song_id"])],
};

pub static SINGLE: TableSchema = TableSchema {
    name: "single",
    columns: &[Column::required("song_id", Text)],
    primary_key: &["song_id"],
    foreign_keys: &[ForeignKey::new(&["song_id"], "song", &["song_id"])],
};

pub static CORE: TableSchema = TableSchema {
    name: "core",
    columns: &[
        Column::required("core_id", Text),
        Column::required("core_name", Text),
        Column::required("internal_id", Text),
    ],
    primary_key: &["core_id"],
    foreign_keys: &[],
};

pub static WORLD_ITEM: TableSchema = TableSchema {
    name: "world_item",
    columns: &[Column::required("item_name", Text)],
    primary_key: &["item_name"],
    foreign_keys: &[],
};

/// World songs include the beyond unlocks (`<song_id>3`), so there is no
/// reference back to `song`.
pub static WORLD_SONG: TableSchema = TableSchema {
    name: "world_song",
    columns: &[Column::required("item_name", Text)],
    primary_key: &["item_name"],
    foreign_keys: &[],
};

// =============================================================================
// Player save data
// =============================================================================

pub static PLAYER: TableSchema = TableSchema {
    name: "player",
    columns: &[
        Column::required("user_id", Integer),
        Column::new("email", Text),
        Column::new("pwdhash", Text),
        Column::required("user_name", Text),
        Column::new("display_name", Text),
        Column::required("user_code", Integer),
        Column::new("ticket", Integer).default("0"),
        Column::new("partner", Integer),
        Column::new("is_locked_name_duplicated", Flag),
        Column::new("is_skill_sealed", Flag),
        Column::new("curr_map", Text),
        Column::new("prog_boost", Integer).default("0"),
        Column::new("stamina", Integer).default("12"),
        Column::new("next_fragstam_ts", Integer).default("0"),
        Column::new("max_stamina_ts", Integer).default("0"),
        Column::new("max_stamina_notification", Flag),
        Column::new("is_hide_rating", Flag),
        Column::new("favorite_partner", Integer),
        Column::new("recent_score_date", Integer).default("0"),
        Column::new("max_friend", Integer).default("50"),
        Column::new("rating", Integer).default("0"),
        Column::required("join_date", Integer),
    ],
    primary_key: &["user_id"],
    foreign_keys: &[],
};

pub static FRIEND_LIST: TableSchema = TableSchema {
    name: "friend_list",
    columns: &[
        Column::required("user_id", Integer),
        Column::required("friend_id", Integer),
    ],
    primary_key: &["user_id", "friend_id"],
    foreign_keys: &[
        ForeignKey::new(&["user_id"], "player", &["user_id"]),
        ForeignKey::new(&["friend_id"], "player", &["user_id"]),
    ],
};

pub static PLAYER_MAP_PROG: TableSchema = TableSchema {
    name: "player_map_prog",
    columns: &[
        Column::required("user_id", Integer),
        Column::required("map_id", Text),
        Column::new("curr_capture", Integer).default("0"),
        Column::new("curr_position", Integer).default("0"),
        Column::new("is_locked", Flag),
    ],
    primary_key: &["user_id", "map_id"],
    foreign_keys: &[
        ForeignKey::new(&["user_id"], "player", &["user_id"]),
        ForeignKey::new(&["map_id"], "world_map", &["map_id"]),
    ],
};

pub static DATA_BACKUP: TableSchema = TableSchema {
    name: "data_backup",
    columns: &[
        Column::required("user_id", Integer),
        Column::new("backup_data", Text),
    ],
    primary_key: &["user_id"],
    foreign_keys: &[ForeignKey::new(&["user_id"], "player", &["user_id"])],
};

pub static PACK_PURCHASE_INFO: TableSchema = TableSchema {
    name: "pack_purchase_info",
    columns: &[
        Column::required("user_id", Integer),
        Column::required("pack_name", Text),
    ],
    primary_key: &["user_id", "pack_name"],
    foreign_keys: &[
        ForeignKey::new(&["user_id"], "player", &["user_id"]),
        ForeignKey::new(&["pack_name"], "pack", &["pack_name"]),
    ],
};

pub static SINGLE_PURCHASE_INFO: TableSchema = TableSchema {
    name: "single_purchase_info",
    columns: &[
        Column::required("user_id", Integer),
        Column::required("song_id", Text),
    ],
    primary_key: &["user_id", "song_id"],
    foreign_keys: &[
        ForeignKey::new(&["user_id"], "player", &["user_id"]),
        ForeignKey::new(&["song_id"], "single", &["song_id"]),
    ],
};

pub static PART_STATS: TableSchema = TableSchema {
    name: "part_stats",
    columns: &[
        Column::required("user_id", Integer),
        Column::required("part_id", Integer),
        Column::new("is_uncapped_override", Flag),
        Column::new("is_uncapped", Flag),
        Column::new("exp_val", Real).default("0"),
        Column::new("overdrive", Real),
        Column::new("prog", Real),
        Column::new("frag", Real),
        Column::required("lv", Integer),
        Column::new("prog_tempest", Real).default("0"),
    ],
    primary_key: &["user_id", "part_id"],
    foreign_keys: &[
        ForeignKey::new(&["user_id"], "player", &["user_id"]),
        ForeignKey::new(&["part_id"], "partner", &["part_id"]),
        ForeignKey::new(&["lv"], "level_exp", &["lv"]),
    ],
};

pub static CORE_POSSESS_INFO: TableSchema = TableSchema {
    name: "core_possess_info",
    columns: &[
        Column::required("core_id", Text),
        Column::required("user_id", Integer),
        Column::new("amount", Integer).default("0"),
    ],
    primary_key: &["core_id", "user_id"],
    foreign_keys: &[
        ForeignKey::new(&["core_id"], "core", &["core_id"]),
        ForeignKey::new(&["user_id"], "player", &["user_id"]),
    ],
};

pub static WORLD_UNLOCK: TableSchema = TableSchema {
    name: "world_unlock",
    columns: &[
        Column::required("user_id", Integer),
        Column::required("item_name", Text),
    ],
    primary_key: &["user_id", "item_name"],
    foreign_keys: &[
        ForeignKey::new(&["user_id"], "player", &["user_id"]),
        ForeignKey::new(&["item_name"], "world_item", &["item_name"]),
    ],
};

pub static WORLD_SONG_UNLOCK: TableSchema = TableSchema {
    name: "world_song_unlock",
    columns: &[
        Column::required("user_id", Integer),
        Column::required("item_name", Text),
    ],
    primary_key: &["user_id", "item_name"],
    foreign_keys: &[
        ForeignKey::new(&["user_id"], "player", &["user_id"]),
        ForeignKey::new(&["item_name"], "world_song", &["item_name"]),
    ],
};

pub static SCORE: TableSchema = TableSchema {
    name: "score",
    columns: &[
        Column::required("user_id", Integer),
        Column::required("played_date", Integer),
        Column::required("song_id", Text),
        Column::required("difficulty", Integer),
        Column::required("score", Integer),
        Column::new("shiny_pure", Integer),
        Column::new("pure", Integer),
        Column::new("far", Integer),
        Column::new("lost", Integer),
        Column::new("rating", Real),
        Column::new("health", Integer),
        Column::new("modifier", Integer),
        Column::new("beyond_gauge", Integer),
        Column::new("clear_type", Integer),
    ],
    primary_key: &["user_id", "played_date"],
    foreign_keys: &[
        ForeignKey::new(&["user_id"], "player", &["user_id"]),
        ForeignKey::new(&["song_id"], "song", &["song_id"]),
    ],
};

pub static BEST_SCORE: TableSchema = TableSchema {
    name: "best_score",
    columns: &[
        Column::required("user_id", Integer),
        Column::required("played_date", Integer),
        Column::required("song_id", Text),
    ],
    primary_key: &["user_id", "played_date"],
    foreign_keys: &[ForeignKey::new(
        &["user_id", "played_date"],
        "score",
        &["user_id", "played_date"],
    )],
};

pub static RECENT_SCORE: TableSchema = TableSchema {
    name: "recent_score",
    columns: &[
        Column::required("user_id", Integer),
        Column::required("played_date", Integer),
        Column::new("is_recent_10", Flag),
    ],
    primary_key: &["user_id", "played_date"],
    foreign_keys: &[ForeignKey::new(
        &["user_id", "played_date"],
        "score",
        &["user_id", "played_date"],
    )],
};

pub static DL_REQUEST: TableSchema = TableSchema {
    name: "dl_request",
    columns: &[
        Column::required("user_id", Integer),
        Column::required("song_id", Text),
        Column::required("request_time", Integer),
    ],
    primary_key: &[],
    foreign_keys: &[
        ForeignKey::new(&["user_id"], "player", &["user_id"]),
        ForeignKey::new(&["song_id"], "song", &["song_id"]),
    ],
};

// =============================================================================
// Schema Registry
// =============================================================================

/// All table schemas in declaration order. Insertion order is derived from
/// the foreign keys by [`DependencyResolver`](super::DependencyResolver).
pub static ALL_TABLES: &[&TableSchema] = &[
    &GAME_INFO,
    &WORLD_MAP,
    &PARTNER,
    &MAP_REWARD,
    &MAP_AFFINITY,
    &PLAYER,
    &FRIEND_LIST,
    &PLAYER_MAP_PROG,
    &DATA_BACKUP,
    &PACK,
    &PACK_ITEM,
    &PACK_PURCHASE_INFO,
    &SONG,
    &CHART_INFO,
    &SINGLE,
    &SINGLE_PURCHASE_INFO,
    &LEVEL_EXP,
    &PART_STATS,
    &CORE,
    &CORE_POSSESS_INFO,
    &WORLD_ITEM,
    &WORLD_UNLOCK,
    &WORLD_SONG,
    &WORLD_SONG_UNLOCK,
    &SCORE,
    &BEST_SCORE,
    &RECENT_SCORE,
    &DL_REQUEST,
];

/// Get table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_keys_point_at_declared_columns() {
        for table in ALL_TABLES {
            for fk in table.foreign_keys {
                assert_eq!(fk.columns.len(), fk.references_columns.len());
                for col in fk.columns {
                    assert!(
                        table.column(col).is_some(),
                        "{}.{} is not a column",
                        table.name,
                        col
                    );
                }
                let parent = get_table(fk.references_table)
                    .unwrap_or_else(|| panic!("{} references unknown table", table.name));
                for col in fk.references_columns {
                    assert!(
                        parent.column(col).is_some(),
                        "{}.{} is not a column",
                        parent.name,
                        col
                    );
                }
            }
        }
    }

    #[test]
    fn test_primary_keys_are_columns() {
        for table in ALL_TABLES {
            for col in table.primary_key {
                assert!(table.column(col).is_some(), "{}.{}", table.name, col);
            }
        }
    }

    #[test]
    fn test_table_names_are_unique() {
        let mut names = table_names();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(total, 28);
    }
}
