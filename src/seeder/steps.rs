//! Fixture steps: each reads one or more fixture files and writes the rows
//! for the tables it declares

use crate::error::{Result, SeedError};
use crate::fixtures::{
    self, ChecksumFile, CoreRecord, GameInfoRecord, MapRecord, PackInfoFile, PartnerRecord,
    PartnerStatusRecord, PlayerRecord, RatingInfoFile, ScoreRecord, SongList,
};
use crate::writer::{Row, SqlValue};

use super::SeedContext;

/// Chart difficulty that unlocks the beyond world song
const BEYOND_DIFFICULTY: i64 = 3;
/// Scores kept in the recent list, best first
const RECENT_SCORES: usize = 30;
/// Of the recent scores, how many count towards the recent-10 rating
const RECENT_10: usize = 10;
/// Packs every player owns without a purchase row
const FREE_PACKS: &[&str] = &["base", "single"];

/// One unit of seeding work
pub struct SeedStep {
    pub name: &'static str,
    pub fixtures: &'static [&'static str],
    /// Every table the step inserts into
    pub tables: &'static [&'static str],
    pub run: fn(&mut SeedContext<'_>) -> Result<()>,
}

/// All seed steps in declaration order. Run order is derived by
/// [`plan_steps`](super::plan_steps).
pub static STEPS: &[SeedStep] = &[
    SeedStep {
        name: "player",
        fixtures: &[fixtures::PLAYER],
        tables: &["player"],
        run: seed_player,
    },
    SeedStep {
        name: "level_exp",
        fixtures: &[fixtures::LEVEL_EXP],
        tables: &["level_exp"],
        run: seed_level_exp,
    },
    SeedStep {
        name: "partners",
        fixtures: &[fixtures::PARTNER_INFO],
        tables: &["partner"],
        run: seed_partners,
    },
    SeedStep {
        name: "partner_stats",
        fixtures: &[fixtures::PARTNER_STATUS],
        tables: &["part_stats"],
        run: seed_partner_stats,
    },
    SeedStep {
        name: "packs",
        fixtures: &[fixtures::PACK_INFO],
        tables: &["pack", "pack_item", "pack_purchase_info"],
        run: seed_packs,
    },
    SeedStep {
        name: "songs",
        fixtures: &[fixtures::SONG_LIST, fixtures::CHECKSUMS, fixtures::RATING_INFO],
        tables: &[
            "song",
            "single",
            "single_purchase_info",
            "world_song",
            "world_song_unlock",
            "chart_info",
        ],
        run: seed_songs,
    },
    SeedStep {
        name: "game_info",
        fixtures: &[fixtures::GAME_INFO],
        tables: &["game_info"],
        run: seed_game_info,
    },
    SeedStep {
        name: "maps",
        fixtures: &[fixtures::MAP_DATA],
        tables: &["world_map", "player_map_prog", "map_affinity", "map_reward"],
        run: seed_maps,
    },
    SeedStep {
        name: "world_items",
        fixtures: &[fixtures::WORLD_ITEM],
        tables: &["world_item", "world_unlock"],
        run: seed_world_items,
    },
    SeedStep {
        name: "cores",
        fixtures: &[fixtures::CORE_INFO],
        tables: &["core", "core_possess_info"],
        run: seed_cores,
    },
    SeedStep {
        name: "scores",
        fixtures: &[fixtures::SCORES],
        tables: &["score", "best_score", "recent_score"],
        run: seed_scores,
    },
    SeedStep {
        name: "backup",
        fixtures: &[fixtures::BACKUP_DATA],
        tables: &["data_backup"],
        run: seed_backup,
    },
];

/// Empty strings are stored as NULL
fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn seed_player(ctx: &mut SeedContext<'_>) -> Result<()> {
    let player: PlayerRecord = ctx.fixtures().load(fixtures::PLAYER)?;

    let row = Row::new()
        .set("user_id", ctx.user_id())
        .set("email", player.email.as_deref())
        .set("pwdhash", player.pwdhash.as_deref())
        .set("user_name", player.user_name.as_str())
        .set("display_name", player.display_name.as_deref())
        .set("user_code", player.user_code)
        .set("ticket", player.ticket)
        .set("partner", player.character)
        .set("curr_map", player.current_map.as_deref())
        .set("join_date", player.join_date);
    ctx.insert("player", row)?;

    Ok(())
}

fn seed_level_exp(ctx: &mut SeedContext<'_>) -> Result<()> {
    let steps: Vec<i64> = ctx.fixtures().load(fixtures::LEVEL_EXP)?;

    for (idx, exp_val) in steps.into_iter().enumerate() {
        let row = Row::new()
            .set("lv", idx as i64 + 1)
            .set("exp_val", exp_val);
        ctx.insert("level_exp", row)?;
    }

    Ok(())
}

fn seed_partners(ctx: &mut SeedContext<'_>) -> Result<()> {
    let partners: Vec<PartnerRecord> = ctx.fixtures().load(fixtures::PARTNER_INFO)?;

    for p in &partners {
        let row = Row::new()
            .set("part_id", p.character_id)
            .set("skill_id", non_empty(&p.skill_id))
            .set("skill_id_uncap", non_empty(&p.skill_id_uncap))
            .set("char_type", p.char_type)
            .set("skill_requires_uncap", SqlValue::flag(p.skill_requires_uncap))
            .set("skill_unlock_level", p.skill_unlock_level)
            .set("part_name", p.name.as_str())
            .set("frag_1", p.frag_1)
            .set("frag_20", p.frag_20)
            .set("prog_1", p.prog_1)
            .set("prog_20", p.prog_20)
            .set("overdrive_1", p.overdrive_1)
            .set("overdrive_20", p.overdrive_20);
        ctx.insert("partner", row)?;
    }

    Ok(())
}

fn seed_partner_stats(ctx: &mut SeedContext<'_>) -> Result<()> {
    let stats: Vec<PartnerStatusRecord> = ctx.fixtures().load(fixtures::PARTNER_STATUS)?;

    for s in &stats {
        let row = Row::new()
            .set("user_id", ctx.user_id())
            .set("part_id", s.character_id)
            .set("is_uncapped_override", SqlValue::flag(s.is_uncapped_override))
            .set("is_uncapped", SqlValue::flag(s.is_uncapped))
            .set("exp_val", s.exp)
            .set("overdrive", s.overdrive)
            .set("prog", s.prog)
            .set("frag", s.frag)
            .set("lv", s.level)
            .set("prog_tempest", s.prog_tempest);
        ctx.insert("part_stats", row)?;
    }

    Ok(())
}

fn seed_packs(ctx: &mut SeedContext<'_>) -> Result<()> {
    let info: PackInfoFile = ctx.fixtures().load(fixtures::PACK_INFO)?;

    for pack in &info.packs {
        let detail = info.detail.get(pack).ok_or_else(|| {
            SeedError::MissingFixtureData(format!("pack {} has no detail entry", pack))
        })?;

        let row = Row::new()
            .set("pack_name", pack)
            .set("price", detail.price)
            .set("orig_price", detail.orig_price)
            .set("discount_from", detail.discount_from)
            .set("discount_to", detail.discount_to);
        ctx.insert("pack", row)?;

        for item in &detail.items {
            let row = Row::new()
                .set("pack_name", pack)
                .set("item_id", item.id.as_str())
                .set("item_type", item.item_type.as_str())
                .set("is_available", SqlValue::flag(item.is_available));
            ctx.insert("pack_item", row)?;
        }

        if !FREE_PACKS.contains(&pack.as_str()) {
            let row = Row::new()
                .set("user_id", ctx.user_id())
                .set("pack_name", pack);
            ctx.insert("pack_purchase_info", row)?;
        }
    }

    Ok(())
}

fn seed_songs(ctx: &mut SeedContext<'_>) -> Result<()> {
    let songs: SongList = ctx.fixtures().load(fixtures::SONG_LIST)?;
    let checksums: ChecksumFile = ctx.fixtures().load(fixtures::CHECKSUMS)?;
    let ratings: RatingInfoFile = ctx.fixtures().load(fixtures::RATING_INFO)?;
    let user_id = ctx.user_id();

    for song in &songs.songs {
        let song_sums = checksums.get(&song.id).ok_or_else(|| {
            SeedError::MissingFixtureData(format!("no checksums for song {}", song.id))
        })?;

        let row = Row::new()
            .set("song_id", song.id.as_str())
            .set("title_local_en", song.title("en"))
            .set("title_local_ko", song.title("ko"))
            .set("title_local_ja", song.title("ja"))
            .set("title_local_zh_hant", song.title("zh-Hant"))
            .set("title_local_zh_hans", song.title("zh-Hans"))
            .set("artist", song.artist.as_str())
            .set("bpm", song.bpm.as_str())
            .set("bpm_base", song.bpm_base)
            .set("pack_name", song.set.as_str())
            .set("purchase", song.purchase.as_str())
            .set("audio_preview", song.audio_preview)
            .set("audio_preview_end", song.audio_preview_end)
            .set("side", song.side)
            .set("world_unlock", SqlValue::flag(song.world_unlock))
            .set("bg", song.bg.as_str())
            .set("date", song.date)
            .set("version", song.version.as_str())
            .set("remote_dl", SqlValue::flag(song.remote_dl))
            .set("checksum", song_sums.audio.checksum.as_str());
        ctx.insert("song", row)?;

        if song.set == "single" {
            ctx.insert("single", Row::new().set("song_id", song.id.as_str()))?;
            let row = Row::new()
                .set("user_id", user_id)
                .set("song_id", song.id.as_str());
            ctx.insert("single_purchase_info", row)?;
        }

        if song.world_unlock {
            unlock_world_song(ctx, song.id.clone())?;
        }

        for chart in &song.difficulties {
            let diff = chart.rating_class;
            let checksum = song_sums.chart.get(&diff.to_string()).ok_or_else(|| {
                SeedError::MissingFixtureData(format!(
                    "no chart checksum for {} difficulty {}",
                    song.id, diff
                ))
            })?;
            let rating = ratings
                .get(&song.id)
                .and_then(|r| usize::try_from(diff).ok().and_then(|d| r.get(d)))
                .ok_or_else(|| {
                    SeedError::MissingFixtureData(format!(
                        "no rating for {} difficulty {}",
                        song.id, diff
                    ))
                })?;

            let row = Row::new()
                .set("song_id", song.id.as_str())
                .set("difficulty", diff)
                .set("chart_designer", chart.chart_designer.as_str())
                .set("jacket_designer", non_empty(&chart.jacket_designer))
                .set("rating", *rating)
                .set(
                    "remote_dl",
                    SqlValue::flag(diff == BEYOND_DIFFICULTY || song.remote_dl),
                )
                .set("checksum", checksum.checksum.as_str());
            ctx.insert("chart_info", row)?;

            if diff == BEYOND_DIFFICULTY {
                unlock_world_song(ctx, format!("{}{}", song.id, BEYOND_DIFFICULTY))?;
            }
        }
    }

    Ok(())
}

fn unlock_world_song(ctx: &mut SeedContext<'_>, item_name: String) -> Result<()> {
    ctx.insert("world_song", Row::new().set("item_name", &item_name))?;
    let row = Row::new()
        .set("user_id", ctx.user_id())
        .set("item_name", item_name);
    ctx.insert("world_song_unlock", row)?;
    Ok(())
}

fn seed_game_info(ctx: &mut SeedContext<'_>) -> Result<()> {
    let info: GameInfoRecord = ctx.fixtures().load(fixtures::GAME_INFO)?;

    let row = Row::new()
        .set("is_aprilfools", SqlValue::flag(info.is_aprilfools))
        .set("max_stamina", info.max_stamina)
        .set("stamina_recover_tick", info.stamina_recover_tick)
        .set("core_exp", info.core_exp)
        .set("world_ranking_enabled", SqlValue::flag(info.world_ranking_enabled))
        .set("is_byd_chapter_unlocked", SqlValue::flag(info.is_byd_chapter_unlocked));
    ctx.insert("game_info", row)?;

    Ok(())
}

fn seed_maps(ctx: &mut SeedContext<'_>) -> Result<()> {
    let maps: Vec<MapRecord> = ctx.fixtures().load(fixtures::MAP_DATA)?;

    for m in &maps {
        let row = Row::new()
            .set("map_id", m.map_id.as_str())
            .set("available_from", m.available_from)
            .set("available_to", m.available_to)
            .set("beyond_health", m.beyond_health)
            .set("chapter", m.chapter)
            .set("coordinate", m.coordinate.as_str())
            .set("custom_bg", non_empty(&m.custom_bg))
            .set("is_beyond", SqlValue::flag(m.is_beyond))
            .set("is_legacy", SqlValue::flag(m.is_legacy))
            .set("is_repeatable", SqlValue::flag(m.is_repeatable))
            .set("require_id", non_empty(&m.require_id))
            .set("require_type", non_empty(&m.require_type))
            .set("require_value", m.require_value)
            .set("stamina_cost", m.stamina_cost)
            .set("step_count", m.step_count);
        ctx.insert("world_map", row)?;

        let row = Row::new()
            .set("user_id", ctx.user_id())
            .set("map_id", m.map_id.as_str())
            .set("curr_capture", m.curr_capture)
            .set("curr_position", m.curr_position)
            .set("is_locked", SqlValue::flag(m.is_locked));
        ctx.insert("player_map_prog", row)?;

        for (multiplier, part_id) in m.affinity_multiplier.iter().zip(&m.character_affinity) {
            let row = Row::new()
                .set("map_id", m.map_id.as_str())
                .set("part_id", *part_id)
                .set("multiplier", *multiplier);
            ctx.insert("map_affinity", row)?;
        }

        for reward in &m.rewards {
            let item = reward.items.first().ok_or_else(|| {
                SeedError::MissingFixtureData(format!(
                    "map {} reward at position {} has no items",
                    m.map_id, reward.position
                ))
            })?;

            let row = Row::new()
                .set("map_id", m.map_id.as_str())
                .set("reward_id", item.id.as_deref())
                .set("item_type", item.item_type.as_str())
                .set("amount", item.amount)
                .set("position", reward.position);
            ctx.insert("map_reward", row)?;
        }
    }

    Ok(())
}

fn seed_world_items(ctx: &mut SeedContext<'_>) -> Result<()> {
    let items: Vec<String> = ctx.fixtures().load(fixtures::WORLD_ITEM)?;

    for item in &items {
        ctx.insert("world_item", Row::new().set("item_name", item))?;
        let row = Row::new()
            .set("user_id", ctx.user_id())
            .set("item_name", item);
        ctx.insert("world_unlock", row)?;
    }

    Ok(())
}

fn seed_cores(ctx: &mut SeedContext<'_>) -> Result<()> {
    let cores: Vec<CoreRecord> = ctx.fixtures().load(fixtures::CORE_INFO)?;

    for core in &cores {
        let row = Row::new()
            .set("core_id", core.id.as_str())
            .set("core_name", core.core_type.as_str())
            .set("internal_id", core.internal_id.as_str());
        ctx.insert("core", row)?;

        let row = Row::new()
            .set("core_id", core.id.as_str())
            .set("user_id", ctx.user_id())
            .set("amount", 0);
        ctx.insert("core_possess_info", row)?;
    }

    Ok(())
}

fn seed_scores(ctx: &mut SeedContext<'_>) -> Result<()> {
    let mut scores: Vec<ScoreRecord> = ctx.fixtures().load(fixtures::SCORES)?;
    scores.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    let mut rank = 0;
    for s in &scores {
        let played_date = s.time_played / 1000;

        let row = Row::new()
            .set("user_id", ctx.user_id())
            .set("played_date", played_date)
            .set("song_id", s.song_id.as_str())
            .set("difficulty", s.difficulty)
            .set("score", s.score)
            .set("shiny_pure", s.shiny_perfect_count)
            .set("pure", s.perfect_count)
            .set("far", s.near_count)
            .set("lost", s.miss_count)
            .set("rating", s.rating)
            .set("health", 100)
            .set("modifier", 0)
            .set("beyond_gauge", 0)
            .set("clear_type", s.clear_type);
        if !ctx.insert("score", row)? {
            continue;
        }

        let row = Row::new()
            .set("user_id", ctx.user_id())
            .set("played_date", played_date)
            .set("song_id", s.song_id.as_str());
        ctx.insert("best_score", row)?;

        if rank < RECENT_SCORES {
            let row = Row::new()
                .set("user_id", ctx.user_id())
                .set("played_date", played_date)
                .set("is_recent_10", SqlValue::flag(rank < RECENT_10));
            ctx.insert("recent_score", row)?;
        }
        rank += 1;
    }

    Ok(())
}

fn seed_backup(ctx: &mut SeedContext<'_>) -> Result<()> {
    let text = ctx.fixtures().read(fixtures::BACKUP_DATA)?;
    let data = fixtures::compact_backup(&text).map_err(|source| SeedError::Fixture {
        file: ctx.fixtures().path(fixtures::BACKUP_DATA),
        source,
    })?;

    let row = Row::new()
        .set("user_id", ctx.user_id())
        .set("backup_data", data);
    ctx.insert("data_backup", row)?;

    Ok(())
}
