use serde::Deserialize;
use std::collections::HashMap;

/// `player.json`: the single seeded player
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRecord {
    pub user_name: String,
    pub user_code: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub pwdhash: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub ticket: i64,
    /// Selected partner
    #[serde(default)]
    pub character: Option<i64>,
    #[serde(default)]
    pub current_map: Option<String>,
    pub join_date: i64,
}

/// `partner_info.json` entry
#[derive(Debug, Clone, Deserialize)]
pub struct PartnerRecord {
    pub character_id: i64,
    pub name: String,
    pub char_type: i64,
    #[serde(default)]
    pub skill_id: String,
    #[serde(default)]
    pub skill_id_uncap: String,
    #[serde(default)]
    pub skill_requires_uncap: bool,
    pub skill_unlock_level: i64,
    pub frag_1: f64,
    pub frag_20: f64,
    pub prog_1: f64,
    pub prog_20: f64,
    pub overdrive_1: f64,
    pub overdrive_20: f64,
}

/// `partner_status.json` entry: the player's progress with one partner
#[derive(Debug, Clone, Deserialize)]
pub struct PartnerStatusRecord {
    pub character_id: i64,
    pub is_uncapped_override: bool,
    pub is_uncapped: bool,
    pub exp: f64,
    pub overdrive: f64,
    pub prog: f64,
    pub frag: f64,
    pub level: i64,
    #[serde(default)]
    pub prog_tempest: f64,
}

/// `pack_info.json`
#[derive(Debug, Clone, Deserialize)]
pub struct PackInfoFile {
    /// Pack names in storefront order
    pub packs: Vec<String>,
    pub detail: HashMap<String, PackDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackDetail {
    pub price: i64,
    pub orig_price: i64,
    #[serde(default)]
    pub discount_from: i64,
    #[serde(default)]
    pub discount_to: i64,
    pub items: Vec<PackItemRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackItemRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub is_available: bool,
}

/// `songlist`
#[derive(Debug, Clone, Deserialize)]
pub struct SongList {
    pub songs: Vec<SongRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRecord {
    pub id: String,
    #[serde(rename = "title_localized")]
    pub title_localized: HashMap<String, String>,
    pub artist: String,
    pub bpm: String,
    #[serde(rename = "bpm_base")]
    pub bpm_base: f64,
    pub set: String,
    #[serde(default)]
    pub purchase: String,
    pub audio_preview: i64,
    pub audio_preview_end: i64,
    pub side: i64,
    #[serde(rename = "world_unlock", default)]
    pub world_unlock: bool,
    #[serde(default)]
    pub bg: String,
    pub date: i64,
    pub version: String,
    #[serde(rename = "remote_dl", default)]
    pub remote_dl: bool,
    pub difficulties: Vec<DifficultyRecord>,
}

impl SongRecord {
    /// Localized title, empty when the language is missing
    pub fn title(&self, lang: &str) -> &str {
        self.title_localized
            .get(lang)
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyRecord {
    pub rating_class: i64,
    #[serde(default)]
    pub chart_designer: String,
    #[serde(default)]
    pub jacket_designer: String,
}

/// `checksums.json`: song id -> audio and per-difficulty chart checksums
pub type ChecksumFile = HashMap<String, SongChecksums>;

#[derive(Debug, Clone, Deserialize)]
pub struct SongChecksums {
    pub audio: ChecksumEntry,
    #[serde(default)]
    pub chart: HashMap<String, ChecksumEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChecksumEntry {
    pub checksum: String,
}

/// `rating_info.json`: song id -> chart constant indexed by difficulty
pub type RatingInfoFile = HashMap<String, Vec<f64>>;

/// `game_info.json`
#[derive(Debug, Clone, Deserialize)]
pub struct GameInfoRecord {
    #[serde(default)]
    pub is_aprilfools: bool,
    pub max_stamina: i64,
    pub stamina_recover_tick: i64,
    pub core_exp: i64,
    #[serde(default)]
    pub world_ranking_enabled: bool,
    #[serde(default)]
    pub is_byd_chapter_unlocked: bool,
}

/// `map_data.json` entry: one world map plus the player's progress on it
#[derive(Debug, Clone, Deserialize)]
pub struct MapRecord {
    pub map_id: String,
    pub available_from: i64,
    pub available_to: i64,
    pub beyond_health: i64,
    pub chapter: i64,
    pub coordinate: String,
    #[serde(default)]
    pub custom_bg: String,
    pub is_beyond: bool,
    pub is_legacy: bool,
    pub is_repeatable: bool,
    #[serde(default)]
    pub require_id: String,
    #[serde(default)]
    pub require_type: String,
    #[serde(default)]
    pub require_value: Option<i64>,
    pub stamina_cost: i64,
    pub step_count: i64,
    pub curr_capture: i64,
    pub curr_position: i64,
    pub is_locked: bool,
    #[serde(default)]
    pub affinity_multiplier: Vec<f64>,
    #[serde(default)]
    pub character_affinity: Vec<i64>,
    #[serde(default)]
    pub rewards: Vec<RewardRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewardRecord {
    pub items: Vec<RewardItem>,
    pub position: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewardItem {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
}

/// `core_info.json` entry
#[derive(Debug, Clone, Deserialize)]
pub struct CoreRecord {
    pub id: String,
    pub core_type: String,
    #[serde(rename = "_id")]
    pub internal_id: String,
}

/// `scores.json` entry
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRecord {
    pub song_id: String,
    pub difficulty: i64,
    pub score: i64,
    pub shiny_perfect_count: i64,
    pub perfect_count: i64,
    pub near_count: i64,
    pub miss_count: i64,
    pub rating: f64,
    pub clear_type: i64,
    /// Milliseconds since the epoch
    pub time_played: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_record_field_names() {
        let json = r#"{
            "id": "grievouslady",
            "title_localized": {"en": "Grievous Lady"},
            "artist": "Team Grimoire vs Laur",
            "bpm": "210",
            "bpm_base": 210.0,
            "set": "yugamu",
            "purchase": "yugamu",
            "audioPreview": 102000,
            "audioPreviewEnd": 124000,
            "side": 1,
            "bg": "",
            "date": 1514016000,
            "version": "1.7",
            "difficulties": [
                {"ratingClass": 0, "chartDesigner": "Nitro", "jacketDesigner": "hideo"},
                {"ratingClass": 2, "chartDesigner": "Nitro"}
            ]
        }"#;
        let song: SongRecord = serde_json::from_str(json).unwrap();
        assert_eq!(song.audio_preview_end, 124000);
        assert_eq!(song.title("en"), "Grievous Lady");
        assert_eq!(song.title("ko"), "");
        assert!(!song.world_unlock);
        assert_eq!(song.difficulties[1].rating_class, 2);
        assert_eq!(song.difficulties[1].jacket_designer, "");
    }

    #[test]
    fn test_partner_missing_required_field() {
        let json = r#"{"character_id": 0, "name": "Hikari", "char_type": 1}"#;
        let err = serde_json::from_str::<PartnerRecord>(json).unwrap_err();
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_reward_item_optional_fields() {
        let json = r#"{"items": [{"type": "fragment", "amount": 100}], "position": 4}"#;
        let reward: RewardRecord = serde_json::from_str(json).unwrap();
        assert_eq!(reward.items[0].id, None);
        assert_eq!(reward.items[0].amount, Some(100));
    }
}
