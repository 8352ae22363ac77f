//! Campaign graph
//!
//! A campaign is an ordered list of levels; each level lists the indices of
//! the levels reachable from it. Indices are positions in the list, so the
//! order of `levels` must be preserved through every save and load.

use std::path::{Path, PathBuf};

use arcade_engine::config::{read_json_file, write_json_file, ConfigError};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config_asset::{json, ConfigAsset, ASSETS_DIR};
use crate::levels::SpaceLevelConfig;

/// Campaign directory inside a mod's assets
pub const CAMPAIGN_DIR: &str = "Campaigns";

/// Key wrapping the campaign object in its file
const ROOT_KEY: &str = "CampaignConfig";

/// Problems found in a campaign graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CampaignError {
    /// An outgoing path points past the end of the level list
    #[error("level {level} has outgoing path {index}, but the campaign only has {level_count} level(s)")]
    DanglingPath {
        /// Level holding the path
        level: usize,
        /// Invalid target index
        index: usize,
        /// Levels in the campaign
        level_count: usize,
    },
}

/// One node of the campaign graph
#[derive(Debug, Clone, PartialEq)]
pub struct LevelData {
    /// Display name
    pub name: String,
    /// Difficulty tier
    pub tier: i64,
    /// Planet shown for the level on the campaign map
    pub optional_default_planet_idx: Option<i64>,
    /// Planet size on the campaign map
    pub optional_ui_planet_size_factor: Option<f32>,
    /// Levels reachable from this one
    pub outgoing_path_indices: Vec<usize>,
    /// Layout of the level
    pub space_level_config: SpaceLevelConfig,
}

impl Default for LevelData {
    fn default() -> Self {
        Self {
            name: String::new(),
            tier: 0,
            optional_default_planet_idx: None,
            optional_ui_planet_size_factor: None,
            outgoing_path_indices: Vec::new(),
            space_level_config: SpaceLevelConfig::default(),
        }
    }
}

impl LevelData {
    fn read(value: &Value) -> Self {
        let mut level = Self::default();
        if let Some(name) = json::string(value, "level.name") {
            level.name = name;
        }
        if let Some(tier) = json::int(value, "level.tier") {
            level.tier = tier;
        }
        level.optional_default_planet_idx = json::int(value, "level.optional_defaultPlanetIdx");
        level.optional_ui_planet_size_factor = json::float(value, "level.optional_ui_planetSizeFactor");
        level.space_level_config = SpaceLevelConfig::read_from(value);
        if let Some(paths) = json::array(value, "level.outGoingPathIndices") {
            level.outgoing_path_indices = paths
                .iter()
                .filter_map(|path| {
                    let index = json::as_index(path);
                    if index.is_none() {
                        log::warn!("Level '{}' has a malformed outgoing path {}", level.name, path);
                    }
                    index
                })
                .collect();
        }
        level
    }

    fn write(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("level.name".to_string(), Value::from(self.name.as_str()));
        obj.insert("level.tier".to_string(), Value::from(self.tier));
        obj.insert(
            "level.optional_defaultPlanetIdx".to_string(),
            self.optional_default_planet_idx.map_or(Value::Null, Value::from),
        );
        obj.insert(
            "level.optional_ui_planetSizeFactor".to_string(),
            self.optional_ui_planet_size_factor.map_or(Value::Null, Value::from),
        );
        obj.insert(
            "level.outGoingPathIndices".to_string(),
            Value::Array(self.outgoing_path_indices.iter().copied().map(Value::from).collect()),
        );
        self.space_level_config.write_into(&mut obj);
        Value::Object(obj)
    }
}

/// The levels of one campaign and how they connect
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CampaignConfig {
    /// Name shown to players
    pub user_facing_name: String,
    /// Levels; indices into this list are stable identifiers
    pub levels: Vec<LevelData>,
    campaign_index: usize,
    owning_mod_dir: PathBuf,
}

impl CampaignConfig {
    /// Empty campaign `campaign_index` of `mod_dir`
    pub fn new(mod_dir: impl Into<PathBuf>, campaign_index: usize) -> Self {
        Self {
            campaign_index,
            owning_mod_dir: mod_dir.into(),
            ..Self::default()
        }
    }

    /// Position among the mod's campaigns
    pub fn campaign_index(&self) -> usize {
        self.campaign_index
    }

    /// Change the campaign index (and so the file it saves to)
    pub fn set_campaign_index(&mut self, index: usize) {
        self.campaign_index = index;
    }

    /// File stem: `CampaignConfig_<index>`
    pub fn indexed_name(&self) -> String {
        format!("{ROOT_KEY}_{}", self.campaign_index)
    }

    /// Serialize to the campaign document
    ///
    /// An empty campaign is written as a one level template whose only path
    /// leads back to itself; the campaign itself is left untouched.
    pub fn to_json(&self) -> Value {
        let template;
        let levels = if self.levels.is_empty() {
            template = [LevelData {
                outgoing_path_indices: vec![0],
                ..LevelData::default()
            }];
            &template[..]
        } else {
            &self.levels[..]
        };

        let mut campaign = Map::new();
        campaign.insert("userFacingName".to_string(), Value::from(self.user_facing_name.as_str()));
        campaign.insert("levels".to_string(), Value::Array(levels.iter().map(LevelData::write).collect()));

        let mut root = Map::new();
        root.insert(ROOT_KEY.to_string(), Value::Object(campaign));
        Value::Object(root)
    }

    /// Read fields present in `document`
    ///
    /// Levels are replaced only when the document carries a `levels` array.
    pub fn apply_json(&mut self, document: &Value) {
        let Some(campaign) = document.get(ROOT_KEY).filter(|c| !c.is_null()) else {
            log::warn!("Campaign document has no '{ROOT_KEY}' object");
            return;
        };
        if let Some(name) = json::string(campaign, "userFacingName") {
            self.user_facing_name = name;
        }
        if let Some(levels) = json::array(campaign, "levels") {
            self.levels = levels.iter().map(LevelData::read).collect();
        }
    }

    /// Load campaign `campaign_index` of `mod_dir`
    ///
    /// Dangling paths are logged but kept; see [`CampaignConfig::validate`].
    pub fn load(mod_dir: impl Into<PathBuf>, campaign_index: usize) -> Result<Self, ConfigError> {
        let mut campaign = Self::new(mod_dir, campaign_index);
        let path = campaign.representative_file_path();
        let document = read_json_file(&path)?;
        campaign.apply_json(&document);
        for error in campaign.validate() {
            log::warn!("{}: {}", path.display(), error);
        }
        log::info!(
            "Loaded campaign '{}' with {} level(s) from {}",
            campaign.user_facing_name,
            campaign.levels.len(),
            path.display()
        );
        Ok(campaign)
    }

    /// Write to the representative file path
    pub fn save(&self) -> Result<(), ConfigError> {
        write_json_file(self.representative_file_path(), &self.to_json())
    }

    /// Every outgoing path that points past the level list
    pub fn validate(&self) -> Vec<CampaignError> {
        let level_count = self.levels.len();
        self.levels
            .iter()
            .enumerate()
            .flat_map(|(level, data)| {
                data.outgoing_path_indices
                    .iter()
                    .filter(move |&&index| index >= level_count)
                    .map(move |&index| CampaignError::DanglingPath {
                        level,
                        index,
                        level_count,
                    })
            })
            .collect()
    }

    /// Valid levels reachable from `level`
    pub fn outgoing_levels(&self, level: usize) -> impl Iterator<Item = usize> + '_ {
        let level_count = self.levels.len();
        self.levels
            .get(level)
            .into_iter()
            .flat_map(|data| data.outgoing_path_indices.iter().copied())
            .filter(move |&index| index < level_count)
    }
}

impl ConfigAsset for CampaignConfig {
    fn name(&self) -> &str {
        ROOT_KEY
    }

    fn owning_mod_dir(&self) -> &Path {
        &self.owning_mod_dir
    }

    fn representative_file_path(&self) -> PathBuf {
        self.owning_mod_dir
            .join(ASSETS_DIR)
            .join(CAMPAIGN_DIR)
            .join(format!("{}.json", self.indexed_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::ShipSpawn;
    use arcade_engine::foundation::math::Vec3;
    use serde_json::json;

    fn three_level_campaign(dir: &Path) -> CampaignConfig {
        let mut campaign = CampaignConfig::new(dir, 2);
        campaign.user_facing_name = "Outer Rim".to_string();
        for (i, paths) in [vec![1, 2], vec![2], vec![]].into_iter().enumerate() {
            let mut level = LevelData {
                name: format!("Sector {i}"),
                tier: i as i64,
                outgoing_path_indices: paths,
                ..LevelData::default()
            };
            level.space_level_config.ships.push(ShipSpawn::new("Fighter", i % 2, Vec3::zeros()));
            campaign.levels.push(level);
        }
        campaign.levels[1].optional_default_planet_idx = Some(4);
        campaign.levels[1].optional_ui_planet_size_factor = Some(1.5);
        campaign
    }

    #[test]
    fn test_file_path_uses_campaign_index() {
        let campaign = CampaignConfig::new("mods/SpaceArcade", 3);
        assert_eq!(
            campaign.representative_file_path(),
            PathBuf::from("mods/SpaceArcade/Assets/Campaigns/CampaignConfig_3.json")
        );
    }

    #[test]
    fn test_save_load_preserves_graph() {
        let dir = tempfile::tempdir().unwrap();
        let campaign = three_level_campaign(dir.path());
        campaign.save().unwrap();

        let loaded = CampaignConfig::load(dir.path(), 2).unwrap();
        assert_eq!(loaded, campaign);
        assert!(loaded.validate().is_empty());
    }

    #[test]
    fn test_empty_campaign_writes_template() {
        let campaign = CampaignConfig::new("mods/Test", 0);
        let document = campaign.to_json();

        let levels = document["CampaignConfig"]["levels"].as_array().unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0]["level.outGoingPathIndices"], json!([0]));
        assert!(levels[0]["level.optional_defaultPlanetIdx"].is_null());
        assert_eq!(levels[0]["numTeams"], 2);
        assert!(campaign.levels.is_empty());
    }

    #[test]
    fn test_levels_kept_without_levels_array() {
        let mut campaign = three_level_campaign(Path::new("mods/Test"));
        campaign.apply_json(&json!({ "CampaignConfig": { "userFacingName": "Renamed", "levels": "oops" } }));

        assert_eq!(campaign.user_facing_name, "Renamed");
        assert_eq!(campaign.levels.len(), 3);
    }

    #[test]
    fn test_dangling_paths_are_reported_and_skipped() {
        let mut campaign = CampaignConfig::new("mods/Test", 0);
        campaign.apply_json(&json!({ "CampaignConfig": { "levels": [
            { "level.name": "A", "level.outGoingPathIndices": [1, 5] },
            { "level.name": "B", "level.outGoingPathIndices": [0.0, -1, 0.5] }
        ] } }));

        assert_eq!(
            campaign.validate(),
            vec![CampaignError::DanglingPath {
                level: 0,
                index: 5,
                level_count: 2
            }]
        );
        assert_eq!(campaign.outgoing_levels(0).collect::<Vec<_>>(), vec![1]);
        assert_eq!(campaign.outgoing_levels(1).collect::<Vec<_>>(), vec![0]);
        assert_eq!(campaign.outgoing_levels(9).count(), 0);
    }
}
