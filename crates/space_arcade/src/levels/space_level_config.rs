//! Space level layout embedded in each campaign level
//!
//! The fields are written flat into the campaign's level object, next to the
//! `level.*` keys. Reading is lenient: anything missing or mistyped keeps its
//! default.

use arcade_engine::foundation::math::{Transform, Vec3};
use serde_json::{Map, Value};

use crate::config_asset::json;

/// Teams in a level that does not say otherwise
pub const DEFAULT_NUM_TEAMS: usize = 2;

/// Upper bound on teams in one level; larger values in a document are ignored
pub const MAX_TEAMS: usize = 16;

fn team_index(value: &Value, key: &str) -> Option<usize> {
    let index = json::index(value, key)?;
    if index >= MAX_TEAMS {
        log::warn!("'{key}' of {index} is out of range (max {}), using the default", MAX_TEAMS - 1);
        return None;
    }
    Some(index)
}

/// A star to place in the level
#[derive(Debug, Clone, PartialEq)]
pub struct StarSpawn {
    /// World position
    pub position: Vec3,
    /// Light colour
    pub color: Vec3,
    /// HDR intensity
    pub intensity: f32,
}

impl Default for StarSpawn {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 100.0, -500.0),
            color: Vec3::new(1.0, 1.0, 1.0),
            intensity: crate::environment::star::DEFAULT_HDR_INTENSITY,
        }
    }
}

impl StarSpawn {
    fn read(value: &Value) -> Self {
        let mut star = Self::default();
        if let Some(position) = json::vec3(value, "position") {
            star.position = position;
        }
        if let Some(color) = json::vec3(value, "color") {
            star.color = color;
        }
        if let Some(intensity) = json::float(value, "intensity") {
            star.intensity = intensity;
        }
        star
    }

    fn write(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("position".to_string(), json::vec3_value(&self.position));
        obj.insert("color".to_string(), json::vec3_value(&self.color));
        obj.insert("intensity".to_string(), Value::from(self.intensity));
        Value::Object(obj)
    }
}

/// A ship to spawn when the level starts
#[derive(Debug, Clone, PartialEq)]
pub struct ShipSpawn {
    /// Spawn config name
    pub spawn_config: String,
    /// Team index
    pub team: usize,
    /// World position
    pub position: Vec3,
    /// Euler rotation in degrees
    pub rotation_deg: Vec3,
    /// Uniform scale
    pub scale: f32,
}

impl Default for ShipSpawn {
    fn default() -> Self {
        Self {
            spawn_config: String::new(),
            team: 0,
            position: Vec3::zeros(),
            rotation_deg: Vec3::zeros(),
            scale: 1.0,
        }
    }
}

impl ShipSpawn {
    /// Ship of `spawn_config` for `team` at `position`
    pub fn new(spawn_config: impl Into<String>, team: usize, position: Vec3) -> Self {
        Self {
            spawn_config: spawn_config.into(),
            team,
            position,
            ..Self::default()
        }
    }

    /// World transform of the ship
    pub fn transform(&self) -> Transform {
        Transform::from_degrees(self.position, self.rotation_deg, Vec3::repeat(self.scale))
    }

    fn read(value: &Value) -> Self {
        let mut ship = Self::default();
        if let Some(name) = json::string(value, "spawnConfig") {
            ship.spawn_config = name;
        }
        if let Some(team) = team_index(value, "team") {
            ship.team = team;
        }
        if let Some(position) = json::vec3(value, "position") {
            ship.position = position;
        }
        if let Some(rotation) = json::vec3(value, "rotation_deg") {
            ship.rotation_deg = rotation;
        }
        if let Some(scale) = json::float(value, "scale") {
            ship.scale = scale;
        }
        ship
    }

    fn write(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("spawnConfig".to_string(), Value::from(self.spawn_config.as_str()));
        obj.insert("team".to_string(), Value::from(self.team));
        obj.insert("position".to_string(), json::vec3_value(&self.position));
        obj.insert("rotation_deg".to_string(), json::vec3_value(&self.rotation_deg));
        obj.insert("scale".to_string(), Value::from(self.scale));
        Value::Object(obj)
    }
}

/// Layout of one space level
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceLevelConfig {
    /// Stars lighting the level
    pub stars: Vec<StarSpawn>,
    /// Ships present at start
    pub ships: Vec<ShipSpawn>,
    /// Teams taking part; one commander each
    pub num_teams: usize,
    /// Skybox texture, mod relative
    pub skybox_texture: Option<String>,
}

impl Default for SpaceLevelConfig {
    fn default() -> Self {
        Self {
            stars: Vec::new(),
            ships: Vec::new(),
            num_teams: DEFAULT_NUM_TEAMS,
            skybox_texture: None,
        }
    }
}

impl SpaceLevelConfig {
    /// Read from a level object; unknown keys are ignored
    pub fn read_from(value: &Value) -> Self {
        let mut config = Self::default();
        if let Some(stars) = json::array(value, "stars") {
            config.stars = stars.iter().map(StarSpawn::read).collect();
        }
        if let Some(ships) = json::array(value, "ships") {
            config.ships = ships.iter().map(ShipSpawn::read).collect();
        }
        match json::index(value, "numTeams") {
            Some(num_teams) if num_teams <= MAX_TEAMS => config.num_teams = num_teams,
            Some(num_teams) => log::warn!("'numTeams' of {num_teams} exceeds {MAX_TEAMS}, using the default"),
            None => {}
        }
        config.skybox_texture = json::string(value, "skyboxTexture");
        config
    }

    /// Write the fields into a level object
    pub fn write_into(&self, obj: &mut Map<String, Value>) {
        obj.insert("stars".to_string(), Value::Array(self.stars.iter().map(StarSpawn::write).collect()));
        obj.insert("ships".to_string(), Value::Array(self.ships.iter().map(ShipSpawn::write).collect()));
        obj.insert("numTeams".to_string(), Value::from(self.num_teams));
        if let Some(skybox) = &self.skybox_texture {
            obj.insert("skyboxTexture".to_string(), Value::from(skybox.as_str()));
        }
    }

    /// Teams needed to cover every ship spawn, at most [`MAX_TEAMS`]
    pub fn team_count(&self) -> usize {
        self.ships
            .iter()
            .map(|ship| ship.team.saturating_add(1))
            .max()
            .unwrap_or(0)
            .max(self.num_teams)
            .min(MAX_TEAMS)
    }
}
