//! Spawn configs: how a ship model is built, collided with and armed
//!
//! Stored as `<modDir>/Assets/SpawnConfigs/<name>.json`. The owning mod is
//! not written to disk so configs can be copied between mods; it is
//! recovered from the path on load.

use std::path::{Path, PathBuf};

use arcade_engine::config::{read_json_file, write_json_file, ConfigError};
use arcade_engine::foundation::math::{Mat4, Transform, Vec3};
use serde::Serialize;
use serde_json::Value;

use crate::config_asset::{json, mod_dir_from_path, vec3_xyz, ConfigAsset, ASSETS_DIR};
use crate::placement::PlacementSubConfig;

/// Folder below `Assets/` holding spawn configs
pub const SPAWN_CONFIG_DIR: &str = "SpawnConfigs";

/// Primitive used to approximate a model for collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionShapeKind {
    /// Unit cube
    Cube,
    /// Capsule built from polygons
    PolyCapsule,
    /// Wedge (triangular prism)
    Wedge,
    /// Square pyramid
    Pyramid,
    /// Icosphere
    Icosphere,
    /// UV sphere
    UvSphere,
}

impl CollisionShapeKind {
    /// Shape for a serialized id, if the id is known
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(Self::Cube),
            1 => Some(Self::PolyCapsule),
            2 => Some(Self::Wedge),
            3 => Some(Self::Pyramid),
            4 => Some(Self::Icosphere),
            5 => Some(Self::UvSphere),
            _ => None,
        }
    }
}

/// One collision primitive as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollisionShapeConfig {
    /// Shape id (see [`CollisionShapeKind::from_id`])
    pub shape: i32,
    /// Local scale
    #[serde(with = "vec3_xyz")]
    pub scale: Vec3,
    /// Local yaw, pitch, roll in degrees
    #[serde(rename = "rotationDegrees", with = "vec3_xyz")]
    pub rotation_degrees: Vec3,
    /// Local offset
    #[serde(with = "vec3_xyz")]
    pub position: Vec3,
}

impl Default for CollisionShapeConfig {
    fn default() -> Self {
        Self {
            shape: 0,
            scale: Vec3::new(1.0, 1.0, 1.0),
            rotation_degrees: Vec3::zeros(),
            position: Vec3::zeros(),
        }
    }
}

impl CollisionShapeConfig {
    fn read(value: &Value) -> Self {
        let mut shape = Self::default();
        if let Some(id) = json::int(value, "shape").and_then(|id| i32::try_from(id).ok()) {
            shape.shape = id;
        }
        if let Some(scale) = json::vec3(value, "scale") {
            shape.scale = scale;
        }
        if let Some(rotation) = json::vec3(value, "rotationDegrees") {
            shape.rotation_degrees = rotation;
        }
        if let Some(position) = json::vec3(value, "position") {
            shape.position = position;
        }
        shape
    }
}

/// Collision description built from a spawn config
#[derive(Debug, Clone, PartialEq)]
pub struct ModelCollisionInfo {
    /// Shapes with their local matrices
    pub shapes: Vec<(CollisionShapeKind, Mat4)>,
    /// Model matrix of the visual model
    pub model_matrix: Mat4,
    /// Whether to test the model's AABB before the shapes
    pub use_model_aabb_test: bool,
}

/// How to spawn one kind of ship
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpawnConfig {
    name: String,
    #[serde(rename = "fullModelFilePath")]
    full_model_file_path: String,
    #[serde(rename = "bIsDeleteable")]
    is_deletable: bool,
    #[serde(rename = "modelScale", with = "vec3_xyz")]
    model_scale: Vec3,
    #[serde(rename = "modelRotationDegrees", with = "vec3_xyz")]
    model_rotation_degrees: Vec3,
    #[serde(rename = "modelPosition", with = "vec3_xyz")]
    model_position: Vec3,
    #[serde(rename = "bUseModelAABBTest")]
    use_model_aabb_test: bool,
    shapes: Vec<CollisionShapeConfig>,
    placements: Vec<PlacementSubConfig>,
    #[serde(rename = "teamColor", skip_serializing_if = "Option::is_none", with = "optional_xyz")]
    team_color: Option<Vec3>,

    #[serde(skip)]
    owning_mod_dir: PathBuf,
}

mod optional_xyz {
    use arcade_engine::foundation::math::Vec3;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Option<Vec3>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => crate::config_asset::vec3_xyz::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            full_model_file_path: String::new(),
            is_deletable: true,
            model_scale: Vec3::new(1.0, 1.0, 1.0),
            model_rotation_degrees: Vec3::zeros(),
            model_position: Vec3::zeros(),
            use_model_aabb_test: true,
            shapes: Vec::new(),
            placements: Vec::new(),
            team_color: None,
            owning_mod_dir: PathBuf::new(),
        }
    }
}

impl SpawnConfig {
    /// Config with only a name and model, owned by `mod_dir`
    pub fn new(name: impl Into<String>, model_path: impl Into<String>, mod_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            full_model_file_path: model_path.into(),
            owning_mod_dir: mod_dir.into(),
            ..Self::default()
        }
    }

    /// Read a spawn config document
    ///
    /// Missing or mistyped fields keep their defaults, so one bad field never
    /// drops the placements.
    pub fn read(value: &Value) -> Self {
        let mut config = Self::default();
        if let Some(name) = json::string(value, "name") {
            config.name = name;
        }
        if let Some(path) = json::string(value, "fullModelFilePath") {
            config.full_model_file_path = path;
        }
        if let Some(deletable) = json::boolean(value, "bIsDeleteable") {
            config.is_deletable = deletable;
        }
        if let Some(scale) = json::vec3(value, "modelScale") {
            config.model_scale = scale;
        }
        if let Some(rotation) = json::vec3(value, "modelRotationDegrees") {
            config.model_rotation_degrees = rotation;
        }
        if let Some(position) = json::vec3(value, "modelPosition") {
            config.model_position = position;
        }
        if let Some(aabb) = json::boolean(value, "bUseModelAABBTest") {
            config.use_model_aabb_test = aabb;
        }
        if let Some(shapes) = json::array(value, "shapes") {
            config.shapes = shapes.iter().map(CollisionShapeConfig::read).collect();
        }
        if let Some(placements) = json::array(value, "placements") {
            config.placements = placements.iter().map(PlacementSubConfig::read).collect();
        }
        config.team_color = json::vec3(value, "teamColor");
        config
    }

    /// Load a spawn config file
    ///
    /// Only unreadable files and invalid JSON fail; the owning mod is taken
    /// from the path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let document = read_json_file(path)?;
        if !document.is_object() {
            log::warn!("{}: spawn config is not a JSON object, using defaults", path.display());
        }
        let mut config = Self::read(&document);
        config.owning_mod_dir = mod_dir_from_path(path);
        if config.name.is_empty() {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                config.name = stem.to_string();
            }
        }
        log::debug!("Loaded spawn config '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// Load `<mod_dir>/Assets/SpawnConfigs/<name>.json`
    pub fn load_named(mod_dir: &Path, name: &str) -> Result<Self, ConfigError> {
        Self::load(spawn_config_path(mod_dir, name))
    }

    /// Write the config to its representative path
    pub(crate) fn save(&self) -> Result<(), ConfigError> {
        let value = serde_json::to_value(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        write_json_file(self.representative_file_path(), &value)
    }

    /// Model file to render
    pub fn model_file_path(&self) -> &str {
        &self.full_model_file_path
    }

    /// Whether editors may delete this config
    pub fn is_deletable(&self) -> bool {
        self.is_deletable
    }

    /// Placements mounted on ships of this kind
    pub fn placements(&self) -> &[PlacementSubConfig] {
        &self.placements
    }

    /// Add a placement template
    pub fn add_placement(&mut self, placement: PlacementSubConfig) {
        self.placements.push(placement);
    }

    /// Add a collision primitive
    pub fn add_shape(&mut self, shape: CollisionShapeConfig) {
        self.shapes.push(shape);
    }

    /// Colour override for ships of this kind
    pub fn team_color(&self) -> Option<Vec3> {
        self.team_color
    }

    /// Model transform relative to the ship entity
    pub fn model_transform(&self) -> Transform {
        Transform::from_degrees(self.model_position, self.model_rotation_degrees, self.model_scale)
    }

    /// Build collision data; unknown shape ids are skipped
    pub fn to_collision_info(&self) -> ModelCollisionInfo {
        let shapes = self
            .shapes
            .iter()
            .filter_map(|shape| {
                let Some(kind) = CollisionShapeKind::from_id(shape.shape) else {
                    log::warn!("Spawn config '{}' has unknown collision shape id {}", self.name, shape.shape);
                    return None;
                };
                let local = Transform::from_degrees(shape.position, shape.rotation_degrees, shape.scale);
                Some((kind, local.to_matrix()))
            })
            .collect();

        ModelCollisionInfo {
            shapes,
            model_matrix: self.model_transform().to_matrix(),
            use_model_aabb_test: self.use_model_aabb_test,
        }
    }
}

/// Path of the spawn config called `name` in `mod_dir`
pub fn spawn_config_path(mod_dir: &Path, name: &str) -> PathBuf {
    mod_dir.join(ASSETS_DIR).join(SPAWN_CONFIG_DIR).join(format!("{name}.json"))
}

impl ConfigAsset for SpawnConfig {
    fn name(&self) -> &str {
        &self.name
    }

    fn owning_mod_dir(&self) -> &Path {
        &self.owning_mod_dir
    }

    fn representative_file_path(&self) -> PathBuf {
        spawn_config_path(&self.owning_mod_dir, &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::PlacementType;
    use approx::assert_relative_eq;

    #[test]
    fn test_save_then_load_recovers_mod_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SpawnConfig::new("Frigate", "Models/frigate.obj", dir.path());
        config.add_placement(PlacementSubConfig {
            placement_type: PlacementType::Turret,
            relative_file_path: "Models/turret.obj".to_string(),
            ..PlacementSubConfig::default()
        });
        config.save().unwrap();

        let path = dir.path().join("Assets/SpawnConfigs/Frigate.json");
        let loaded = SpawnConfig::load(&path).unwrap();
        assert_eq!(loaded.owning_mod_dir(), dir.path());
        assert_eq!(loaded, config);
        assert_eq!(loaded.placements()[0].placement_type, PlacementType::Turret);
    }

    #[test]
    fn test_on_disk_keys() {
        let mut config = SpawnConfig::new("Fighter", "fighter.obj", "mod");
        config.team_color = Some(Vec3::new(1.0, 0.0, 0.0));
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value["fullModelFilePath"], "fighter.obj");
        assert_eq!(value["bIsDeleteable"], true);
        assert_eq!(value["modelScale"]["y"], 1.0);
        assert_eq!(value["teamColor"]["x"], 1.0);
        assert!(value.get("owning_mod_dir").is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Assets/SpawnConfigs/Bare.json");
        write_json_file(&path, &serde_json::json!({ "fullModelFilePath": "bare.obj" })).unwrap();

        let loaded = SpawnConfig::load(&path).unwrap();
        assert_eq!(loaded.name(), "Bare");
        assert!(loaded.is_deletable());
        assert_eq!(loaded.model_transform().scale, Vec3::new(1.0, 1.0, 1.0));
        assert!(loaded.team_color().is_none());
    }

    #[test]
    fn test_mistyped_fields_keep_defaults_and_placements() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Assets/SpawnConfigs/Frigate.json");
        write_json_file(
            &path,
            &serde_json::json!({
                "name": "Frigate",
                "fullModelFilePath": "frigate.obj",
                "bIsDeleteable": "yes",
                "modelScale": "big",
                "shapes": [{ "shape": "cube", "position": { "y": 2 } }],
                "placements": [
                    { "placementType": "TURRET", "position": { "x": 1, "y": 0, "z": 2 } },
                    { "placementType": 7, "scale": [2, 2, 2] }
                ]
            }),
        )
        .unwrap();

        let loaded = SpawnConfig::load(&path).unwrap();
        assert_eq!(loaded.model_file_path(), "frigate.obj");
        assert!(loaded.is_deletable());
        assert_eq!(loaded.model_transform().scale, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(loaded.placements().len(), 2);
        assert_eq!(loaded.placements()[0].placement_type, PlacementType::Turret);
        assert_eq!(loaded.placements()[0].position, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(loaded.placements()[1].placement_type, PlacementType::Invalid);
        assert_eq!(loaded.placements()[1].scale, Vec3::new(1.0, 1.0, 1.0));

        let info = loaded.to_collision_info();
        assert_eq!(info.shapes[0].0, CollisionShapeKind::Cube);
        assert_relative_eq!(info.shapes[0].1[(1, 3)], 2.0);
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Broken.json");
        std::fs::write(&path, "{ \"name\": ").unwrap();
        assert!(matches!(SpawnConfig::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_collision_info_skips_unknown_shapes() {
        let mut config = SpawnConfig::new("Probe", "probe.obj", "mod");
        config.add_shape(CollisionShapeConfig {
            shape: 4,
            position: Vec3::new(0.0, 2.0, 0.0),
            ..CollisionShapeConfig::default()
        });
        config.add_shape(CollisionShapeConfig {
            shape: 42,
            ..CollisionShapeConfig::default()
        });

        let info = config.to_collision_info();
        assert_eq!(info.shapes.len(), 1);
        assert_eq!(info.shapes[0].0, CollisionShapeKind::Icosphere);
        assert_relative_eq!(info.shapes[0].1[(1, 3)], 2.0);
        assert!(info.use_model_aabb_test);
    }
}
