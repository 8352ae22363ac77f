//! Ship placements: turrets, communication dishes and defense modules
//!
//! A placement is an entity mounted on a ship. [`PlacementSubConfig`] is the
//! immutable template from the ship's spawn config; [`ShipPlacement`] is the
//! live state (transform caches, team, health); a [`PlacementBehavior`]
//! implements what each placement type does every tick.

pub mod communication;
pub mod defense;
pub mod lifecycle;
pub mod turret;

pub use communication::CommunicationBehavior;
pub use defense::DefenseBehavior;
pub use lifecycle::{LifecycleEvent, PlacementLifecycle, PlacementState};
pub use turret::TurretBehavior;

use std::cell::Cell;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;

use arcade_engine::foundation::math::{utils, Mat4, Quat, Transform, Vec3};
use arcade_engine::prelude::{Component, EntityId};
use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use crate::config_asset::{json, vec3_xyz, ConfigAsset};
use crate::projectile::{FireRequest, ProjectileConfig, ProjectileHit};

/// Hit points a placement spawns with
pub const DEFAULT_MAX_HP: i32 = 100;

/// Kind of placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "String")]
pub enum PlacementType {
    /// Communications dish
    Communications,
    /// Defense module
    Defense,
    /// Turret
    Turret,
    /// Unknown kind; never spawned
    #[default]
    Invalid,
}

impl PlacementType {
    /// On-disk name
    pub fn lex(self) -> &'static str {
        match self {
            Self::Communications => "COMMUNICATIONS",
            Self::Defense => "DEFENSE",
            Self::Turret => "TURRET",
            Self::Invalid => "INVALID",
        }
    }

    /// Parse an on-disk name; anything unknown is [`PlacementType::Invalid`]
    pub fn from_lex(value: &str) -> Self {
        match value {
            "COMMUNICATIONS" => Self::Communications,
            "DEFENSE" => Self::Defense,
            "TURRET" => Self::Turret,
            _ => Self::Invalid,
        }
    }
}

impl fmt::Display for PlacementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lex())
    }
}

impl FromStr for PlacementType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_lex(s))
    }
}

impl From<PlacementType> for String {
    fn from(value: PlacementType) -> Self {
        value.lex().to_string()
    }
}

/// Spawn template of one placement, relative to its ship
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementSubConfig {
    /// Offset from the ship origin
    #[serde(with = "vec3_xyz")]
    pub position: Vec3,
    /// Yaw, pitch, roll in degrees
    #[serde(with = "vec3_xyz")]
    pub rotation_deg: Vec3,
    /// Scale
    #[serde(with = "vec3_xyz")]
    pub scale: Vec3,
    /// Model path relative to the owning mod
    #[serde(rename = "relativeFilePath")]
    pub relative_file_path: String,
    /// Collision model path relative to the owning mod
    #[serde(rename = "relativeCollisionModelFilePath")]
    pub relative_collision_model_file_path: String,
    /// What kind of placement this is
    #[serde(rename = "placementType")]
    pub placement_type: PlacementType,
}

impl Default for PlacementSubConfig {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation_deg: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            relative_file_path: String::new(),
            relative_collision_model_file_path: String::new(),
            placement_type: PlacementType::Invalid,
        }
    }
}

impl PlacementSubConfig {
    /// Read a placement object; missing or mistyped fields keep their defaults
    pub fn read(value: &Value) -> Self {
        let mut config = Self::default();
        if let Some(position) = json::vec3(value, "position") {
            config.position = position;
        }
        if let Some(rotation) = json::vec3(value, "rotation_deg") {
            config.rotation_deg = rotation;
        }
        if let Some(scale) = json::vec3(value, "scale") {
            config.scale = scale;
        }
        if let Some(path) = json::string(value, "relativeFilePath") {
            config.relative_file_path = path;
        }
        if let Some(path) = json::string(value, "relativeCollisionModelFilePath") {
            config.relative_collision_model_file_path = path;
        }
        if let Some(kind) = json::string(value, "placementType") {
            config.placement_type = PlacementType::from_lex(&kind);
        }
        config
    }

    /// Model path resolved against the owning config's mod
    pub fn full_path(&self, owning_config: &dyn ConfigAsset) -> PathBuf {
        owning_config.resolve_mod_path(&self.relative_file_path)
    }

    /// Collision model path resolved against the owning config's mod
    pub fn collision_model_full_path(&self, owning_config: &dyn ConfigAsset) -> PathBuf {
        owning_config.resolve_mod_path(&self.relative_collision_model_file_path)
    }

    /// Local transform described by the template
    pub fn transform(&self) -> Transform {
        Transform::from_degrees(self.position, self.rotation_deg, self.scale)
    }
}

/// Team presentation and weapons shared by a team's placements
#[derive(Debug, Clone, PartialEq)]
pub struct TeamData {
    /// Hull colour
    pub color: Vec3,
    /// Shield effect colour
    pub shield_color: Vec3,
    /// Projectile colour
    pub projectile_color: Vec3,
    /// What the team's weapons fire
    pub primary_projectile: Option<Rc<ProjectileConfig>>,
    /// Team index
    pub team: usize,
}

impl Default for TeamData {
    fn default() -> Self {
        Self {
            color: Vec3::new(1.0, 1.0, 1.0),
            shield_color: Vec3::new(1.0, 1.0, 1.0),
            projectile_color: Vec3::new(1.0, 1.0, 1.0),
            primary_projectile: None,
            team: 0,
        }
    }
}

impl TeamData {
    /// Default palette entry for `team`
    pub fn for_team(team: usize) -> Self {
        const PALETTE: [[f32; 3]; 4] = [[0.2, 0.4, 1.0], [1.0, 0.25, 0.2], [0.2, 1.0, 0.4], [1.0, 0.9, 0.2]];
        let [r, g, b] = PALETTE[team % PALETTE.len()];
        let color = Vec3::new(r, g, b);
        Self {
            color,
            shield_color: color,
            projectile_color: color,
            primary_projectile: Some(Rc::new(ProjectileConfig::default())),
            team,
        }
    }
}

/// Something that happened to or was requested by a placement
#[derive(Debug, Clone)]
pub enum PlacementEvent {
    /// Hit by a projectile; play the damage effect here
    Damaged {
        /// Impact point
        location: Vec3,
    },
    /// Health ran out
    DestructionStarted,
    /// Periodic explosion effect while destructing
    DestructionFx {
        /// Where to spawn the effect
        location: Vec3,
    },
    /// Destruction finished; the entity should be removed
    Destroyed,
    /// Launch a projectile
    Fire(FireRequest),
}

/// Live state of one placement
#[derive(Debug)]
pub struct ShipPlacement {
    config: PlacementSubConfig,
    model_path: PathBuf,
    collision_model_path: PathBuf,
    team_data: TeamData,
    hp: i32,
    has_generator_power: bool,
    target: Option<EntityId>,
    hit_location: Option<Vec3>,
    lifecycle: PlacementLifecycle,

    local: Transform,
    spawn_local: Transform,
    parent_xform: Mat4,
    cached_model_pxl: Mat4,

    world_position: Cell<Option<Vec3>>,
    world_forward_n: Cell<Option<Vec3>>,
    world_up_n: Cell<Option<Vec3>>,
    spawn_up_wn: Cell<Option<Vec3>>,
    spawn_right_wn: Cell<Option<Vec3>>,
    spawn_forward_wn: Cell<Option<Vec3>>,
}

impl ShipPlacement {
    /// Local forward axis
    pub const FORWARD_LN: Vec3 = Vec3::new(0.0, 0.0, 1.0);
    /// Local up axis
    pub const UP_LN: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    /// Local right axis
    pub const RIGHT_LN: Vec3 = Vec3::new(1.0, 0.0, 0.0);

    /// Build a placement from its template
    pub fn new(config: PlacementSubConfig, owning_config: &dyn ConfigAsset, team_data: TeamData, parent_xform: Mat4) -> Self {
        let mut placement = Self {
            config: PlacementSubConfig::default(),
            model_path: PathBuf::new(),
            collision_model_path: PathBuf::new(),
            team_data,
            hp: DEFAULT_MAX_HP,
            has_generator_power: true,
            target: None,
            hit_location: None,
            lifecycle: PlacementLifecycle::default(),
            local: Transform::identity(),
            spawn_local: Transform::identity(),
            parent_xform,
            cached_model_pxl: Mat4::identity(),
            world_position: Cell::new(None),
            world_forward_n: Cell::new(None),
            world_up_n: Cell::new(None),
            spawn_up_wn: Cell::new(None),
            spawn_right_wn: Cell::new(None),
            spawn_forward_wn: Cell::new(None),
        };
        placement.replace_placement_config(config, owning_config);
        placement
    }

    /// Swap the template, resetting the transform to the new spawn pose
    pub fn replace_placement_config(&mut self, config: PlacementSubConfig, owning_config: &dyn ConfigAsset) {
        self.model_path = config.full_path(owning_config);
        self.collision_model_path = config.collision_model_full_path(owning_config);
        self.spawn_local = config.transform();
        self.config = config;
        self.set_transform(self.spawn_local.clone());
    }

    /// Template this placement was built from
    pub fn config(&self) -> &PlacementSubConfig {
        &self.config
    }

    /// Placement kind
    pub fn placement_type(&self) -> PlacementType {
        self.config.placement_type
    }

    /// Resolved model file
    pub fn model_path(&self) -> &PathBuf {
        &self.model_path
    }

    /// Resolved collision model file
    pub fn collision_model_path(&self) -> &PathBuf {
        &self.collision_model_path
    }

    /// Team presentation and weapons
    pub fn team_data(&self) -> &TeamData {
        &self.team_data
    }

    /// Replace team data
    pub fn set_team_data(&mut self, team_data: TeamData) {
        self.team_data = team_data;
    }

    /// Remaining hit points
    pub fn hp(&self) -> i32 {
        self.hp
    }

    /// Add (or with a negative amount, remove) hit points
    pub fn adjust_hp(&mut self, amount: i32) {
        self.hp = self.hp.saturating_add(amount);
    }

    /// Whether the ship's generator powers this placement
    pub fn has_generator_power(&self) -> bool {
        self.has_generator_power
    }

    /// Connect or cut generator power
    pub fn set_has_generator_power(&mut self, value: bool) {
        self.has_generator_power = value;
    }

    /// Current target handle (may be stale)
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Aim at `target`
    pub fn set_target(&mut self, target: Option<EntityId>) {
        self.target = target;
    }

    /// Where the last projectile struck
    pub fn hit_location(&self) -> Option<Vec3> {
        self.hit_location
    }

    /// Lifecycle state machine
    pub fn lifecycle(&self) -> &PlacementLifecycle {
        &self.lifecycle
    }

    /// Whether the placement still acts (not destructing)
    pub fn is_operational(&self) -> bool {
        !self.lifecycle.has_started_destruction()
    }

    /// Ship transform this placement hangs from
    pub fn parent_xform(&self) -> &Mat4 {
        &self.parent_xform
    }

    /// Move with the parent ship
    pub fn set_parent_xform(&mut self, parent_xform: Mat4) {
        self.parent_xform = parent_xform;
        self.update_model_matrix_cache();
    }

    /// Transform relative to the parent
    pub fn transform(&self) -> &Transform {
        &self.local
    }

    /// Replace the transform relative to the parent
    pub fn set_transform(&mut self, transform: Transform) {
        self.local = transform;
        self.update_model_matrix_cache();
    }

    /// Model matrix including the parent transform
    pub fn parent_x_local_model_matrix(&self) -> &Mat4 {
        &self.cached_model_pxl
    }

    /// Spawn pose matrix relative to the parent
    pub fn spawn_xform(&self) -> Mat4 {
        self.spawn_local.to_matrix()
    }

    fn update_model_matrix_cache(&mut self) {
        self.cached_model_pxl = self.parent_xform * self.local.to_matrix();
        for cache in [
            &self.world_position,
            &self.world_forward_n,
            &self.world_up_n,
            &self.spawn_up_wn,
            &self.spawn_right_wn,
            &self.spawn_forward_wn,
        ] {
            cache.set(None);
        }
    }

    fn cached(cache: &Cell<Option<Vec3>>, compute: impl FnOnce() -> Vec3) -> Vec3 {
        if let Some(value) = cache.get() {
            return value;
        }
        let value = compute();
        cache.set(Some(value));
        value
    }

    /// World-space position
    pub fn world_position(&self) -> Vec3 {
        Self::cached(&self.world_position, || utils::transform_point(&self.cached_model_pxl, Vec3::zeros()))
    }

    /// World-space forward, normalized
    pub fn world_forward_n(&self) -> Vec3 {
        Self::cached(&self.world_forward_n, || {
            utils::transform_direction(&self.cached_model_pxl, Self::FORWARD_LN, Self::FORWARD_LN)
        })
    }

    /// World-space up, normalized
    pub fn world_up_n(&self) -> Vec3 {
        Self::cached(&self.world_up_n, || utils::transform_direction(&self.cached_model_pxl, Self::UP_LN, Self::UP_LN))
    }

    fn spawn_axis_wn(&self, cache: &Cell<Option<Vec3>>, axis: Vec3) -> Vec3 {
        Self::cached(cache, || {
            let spawn_world = self.parent_xform * self.spawn_xform();
            utils::transform_direction(&spawn_world, axis, axis)
        })
    }

    /// World-space up of the spawn pose
    pub fn spawn_up_wn(&self) -> Vec3 {
        self.spawn_axis_wn(&self.spawn_up_wn, Self::UP_LN)
    }

    /// World-space right of the spawn pose
    pub fn spawn_right_wn(&self) -> Vec3 {
        self.spawn_axis_wn(&self.spawn_right_wn, Self::RIGHT_LN)
    }

    /// World-space forward of the spawn pose
    pub fn spawn_forward_wn(&self) -> Vec3 {
        self.spawn_axis_wn(&self.spawn_forward_wn, Self::FORWARD_LN)
    }

    /// World-space rotation of the placement (scale removed)
    pub fn world_rotation(&self) -> Quat {
        let forward = self.world_forward_n();
        let up = self.world_up_n();
        if forward.cross(&up).norm_squared() < f32::EPSILON {
            return Quat::identity();
        }
        Quat::face_towards(&forward, &up)
    }

    /// Turn the placement so its forward points along `direction_wn`
    ///
    /// Keeps the spawn pose's up as the roll reference.
    pub fn face_world_direction(&mut self, direction_wn: Vec3) {
        let Some(parent_inverse) = self.parent_xform.try_inverse() else {
            return;
        };
        let current = self.local.rotation * Self::FORWARD_LN;
        let direction = utils::transform_direction(&parent_inverse, direction_wn, current);
        let up = self.spawn_local.rotation * Self::UP_LN;
        if direction.cross(&up).norm_squared() < f32::EPSILON {
            return;
        }
        let mut transform = self.local.clone();
        transform.rotation = Quat::face_towards(&direction, &up);
        self.set_transform(transform);
    }

    /// Apply a projectile hit
    ///
    /// Ignored once destruction has started.
    pub fn notify_projectile_hit(&mut self, hit: &ProjectileHit, out: &mut Vec<PlacementEvent>) {
        if self.lifecycle.has_started_destruction() {
            return;
        }
        self.adjust_hp(-hit.damage);
        self.hit_location = Some(hit.location);
        self.lifecycle.mark_damaged();
        out.push(PlacementEvent::Damaged { location: hit.location });
        self.check_destruction(out);
    }

    fn check_destruction(&mut self, out: &mut Vec<PlacementEvent>) {
        if self.hp <= 0 && self.lifecycle.begin_destruction() {
            log::debug!("{} placement starting destruction", self.placement_type());
            out.push(PlacementEvent::DestructionStarted);
        }
    }

    /// Advance health driven state
    pub fn tick_lifecycle(&mut self, delta_time: f32, out: &mut Vec<PlacementEvent>) {
        self.check_destruction(out);

        let mut lifecycle_events = Vec::new();
        self.lifecycle.update(delta_time, &mut lifecycle_events);
        for event in lifecycle_events {
            match event {
                LifecycleEvent::DestructionTick => out.push(PlacementEvent::DestructionFx {
                    location: self.destruction_fx_location(),
                }),
                LifecycleEvent::Destroyed => out.push(PlacementEvent::Destroyed),
            }
        }
    }

    fn destruction_fx_location(&self) -> Vec3 {
        let mut rng = rand::thread_rng();
        let jitter = Vec3::new(rng.gen_range(-0.5..=0.5), rng.gen_range(-0.5..=0.5), rng.gen_range(-0.5..=0.5));
        self.world_position() + jitter
    }

    /// Build a fire request from this placement's team data
    ///
    /// `None` when the team has no projectile.
    pub fn fire_request(&self, start: Vec3, direction: Vec3) -> Option<FireRequest> {
        let projectile = self.team_data.primary_projectile.clone()?;
        Some(FireRequest {
            start,
            direction: direction.try_normalize(f32::EPSILON).unwrap_or_else(|| self.world_forward_n()),
            team: self.team_data.team,
            color: self.team_data.projectile_color,
            projectile,
            target: self.target,
        })
    }
}

/// Per-type placement behaviour
pub trait PlacementBehavior {
    /// Kind this behaviour implements
    fn placement_type(&self) -> PlacementType;

    /// Template was swapped; reset any pose-dependent state
    fn on_config_replaced(&mut self, _placement: &ShipPlacement) {}

    /// Act for one frame; only called while the placement is operational
    ///
    /// `target_position` is the live target's world position, if any.
    fn tick(
        &mut self,
        placement: &mut ShipPlacement,
        delta_time: f32,
        target_position: Option<Vec3>,
        out: &mut Vec<PlacementEvent>,
    );
}

/// Behaviour for a placement kind; `None` for [`PlacementType::Invalid`]
pub fn behavior_for(placement_type: PlacementType) -> Option<Box<dyn PlacementBehavior>> {
    match placement_type {
        PlacementType::Turret => Some(Box::new(TurretBehavior::default())),
        PlacementType::Communications => Some(Box::new(CommunicationBehavior::default())),
        PlacementType::Defense => Some(Box::new(DefenseBehavior)),
        PlacementType::Invalid => None,
    }
}

/// Placement component stored in the level's world
pub struct PlacementEntity {
    /// Live state
    pub placement: ShipPlacement,
    behavior: Box<dyn PlacementBehavior>,
}

impl Component for PlacementEntity {}

impl fmt::Debug for PlacementEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacementEntity")
            .field("placement", &self.placement)
            .field("behavior", &self.behavior.placement_type())
            .finish()
    }
}

impl PlacementEntity {
    /// Build a placement; `None` when the template's type is invalid
    pub fn spawn(
        config: PlacementSubConfig,
        owning_config: &dyn ConfigAsset,
        team_data: TeamData,
        parent_xform: Mat4,
    ) -> Option<Self> {
        let Some(behavior) = behavior_for(config.placement_type) else {
            log::warn!(
                "Skipping placement '{}' with invalid type in '{}'",
                config.relative_file_path,
                owning_config.name()
            );
            return None;
        };
        let placement = ShipPlacement::new(config, owning_config, team_data, parent_xform);
        Some(Self { placement, behavior })
    }

    /// Swap the template and let the behaviour react
    pub fn replace_placement_config(&mut self, config: PlacementSubConfig, owning_config: &dyn ConfigAsset) {
        self.placement.replace_placement_config(config, owning_config);
        self.behavior.on_config_replaced(&self.placement);
    }

    /// Advance lifecycle, then behaviour while operational
    pub fn tick(&mut self, delta_time: f32, target_position: Option<Vec3>, out: &mut Vec<PlacementEvent>) {
        self.placement.tick_lifecycle(delta_time, out);
        if self.placement.is_operational() {
            self.behavior.tick(&mut self.placement, delta_time, target_position, out);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::TestOwner;
    use super::*;
    use approx::assert_relative_eq;

    fn turret_config() -> PlacementSubConfig {
        PlacementSubConfig {
            position: Vec3::new(0.0, 1.0, 0.0),
            relative_file_path: "Models/turret.obj".to_string(),
            relative_collision_model_file_path: "Models/turret_col.obj".to_string(),
            placement_type: PlacementType::Turret,
            ..PlacementSubConfig::default()
        }
    }

    #[test]
    fn test_lex_round_trip_and_invalid() {
        for kind in [PlacementType::Communications, PlacementType::Defense, PlacementType::Turret] {
            assert_eq!(PlacementType::from_lex(kind.lex()), kind);
        }
        assert_eq!(PlacementType::from_lex("turret"), PlacementType::Invalid);
        assert_eq!("BOGUS".parse::<PlacementType>(), Ok(PlacementType::Invalid));
        assert_eq!(PlacementType::Invalid.to_string(), "INVALID");
    }

    #[test]
    fn test_sub_config_json_keys() {
        let value = serde_json::to_value(turret_config()).unwrap();
        assert_eq!(value["placementType"], "TURRET");
        assert_eq!(value["relativeFilePath"], "Models/turret.obj");
        assert_eq!(value["position"]["y"], 1.0);

        let parsed = PlacementSubConfig::read(&serde_json::json!({ "placementType": "LASER", "rotation_deg": { "x": 90 } }));
        assert_eq!(parsed.placement_type, PlacementType::Invalid);
        assert_eq!(parsed.rotation_deg, Vec3::new(90.0, 0.0, 0.0));
        assert_eq!(parsed.scale, Vec3::new(1.0, 1.0, 1.0));

        assert_eq!(PlacementSubConfig::read(&value), turret_config());
    }

    #[test]
    fn test_sub_config_mistyped_fields_keep_defaults() {
        let parsed = PlacementSubConfig::read(&serde_json::json!({
            "placementType": 3,
            "scale": "big",
            "relativeFilePath": "Models/dish.obj"
        }));
        assert_eq!(parsed.placement_type, PlacementType::Invalid);
        assert_eq!(parsed.scale, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(parsed.relative_file_path, "Models/dish.obj");
    }

    #[test]
    fn test_paths_resolve_against_owner() {
        let owner = TestOwner::default();
        let config = turret_config();
        assert_eq!(config.full_path(&owner), PathBuf::from("mods/Test/Models/turret.obj"));
        assert_eq!(config.collision_model_full_path(&owner), PathBuf::from("mods/Test/Models/turret_col.obj"));
    }

    #[test]
    fn test_world_caches_follow_parent() {
        let owner = TestOwner::default();
        let mut placement = ShipPlacement::new(turret_config(), &owner, TeamData::default(), Mat4::identity());
        assert_relative_eq!(placement.world_position(), Vec3::new(0.0, 1.0, 0.0));

        placement.set_parent_xform(Mat4::new_translation(&Vec3::new(10.0, 0.0, 0.0)));
        assert_relative_eq!(placement.world_position(), Vec3::new(10.0, 1.0, 0.0));
        assert_relative_eq!(placement.world_forward_n(), Vec3::z(), epsilon = 1e-6);

        let yaw = Transform::from_degrees(Vec3::zeros(), Vec3::new(90.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        placement.set_parent_xform(yaw.to_matrix());
        assert_relative_eq!(placement.world_forward_n(), Vec3::x(), epsilon = 1e-5);
        assert_relative_eq!(placement.spawn_forward_wn(), Vec3::x(), epsilon = 1e-5);
        assert_relative_eq!(placement.spawn_right_wn(), -Vec3::z(), epsilon = 1e-5);
    }

    #[test]
    fn test_face_world_direction_keeps_spawn_pose() {
        let owner = TestOwner::default();
        let mut placement = ShipPlacement::new(turret_config(), &owner, TeamData::default(), Mat4::identity());
        placement.face_world_direction(Vec3::x());

        assert_relative_eq!(placement.world_forward_n(), Vec3::x(), epsilon = 1e-5);
        assert_relative_eq!(placement.spawn_forward_wn(), Vec3::z(), epsilon = 1e-5);
        assert_relative_eq!(placement.world_position(), Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_hits_drive_destruction_once() {
        let owner = TestOwner::default();
        let mut placement = ShipPlacement::new(turret_config(), &owner, TeamData::default(), Mat4::identity());
        let mut events = Vec::new();
        let hit = ProjectileHit {
            damage: 60,
            location: Vec3::new(0.0, 1.5, 0.0),
            team: 1,
        };

        placement.notify_projectile_hit(&hit, &mut events);
        assert_eq!(placement.lifecycle().state(), PlacementState::Damaged);
        assert_eq!(placement.hp(), 40);

        placement.notify_projectile_hit(&hit, &mut events);
        assert!(placement.lifecycle().has_started_destruction());
        assert!(matches!(events.last(), Some(PlacementEvent::DestructionStarted)));

        let before = events.len();
        placement.notify_projectile_hit(&hit, &mut events);
        assert_eq!(events.len(), before);
        assert_eq!(placement.hp(), -20);
    }

    #[test]
    fn test_adjust_hp_below_zero_starts_destruction_on_tick() {
        let owner = TestOwner::default();
        let mut placement = ShipPlacement::new(turret_config(), &owner, TeamData::default(), Mat4::identity());
        placement.adjust_hp(-DEFAULT_MAX_HP);

        let mut events = Vec::new();
        placement.tick_lifecycle(0.0, &mut events);
        assert!(matches!(events.first(), Some(PlacementEvent::DestructionStarted)));
        assert!(!placement.is_operational());
    }

    #[test]
    fn test_invalid_type_is_not_spawned() {
        let owner = TestOwner::default();
        let config = PlacementSubConfig::default();
        assert!(PlacementEntity::spawn(config, &owner, TeamData::default(), Mat4::identity()).is_none());
    }
}
