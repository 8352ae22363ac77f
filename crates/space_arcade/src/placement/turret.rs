//! Turret placement
//!
//! Swivels toward its target inside a cone around its spawn forward and
//! fires from alternating barrels once it is lined up.

use arcade_engine::foundation::math::{utils, Vec3};

use super::{PlacementBehavior, PlacementEvent, PlacementType, ShipPlacement};

/// Max swivel away from the spawn forward (degrees)
pub const ROTATION_LIMIT_DEG: f32 = 45.0;
/// Swivel speed (degrees per second)
pub const ROTATION_SPEED_DEG_SEC: f32 = 30.0;
/// Seconds between shots
pub const FIRE_COOLDOWN_SEC: f32 = 1.0;
/// Aim error under which the turret shoots (degrees)
pub const AIM_TOLERANCE_DEG: f32 = 5.0;

/// Turret behaviour
#[derive(Debug, Clone)]
pub struct TurretBehavior {
    rotation_limit_rad: f32,
    rotation_speed_rad_sec: f32,
    fire_cooldown_sec: f32,
    time_since_fire_sec: f32,
    aim_tolerance_rad: f32,
    shooting_enabled: bool,
    barrel_locations_lp: Vec<Vec3>,
    barrel_index: usize,
}

impl Default for TurretBehavior {
    fn default() -> Self {
        Self {
            rotation_limit_rad: utils::deg_to_rad(ROTATION_LIMIT_DEG),
            rotation_speed_rad_sec: utils::deg_to_rad(ROTATION_SPEED_DEG_SEC),
            fire_cooldown_sec: FIRE_COOLDOWN_SEC,
            time_since_fire_sec: FIRE_COOLDOWN_SEC,
            aim_tolerance_rad: utils::deg_to_rad(AIM_TOLERANCE_DEG),
            shooting_enabled: true,
            barrel_locations_lp: Self::default_barrels(),
            barrel_index: 0,
        }
    }
}

impl TurretBehavior {
    /// Barrel muzzles of the stock turret model, in local space
    pub fn default_barrels() -> Vec<Vec3> {
        vec![Vec3::new(0.25, 0.0, 1.0), Vec3::new(-0.25, 0.0, 1.0)]
    }

    /// Builder: custom barrel muzzles; an empty list fires from the origin
    pub fn with_barrels(mut self, barrels: Vec<Vec3>) -> Self {
        self.barrel_locations_lp = barrels;
        self.barrel_index = 0;
        self
    }

    /// Allow or forbid shooting (aiming continues)
    pub fn set_shooting_enabled(&mut self, enabled: bool) {
        self.shooting_enabled = enabled;
    }

    fn next_barrel(&mut self) -> Vec3 {
        if self.barrel_locations_lp.is_empty() {
            return Vec3::zeros();
        }
        let barrel = self.barrel_locations_lp[self.barrel_index % self.barrel_locations_lp.len()];
        self.barrel_index = (self.barrel_index + 1) % self.barrel_locations_lp.len();
        barrel
    }
}

impl PlacementBehavior for TurretBehavior {
    fn placement_type(&self) -> PlacementType {
        PlacementType::Turret
    }

    fn on_config_replaced(&mut self, _placement: &ShipPlacement) {
        self.barrel_index = 0;
    }

    fn tick(
        &mut self,
        placement: &mut ShipPlacement,
        delta_time: f32,
        target_position: Option<Vec3>,
        out: &mut Vec<PlacementEvent>,
    ) {
        self.time_since_fire_sec += delta_time;

        let Some(target_position) = target_position else {
            return;
        };
        let Some(to_target) = (target_position - placement.world_position()).try_normalize(f32::EPSILON) else {
            return;
        };

        let stationary = placement.spawn_forward_wn();
        let allowed = utils::rotate_toward(&stationary, &to_target, self.rotation_limit_rad);
        let aim = utils::rotate_toward(&placement.world_forward_n(), &allowed, self.rotation_speed_rad_sec * delta_time);
        placement.face_world_direction(aim);

        let aim_error = utils::angle_between(&placement.world_forward_n(), &to_target);
        let ready = self.shooting_enabled
            && placement.has_generator_power()
            && self.time_since_fire_sec >= self.fire_cooldown_sec
            && aim_error <= self.aim_tolerance_rad;
        if !ready {
            return;
        }

        let barrel = self.next_barrel();
        let start = utils::transform_point(placement.parent_x_local_model_matrix(), barrel);
        if let Some(request) = placement.fire_request(start, placement.world_forward_n()) {
            self.time_since_fire_sec = 0.0;
            out.push(PlacementEvent::Fire(request));
        }
    }
}
