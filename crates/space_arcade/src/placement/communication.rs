//! Communications placement: a spinning dish that pings its target

use arcade_engine::foundation::math::{utils, Quat, Vec3};

use super::{PlacementBehavior, PlacementEvent, PlacementType, ShipPlacement};

/// Dish spin speed (degrees per second)
pub const ROTATION_SPEED_DEG_SEC: f32 = 30.0;
/// Seconds between transmissions
pub const FIRE_COOLDOWN_SEC: f32 = 10.0;
const INITIAL_TIME_SINCE_FIRE_SEC: f32 = 1.0;

/// Communications behaviour
#[derive(Debug, Clone)]
pub struct CommunicationBehavior {
    rotation_speed_rad_sec: f32,
    fire_cooldown_sec: f32,
    time_since_fire_sec: f32,
}

impl Default for CommunicationBehavior {
    fn default() -> Self {
        Self {
            rotation_speed_rad_sec: utils::deg_to_rad(ROTATION_SPEED_DEG_SEC),
            fire_cooldown_sec: FIRE_COOLDOWN_SEC,
            time_since_fire_sec: INITIAL_TIME_SINCE_FIRE_SEC,
        }
    }
}

impl PlacementBehavior for CommunicationBehavior {
    fn placement_type(&self) -> PlacementType {
        PlacementType::Communications
    }

    fn on_config_replaced(&mut self, _placement: &ShipPlacement) {
        self.time_since_fire_sec = INITIAL_TIME_SINCE_FIRE_SEC;
    }

    fn tick(
        &mut self,
        placement: &mut ShipPlacement,
        delta_time: f32,
        target_position: Option<Vec3>,
        out: &mut Vec<PlacementEvent>,
    ) {
        if !placement.has_generator_power() {
            return;
        }

        let mut transform = placement.transform().clone();
        let spin = Quat::from_axis_angle(&Vec3::y_axis(), self.rotation_speed_rad_sec * delta_time);
        transform.rotation *= spin;
        placement.set_transform(transform);

        self.time_since_fire_sec += delta_time;
        let Some(target_position) = target_position else {
            return;
        };
        if self.time_since_fire_sec < self.fire_cooldown_sec {
            return;
        }

        let start = placement.world_position();
        if let Some(request) = placement.fire_request(start, target_position - start) {
            self.time_since_fire_sec = 0.0;
            out.push(PlacementEvent::Fire(request));
        }
    }
}
