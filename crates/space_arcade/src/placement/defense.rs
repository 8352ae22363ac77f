//! Defense placement; it only soaks up damage

use arcade_engine::foundation::math::Vec3;

use super::{PlacementBehavior, PlacementEvent, PlacementType, ShipPlacement};

/// Defense behaviour
#[derive(Debug, Clone, Copy, Default)]
pub struct DefenseBehavior;

impl PlacementBehavior for DefenseBehavior {
    fn placement_type(&self) -> PlacementType {
        PlacementType::Defense
    }

    fn tick(&mut self, _placement: &mut ShipPlacement, _delta_time: f32, _target: Option<Vec3>, _out: &mut Vec<PlacementEvent>) {}
}
