//! Projectile data exchanged between placements and the level

use std::rc::Rc;

use arcade_engine::prelude::*;

/// Tunables of one projectile kind
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileConfig {
    /// Display name
    pub name: String,
    /// Hit points removed on impact
    pub damage: i32,
    /// Travel speed (units per second)
    pub speed: f32,
    /// Time before the projectile expires (seconds)
    pub lifetime_sec: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            name: "laser".to_string(),
            damage: 25,
            speed: 400.0,
            lifetime_sec: 3.0,
        }
    }
}

/// A placement asking the level to launch a projectile
#[derive(Debug, Clone)]
pub struct FireRequest {
    /// Muzzle position in world space
    pub start: Vec3,
    /// Normalized launch direction
    pub direction: Vec3,
    /// Team of the shooter
    pub team: usize,
    /// Projectile colour
    pub color: Vec3,
    /// What is being fired
    pub projectile: Rc<ProjectileConfig>,
    /// Entity the shooter was aiming at
    pub target: Option<EntityId>,
}

/// A projectile reaching something
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileHit {
    /// Damage dealt
    pub damage: i32,
    /// Impact point in world space
    pub location: Vec3,
    /// Team of the shooter
    pub team: usize,
}
