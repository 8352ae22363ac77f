//! Stars: the directional lights of a solar system
//!
//! Stars belong to the level that spawned them. The level's
//! [`StarRegistry`] replaces a process-wide star list; it is emptied when
//! the level ends.

use arcade_engine::foundation::collections::{new_key_type, SlotMap};
use arcade_engine::foundation::math::{Transform, Vec3};
use arcade_engine::render::DirectionalLight;

/// Directional lights a lit shader accepts
pub const MAX_DIR_LIGHTS: usize = 4;

/// Default HDR multiplier of a star's colour
pub const DEFAULT_HDR_INTENSITY: f32 = 1000.0;

new_key_type! {
    /// Handle to a star in a [`StarRegistry`]
    pub struct StarId;
}

/// A local star
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    /// Where the star sits
    pub xform: Transform,
    /// Display colour
    pub ldr_color: Vec3,
    /// HDR multiplier
    pub hdr_intensity: f32,
    /// Light with the HDR colour
    pub use_hdr: bool,
    /// Light the scene as if aimed at the origin
    pub force_centered: bool,
}

impl Default for Star {
    fn default() -> Self {
        Self {
            xform: Transform::identity(),
            ldr_color: Vec3::new(1.0, 1.0, 1.0),
            hdr_intensity: DEFAULT_HDR_INTENSITY,
            use_hdr: false,
            force_centered: true,
        }
    }
}

impl Star {
    /// Star at `position` with default colour
    pub fn at(position: Vec3) -> Self {
        Self {
            xform: Transform::from_position(position),
            ..Self::default()
        }
    }

    /// Direction the light travels
    ///
    /// A centered star shines toward the origin; otherwise (or when it sits
    /// on the origin) along its forward.
    pub fn light_direction(&self) -> Vec3 {
        let forward = self.xform.rotation * Vec3::z();
        if self.force_centered {
            (-self.xform.position).try_normalize(f32::EPSILON).unwrap_or(forward)
        } else {
            forward
        }
    }

    /// Display colour
    pub fn light_ldr(&self) -> Vec3 {
        self.ldr_color
    }

    /// Colour scaled by the HDR intensity
    pub fn light_hdr(&self) -> Vec3 {
        self.ldr_color * self.hdr_intensity
    }

    /// Light as fed to shaders
    pub fn directional_light(&self) -> DirectionalLight {
        DirectionalLight {
            direction: self.light_direction(),
            color: if self.use_hdr { self.light_hdr() } else { self.light_ldr() },
        }
    }
}

/// Stars of one scene
#[derive(Debug, Default)]
pub struct StarRegistry {
    stars: SlotMap<StarId, Star>,
}

impl StarRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a star
    pub fn add(&mut self, star: Star) -> StarId {
        self.stars.insert(star)
    }

    /// Remove a star
    pub fn remove(&mut self, id: StarId) -> Option<Star> {
        self.stars.remove(id)
    }

    /// Look up a star
    pub fn get(&self, id: StarId) -> Option<&Star> {
        self.stars.get(id)
    }

    /// All stars in registration order
    pub fn iter(&self) -> impl Iterator<Item = (StarId, &Star)> {
        self.stars.iter()
    }

    /// Number of stars
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    /// True without stars
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Remove every star
    pub fn clear(&mut self) {
        self.stars.clear();
    }

    /// Lights for the scene shader, capped at [`MAX_DIR_LIGHTS`]
    pub fn directional_lights(&self) -> Vec<DirectionalLight> {
        if self.stars.len() > MAX_DIR_LIGHTS {
            log::warn!("{} stars in scene, only {} light it", self.stars.len(), MAX_DIR_LIGHTS);
        }
        self.stars
            .values()
            .take(MAX_DIR_LIGHTS)
            .map(Star::directional_light)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_centered_star_shines_at_origin() {
        let star = Star::at(Vec3::new(0.0, 0.0, 100.0));
        assert_relative_eq!(star.light_direction(), -Vec3::z());

        let mut free = Star::at(Vec3::new(0.0, 0.0, 100.0));
        free.force_centered = false;
        assert_relative_eq!(free.light_direction(), Vec3::z());
    }

    #[test]
    fn test_hdr_scales_colour() {
        let mut star = Star::default();
        assert_relative_eq!(star.light_hdr(), Vec3::new(1000.0, 1000.0, 1000.0));
        assert_relative_eq!(star.directional_light().color, Vec3::new(1.0, 1.0, 1.0));
        star.use_hdr = true;
        assert_relative_eq!(star.directional_light().color, Vec3::new(1000.0, 1000.0, 1000.0));
    }

    #[test]
    fn test_registry_caps_lights() {
        let mut registry = StarRegistry::new();
        let ids: Vec<_> = (0..6).map(|i| registry.add(Star::at(Vec3::new(i as f32 + 1.0, 0.0, 0.0)))).collect();
        assert_eq!(registry.directional_lights().len(), MAX_DIR_LIGHTS);

        registry.remove(ids[0]);
        assert!(registry.get(ids[0]).is_none());
        assert_eq!(registry.len(), 5);

        registry.clear();
        assert!(registry.directional_lights().is_empty());
    }
}
