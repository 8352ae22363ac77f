//! Space combat level
//!
//! Owns the level's entity arena. Ships and their placements are spawned
//! from spawn configs when the level starts, each announced on
//! [`SpaceLevel::on_spawned_entity`]. One [`TeamCommander`] per team listens
//! to that broadcast and hands out targets to idle placements every tick.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use arcade_engine::foundation::math::Vec3;
use arcade_engine::prelude::*;

use super::base_level::{model_draw, BaseLevel};
use super::space_level_config::{ShipSpawn, SpaceLevelConfig, MAX_TEAMS};
use super::SpawnedEntity;
use crate::components::{RenderModelComponent, ShipComponent, TeamComponent};
use crate::config_asset::ConfigAsset;
use crate::environment::{Star, StarRegistry};
use crate::placement::{PlacementEntity, PlacementEvent, TeamData};
use crate::projectile::ProjectileHit;
use crate::spawn_config::SpawnConfig;
use crate::team::TeamCommander;

/// A placement event tagged with the entity it came from
#[derive(Debug, Clone)]
pub struct LevelEvent {
    /// Placement entity
    pub source: EntityId,
    /// What happened
    pub event: PlacementEvent,
}

/// A level of ships fighting in space
pub struct SpaceLevel {
    base: BaseLevel,
    config: SpaceLevelConfig,
    mod_dir: PathBuf,
    world: World,
    stars: StarRegistry,
    spawn_configs: HashMap<String, Rc<SpawnConfig>>,
    team_data: Vec<TeamData>,
    commanders: Vec<Rc<RefCell<TeamCommander>>>,
    commander_subscriptions: Vec<SubscriptionId>,
    instant_hits: bool,
    events: Vec<LevelEvent>,

    /// Fired for every entity spawned into the level
    pub on_spawned_entity: Broadcast<SpawnedEntity>,
}

impl std::fmt::Debug for SpaceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpaceLevel")
            .field("name", &self.base.name())
            .field("entities", &self.world.len())
            .field("stars", &self.stars.len())
            .field("commanders", &self.commanders.len())
            .finish()
    }
}

impl SpaceLevel {
    /// Level called `name` with layout `config`; spawn configs are read
    /// from `mod_dir`
    pub fn new(name: impl Into<String>, config: SpaceLevelConfig, mod_dir: impl Into<PathBuf>) -> Self {
        Self {
            base: BaseLevel::new(name),
            config,
            mod_dir: mod_dir.into(),
            world: World::new(),
            stars: StarRegistry::new(),
            spawn_configs: HashMap::new(),
            team_data: Vec::new(),
            commanders: Vec::new(),
            commander_subscriptions: Vec::new(),
            instant_hits: true,
            events: Vec::new(),
            on_spawned_entity: Broadcast::new(),
        }
    }

    /// Resolve fire requests as immediate hits on the shooter's target
    pub fn set_instant_hits(&mut self, instant_hits: bool) {
        self.instant_hits = instant_hits;
    }

    /// Layout the level was built from
    pub fn config(&self) -> &SpaceLevelConfig {
        &self.config
    }

    /// Mod the level loads its spawn configs from
    pub fn mod_dir(&self) -> &Path {
        &self.mod_dir
    }

    /// Entity arena
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Stars lighting the level
    pub fn stars(&self) -> &StarRegistry {
        &self.stars
    }

    /// Commander of `team`, while the level is started
    pub fn commander(&self, team: usize) -> Option<&Rc<RefCell<TeamCommander>>> {
        self.commanders.get(team)
    }

    /// Events produced since the start of the last tick
    pub fn events(&self) -> &[LevelEvent] {
        &self.events
    }

    /// Make a spawn config available without reading it from disk
    pub fn register_spawn_config(&mut self, config: SpawnConfig) {
        self.spawn_configs.insert(config.name().to_string(), Rc::new(config));
    }

    fn spawn_config(&mut self, name: &str) -> Option<Rc<SpawnConfig>> {
        if let Some(config) = self.spawn_configs.get(name) {
            return Some(Rc::clone(config));
        }
        match SpawnConfig::load_named(&self.mod_dir, name) {
            Ok(config) => {
                let config = Rc::new(config);
                self.spawn_configs.insert(name.to_string(), Rc::clone(&config));
                Some(config)
            }
            Err(e) => {
                log::error!("Level '{}' cannot load spawn config '{}': {}", self.base.name(), name, e);
                None
            }
        }
    }

    fn team_data_for(&mut self, team: usize) -> TeamData {
        if self.team_data.len() <= team {
            let start = self.team_data.len();
            self.team_data.extend((start..=team).map(TeamData::for_team));
        }
        self.team_data[team].clone()
    }

    fn announce(&mut self, entity: EntityId, team: Option<usize>) {
        self.on_spawned_entity.broadcast(&SpawnedEntity { entity, team });
    }

    /// Spawn a ship and its placements
    ///
    /// Returns the ship entity, or `None` when its spawn config is missing
    /// or its team is out of range.
    pub fn spawn_ship(&mut self, spawn: &ShipSpawn) -> Option<EntityId> {
        if spawn.team >= MAX_TEAMS {
            log::warn!("Not spawning '{}': team {} is out of range", spawn.spawn_config, spawn.team);
            return None;
        }
        let config = self.spawn_config(&spawn.spawn_config)?;
        let team_data = self.team_data_for(spawn.team);
        let ship_xform = spawn.transform();
        let tint = config.team_color().unwrap_or(team_data.color);

        let ship = self.world.create_entity(format!("ship {}", config.name()));
        self.world.add_component(ship, TransformComponent::from_math_transform(&ship_xform));
        self.world.add_component(ship, TeamComponent { team: spawn.team });
        self.world.add_component(
            ship,
            RenderModelComponent::new(config.resolve_mod_path(config.model_file_path())).with_tint(tint),
        );
        self.world.add_component(
            ship,
            ShipComponent {
                spawn_config: config.name().to_string(),
                placements: Vec::new(),
            },
        );
        self.announce(ship, Some(spawn.team));

        let parent_xform = ship_xform.to_matrix();
        let mut placements = Vec::with_capacity(config.placements().len());
        for sub_config in config.placements() {
            let Some(placement) =
                PlacementEntity::spawn(sub_config.clone(), &*config, team_data.clone(), parent_xform)
            else {
                continue;
            };
            let entity = self
                .world
                .create_entity(format!("{} placement of {}", placement.placement.placement_type(), config.name()));
            self.world.add_component(entity, placement_transform(&placement));
            self.world.add_component(entity, TeamComponent { team: spawn.team });
            self.world.add_component(
                entity,
                RenderModelComponent::new(placement.placement.model_path().clone()).with_tint(tint),
            );
            self.world.add_component(entity, placement);
            placements.push(entity);
            self.announce(entity, Some(spawn.team));
        }

        log::debug!(
            "Spawned '{}' for team {} with {} placement(s)",
            config.name(),
            spawn.team,
            placements.len()
        );
        if let Some(ship_component) = self.world.get_component_mut::<ShipComponent>(ship) {
            ship_component.placements = placements;
        }
        Some(ship)
    }

    /// Deliver a projectile hit to a placement
    ///
    /// Returns false when `entity` is not a live placement or the hit came
    /// from its own team.
    pub fn apply_projectile_hit(&mut self, entity: EntityId, hit: &ProjectileHit) -> bool {
        if self.world.get_component::<TeamComponent>(entity).is_some_and(|t| t.team == hit.team) {
            return false;
        }
        let Some(placement) = self.world.get_component_mut::<PlacementEntity>(entity) else {
            return false;
        };
        let mut out = Vec::new();
        placement.placement.notify_projectile_hit(hit, &mut out);
        self.events
            .extend(out.into_iter().map(|event| LevelEvent { source: entity, event }));
        true
    }

    fn entity_position(&self, entity: EntityId) -> Option<Vec3> {
        self.world.get_component::<TransformComponent>(entity).map(|t| t.position)
    }

    fn assign_targets(&mut self, placements: &[EntityId]) {
        for &entity in placements {
            let Some(placement) = self.world.get_component::<PlacementEntity>(entity) else {
                continue;
            };
            if !placement.placement.is_operational()
                || placement.placement.target().is_some_and(|t| self.world.is_alive(t))
            {
                continue;
            }
            let Some(team) = self.world.get_component::<TeamComponent>(entity).map(|t| t.team) else {
                continue;
            };
            let target = self
                .commanders
                .get(team)
                .and_then(|commander| commander.borrow_mut().target(&self.world));
            if let Some(placement) = self.world.get_component_mut::<PlacementEntity>(entity) {
                placement.placement.set_target(target);
            }
        }
    }

    fn resolve_fire_requests(&mut self) {
        let hits: Vec<(EntityId, ProjectileHit)> = self
            .events
            .iter()
            .filter_map(|e| match &e.event {
                PlacementEvent::Fire(request) => {
                    let target = request.target?;
                    let location = self.entity_position(target)?;
                    Some((
                        target,
                        ProjectileHit {
                            damage: request.projectile.damage,
                            location,
                            team: request.team,
                        },
                    ))
                }
                _ => None,
            })
            .collect();
        for (target, hit) in hits {
            self.apply_projectile_hit(target, &hit);
        }
    }

    fn remove_destroyed(&mut self, destroyed: &[EntityId]) {
        if destroyed.is_empty() {
            return;
        }
        for &entity in destroyed {
            self.world.destroy_entity(entity);
        }
        for ship in self.world.entities_with::<ShipComponent>() {
            if let Some(ship) = self.world.get_component_mut::<ShipComponent>(ship) {
                ship.placements.retain(|p| !destroyed.contains(p));
            }
        }
        log::debug!("Removed {} destroyed placement(s)", destroyed.len());
    }

    /// Number of placements still in the world
    pub fn placement_count(&self) -> usize {
        self.world.query::<PlacementEntity>().count()
    }
}

fn placement_transform(entity: &PlacementEntity) -> TransformComponent {
    TransformComponent {
        position: entity.placement.world_position(),
        rotation: entity.placement.world_rotation(),
        scale: entity.placement.transform().scale,
    }
}

impl Level for SpaceLevel {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn start_level(&mut self) {
        self.base.start();

        for spawn in &self.config.stars {
            self.stars.add(Star {
                ldr_color: spawn.color,
                hdr_intensity: spawn.intensity,
                ..Star::at(spawn.position)
            });
        }

        for team in 0..self.config.team_count() {
            let commander = Rc::new(RefCell::new(TeamCommander::new(team)));
            let id = TeamCommander::attach(&commander, &mut self.on_spawned_entity, &self.world);
            self.commander_subscriptions.push(id);
            self.commanders.push(commander);
        }

        let ships = self.config.ships.clone();
        let spawned = ships.iter().filter_map(|spawn| self.spawn_ship(spawn)).count();
        log::info!(
            "Level '{}' started: {} ship(s), {} star(s), {} team(s)",
            self.base.name(),
            spawned,
            self.stars.len(),
            self.commanders.len()
        );
    }

    fn end_level(&mut self) {
        for id in self.commander_subscriptions.drain(..) {
            self.on_spawned_entity.unsubscribe(id);
        }
        self.commanders.clear();
        self.world.clear();
        self.stars.clear();
        self.team_data.clear();
        self.events.clear();
        self.base.end();
        log::info!("Level '{}' ended", self.base.name());
    }

    fn tick(&mut self, delta_time: f32) {
        self.events.clear();

        let placements = self.world.entities_with::<PlacementEntity>();
        self.assign_targets(&placements);

        let target_positions: Vec<Option<Vec3>> = placements
            .iter()
            .map(|&entity| {
                let target = self.world.get_component::<PlacementEntity>(entity)?.placement.target()?;
                self.entity_position(target)
            })
            .collect();

        let mut destroyed = Vec::new();
        let mut out = Vec::new();
        for (&entity, target_position) in placements.iter().zip(target_positions) {
            let Some(placement) = self.world.get_component_mut::<PlacementEntity>(entity) else {
                continue;
            };
            placement.tick(delta_time, target_position, &mut out);
            let transform = placement_transform(placement);
            if let Some(component) = self.world.get_component_mut::<TransformComponent>(entity) {
                *component = transform;
            }
            for event in out.drain(..) {
                if matches!(event, PlacementEvent::Destroyed) {
                    destroyed.push(entity);
                }
                self.events.push(LevelEvent { source: entity, event });
            }
        }

        if self.instant_hits {
            self.resolve_fire_requests();
        }
        self.remove_destroyed(&destroyed);
    }

    fn render(&self, camera: Option<&FrameView>, queue: &mut RenderQueue) {
        let Some(program) = self.base.begin_frame(camera, self.stars.directional_lights(), queue) else {
            return;
        };
        let Some(camera) = camera else {
            return;
        };
        self.base.draw_render_entities(program, camera, queue);

        for (entity, model) in self.world.query::<RenderModelComponent>() {
            let matrix = match self.world.get_component::<PlacementEntity>(entity) {
                Some(placement) => *placement.placement.parent_x_local_model_matrix(),
                None => match self.world.get_component::<TransformComponent>(entity) {
                    Some(transform) => transform.to_matrix(),
                    None => continue,
                },
            };
            queue.add_command(model_draw(
                &model.model_path.to_string_lossy(),
                program,
                matrix,
                model.tint,
                camera,
            ));
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{PlacementSubConfig, PlacementType};
    use crate::levels::StarSpawn;

    fn turret_ship() -> SpawnConfig {
        let mut config = SpawnConfig::new("Frigate", "Assets/Models/frigate.obj", "mods/Test");
        for x in [-2.0, 2.0] {
            config.add_placement(PlacementSubConfig {
                placement_type: PlacementType::Turret,
                position: Vec3::new(x, 1.0, 0.0),
                relative_file_path: "Assets/Models/turret.obj".to_string(),
                ..PlacementSubConfig::default()
            });
        }
        config
    }

    fn duel() -> SpaceLevel {
        let mut facing_back = ShipSpawn::new("Frigate", 1, Vec3::new(0.0, 0.0, 40.0));
        facing_back.rotation_deg = Vec3::new(180.0, 0.0, 0.0);
        let config = SpaceLevelConfig {
            stars: vec![StarSpawn::default()],
            ships: vec![ShipSpawn::new("Frigate", 0, Vec3::zeros()), facing_back],
            ..SpaceLevelConfig::default()
        };
        let mut level = SpaceLevel::new("duel", config, "mods/Test");
        level.register_spawn_config(turret_ship());
        level
    }

    #[test]
    fn test_start_spawns_and_announces_everything() {
        let mut level = duel();
        let announced = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&announced);
        level.on_spawned_entity.subscribe(move |spawned: &SpawnedEntity| sink.borrow_mut().push(*spawned));

        level.start_level();

        assert_eq!(announced.borrow().len(), 6);
        assert_eq!(level.world().len(), 6);
        assert_eq!(level.placement_count(), 4);
        assert_eq!(level.stars().len(), 1);
        let enemy = level.commander(0).unwrap();
        assert_eq!(enemy.borrow().pending_count(), 3);
    }

    #[test]
    fn test_missing_spawn_config_is_skipped() {
        let config = SpaceLevelConfig {
            ships: vec![ShipSpawn::new("Nowhere", 0, Vec3::zeros())],
            ..SpaceLevelConfig::default()
        };
        let mut level = SpaceLevel::new("empty", config, "mods/DoesNotExist");
        level.start_level();
        assert!(level.world().is_empty());
    }

    #[test]
    fn test_out_of_range_team_is_not_spawned() {
        let config = SpaceLevelConfig {
            ships: vec![ShipSpawn::new("Frigate", usize::MAX, Vec3::zeros())],
            num_teams: usize::MAX,
            ..SpaceLevelConfig::default()
        };
        let mut level = SpaceLevel::new("crowded", config, "mods/Test");
        level.register_spawn_config(turret_ship());
        level.start_level();

        assert!(level.world().is_empty());
        assert!(level.commander(MAX_TEAMS - 1).is_some());
        assert!(level.commander(MAX_TEAMS).is_none());
    }

    #[test]
    fn test_friendly_fire_is_ignored() {
        let mut level = duel();
        level.start_level();
        let placement = level.world().entities_with::<PlacementEntity>()[0];
        let own_team = level.world().get_component::<TeamComponent>(placement).unwrap().team;

        let hit = ProjectileHit {
            damage: 1000,
            location: Vec3::zeros(),
            team: own_team,
        };
        assert!(!level.apply_projectile_hit(placement, &hit));

        let hostile = ProjectileHit { team: own_team + 1, ..hit };
        assert!(level.apply_projectile_hit(placement, &hostile));
        assert!(matches!(level.events()[0].event, PlacementEvent::Damaged { .. }));
    }

    #[test]
    fn test_destroyed_placements_leave_world_and_ship() {
        let mut level = duel();
        level.set_instant_hits(false);
        level.start_level();
        let victim = level.world().entities_with::<PlacementEntity>()[0];
        let team = level.world().get_component::<TeamComponent>(victim).unwrap().team;
        level.apply_projectile_hit(
            victim,
            &ProjectileHit {
                damage: 1000,
                location: Vec3::zeros(),
                team: team + 1,
            },
        );

        for _ in 0..40 {
            level.tick(0.1);
        }

        assert!(!level.world().is_alive(victim));
        assert_eq!(level.placement_count(), 3);
        for (_, ship) in level.world().query::<ShipComponent>() {
            assert!(!ship.placements.contains(&victim));
        }
    }

    #[test]
    fn test_render_draws_models_with_star_light() {
        let mut level = duel();
        level.start_level();

        let camera = FrameView::look_at(Vec3::new(0.0, 50.0, -50.0), Vec3::zeros(), 1.0, 60.0);
        let mut queue = RenderQueue::new();
        level.render(Some(&camera), &mut queue);

        assert_eq!(queue.command_count(), 6);
        let uniforms = queue.uniforms(&arcade_engine::render::ShaderProgram::FORWARD_MODEL).unwrap();
        assert_eq!(uniforms.directional_lights.len(), 1);
    }

    #[test]
    fn test_end_level_drops_commanders_and_entities() {
        let mut level = duel();
        level.start_level();
        let commander = Rc::downgrade(level.commander(0).unwrap());
        level.end_level();

        assert!(commander.upgrade().is_none());
        assert!(level.world().is_empty());
        assert!(level.on_spawned_entity.is_empty());
        assert!(level.stars().is_empty());
    }
}
