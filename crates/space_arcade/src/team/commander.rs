//! Per-team target selection
//!
//! A commander watches everything spawned into its level and keeps one
//! stack of candidate targets per hostile team. Handles are generational,
//! so a destroyed target shows up as a stale handle and is dropped.

use std::cell::RefCell;
use std::rc::Rc;

use arcade_engine::prelude::*;

use crate::components::TeamComponent;
use crate::levels::SpawnedEntity;

/// AI controller choosing hostile targets for one team
#[derive(Debug, Clone, Default)]
pub struct TeamCommander {
    team: usize,
    pending_targets_by_team: Vec<Vec<EntityId>>,
}

impl TeamCommander {
    /// Commander for `team`
    pub fn new(team: usize) -> Self {
        Self {
            team,
            pending_targets_by_team: Vec::new(),
        }
    }

    /// Team this commander plays for
    pub fn team(&self) -> usize {
        self.team
    }

    /// Start following a level's spawns
    ///
    /// The subscription is weak: dropping the commander removes it. Entities
    /// already in `world` are stacked immediately.
    pub fn attach(commander: &Rc<RefCell<Self>>, spawns: &mut Broadcast<SpawnedEntity>, world: &World) -> SubscriptionId {
        let id = spawns.subscribe_weak(commander, Self::handle_entity_spawned);
        let mut this = commander.borrow_mut();
        for (entity, team) in world.query::<TeamComponent>() {
            this.handle_entity_spawned(&SpawnedEntity {
                entity,
                team: Some(team.team),
            });
        }
        log::debug!("Commander for team {} attached with {} pending target(s)", this.team, this.pending_count());
        id
    }

    /// Stack a spawned entity if it belongs to another team
    pub fn handle_entity_spawned(&mut self, spawned: &SpawnedEntity) {
        let Some(team) = spawned.team else {
            return;
        };
        if team == self.team {
            return;
        }
        if self.pending_targets_by_team.len() <= team {
            self.pending_targets_by_team.resize_with(team + 1, Vec::new);
        }
        self.pending_targets_by_team[team].push(spawned.entity);
    }

    /// Pop the most recent live target of `team`
    ///
    /// Stale handles on top of the stack are discarded for good.
    pub fn target_on_team(&mut self, team: usize, world: &World) -> Option<EntityId> {
        let stack = self.pending_targets_by_team.get_mut(team)?;
        while let Some(candidate) = stack.pop() {
            if world.is_alive(candidate) {
                return Some(candidate);
            }
        }
        None
    }

    /// First live target, scanning hostile teams in ascending order
    pub fn target(&mut self, world: &World) -> Option<EntityId> {
        let own_team = self.team;
        (0..self.pending_targets_by_team.len())
            .filter(|&team| team != own_team)
            .find_map(|team| self.target_on_team(team, world))
    }

    /// Handles still stacked, live or not
    pub fn pending_count(&self) -> usize {
        self.pending_targets_by_team.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(world: &mut World, team: usize) -> SpawnedEntity {
        let entity = world.create_entity(format!("team {team}"));
        world.add_component(entity, TeamComponent { team });
        SpawnedEntity { entity, team: Some(team) }
    }

    #[test]
    fn test_own_team_and_neutral_are_ignored() {
        let mut world = World::new();
        let mut commander = TeamCommander::new(0);
        commander.handle_entity_spawned(&spawn(&mut world, 0));
        commander.handle_entity_spawned(&SpawnedEntity {
            entity: world.create_entity("rock"),
            team: None,
        });

        assert_eq!(commander.pending_count(), 0);
        assert_eq!(commander.target(&world), None);
    }

    #[test]
    fn test_lifo_per_team_and_ascending_team_scan() {
        let mut world = World::new();
        let mut commander = TeamCommander::new(1);
        let older = spawn(&mut world, 2);
        let newer = spawn(&mut world, 2);
        let low = spawn(&mut world, 0);
        for s in [&older, &newer, &low] {
            commander.handle_entity_spawned(s);
        }

        assert_eq!(commander.target(&world), Some(low.entity));
        assert_eq!(commander.target(&world), Some(newer.entity));
        assert_eq!(commander.target(&world), Some(older.entity));
        assert_eq!(commander.target(&world), None);
    }

    #[test]
    fn test_expired_handles_are_never_returned() {
        let mut world = World::new();
        let mut commander = TeamCommander::new(0);
        let survivor = spawn(&mut world, 1);
        let doomed = spawn(&mut world, 1);
        commander.handle_entity_spawned(&survivor);
        commander.handle_entity_spawned(&doomed);

        world.destroy_entity(doomed.entity);
        assert_eq!(commander.target_on_team(1, &world), Some(survivor.entity));
        assert_eq!(commander.pending_count(), 0);
        assert_eq!(commander.target_on_team(7, &world), None);
    }

    #[test]
    fn test_attach_stacks_existing_and_future_spawns() {
        let mut world = World::new();
        let existing = spawn(&mut world, 1);
        let mut spawns = Broadcast::new();
        let commander = Rc::new(RefCell::new(TeamCommander::new(0)));
        TeamCommander::attach(&commander, &mut spawns, &world);

        let later = spawn(&mut world, 1);
        spawns.broadcast(&later);
        assert_eq!(commander.borrow().pending_count(), 2);
        assert_eq!(commander.borrow_mut().target(&world), Some(later.entity));
        assert_eq!(commander.borrow_mut().target(&world), Some(existing.entity));

        drop(commander);
        spawns.broadcast(&later);
        assert!(spawns.is_empty());
    }
}
