//! Campaign files on disk through to a fought-out level

use std::collections::HashMap;
use std::path::Path;

use arcade_engine::config::write_json_file;
use arcade_engine::prelude::*;
use serde_json::json;
use space_arcade::campaign::{CampaignConfig, LevelData};
use space_arcade::config::GameConfig;
use space_arcade::levels::{ShipSpawn, SpaceLevel, StarSpawn};
use space_arcade::placement::{PlacementEntity, PlacementEvent};
use space_arcade::SpaceArcade;

fn write_frigate(mod_dir: &Path) {
    let turret = |x: f32| {
        json!({
            "position": { "x": x, "y": 1.0, "z": 0.0 },
            "rotation_deg": { "x": 0.0, "y": 0.0, "z": 0.0 },
            "scale": { "x": 1.0, "y": 1.0, "z": 1.0 },
            "relativeFilePath": "Assets/Models/turret.obj",
            "relativeCollisionModelFilePath": "Assets/Models/turret_collision.obj",
            "placementType": "TURRET"
        })
    };
    let frigate = json!({
        "name": "Frigate",
        "fullModelFilePath": "Assets/Models/frigate.obj",
        "placements": [turret(-2.0), turret(2.0)]
    });
    write_json_file(mod_dir.join("Assets/SpawnConfigs/Frigate.json"), &frigate).unwrap();
}

fn write_campaign(mod_dir: &Path) -> CampaignConfig {
    let mut campaign = CampaignConfig::new(mod_dir, 0);
    campaign.user_facing_name = "Border War".to_string();

    let mut skirmish = LevelData {
        name: "Skirmish".to_string(),
        tier: 1,
        outgoing_path_indices: vec![1],
        ..LevelData::default()
    };
    let mut enemy = ShipSpawn::new("Frigate", 1, Vec3::new(0.0, 0.0, 40.0));
    enemy.rotation_deg = Vec3::new(180.0, 0.0, 0.0);
    skirmish.space_level_config.ships = vec![ShipSpawn::new("Frigate", 0, Vec3::zeros()), enemy];
    skirmish.space_level_config.stars = vec![StarSpawn::default()];

    let aftermath = LevelData {
        name: "Aftermath".to_string(),
        tier: 2,
        ..LevelData::default()
    };

    campaign.levels = vec![skirmish, aftermath];
    campaign.save().unwrap();
    campaign
}

#[test]
fn campaign_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let saved = write_campaign(dir.path());

    let loaded = CampaignConfig::load(dir.path(), 0).unwrap();
    assert_eq!(loaded, saved);
    let names: Vec<_> = loaded.levels.iter().map(|level| level.name.as_str()).collect();
    assert_eq!(names, ["Skirmish", "Aftermath"]);
    assert_eq!(loaded.outgoing_levels(0).collect::<Vec<_>>(), vec![1]);
}

#[test]
fn game_loads_level_from_campaign_and_advances() {
    let dir = tempfile::tempdir().unwrap();
    write_frigate(dir.path());
    write_campaign(dir.path());

    let mut config = GameConfig::default();
    config.campaign.mod_dir = dir.path().to_path_buf();
    let mut game = SpaceArcade::new(config).unwrap();
    game.load_campaign_level(0).unwrap();

    {
        let level = game.space_level().unwrap();
        assert_eq!(level.name(), "Skirmish");
        assert_eq!(level.placement_count(), 4);
        assert_eq!(level.stars().directional_lights().len(), 1);
    }

    assert!(game.advance().unwrap());
    assert_eq!(game.space_level().unwrap().placement_count(), 0);
    assert!(!game.advance().unwrap());
    game.shutdown();
}

#[test]
fn turrets_fight_until_placements_are_destroyed() {
    let dir = tempfile::tempdir().unwrap();
    write_frigate(dir.path());
    let campaign = write_campaign(dir.path());

    let level = SpaceLevel::new("Skirmish", campaign.levels[0].space_level_config.clone(), dir.path());
    let mut levels = LevelSubsystem::new();
    levels.load_level(level_ref(level));
    let level = levels.current_level().unwrap().clone();

    let mut fx_by_placement: HashMap<EntityId, u32> = HashMap::new();
    let mut destroyed = Vec::new();
    let mut shots = 0;

    for _ in 0..(20 * 64) {
        levels.tick(1.0 / 64.0);

        let level = level.borrow();
        let space = level.as_any().downcast_ref::<SpaceLevel>().unwrap();
        for event in space.events() {
            match &event.event {
                PlacementEvent::Fire(_) => shots += 1,
                PlacementEvent::DestructionFx { .. } => *fx_by_placement.entry(event.source).or_default() += 1,
                PlacementEvent::Destroyed => destroyed.push(event.source),
                _ => {}
            }
        }
    }

    let level = level.borrow();
    let space = level.as_any().downcast_ref::<SpaceLevel>().unwrap();
    assert!(shots > 0);
    assert!(!destroyed.is_empty());
    for placement in &destroyed {
        assert!(!space.world().is_alive(*placement));
        assert_eq!(fx_by_placement[placement], 30);
    }
    assert_eq!(space.placement_count() + destroyed.len(), 4);
    assert_eq!(space.world().query::<PlacementEntity>().count(), space.placement_count());

    for team in 0..2 {
        let commander = space.commander(team).unwrap();
        while let Some(target) = commander.borrow_mut().target(space.world()) {
            assert!(space.world().is_alive(target), "commander handed out a dead handle");
        }
    }
}
