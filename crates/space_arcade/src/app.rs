//! Game driver: campaign progression and the fixed-step frame update

use std::cell::Ref;
use std::io::ErrorKind;

use arcade_engine::config::ConfigError;
use arcade_engine::foundation::math::Vec3;
use arcade_engine::prelude::*;

use crate::campaign::CampaignConfig;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::levels::SpaceLevel;

/// Vertical field of view of the overview camera (degrees)
const CAMERA_FOV_DEG: f32 = 60.0;

/// The running game
pub struct SpaceArcade {
    config: GameConfig,
    levels: LevelSubsystem,
    campaign: CampaignConfig,
    textures: TextureSubsystem,
    skybox: Option<TextureId>,
    current_level: Option<usize>,
    step_timer: TickTimer,
}

impl SpaceArcade {
    /// Load the configured campaign
    ///
    /// A missing campaign file is replaced by the one level template so a
    /// fresh mod directory is playable.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let settings = &config.campaign;
        let campaign = match CampaignConfig::load(&settings.mod_dir, settings.campaign_index) {
            Ok(campaign) => campaign,
            Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                let template = CampaignConfig::new(&settings.mod_dir, settings.campaign_index);
                log::warn!(
                    "No campaign {} in {}, writing a template",
                    settings.campaign_index,
                    settings.mod_dir.display()
                );
                template.save()?;
                CampaignConfig::load(&settings.mod_dir, settings.campaign_index)?
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            step_timer: TickTimer::new(config.simulation.fixed_timestep),
            config,
            levels: LevelSubsystem::new(),
            campaign,
            textures: TextureSubsystem::default(),
            skybox: None,
            current_level: None,
        })
    }

    /// Loaded campaign
    pub fn campaign(&self) -> &CampaignConfig {
        &self.campaign
    }

    /// Level subsystem, for subscribing to level changes
    pub fn levels_mut(&mut self) -> &mut LevelSubsystem {
        &mut self.levels
    }

    /// Index of the loaded campaign level
    pub fn current_level(&self) -> Option<usize> {
        self.current_level
    }

    /// Loaded space level
    pub fn space_level(&self) -> Option<Ref<'_, SpaceLevel>> {
        let level = self.levels.current_level()?.borrow();
        Ref::filter_map(level, |level| level.as_any().downcast_ref::<SpaceLevel>()).ok()
    }

    /// Textures owned by the game
    pub fn textures(&self) -> &TextureSubsystem {
        &self.textures
    }

    /// Replace the loaded level with campaign level `index`
    pub fn load_campaign_level(&mut self, index: usize) -> Result<(), GameError> {
        let count = self.campaign.levels.len();
        let data = self.campaign.levels.get(index).ok_or(GameError::NoSuchLevel { index, count })?;

        let name = if data.name.is_empty() {
            format!("Level {index}")
        } else {
            data.name.clone()
        };
        let mod_dir = self.config.campaign.mod_dir.clone();
        let mut level = SpaceLevel::new(name, data.space_level_config.clone(), &mod_dir);
        level.set_instant_hits(self.config.simulation.instant_hits);

        if let Some(old) = self.skybox.take() {
            self.textures.unload_texture(old);
        }
        if let Some(skybox) = &data.space_level_config.skybox_texture {
            self.skybox = self.textures.load_texture(mod_dir.join(skybox), Some(0), true).ok();
        }

        self.levels.load_level(level_ref(level));
        self.step_timer.reset();
        self.current_level = Some(index);
        Ok(())
    }

    /// Move on to the first level reachable from the current one
    ///
    /// Returns false at the end of the campaign.
    pub fn advance(&mut self) -> Result<bool, GameError> {
        let Some(current) = self.current_level else {
            return Ok(false);
        };
        let Some(next) = self.campaign.outgoing_levels(current).next() else {
            log::info!("Campaign '{}' complete", self.campaign.user_facing_name);
            return Ok(false);
        };
        self.load_campaign_level(next)?;
        Ok(true)
    }

    /// Feed one frame's delta; runs whole fixed steps and returns how many
    ///
    /// Steps past the per-frame cap are dropped.
    pub fn step(&mut self, frame_delta: f32) -> u32 {
        let due = self.step_timer.advance(frame_delta);
        let steps = due.min(self.config.simulation.max_steps_per_frame);
        if steps < due {
            log::debug!("Dropping {} simulation step(s)", due - steps);
        }
        let dt = self.step_timer.period();
        for _ in 0..steps {
            self.levels.tick(dt);
        }
        steps
    }

    /// Overview camera for a viewport with `aspect`
    pub fn camera(aspect: f32) -> FrameView {
        FrameView::look_at(Vec3::new(0.0, 60.0, -80.0), Vec3::zeros(), aspect, CAMERA_FOV_DEG)
    }

    /// Draw the loaded level
    pub fn render(&mut self, camera: Option<&FrameView>, renderer: &mut dyn SceneRenderer) {
        self.levels.render(camera, renderer);
    }

    /// Unload the level and release textures
    pub fn shutdown(&mut self) {
        self.levels.shutdown();
        self.textures.shutdown();
        self.skybox = None;
        self.current_level = None;
    }
}
