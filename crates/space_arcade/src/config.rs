//! Game configuration
//!
//! Loaded from a toml file next to the executable; every field has a default
//! so a partial file is fine.

use std::path::PathBuf;

use arcade_engine::config::{Config, Deserialize, Serialize};

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    /// Window settings
    pub window: WindowConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Which campaign to play
    pub campaign: CampaignSettings,

    /// Frame loop settings
    pub simulation: SimulationConfig,
}

impl Config for GameConfig {}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width
    pub width: u32,

    /// Window height
    pub height: u32,

    /// Title bar text
    pub title: String,

    /// Run without opening a window
    pub headless: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
}

/// Campaign selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignSettings {
    /// Mod directory holding `Assets/`
    pub mod_dir: PathBuf,

    /// Campaign file index
    pub campaign_index: usize,

    /// Level to start on
    pub start_level: usize,
}

/// Frame loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed simulation step (seconds)
    pub fixed_timestep: f32,

    /// Upper bound on simulation steps per rendered frame
    pub max_steps_per_frame: u32,

    /// Stop after this many frames (0 = until the window closes)
    pub max_frames: u64,

    /// Resolve fire requests as immediate hits on their target
    pub instant_hits: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Space Arcade".to_string(),
            headless: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for CampaignSettings {
    fn default() -> Self {
        Self {
            mod_dir: PathBuf::from("GameData/mods/SpaceArcade"),
            campaign_index: 0,
            start_level: 0,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_steps_per_frame: 5,
            max_frames: 0,
            instant_hits: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("space_arcade.toml");
        std::fs::write(&path, "[window]\nheadless = true\n\n[simulation]\nmax_frames = 120\n").unwrap();

        let config = GameConfig::load_from_file(&path).unwrap();
        assert!(config.window.headless);
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.simulation.max_frames, 120);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("space_arcade.toml");
        let mut config = GameConfig::default();
        config.campaign.campaign_index = 3;
        config.save_to_file(&path).unwrap();

        assert_eq!(GameConfig::load_or_default(&path), config);
    }
}
