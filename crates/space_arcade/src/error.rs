//! Application level errors

use arcade_engine::config::ConfigError;
use arcade_engine::render::WindowError;
use thiserror::Error;

/// Anything that can stop the game
#[derive(Error, Debug)]
pub enum GameError {
    /// Reading or writing a config file failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No window, nothing to play in
    #[error(transparent)]
    Window(#[from] WindowError),

    /// Campaign has no level with this index
    #[error("Campaign has no level {index} (it has {count})")]
    NoSuchLevel {
        /// Requested level
        index: usize,
        /// Levels in the campaign
        count: usize,
    },
}
