//! Scene environment: stars and their lighting

pub mod star;

pub use star::{Star, StarId, StarRegistry, MAX_DIR_LIGHTS};
