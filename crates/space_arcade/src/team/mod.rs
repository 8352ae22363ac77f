//! Team AI

pub mod commander;

pub use commander::TeamCommander;
