//! Turret components: aim state, config, rig bindings

pub mod aim;
pub mod config;
pub mod rig;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod aim_tests;
#[cfg(test)]
mod rig_tests;

pub use aim::*;
pub use config::*;
pub use rig::*;
