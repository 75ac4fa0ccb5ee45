//! Turret systems

pub mod binding;
pub mod tick;

pub use binding::*;
pub use tick::*;
