//! Ошибки turret API
//!
//! Rotation math тотальна и не падает; ошибки возникают только на границе
//! API: rebind во время симуляции, невалидный target, невалидный config.

use bevy::prelude::*;
use thiserror::Error;

use crate::turret::RigSlot;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TurretError {
    /// Rebind transform'ов разрешён только вне симуляции (SimulationMode::Editing)
    #[error("cannot rebind turret {slot} while the simulation is running")]
    InvalidOperationInPlayMode { slot: RigSlot },

    /// Одна entity в обоих slot'ах: её rotation перезаписывалась бы дважды за tick
    #[error("entity {entity} cannot be both turret base and barrels")]
    SharedRigEntity { entity: Entity },

    #[error("aim target must be finite, got {0}")]
    NonFiniteTarget(Vec3),

    #[error("invalid turret config: {field} = {value}")]
    InvalidConfig { field: &'static str, value: f32 },
}
