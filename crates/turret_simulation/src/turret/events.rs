//! Turret events

use bevy::prelude::*;

use crate::turret::RigSlot;

/// Debug ray turret'а за этот tick (только при включённом debug ray).
///
/// Чисто визуальный: client рисует его gizmos'ами, симуляция не читает.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TurretDebugRay {
    pub turret: Entity,
    pub origin: Vec3,
    pub direction: Vec3,
    pub length: f32,
}

/// Turret вернулся в rest pose (переход ReturningToRest → AtRest)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurretCameToRest {
    pub turret: Entity,
}

/// Запрос rebind'а base/barrels.
///
/// Применяется `apply_bind_requests`; во время Running отклоняется с warning.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurretBindRequest {
    pub turret: Entity,
    pub slot: RigSlot,
    pub target: Option<Entity>,
}
