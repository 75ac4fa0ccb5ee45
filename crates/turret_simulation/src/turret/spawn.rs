//! Spawn helper: turret root + base + barrels, уже привязанные

use bevy::prelude::*;

use crate::turret::{TurretAim, TurretConfig, TurretRig};

/// Pivot barrels относительно base по умолчанию
pub const DEFAULT_BARREL_PIVOT: Vec3 = Vec3::new(0.0, 0.5, 0.0);

/// Marker: base (yaw) transform turret'а
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct TurretBase;

/// Marker: barrels (pitch) transform turret'а
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct TurretBarrels;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurretEntities {
    pub turret: Entity,
    pub base: Entity,
    pub barrels: Entity,
}

/// Spawn turret: root (TurretAim + config + rig) → base → barrels.
///
/// Target по умолчанию: вдоль forward root'а, так что первый tick ничего не крутит.
pub fn spawn_turret(commands: &mut Commands, transform: Transform, config: TurretConfig) -> TurretEntities {
    let turret = commands
        .spawn((transform, TurretAim::facing(&transform), config))
        .id();

    let base = commands
        .spawn((Transform::default(), TurretBase, ChildOf(turret)))
        .id();

    let barrels = commands
        .spawn((Transform::from_translation(DEFAULT_BARREL_PIVOT), TurretBarrels, ChildOf(base)))
        .id();

    commands
        .entity(turret)
        .insert(TurretRig::new(Some(base), Some(barrels)));

    crate::logger::log(&format!(
        "Spawned turret {:?} (base {:?}, barrels {:?})",
        turret, base, barrels
    ));

    TurretEntities { turret, base, barrels }
}
