//! TurretRig: weak-ссылки на base/barrels entity + play-mode guard

use bevy::prelude::*;
use std::fmt;

use crate::TurretError;

/// Режим симуляции
///
/// - Editing: turret systems не тикают, rebind разрешён
/// - Running: turret systems тикают, rebind запрещён
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Resource)]
pub enum SimulationMode {
    #[default]
    Editing,
    Running,
}

impl SimulationMode {
    pub fn is_running(&self) -> bool {
        matches!(self, SimulationMode::Running)
    }
}

/// Какой transform rebind'им
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum RigSlot {
    Base,
    Barrels,
    /// Оба сразу (clear)
    All,
}

impl fmt::Display for RigSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RigSlot::Base => "base",
            RigSlot::Barrels => "barrels",
            RigSlot::All => "rig",
        };
        f.write_str(name)
    }
}

/// Base (yaw) и barrels (pitch, child of base) turret'а.
///
/// Turret не владеет этими entity: despawned entity = отсутствующий transform,
/// aim tick его просто пропускает.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TurretRig {
    base: Option<Entity>,
    barrels: Option<Entity>,
}

impl TurretRig {
    /// Создать уже привязанный rig (до старта симуляции)
    pub fn new(base: Option<Entity>, barrels: Option<Entity>) -> Self {
        Self { base, barrels }
    }

    pub fn base(&self) -> Option<Entity> {
        self.base
    }

    pub fn barrels(&self) -> Option<Entity> {
        self.barrels
    }

    /// Rebind одного slot'а. Во время Running: ошибка, rig не меняется.
    ///
    /// Base и barrels не могут быть одной entity (`RigSlot::All` годится только для `None`).
    pub fn bind(
        &mut self,
        slot: RigSlot,
        entity: Option<Entity>,
        mode: SimulationMode,
    ) -> Result<(), TurretError> {
        if mode.is_running() {
            return Err(TurretError::InvalidOperationInPlayMode { slot });
        }

        let (base, barrels) = match slot {
            RigSlot::Base => (entity, self.barrels),
            RigSlot::Barrels => (self.base, entity),
            RigSlot::All => (entity, entity),
        };
        if let (Some(base), Some(barrels)) = (base, barrels) {
            if base == barrels {
                return Err(TurretError::SharedRigEntity { entity: base });
            }
        }

        self.base = base;
        self.barrels = barrels;
        Ok(())
    }

    pub fn bind_base(&mut self, entity: Option<Entity>, mode: SimulationMode) -> Result<(), TurretError> {
        self.bind(RigSlot::Base, entity, mode)
    }

    pub fn bind_barrels(&mut self, entity: Option<Entity>, mode: SimulationMode) -> Result<(), TurretError> {
        self.bind(RigSlot::Barrels, entity, mode)
    }

    /// Отвязать оба transform'а
    pub fn clear(&mut self, mode: SimulationMode) -> Result<(), TurretError> {
        self.bind(RigSlot::All, None, mode)
    }
}
