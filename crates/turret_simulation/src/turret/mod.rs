//! Turret aiming module
//!
//! Base крутится по горизонтали (yaw), barrels (child base): по вертикали (pitch).
//! Каждый tick turret либо целится в target с учётом traverse/elevation лимитов,
//! либо (idle) возвращается в rest pose (identity) и засыпает.
//!
//! Алгоритм (`TurretAim::tick`) не зависит от ECS: работает через `OrientableFrame`.
//! ECS часть: components + systems + `TurretPlugin`.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod frame;
pub mod math;
pub mod spawn;
pub mod systems;


pub use components::*;
pub use events::*;
pub use frame::{OrientableFrame, TransformFrame};
pub use spawn::{spawn_turret, TurretBarrels, TurretBase, TurretEntities, DEFAULT_BARREL_PIVOT};

/// Turret Plugin
///
/// Порядок выполнения в Update:
/// 1. apply_bind_requests: rebind (только в Editing, иначе warning)
/// 2. validate_turret_configs: лог невалидных config
/// 3. tick_turrets_update: turrets с `run_in_fixed_tick == false`
///
/// FixedUpdate: tick_turrets_fixed для turrets с `run_in_fixed_tick == true`
pub struct TurretPlugin;

impl Plugin for TurretPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationMode>()
            .add_event::<TurretDebugRay>()
            .add_event::<TurretCameToRest>()
            .add_event::<TurretBindRequest>()
            .register_type::<TurretAim>()
            .register_type::<AimState>()
            .register_type::<TurretConfig>()
            .register_type::<TurretRig>()
            .register_type::<TurretBase>()
            .register_type::<TurretBarrels>()
            .register_type::<SimulationMode>();

        app.add_systems(
            Update,
            (
                systems::apply_bind_requests,
                systems::validate_turret_configs,
                systems::tick_turrets_update.run_if(systems::simulation_running),
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            systems::tick_turrets_fixed.run_if(systems::simulation_running),
        );
    }
}
