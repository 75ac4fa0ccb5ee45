//! Rig binding + config validation systems

use bevy::prelude::*;

use crate::turret::{SimulationMode, TurretBindRequest, TurretConfig, TurretRig};

/// System: применяет TurretBindRequest.
///
/// Во время Running rebind запрещён: warning в лог, rig не меняется.
pub fn apply_bind_requests(
    mut requests: EventReader<TurretBindRequest>,
    mode: Res<SimulationMode>,
    mut rigs: Query<&mut TurretRig>,
) {
    for request in requests.read() {
        let Ok(mut rig) = rigs.get_mut(request.turret) else {
            crate::logger::log_warning(&format!(
                "Bind request for {:?} ignored: entity has no TurretRig",
                request.turret
            ));
            continue;
        };

        match rig.bind(request.slot, request.target, *mode) {
            Ok(()) => crate::logger::log(&format!(
                "Turret {:?}: {} bound to {:?}",
                request.turret, request.slot, request.target
            )),
            Err(err) => crate::logger::log_warning(&format!("Turret {:?}: {}", request.turret, err)),
        }
    }
}

/// System: проверка новых/изменённых TurretConfig
///
/// Невалидный config не блокируется (математика тотальна), только логируется.
pub fn validate_turret_configs(configs: Query<(Entity, &TurretConfig), Changed<TurretConfig>>) {
    for (entity, config) in configs.iter() {
        if let Err(err) = config.validate() {
            crate::logger::log_error(&format!("Turret {:?}: {}", entity, err));
        }
    }
}

/// Run condition: turret systems тикают только во время Running
pub fn simulation_running(mode: Res<SimulationMode>) -> bool {
    mode.is_running()
}
