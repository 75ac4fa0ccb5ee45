//! TurretAim: aim target + idle/rest state machine + per-tick rotation
//!
//! Состояния (derived из двух флагов):
//! - Aiming: base/barrels крутятся к target
//! - ReturningToRest: idle, крутимся обратно к identity
//! - AtRest: idle и оба transform'а в identity, tick = no-op
//!
//! Переходы:
//! - Aiming → ReturningToRest: `set_idle(true)`
//! - ReturningToRest → AtRest: оба transform'а дошли до identity в одном tick
//! - любое → Aiming: `set_idle(false)` или `set_aim_target(..)`

use bevy::prelude::*;

use crate::turret::frame::OrientableFrame;
use crate::turret::math::{
    angular_distance, cone_limit, look_rotation, rescale_direction, step_towards,
    MIN_DIRECTION_LENGTH_SQ, REST_EPSILON_RAD,
};
use crate::turret::TurretConfig;
use crate::TurretError;

/// Дистанция дефолтного target вдоль forward
pub const DEFAULT_TARGET_DISTANCE: f32 = 100.0;

/// Длина debug ray
pub const DEBUG_RAY_LENGTH: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AimState {
    Aiming,
    ReturningToRest,
    AtRest,
}

/// Луч вдоль forward barrels (или base, если barrels нет)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugRay {
    pub origin: Vec3,
    pub direction: Vec3,
    pub length: f32,
}

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TurretAim {
    target: Vec3,
    aiming: bool,
    at_rest: bool,
    debug_ray_enabled: bool,
}

impl Default for TurretAim {
    /// Aiming в точку `DEFAULT_TARGET_DISTANCE` вдоль -Z от origin
    fn default() -> Self {
        Self {
            target: Vec3::NEG_Z * DEFAULT_TARGET_DISTANCE,
            aiming: true,
            at_rest: false,
            debug_ray_enabled: false,
        }
    }
}

impl TurretAim {
    /// Aiming вдоль forward данного transform'а (чтобы не начинать с rest-return)
    pub fn facing(transform: &Transform) -> Self {
        Self {
            target: transform.transform_point(Vec3::NEG_Z * DEFAULT_TARGET_DISTANCE),
            ..default()
        }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Новый target + переход в Aiming.
    ///
    /// Non-finite точка отклоняется, state не меняется.
    pub fn set_aim_target(&mut self, point: Vec3) -> Result<(), TurretError> {
        if !point.is_finite() {
            return Err(TurretError::NonFiniteTarget(point));
        }

        self.target = point;
        if !self.aiming {
            crate::logger::log(&format!("Turret resumes aiming at {}", point));
        }
        self.aiming = true;
        self.at_rest = false;
        Ok(())
    }

    /// `true`: перестаём целиться (target сохраняется). `false`: снова Aiming
    pub fn set_idle(&mut self, idle: bool) {
        if idle {
            if self.aiming {
                crate::logger::log("Turret goes idle → returning to rest");
            }
            self.aiming = false;
        } else {
            self.aiming = true;
            self.at_rest = false;
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.aiming
    }

    /// `true` только пока idle и оба transform'а в rest pose
    pub fn is_at_rest(&self) -> bool {
        !self.aiming && self.at_rest
    }

    pub fn state(&self) -> AimState {
        if self.aiming {
            AimState::Aiming
        } else if self.at_rest {
            AimState::AtRest
        } else {
            AimState::ReturningToRest
        }
    }

    pub fn set_debug_ray_enabled(&mut self, enabled: bool) {
        self.debug_ray_enabled = enabled;
    }

    pub fn is_debug_ray_enabled(&self) -> bool {
        self.debug_ray_enabled
    }

    /// Один simulation tick.
    ///
    /// Base крутится первым; barrels считают target уже в обновлённом frame base.
    /// Отсутствующий transform пропускается и считается "в rest pose".
    ///
    /// Возвращает `true` в tick, в котором turret пришёл в AtRest.
    pub fn tick(
        &mut self,
        delta_secs: f32,
        config: &TurretConfig,
        mut base: Option<&mut dyn OrientableFrame>,
        mut barrels: Option<&mut dyn OrientableFrame>,
    ) -> bool {
        let base_step = config.base_step(delta_secs);
        let barrel_step = config.barrel_step(delta_secs);

        if self.aiming {
            if let Some(base) = base.as_deref_mut() {
                rotate_base(base, self.target, config, base_step);
            }

            if let Some(barrels) = barrels.as_deref_mut() {
                let offset = match base.as_deref() {
                    Some(base) => base.local_space_point(self.target) - barrels.local_translation(),
                    None => barrels.parent_space_point(self.target) - barrels.local_translation(),
                };
                rotate_barrels(barrels, offset, config, barrel_step);
            }

            return false;
        }

        if self.at_rest {
            return false;
        }

        let base_home = base.map_or(true, |frame| return_to_rest(frame, base_step));
        let barrels_home = barrels.map_or(true, |frame| return_to_rest(frame, barrel_step));

        if base_home && barrels_home {
            self.at_rest = true;
            crate::logger::log("Turret reached rest pose");
            return true;
        }

        false
    }

    /// Debug ray от barrels (или base), если включён
    pub fn debug_ray(
        &self,
        base: Option<&dyn OrientableFrame>,
        barrels: Option<&dyn OrientableFrame>,
    ) -> Option<DebugRay> {
        if !self.debug_ray_enabled {
            return None;
        }

        let frame = barrels.or(base)?;
        Some(DebugRay {
            origin: frame.world_position(),
            direction: frame.world_forward(),
            length: DEBUG_RAY_LENGTH,
        })
    }
}

/// Yaw only: target проецируется на горизонтальную плоскость parent space
fn rotate_base<F: OrientableFrame + ?Sized>(
    frame: &mut F,
    target: Vec3,
    config: &TurretConfig,
    max_step: f32,
) {
    let mut offset = frame.parent_space_point(target) - frame.local_translation();
    offset.y = 0.0;

    // Target прямо над/под pivot: yaw не определён, держим текущий
    if offset.length_squared() <= MIN_DIRECTION_LENGTH_SQ {
        return;
    }
    let Some(offset) = rescale_direction(offset) else {
        return;
    };

    let direction = if config.limit_traverse {
        // x >= 0 → правая сторона; вправо крутимся вокруг -Y
        let (limit, fallback_axis) = if offset.x >= 0.0 {
            (config.right_traverse, Vec3::NEG_Y)
        } else {
            (config.left_traverse, Vec3::Y)
        };
        cone_limit(Vec3::NEG_Z, offset, limit.to_radians(), fallback_axis)
    } else {
        offset
    };

    let goal = look_rotation(direction);
    frame.set_local_rotation(step_towards(frame.local_rotation(), goal, max_step));
}

/// Pitch only: `offset` уже в base space относительно pivot'а barrels
fn rotate_barrels<F: OrientableFrame + ?Sized>(
    frame: &mut F,
    mut offset: Vec3,
    config: &TurretConfig,
    max_step: f32,
) {
    offset.x = 0.0;

    if offset.length_squared() <= MIN_DIRECTION_LENGTH_SQ {
        return;
    }
    let Some(offset) = rescale_direction(offset) else {
        return;
    };

    // y >= 0 → elevation (вокруг +X), иначе depression
    let (limit, fallback_axis) = if offset.y >= 0.0 {
        (config.elevation, Vec3::X)
    } else {
        (config.depression, Vec3::NEG_X)
    };
    let direction = cone_limit(Vec3::NEG_Z, offset, limit.to_radians(), fallback_axis);

    // Чистый pitch вокруг +X: при лимите > 90° direction уходит за вертикаль (z > 0),
    // look_rotation там дал бы yaw на 180°
    let goal = Quat::from_rotation_x(direction.y.atan2(-direction.z));
    frame.set_local_rotation(step_towards(frame.local_rotation(), goal, max_step));
}

/// Шаг к identity. `true` когда дошли (и rotation выставлена ровно в identity)
fn return_to_rest<F: OrientableFrame + ?Sized>(frame: &mut F, max_step: f32) -> bool {
    let next = step_towards(frame.local_rotation(), Quat::IDENTITY, max_step);

    if angular_distance(next, Quat::IDENTITY) <= REST_EPSILON_RAD {
        frame.set_local_rotation(Quat::IDENTITY);
        true
    } else {
        frame.set_local_rotation(next);
        false
    }
}
