//! TurretConfig: turn rate + angular limits (per-instance)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::TurretError;

/// Параметры turret (все углы в градусах)
///
/// `#[serde(default)]`: частичный пресет добирает недостающие поля из `Default`.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct TurretConfig {
    /// Скорость поворота base (deg/sec). Barrels крутятся в 2 раза быстрее
    pub turn_rate: f32,
    /// Ограничивать ли traverse (yaw) base
    pub limit_traverse: bool,
    pub left_traverse: f32,
    pub right_traverse: f32,
    /// Максимальный pitch вверх
    pub elevation: f32,
    /// Максимальный pitch вниз
    pub depression: f32,
    /// Тикать в FixedUpdate вместо Update (не оба сразу)
    pub run_in_fixed_tick: bool,
}

impl Default for TurretConfig {
    fn default() -> Self {
        Self {
            turn_rate: 30.0,
            limit_traverse: false,
            left_traverse: 60.0,
            right_traverse: 60.0,
            elevation: 60.0,
            depression: 5.0,
            run_in_fixed_tick: false,
        }
    }
}

impl TurretConfig {
    /// Максимальный шаг base за `delta_secs` (радианы)
    pub fn base_step(&self, delta_secs: f32) -> f32 {
        if !delta_secs.is_finite() || delta_secs < 0.0 {
            return 0.0;
        }
        (self.turn_rate * delta_secs).to_radians()
    }

    /// Максимальный шаг barrels за `delta_secs` (радианы): 2x turn rate
    pub fn barrel_step(&self, delta_secs: f32) -> f32 {
        self.base_step(delta_secs) * 2.0
    }

    /// Проверка на NaN/отрицательные значения и лимиты за пределами [0, 180]
    pub fn validate(&self) -> Result<(), TurretError> {
        if !self.turn_rate.is_finite() || self.turn_rate < 0.0 {
            return Err(TurretError::InvalidConfig {
                field: "turn_rate",
                value: self.turn_rate,
            });
        }

        let limits = [
            ("left_traverse", self.left_traverse),
            ("right_traverse", self.right_traverse),
            ("elevation", self.elevation),
            ("depression", self.depression),
        ];
        for (field, value) in limits {
            if !(0.0..=180.0).contains(&value) {
                return Err(TurretError::InvalidConfig { field, value });
            }
        }

        Ok(())
    }
}
