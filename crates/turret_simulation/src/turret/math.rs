//! Rotation helpers: shortest-arc step, cone limit, look rotation.
//!
//! Конвенция Bevy: forward = local -Z, right = +X, up = +Y.

use bevy::prelude::*;

/// Порог "достигли rest pose" (радианы).
///
/// Exact-equality сравнение с `Quat::IDENTITY` может не сойтись из-за float drift.
pub const REST_EPSILON_RAD: f32 = 1.0e-4;

/// Проекции короче этого считаются нулевыми (target на оси pivot'а)
pub const MIN_DIRECTION_LENGTH_SQ: f32 = 1.0e-8;

/// Угловая дистанция между ориентациями (shortest arc, радианы)
///
/// atan2 вместо acos(dot): acos теряет точность на малых углах.
pub fn angular_distance(a: Quat, b: Quat) -> f32 {
    let delta = a.inverse() * b;
    2.0 * delta.xyz().length().atan2(delta.w.abs())
}

/// Поворачивает `from` к `to` не больше чем на `max_step` радиан (shortest arc).
///
/// Возвращает ровно `to`, если цель достижима за этот шаг.
/// NaN или отрицательный шаг = стоим на месте.
pub fn step_towards(from: Quat, to: Quat, max_step: f32) -> Quat {
    if max_step.is_nan() || max_step <= 0.0 {
        return from;
    }

    let angle = angular_distance(from, to);
    if angle <= max_step {
        return to;
    }

    // delta в parent space: to = delta * from
    let mut delta = to * from.inverse();
    if delta.w < 0.0 {
        // Двойное покрытие: q и -q одна ориентация, берём короткую дугу
        delta = -delta;
    }
    let Some(axis) = delta.xyz().try_normalize() else {
        return to;
    };

    (Quat::from_axis_angle(axis, max_step) * from).normalize()
}

/// Масштабирует `v` так, что max |component| = 1 (направление то же).
///
/// Для огромных offset'ов `length_squared` переполняется до inf и normalize не работает.
/// `None` для нулевого или non-finite вектора.
pub fn rescale_direction(v: Vec3) -> Option<Vec3> {
    let scale = v.abs().max_element();
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    Some(v / scale)
}

/// Static cone limit: поворачивает `forward` к `direction` не больше чем на `max_angle`.
///
/// Не зависит от delta time. Если `direction` строго противоположен `forward`,
/// поворот идёт вокруг `fallback_axis`. Нулевой `direction` возвращает `forward`.
pub fn cone_limit(forward: Vec3, direction: Vec3, max_angle: f32, fallback_axis: Vec3) -> Vec3 {
    let Some(direction) = direction.try_normalize() else {
        return forward;
    };
    let forward = forward.normalize();
    let max_angle = max_angle.max(0.0);

    if forward.angle_between(direction) <= max_angle {
        return direction;
    }

    let axis = forward
        .cross(direction)
        .try_normalize()
        .unwrap_or(fallback_axis);

    Quat::from_axis_angle(axis, max_angle) * forward
}

/// Ориентация, у которой forward (-Z) смотрит вдоль `direction`, up ≈ +Y.
///
/// Вертикальный `direction` использует +X как right (нет однозначного yaw).
pub fn look_rotation(direction: Vec3) -> Quat {
    let Some(back) = (-direction).try_normalize() else {
        return Quat::IDENTITY;
    };
    let right = Vec3::Y.cross(back).try_normalize().unwrap_or(Vec3::X);
    let up = back.cross(right);

    Quat::from_mat3(&Mat3::from_cols(right, up, back)).normalize()
}
