use bevy::prelude::*;
use turret_simulation::{RigSlot, TurretAim, TurretBindRequest, TurretConfig, TurretRig};

pub struct DemoControlsPlugin;

impl Plugin for DemoControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (
            move_targets,
            feed_turret_targets,
            keyboard_controls,
        ).chain());
    }
}

/// Target, который летает по кругу вокруг origin
#[derive(Component)]
pub struct OrbitingTarget {
    pub radius: f32,
    pub height: f32,
    pub angular_speed: f32, // rad/sec
    pub angle: f32,
}

fn move_targets(mut targets: Query<(&mut OrbitingTarget, &mut Transform)>, time: Res<Time>) {
    for (mut target, mut transform) in targets.iter_mut() {
        target.angle += target.angular_speed * time.delta_secs();
        transform.translation = Vec3::new(
            target.radius * target.angle.sin(),
            target.height + (target.angle * 3.0).sin(),
            -target.radius * target.angle.cos(),
        );
    }
}

/// Пока turret не idle: целимся в первый target
fn feed_turret_targets(
    targets: Query<&Transform, With<OrbitingTarget>>,
    mut turrets: Query<&mut TurretAim>,
) {
    let Some(target) = targets.iter().next() else {
        return;
    };

    for mut aim in turrets.iter_mut() {
        if aim.is_idle() {
            continue;
        }
        if let Err(err) = aim.set_aim_target(target.translation) {
            turret_simulation::logger::log_warning(&err.to_string());
        }
    }
}

/// Клавиши:
/// - [Space] idle on/off
/// - [R] debug ray
/// - [L] traverse limit
/// - [F] Update ↔ FixedUpdate
/// - [B] попытка отвязать barrels (в Running будет warning)
fn keyboard_controls(
    keys: Res<ButtonInput<KeyCode>>,
    mut turrets: Query<(Entity, &mut TurretAim, &mut TurretConfig), With<TurretRig>>,
    mut bind_requests: EventWriter<TurretBindRequest>,
) {
    for (entity, mut aim, mut config) in turrets.iter_mut() {
        if keys.just_pressed(KeyCode::Space) {
            let idle = !aim.is_idle();
            aim.set_idle(idle);
        }
        if keys.just_pressed(KeyCode::KeyR) {
            let enabled = !aim.is_debug_ray_enabled();
            aim.set_debug_ray_enabled(enabled);
        }
        if keys.just_pressed(KeyCode::KeyL) {
            config.limit_traverse = !config.limit_traverse;
        }
        if keys.just_pressed(KeyCode::KeyF) {
            config.run_in_fixed_tick = !config.run_in_fixed_tick;
        }
        if keys.just_pressed(KeyCode::KeyB) {
            bind_requests.write(TurretBindRequest {
                turret: entity,
                slot: RigSlot::Barrels,
                target: None,
            });
        }
    }
}
