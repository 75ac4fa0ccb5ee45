use bevy::prelude::*;
use turret_simulation::{TurretBarrels, TurretBase, TurretDebugRay};

use crate::controls::OrbitingTarget;

pub struct TurretVisualsPlugin;

impl Plugin for TurretVisualsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (
            spawn_base_visuals,
            spawn_barrel_visuals,
            draw_debug_rays,
            draw_targets,
        ));
    }
}

/// Меш base: плоский цилиндр (child, чтобы не трогать Transform base)
fn spawn_base_visuals(
    mut commands: Commands,
    bases: Query<Entity, Added<TurretBase>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for base in bases.iter() {
        commands.spawn((
            Mesh3d(meshes.add(Cylinder::new(0.8, 0.5))),
            MeshMaterial3d(materials.add(Color::srgb(0.35, 0.35, 0.4))),
            Transform::from_xyz(0.0, 0.25, 0.0),
            ChildOf(base),
        ));
    }
}

/// Меш barrels: цилиндр, развёрнутый вдоль forward (-Z)
fn spawn_barrel_visuals(
    mut commands: Commands,
    barrels: Query<Entity, Added<TurretBarrels>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for barrel in barrels.iter() {
        commands.spawn((
            Mesh3d(meshes.add(Cylinder::new(0.12, 1.6))),
            MeshMaterial3d(materials.add(Color::srgb(0.2, 0.2, 0.25))),
            Transform::from_xyz(0.0, 0.0, -0.8)
                .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
            ChildOf(barrel),
        ));
    }
}

/// Debug rays из симуляции → gizmos
fn draw_debug_rays(mut rays: EventReader<TurretDebugRay>, mut gizmos: Gizmos) {
    for ray in rays.read() {
        gizmos.ray(ray.origin, ray.direction * ray.length, Color::srgb(0.9, 0.2, 0.2));
    }
}

fn draw_targets(targets: Query<&Transform, With<OrbitingTarget>>, mut gizmos: Gizmos) {
    for transform in targets.iter() {
        let iso = bevy::math::Isometry3d::new(transform.translation, Quat::IDENTITY);
        gizmos.sphere(iso, 0.3, Color::srgb(0.9, 0.8, 0.2));
    }
}
