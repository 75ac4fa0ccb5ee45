use bevy::prelude::*;
use turret_simulation::{init_logger, spawn_turret, SimulationPlugin, TurretConfig};

mod controls;
mod rendering;

use controls::{DemoControlsPlugin, OrbitingTarget};
use rendering::TurretVisualsPlugin;

fn main() {
    init_logger();

    App::new()
        // Bevy defaults (rendering, input, time, etc.)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Turret - Aim Demo".to_string(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        // Simulation (turret aiming)
        .add_plugins(SimulationPlugin)
        // Meshes + gizmos для turret'ов
        .add_plugins(TurretVisualsPlugin)
        // Движение target + клавиши
        .add_plugins(DemoControlsPlugin)
        .add_systems(Startup, setup_scene)
        .run();
}

/// Ground, свет, камера, один turret и target на орбите вокруг него
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Ground plane (40x40m)
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::new(Vec3::Y, Vec2::splat(20.0)))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));

    // Directional light (sun)
    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_4)),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 0.3,
        affects_lightmapped_meshes: false,
    });

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(12.0, 10.0, 12.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let config = TurretConfig {
        limit_traverse: true,
        left_traverse: 90.0,
        right_traverse: 45.0,
        ..default()
    };
    spawn_turret(&mut commands, Transform::from_xyz(0.0, 0.25, 0.0), config);

    commands.spawn((
        OrbitingTarget {
            radius: 10.0,
            height: 3.0,
            angular_speed: 0.4,
            angle: 0.0,
        },
        Transform::from_xyz(0.0, 3.0, -10.0),
    ));
}
