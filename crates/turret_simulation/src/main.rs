//! Headless turret симуляция
//!
//! Один turret, target прыгает в случайные точки (seeded), периодически idle.
//! Печатает state и ориентацию base/barrels.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::Rng;
use turret_simulation::{
    create_headless_app, spawn_turret, AimState, DeterministicRng, SimulationPlugin, TurretAim,
    TurretConfig, TurretEntities,
};

const TICKS: usize = 1200;
const RETARGET_EVERY: usize = 150;
const IDLE_EVERY: usize = 400;

#[derive(Resource)]
struct DemoTurret(TurretEntities);

fn main() {
    let seed = 42;
    println!("Starting turret headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .add_systems(Startup, setup);

    for tick in 0..TICKS {
        if tick > 0 && tick % RETARGET_EVERY == 0 {
            if tick % IDLE_EVERY == 0 {
                set_idle(&mut app);
            } else {
                retarget(&mut app);
            }
        }

        app.update();

        if tick % 100 == 0 {
            report(&mut app, tick);
        }
    }

    println!("Simulation complete!");
}

fn setup(mut commands: Commands) {
    let config = TurretConfig {
        limit_traverse: true,
        ..default()
    };
    let entities = spawn_turret(&mut commands, Transform::default(), config);
    commands.insert_resource(DemoTurret(entities));
}

fn retarget(app: &mut App) {
    let world = app.world_mut();
    let target = {
        let mut rng = world.resource_mut::<DeterministicRng>();
        Vec3::new(
            rng.rng.gen_range(-100.0..100.0),
            rng.rng.gen_range(-10.0..40.0),
            rng.rng.gen_range(-100.0..100.0),
        )
    };

    let turret = world.resource::<DemoTurret>().0.turret;
    if let Some(mut aim) = world.get_mut::<TurretAim>(turret) {
        if let Err(err) = aim.set_aim_target(target) {
            eprintln!("retarget failed: {}", err);
        }
    }
}

fn set_idle(app: &mut App) {
    let world = app.world_mut();
    let turret = world.resource::<DemoTurret>().0.turret;
    if let Some(mut aim) = world.get_mut::<TurretAim>(turret) {
        aim.set_idle(true);
    }
}

fn report(app: &mut App, tick: usize) {
    let world = app.world();
    let entities = world.resource::<DemoTurret>().0;

    let state = world
        .get::<TurretAim>(entities.turret)
        .map(TurretAim::state)
        .unwrap_or(AimState::AtRest);
    let yaw = world
        .get::<Transform>(entities.base)
        .map(|t| t.rotation.to_euler(EulerRot::YXZ).0.to_degrees())
        .unwrap_or_default();
    let pitch = world
        .get::<Transform>(entities.barrels)
        .map(|t| t.rotation.to_euler(EulerRot::YXZ).1.to_degrees())
        .unwrap_or_default();

    println!("Tick {}: {:?} yaw={:.1}° pitch={:.1}°", tick, state, yaw, pitch);
}
