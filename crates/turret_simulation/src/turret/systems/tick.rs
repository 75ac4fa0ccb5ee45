//! Turret tick systems (Update / FixedUpdate)
//!
//! Каждый turret тикается ровно из одного schedule:
//! - `run_in_fixed_tick == false` → `tick_turrets_update` (Update, `Time<Virtual>`)
//! - `run_in_fixed_tick == true` → `tick_turrets_fixed` (FixedUpdate, `Time<Fixed>`)
//!
//! Parent world transform берётся из `GlobalTransform` (propagate в PostUpdate,
//! т.е. значение прошлого frame). Barrels считаются в frame base, обновлённом
//! в этом же tick.

use bevy::ecs::system::SystemParam;
use bevy::math::Affine3A;
use bevy::prelude::*;

use crate::turret::{
    OrientableFrame, TransformFrame, TurretAim, TurretCameToRest, TurretConfig, TurretDebugRay,
    TurretRig,
};

/// Всё что нужно для tick'а turret'ов (общее для Update и FixedUpdate)
#[derive(SystemParam)]
pub struct TurretTickParams<'w, 's> {
    turrets: Query<'w, 's, (Entity, &'static mut TurretAim, &'static TurretConfig, &'static TurretRig)>,
    transforms: Query<'w, 's, &'static mut Transform>,
    globals: Query<'w, 's, &'static GlobalTransform>,
    parents: Query<'w, 's, &'static ChildOf>,
    debug_rays: EventWriter<'w, TurretDebugRay>,
    came_to_rest: EventWriter<'w, TurretCameToRest>,
}

/// System: tick turret'ов с `run_in_fixed_tick == false`
pub fn tick_turrets_update(time: Res<Time>, mut params: TurretTickParams) {
    tick_turrets(&mut params, time.delta_secs(), false);
}

/// System: tick turret'ов с `run_in_fixed_tick == true`
pub fn tick_turrets_fixed(time: Res<Time<Fixed>>, mut params: TurretTickParams) {
    tick_turrets(&mut params, time.delta_secs(), true);
}

fn tick_turrets(params: &mut TurretTickParams, delta_secs: f32, fixed: bool) {
    let TurretTickParams {
        turrets,
        transforms,
        globals,
        parents,
        debug_rays,
        came_to_rest,
    } = params;

    for (turret, mut aim, config, rig) in turrets.iter_mut() {
        if config.run_in_fixed_tick != fixed {
            continue;
        }

        // Despawned entity = отсутствующий transform
        let mut base = rig
            .base()
            .and_then(|entity| read_frame(entity, transforms, globals, parents));
        let mut barrels = rig
            .barrels()
            .and_then(|entity| read_frame(entity, transforms, globals, parents));

        // Barrels child of base → parent affine собираем из свежего Transform base
        let barrels_follow_base = barrels_are_child_of_base(rig, parents);
        if let (Some(base), Some(barrels), true) = (&base, &mut barrels, barrels_follow_base) {
            barrels.reparent(base.world_affine());
        }

        let rested = aim.tick(
            delta_secs,
            config,
            base.as_mut().map(|frame| frame as &mut dyn OrientableFrame),
            barrels.as_mut().map(|frame| frame as &mut dyn OrientableFrame),
        );

        if rested {
            came_to_rest.write(TurretCameToRest { turret });
        }

        if let (Some(base), Some(barrels), true) = (&base, &mut barrels, barrels_follow_base) {
            barrels.reparent(base.world_affine());
        }

        write_rotation(rig.base(), base.as_ref(), transforms);
        write_rotation(rig.barrels(), barrels.as_ref(), transforms);

        let ray = aim.debug_ray(
            base.as_ref().map(|frame| frame as &dyn OrientableFrame),
            barrels.as_ref().map(|frame| frame as &dyn OrientableFrame),
        );
        if let Some(ray) = ray {
            debug_rays.write(TurretDebugRay {
                turret,
                origin: ray.origin,
                direction: ray.direction,
                length: ray.length,
            });
        }
    }
}

/// Snapshot Transform + world affine parent'а (identity для root)
fn read_frame(
    entity: Entity,
    transforms: &Query<&mut Transform>,
    globals: &Query<&GlobalTransform>,
    parents: &Query<&ChildOf>,
) -> Option<TransformFrame> {
    let transform = transforms.get(entity).ok()?;
    let parent = parents
        .get(entity)
        .ok()
        .and_then(|child_of| globals.get(child_of.parent()).ok())
        .map(|global| global.affine())
        .unwrap_or(Affine3A::IDENTITY);

    Some(TransformFrame::new(parent, *transform))
}

fn barrels_are_child_of_base(rig: &TurretRig, parents: &Query<&ChildOf>) -> bool {
    match (rig.base(), rig.barrels()) {
        (Some(base), Some(barrels)) => parents
            .get(barrels)
            .is_ok_and(|child_of| child_of.parent() == base),
        _ => false,
    }
}

/// Пишем rotation обратно (без лишнего Changed<Transform>, если не изменилась)
fn write_rotation(
    entity: Option<Entity>,
    frame: Option<&TransformFrame>,
    transforms: &mut Query<&mut Transform>,
) {
    let (Some(entity), Some(frame)) = (entity, frame) else {
        return;
    };

    if let Ok(mut transform) = transforms.get_mut(entity) {
        let rotation = frame.local_rotation();
        if transform.rotation != rotation {
            transform.rotation = rotation;
        }
    }
}
