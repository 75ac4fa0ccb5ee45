//! Orientable frame: минимальный интерфейс transform'а, который нужен aim-алгоритму.
//!
//! Алгоритм не знает про scene graph. Ему нужно:
//! - читать/писать local rotation
//! - переводить world point в parent space и в own local space
//! - world position + forward (для debug ray)

use bevy::math::Affine3A;
use bevy::prelude::*;

pub trait OrientableFrame {
    /// Rotation относительно parent space
    fn local_rotation(&self) -> Quat;

    fn set_local_rotation(&mut self, rotation: Quat);

    /// Позиция pivot'а в parent space
    fn local_translation(&self) -> Vec3;

    /// World point → parent space (space, в котором выражена local rotation)
    fn parent_space_point(&self, world: Vec3) -> Vec3;

    /// World point → own local space (учитывает текущую local rotation)
    fn local_space_point(&self, world: Vec3) -> Vec3;

    fn world_position(&self) -> Vec3;

    /// World-space forward (-Z), нормализованный
    fn world_forward(&self) -> Vec3;
}

/// Snapshot Bevy transform'а + world affine его parent'а.
///
/// ECS система собирает его из `Transform` + `GlobalTransform` parent'а,
/// прогоняет aim tick и пишет rotation обратно в `Transform`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformFrame {
    pub parent: Affine3A,
    pub transform: Transform,
}

impl TransformFrame {
    pub fn new(parent: Affine3A, transform: Transform) -> Self {
        Self { parent, transform }
    }

    /// Frame без parent'а (root entity)
    pub fn root(transform: Transform) -> Self {
        Self::new(Affine3A::IDENTITY, transform)
    }

    /// World affine этого frame (parent * local)
    pub fn world_affine(&self) -> Affine3A {
        self.parent * self.transform.compute_affine()
    }

    /// Заменить parent (после того как parent повернулся в этом же tick)
    pub fn reparent(&mut self, parent: Affine3A) {
        self.parent = parent;
    }
}

impl OrientableFrame for TransformFrame {
    fn local_rotation(&self) -> Quat {
        self.transform.rotation
    }

    fn set_local_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }

    fn local_translation(&self) -> Vec3 {
        self.transform.translation
    }

    fn parent_space_point(&self, world: Vec3) -> Vec3 {
        self.parent.inverse().transform_point3(world)
    }

    fn local_space_point(&self, world: Vec3) -> Vec3 {
        self.world_affine().inverse().transform_point3(world)
    }

    fn world_position(&self) -> Vec3 {
        self.world_affine().translation.into()
    }

    fn world_forward(&self) -> Vec3 {
        self.world_affine()
            .transform_vector3(Vec3::NEG_Z)
            .normalize_or_zero()
    }
}
