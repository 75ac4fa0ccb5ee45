//! Tests for TurretAim (state machine + per-tick rotation).

#[cfg(test)]
mod tests {
    use crate::turret::components::aim::*;
    use crate::turret::frame::{OrientableFrame, TransformFrame};
    use crate::turret::math::angular_distance;
    use crate::turret::TurretConfig;
    use crate::TurretError;
    use bevy::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const EPS: f32 = 1.0e-3;

    /// Base в origin, barrels child base с pivot'ом выше на 0.5
    fn rig() -> (TransformFrame, TransformFrame) {
        let base = TransformFrame::root(Transform::default());
        let barrels = TransformFrame::new(base.world_affine(), Transform::from_xyz(0.0, 0.5, 0.0));
        (base, barrels)
    }

    fn tick(
        aim: &mut TurretAim,
        config: &TurretConfig,
        delta: f32,
        base: &mut TransformFrame,
        barrels: &mut TransformFrame,
    ) -> bool {
        aim.tick(delta, config, Some(base), Some(barrels))
    }

    #[test]
    fn test_default_state_is_aiming_forward() {
        let aim = TurretAim::default();
        assert_eq!(aim.state(), AimState::Aiming);
        assert!(!aim.is_idle());
        assert!(!aim.is_at_rest());
        assert_eq!(aim.target(), Vec3::new(0.0, 0.0, -DEFAULT_TARGET_DISTANCE));
    }

    #[test]
    fn test_facing_uses_transform_forward() {
        let transform = Transform::from_xyz(5.0, 0.0, 0.0)
            .with_rotation(Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2));
        let aim = TurretAim::facing(&transform);
        assert!(aim.target().abs_diff_eq(Vec3::new(105.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn test_reaches_look_rotation_in_one_large_tick() {
        let config = TurretConfig::default();
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        // Справа-впереди и выше pivot'а barrels
        let target = Vec3::new(10.0, 5.5, -10.0);
        aim.set_aim_target(target).unwrap();
        tick(&mut aim, &config, 100.0, &mut base, &mut barrels);

        let expected_base = Quat::from_rotation_y(-45f32.to_radians());
        let horizontal = Vec2::new(10.0, 10.0).length();
        let expected_barrels = Quat::from_rotation_x(5.0f32.atan2(horizontal));

        assert!(angular_distance(base.local_rotation(), expected_base) < EPS);
        assert!(angular_distance(barrels.local_rotation(), expected_barrels) < EPS);
        assert!(!aim.is_at_rest());
    }

    #[test]
    fn test_target_straight_ahead_keeps_identity() {
        let config = TurretConfig::default();
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        aim.set_aim_target(Vec3::new(0.0, 0.5, -50.0)).unwrap();
        tick(&mut aim, &config, 1.0, &mut base, &mut barrels);

        assert!(angular_distance(base.local_rotation(), Quat::IDENTITY) < EPS);
        assert!(angular_distance(barrels.local_rotation(), Quat::IDENTITY) < EPS);
        assert_eq!(aim.state(), AimState::Aiming);
    }

    #[test]
    fn test_step_respects_turn_rates() {
        let config = TurretConfig::default(); // 30 deg/s
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        // 90° вправо и сильно вверх
        aim.set_aim_target(Vec3::new(100.0, 80.0, 0.0)).unwrap();
        tick(&mut aim, &config, 0.1, &mut base, &mut barrels);

        let base_angle = angular_distance(base.local_rotation(), Quat::IDENTITY).to_degrees();
        let barrel_angle = angular_distance(barrels.local_rotation(), Quat::IDENTITY).to_degrees();
        assert!((base_angle - 3.0).abs() < EPS);
        assert!((barrel_angle - 6.0).abs() < EPS);
    }

    #[test]
    fn test_random_targets_never_exceed_step() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let config = TurretConfig {
            limit_traverse: true,
            left_traverse: 120.0,
            right_traverse: 45.0,
            ..default()
        };
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        for _ in 0..500 {
            if rng.gen_bool(0.2) {
                let target = Vec3::new(
                    rng.gen_range(-100.0..100.0),
                    rng.gen_range(-50.0..50.0),
                    rng.gen_range(-100.0..100.0),
                );
                aim.set_aim_target(target).unwrap();
            }
            let delta: f32 = rng.gen_range(0.0..0.2);

            let base_before = base.local_rotation();
            let barrels_before = barrels.local_rotation();
            tick(&mut aim, &config, delta, &mut base, &mut barrels);

            let base_step = angular_distance(base_before, base.local_rotation());
            let barrel_step = angular_distance(barrels_before, barrels.local_rotation());
            assert!(base_step <= config.base_step(delta) + 1.0e-4);
            assert!(barrel_step <= config.barrel_step(delta) + 1.0e-4);
        }
    }

    #[test]
    fn test_traverse_limit_converges_to_left_edge() {
        let config = TurretConfig {
            limit_traverse: true,
            ..default()
        };
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        // Сзади-слева
        aim.set_aim_target(Vec3::new(-10.0, 0.0, 10.0)).unwrap();
        for _ in 0..200 {
            tick(&mut aim, &config, 0.1, &mut base, &mut barrels);
            let yaw = angular_distance(base.local_rotation(), Quat::IDENTITY).to_degrees();
            assert!(yaw <= 60.0 + EPS);
        }

        let left_edge = Quat::from_rotation_y(60f32.to_radians());
        assert!(angular_distance(base.local_rotation(), left_edge) < EPS);
    }

    #[test]
    fn test_traverse_limit_right_side() {
        let config = TurretConfig {
            limit_traverse: true,
            right_traverse: 30.0,
            ..default()
        };
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        aim.set_aim_target(Vec3::new(100.0, 0.0, 0.0)).unwrap();
        tick(&mut aim, &config, 100.0, &mut base, &mut barrels);

        let right_edge = Quat::from_rotation_y(-30f32.to_radians());
        assert!(angular_distance(base.local_rotation(), right_edge) < EPS);
    }

    #[test]
    fn test_unlimited_traverse_turns_fully_around() {
        let config = TurretConfig::default();
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        aim.set_aim_target(Vec3::new(-1.0, 0.0, 100.0)).unwrap();
        tick(&mut aim, &config, 100.0, &mut base, &mut barrels);

        let forward = base.local_rotation() * Vec3::NEG_Z;
        assert!(forward.z > 0.99);
    }

    #[test]
    fn test_elevation_limit() {
        let config = TurretConfig::default(); // elevation 60
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        aim.set_aim_target(Vec3::new(0.0, 1000.0, -1.0)).unwrap();
        for _ in 0..100 {
            tick(&mut aim, &config, 0.1, &mut base, &mut barrels);
            let pitch = angular_distance(barrels.local_rotation(), Quat::IDENTITY).to_degrees();
            assert!(pitch <= 60.0 + EPS);
        }

        let max_up = Quat::from_rotation_x(60f32.to_radians());
        assert!(angular_distance(barrels.local_rotation(), max_up) < EPS);
    }

    #[test]
    fn test_depression_limit() {
        let config = TurretConfig::default(); // depression 5
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        aim.set_aim_target(Vec3::new(0.0, -100.0, -10.0)).unwrap();
        for _ in 0..20 {
            tick(&mut aim, &config, 0.1, &mut base, &mut barrels);
        }

        let max_down = Quat::from_rotation_x(-5f32.to_radians());
        assert!(angular_distance(barrels.local_rotation(), max_down) < EPS);
    }

    #[test]
    fn test_elevation_past_vertical_stays_pure_pitch() {
        let config = TurretConfig {
            elevation: 135.0,
            ..default()
        };
        assert!(config.validate().is_ok());

        let mut aim = TurretAim::default();
        let mut barrels = TransformFrame::root(Transform::default());

        // Сзади-сверху: base нет, barrels должны перегнуться через вертикаль
        aim.set_aim_target(Vec3::new(0.0, 100.0, 100.0)).unwrap();
        aim.tick(100.0, &config, None, Some(&mut barrels));

        let rotation = barrels.local_rotation();
        let expected = Quat::from_rotation_x(135f32.to_radians());
        assert!(angular_distance(rotation, expected) < EPS, "got {rotation}");
        assert!((rotation * Vec3::X).abs_diff_eq(Vec3::X, EPS));
    }

    #[test]
    fn test_huge_target_still_aims() {
        let config = TurretConfig::default();
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        aim.set_aim_target(Vec3::new(1.0e20, 0.0, 0.0)).unwrap();
        tick(&mut aim, &config, 100.0, &mut base, &mut barrels);

        let forward = base.local_rotation() * Vec3::NEG_Z;
        assert!(forward.abs_diff_eq(Vec3::X, EPS), "got {forward}");
        assert!(angular_distance(barrels.local_rotation(), Quat::IDENTITY) < EPS);
    }

    #[test]
    fn test_barrels_pitch_in_updated_base_frame() {
        // Цель далеко справа-вверху: после поворота base barrels видят её прямо по курсу
        let config = TurretConfig::default();
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        aim.set_aim_target(Vec3::new(100.0, 0.5 + 100.0, 0.0)).unwrap();
        tick(&mut aim, &config, 100.0, &mut base, &mut barrels);

        let expected = Quat::from_rotation_x(45f32.to_radians());
        assert!(angular_distance(barrels.local_rotation(), expected) < EPS);
    }

    #[test]
    fn test_idle_returns_monotonically_to_rest() {
        let config = TurretConfig::default();
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        aim.set_aim_target(Vec3::new(50.0, 30.0, 20.0)).unwrap();
        tick(&mut aim, &config, 100.0, &mut base, &mut barrels);

        aim.set_idle(true);
        assert_eq!(aim.state(), AimState::ReturningToRest);

        let mut prev_base = angular_distance(base.local_rotation(), Quat::IDENTITY);
        let mut prev_barrels = angular_distance(barrels.local_rotation(), Quat::IDENTITY);
        let mut rested_events = 0;

        for _ in 0..1000 {
            if tick(&mut aim, &config, 0.05, &mut base, &mut barrels) {
                rested_events += 1;
            }
            let base_dist = angular_distance(base.local_rotation(), Quat::IDENTITY);
            let barrels_dist = angular_distance(barrels.local_rotation(), Quat::IDENTITY);

            if !aim.is_at_rest() {
                assert!(base_dist < prev_base || base_dist == 0.0);
                assert!(barrels_dist < prev_barrels || barrels_dist == 0.0);
            }
            prev_base = base_dist;
            prev_barrels = barrels_dist;
        }

        assert!(aim.is_at_rest());
        assert_eq!(aim.state(), AimState::AtRest);
        assert_eq!(rested_events, 1);
        assert_eq!(base.local_rotation(), Quat::IDENTITY);
        assert_eq!(barrels.local_rotation(), Quat::IDENTITY);
    }

    #[test]
    fn test_at_rest_requires_both_transforms() {
        let config = TurretConfig::default();
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        // Base уже в identity, barrels подняты на 30°
        barrels.set_local_rotation(Quat::from_rotation_x(30f32.to_radians()));
        aim.set_idle(true);

        // Barrels: 60 deg/s → 0.25s = 15°, ещё не дома
        assert!(!tick(&mut aim, &config, 0.25, &mut base, &mut barrels));
        assert!(!aim.is_at_rest());

        assert!(tick(&mut aim, &config, 0.25, &mut base, &mut barrels));
        assert!(aim.is_at_rest());
    }

    #[test]
    fn test_at_rest_stays_until_aiming_resumes() {
        let config = TurretConfig::default();
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        aim.set_idle(true);
        tick(&mut aim, &config, 0.1, &mut base, &mut barrels);
        assert!(aim.is_at_rest());

        for _ in 0..10 {
            assert!(!tick(&mut aim, &config, 0.1, &mut base, &mut barrels));
            assert!(aim.is_at_rest());
        }

        aim.set_idle(false);
        assert!(!aim.is_at_rest());
        assert_eq!(aim.state(), AimState::Aiming);
    }

    #[test]
    fn test_set_idle_is_idempotent() {
        let mut aim = TurretAim::default();
        aim.set_idle(true);
        let snapshot = aim.clone();

        aim.set_idle(true);
        aim.set_idle(true);
        assert_eq!(aim, snapshot);
    }

    #[test]
    fn test_idle_then_new_target_skips_rest() {
        let config = TurretConfig::default();
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        aim.set_aim_target(Vec3::new(40.0, 0.0, -10.0)).unwrap();
        tick(&mut aim, &config, 0.5, &mut base, &mut barrels);

        aim.set_idle(true);
        let p = Vec3::new(-20.0, 3.0, -5.0);
        aim.set_aim_target(p).unwrap();

        assert_eq!(aim.state(), AimState::Aiming);
        assert_eq!(aim.target(), p);
        assert!(!aim.is_at_rest());
    }

    #[test]
    fn test_idle_target_not_consulted() {
        let config = TurretConfig::default();
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        aim.set_aim_target(Vec3::new(100.0, 0.0, 0.0)).unwrap();
        aim.set_idle(true);
        tick(&mut aim, &config, 1.0, &mut base, &mut barrels);

        // Поворот к target не произошёл, остались в identity
        assert!(aim.is_at_rest());
        assert_eq!(base.local_rotation(), Quat::IDENTITY);
        assert_eq!(aim.target(), Vec3::new(100.0, 0.0, 0.0));
    }

    #[test]
    fn test_missing_barrels_base_only() {
        let config = TurretConfig::default();
        let mut aim = TurretAim::default();
        let mut base = TransformFrame::root(Transform::default());

        // Выше и справа: base крутится только по горизонтали
        aim.set_aim_target(Vec3::new(10.0, 50.0, 0.0)).unwrap();
        aim.tick(100.0, &config, Some(&mut base), None);

        let forward = base.local_rotation() * Vec3::NEG_Z;
        assert!(forward.abs_diff_eq(Vec3::X, EPS));

        aim.set_idle(true);
        aim.tick(100.0, &config, Some(&mut base), None);
        assert!(aim.is_at_rest());
    }

    #[test]
    fn test_missing_base_uses_barrels_parent_frame() {
        let config = TurretConfig::default();
        let mut aim = TurretAim::default();
        let mut barrels = TransformFrame::root(Transform::default());

        aim.set_aim_target(Vec3::new(0.0, 10.0, -10.0)).unwrap();
        aim.tick(100.0, &config, None, Some(&mut barrels));

        let expected = Quat::from_rotation_x(45f32.to_radians());
        assert!(angular_distance(barrels.local_rotation(), expected) < EPS);
    }

    #[test]
    fn test_no_transforms_rest_immediately() {
        let config = TurretConfig::default();
        let mut aim = TurretAim::default();

        aim.set_idle(true);
        assert!(aim.tick(0.016, &config, None, None));
        assert!(aim.is_at_rest());
    }

    #[test]
    fn test_target_above_pivot_holds_yaw() {
        let config = TurretConfig::default();
        let mut aim = TurretAim::default();
        let mut base = TransformFrame::root(
            Transform::default().with_rotation(Quat::from_rotation_y(0.5)),
        );

        aim.set_aim_target(Vec3::new(0.0, 100.0, 0.0)).unwrap();
        aim.tick(1.0, &config, Some(&mut base), None);

        assert_eq!(base.local_rotation(), Quat::from_rotation_y(0.5));
    }

    #[test]
    fn test_invalid_delta_does_not_rotate() {
        let config = TurretConfig::default();
        let mut aim = TurretAim::default();
        let (mut base, mut barrels) = rig();

        aim.set_aim_target(Vec3::new(100.0, 0.0, 0.0)).unwrap();
        tick(&mut aim, &config, -1.0, &mut base, &mut barrels);
        tick(&mut aim, &config, f32::NAN, &mut base, &mut barrels);

        assert_eq!(base.local_rotation(), Quat::IDENTITY);
    }

    #[test]
    fn test_non_finite_target_rejected() {
        let mut aim = TurretAim::default();
        aim.set_idle(true);

        let result = aim.set_aim_target(Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(matches!(result, Err(TurretError::NonFiniteTarget(_))));
        // State не изменился
        assert!(aim.is_idle());
        assert_eq!(aim.target(), Vec3::new(0.0, 0.0, -DEFAULT_TARGET_DISTANCE));
    }

    #[test]
    fn test_debug_ray_from_barrels_then_base() {
        let mut aim = TurretAim::default();
        let (base, barrels) = rig();

        assert!(aim.debug_ray(Some(&base), Some(&barrels)).is_none());

        aim.set_debug_ray_enabled(true);
        let ray = aim.debug_ray(Some(&base), Some(&barrels)).unwrap();
        assert!(ray.origin.abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), EPS));
        assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, EPS));
        assert_eq!(ray.length, DEBUG_RAY_LENGTH);

        let ray = aim.debug_ray(Some(&base), None).unwrap();
        assert!(ray.origin.abs_diff_eq(Vec3::ZERO, EPS));

        assert!(aim.debug_ray(None, None).is_none());
    }
}
