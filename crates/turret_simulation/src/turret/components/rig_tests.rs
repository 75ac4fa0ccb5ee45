//! Tests for TurretRig binding guard.

#[cfg(test)]
mod tests {
    use crate::turret::components::rig::*;
    use crate::TurretError;
    use bevy::prelude::*;

    #[test]
    fn test_rig_default_unbound() {
        let rig = TurretRig::default();
        assert_eq!(rig.base(), None);
        assert_eq!(rig.barrels(), None);
    }

    #[test]
    fn test_bind_while_editing() {
        let base = Entity::from_raw(1);
        let barrels = Entity::from_raw(2);
        let mut rig = TurretRig::default();

        rig.bind_base(Some(base), SimulationMode::Editing).unwrap();
        rig.bind_barrels(Some(barrels), SimulationMode::Editing).unwrap();

        assert_eq!(rig.base(), Some(base));
        assert_eq!(rig.barrels(), Some(barrels));

        rig.clear(SimulationMode::Editing).unwrap();
        assert_eq!(rig, TurretRig::default());
    }

    #[test]
    fn test_bind_while_running_is_rejected() {
        let base = Entity::from_raw(1);
        let mut rig = TurretRig::new(Some(base), None);

        let result = rig.bind_barrels(Some(Entity::from_raw(5)), SimulationMode::Running);
        assert_eq!(
            result,
            Err(TurretError::InvalidOperationInPlayMode { slot: RigSlot::Barrels })
        );

        assert!(rig.clear(SimulationMode::Running).is_err());
        // Rig не тронут
        assert_eq!(rig.base(), Some(base));
        assert_eq!(rig.barrels(), None);
    }

    #[test]
    fn test_base_and_barrels_cannot_share_entity() {
        let base = Entity::from_raw(1);
        let barrels = Entity::from_raw(2);
        let mut rig = TurretRig::new(Some(base), Some(barrels));

        assert_eq!(
            rig.bind(RigSlot::All, Some(base), SimulationMode::Editing),
            Err(TurretError::SharedRigEntity { entity: base })
        );
        assert_eq!(
            rig.bind_base(Some(barrels), SimulationMode::Editing),
            Err(TurretError::SharedRigEntity { entity: barrels })
        );
        assert_eq!(rig, TurretRig::new(Some(base), Some(barrels)));

        // Swap через промежуточный None
        rig.bind_barrels(None, SimulationMode::Editing).unwrap();
        rig.bind_base(Some(barrels), SimulationMode::Editing).unwrap();
        rig.bind_barrels(Some(base), SimulationMode::Editing).unwrap();
        assert_eq!(rig, TurretRig::new(Some(barrels), Some(base)));
    }

    #[test]
    fn test_simulation_mode_default_is_editing() {
        assert_eq!(SimulationMode::default(), SimulationMode::Editing);
        assert!(!SimulationMode::Editing.is_running());
        assert!(SimulationMode::Running.is_running());
    }

    #[test]
    fn test_error_message_names_slot() {
        let err = TurretError::InvalidOperationInPlayMode { slot: RigSlot::Base };
        assert_eq!(err.to_string(), "cannot rebind turret base while the simulation is running");
    }
}
