// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

use crate::model::AircraftStatus;
use crate::store::FleetStore;
use log::{debug, info, warn};

impl FleetStore {
    /// Parks an aircraft on a position.
    ///
    /// Returns `false` without touching anything when the position is unknown
    /// or full, the aircraft is unknown, or the aircraft is in maintenance.
    /// A position the aircraft already holds elsewhere is released as part of
    /// the move, so a reassignment can never double-book.
    pub fn assign_aircraft(&mut self, aircraft_id: &str, position_id: &str) -> bool {
        let Some(capacity) = self.position(position_id).map(|p| p.capacity) else {
            warn!(
                "Assignment rejected: unknown position: aircraft={} position={}",
                aircraft_id, position_id
            );
            return false;
        };

        let (current, maintenance) = match self.aircraft_by_id(aircraft_id) {
            Some(a) => (a.assigned_position_id.clone(), a.is_maintenance()),
            None => {
                warn!(
                    "Assignment rejected: unknown aircraft: aircraft={} position={}",
                    aircraft_id, position_id
                );
                return false;
            }
        };

        if maintenance {
            warn!(
                "Assignment rejected: aircraft is in maintenance: aircraft={} position={}",
                aircraft_id, position_id
            );
            return false;
        }

        if current.as_deref() == Some(position_id) {
            debug!(
                "Aircraft already on position: aircraft={} position={}",
                aircraft_id, position_id
            );
            return true;
        }

        let occupancy = self.position_occupancy(position_id);
        if occupancy >= capacity {
            warn!(
                "Assignment rejected: position full: aircraft={} position={} occupancy={} capacity={}",
                aircraft_id, position_id, occupancy, capacity
            );
            return false;
        }

        if let Some(aircraft) = self.aircraft_mut(aircraft_id) {
            aircraft.assigned_position_id = Some(position_id.to_string());
            aircraft.status = AircraftStatus::Assigned;
        }

        if let Some(previous) = current {
            debug!(
                "Released previous position: aircraft={} position={}",
                aircraft_id, previous
            );
        }
        debug!(
            "Aircraft assigned: aircraft={} position={} occupancy={}",
            aircraft_id,
            position_id,
            occupancy + 1
        );
        true
    }

    /// Clears the position relation. Unknown ids are ignored.
    /// Maintenance aircraft keep their status.
    pub fn unassign_aircraft(&mut self, aircraft_id: &str) {
        if let Some(aircraft) = self.aircraft_mut(aircraft_id) {
            aircraft.assigned_position_id = None;
            if aircraft.status != AircraftStatus::Maintenance {
                aircraft.status = AircraftStatus::Unassigned;
            }
            debug!("Aircraft unassigned: aircraft={}", aircraft_id);
        }
    }

    /// Drops every position assignment in one published update.
    ///
    /// Maintenance aircraft keep their status; any position they were
    /// illegally holding is cleared as well. The dome relation is untouched.
    pub fn clear_all_assignments(&mut self) {
        let mut cleared = 0usize;
        let next = self
            .aircraft
            .iter()
            .map(|a| {
                let mut a = a.clone();
                if a.assigned_position_id.take().is_some() {
                    cleared += 1;
                }
                if a.status != AircraftStatus::Maintenance {
                    a.status = AircraftStatus::Unassigned;
                }
                a
            })
            .collect();

        self.publish_aircraft(next);
        info!("Cleared all position assignments: cleared={}", cleared);
    }
}

#[cfg(test)]
mod tests {
    use crate::fixtures::sample_snapshot;
    use crate::model::AircraftStatus;
    use crate::store::FleetStore;

    fn store() -> FleetStore {
        FleetStore::new(sample_snapshot())
    }

    #[test]
    fn test_assign_sets_status_and_position() {
        let mut store = store();
        assert!(store.assign_aircraft("plane-001", "pos-p2"));

        let a = store.aircraft_by_id("plane-001").unwrap();
        assert_eq!(a.assigned_position_id.as_deref(), Some("pos-p2"));
        assert_eq!(a.status, AircraftStatus::Assigned);
        assert_eq!(store.position_occupancy("pos-p2"), 1);
    }

    #[test]
    fn test_assign_rejects_full_position() {
        let mut store = store();
        assert!(store.assign_aircraft("plane-001", "pos-p2"));
        assert!(store.assign_aircraft("plane-002", "pos-p2"));
        assert!(!store.assign_aircraft("plane-003", "pos-p2"));

        let a = store.aircraft_by_id("plane-003").unwrap();
        assert!(a.assigned_position_id.is_none());
        assert_eq!(a.status, AircraftStatus::Unassigned);
    }

    #[test]
    fn test_assign_unknown_ids_is_noop() {
        let mut store = store();
        let before = store.snapshot();

        assert!(!store.assign_aircraft("plane-001", "pos-nowhere"));
        assert!(!store.assign_aircraft("plane-999", "pos-p1"));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_reassign_moves_instead_of_double_booking() {
        let mut store = store();
        assert!(store.assign_aircraft("plane-001", "pos-p1"));
        assert!(store.assign_aircraft("plane-001", "pos-p2"));

        assert_eq!(store.position_occupancy("pos-p1"), 0);
        assert_eq!(store.position_occupancy("pos-p2"), 1);
    }

    #[test]
    fn test_reassign_to_same_full_position_succeeds() {
        let mut store = store();
        assert!(store.assign_aircraft("plane-001", "pos-p2"));
        assert!(store.assign_aircraft("plane-002", "pos-p2"));
        assert!(store.assign_aircraft("plane-001", "pos-p2"));
        assert_eq!(store.position_occupancy("pos-p2"), 2);
    }

    #[test]
    fn test_move_into_full_position_keeps_original_slot() {
        let mut store = store();
        assert!(store.assign_aircraft("plane-001", "pos-p2"));
        assert!(store.assign_aircraft("plane-002", "pos-p2"));
        assert!(store.assign_aircraft("plane-003", "pos-p1"));

        assert!(!store.assign_aircraft("plane-003", "pos-p2"));
        assert_eq!(
            store
                .aircraft_by_id("plane-003")
                .unwrap()
                .assigned_position_id
                .as_deref(),
            Some("pos-p1")
        );
    }

    #[test]
    fn test_unassign_unknown_is_noop() {
        let mut store = store();
        let before = store.snapshot();
        store.unassign_aircraft("plane-999");
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_unassign_keeps_maintenance_status() {
        let mut snap = sample_snapshot();
        snap.aircraft[12].assigned_position_id = Some("pos-g1".to_string());
        let mut store = FleetStore::new(snap);

        store.unassign_aircraft("plane-013");
        let a = store.aircraft_by_id("plane-013").unwrap();
        assert!(a.assigned_position_id.is_none());
        assert_eq!(a.status, AircraftStatus::Maintenance);
    }
}
