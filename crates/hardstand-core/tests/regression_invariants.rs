// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

use hardstand_core::fixtures::sample_snapshot;
use hardstand_core::{AircraftStatus, AlgorithmParams, FleetStore, Strategy};

fn assert_capacity_invariant(store: &FleetStore) {
    for p in store.positions() {
        let occupancy = store.position_occupancy(&p.id);
        assert!(
            occupancy <= p.capacity,
            "position {} holds {} but capacity is {}",
            p.id,
            occupancy,
            p.capacity
        );
    }
}

fn assert_maintenance_invariant(store: &FleetStore) {
    for a in store.aircraft() {
        if a.status == AircraftStatus::Maintenance {
            assert!(
                a.assigned_position_id.is_none(),
                "maintenance aircraft {} holds a position",
                a.id
            );
        }
    }
}

#[test]
fn test_capacity_holds_across_mixed_operations() {
    let mut store = FleetStore::new(sample_snapshot());
    let ids: Vec<String> = store.aircraft().iter().map(|a| a.id.clone()).collect();
    let positions: Vec<String> = store.positions().iter().map(|p| p.id.clone()).collect();

    // Hammer the smallest hangar with manual assignments.
    for id in &ids {
        store.assign_aircraft(id, "pos-p2");
        assert_capacity_invariant(&store);
    }
    assert_eq!(store.position_occupancy("pos-p2"), 2);

    // Shuffle everyone around by hand.
    for (i, id) in ids.iter().enumerate() {
        store.assign_aircraft(id, &positions[(i * 7) % positions.len()]);
        assert_capacity_invariant(&store);
        assert_maintenance_invariant(&store);
    }

    for strategy in Strategy::ALL {
        store.unassign_aircraft("plane-002");
        store.unassign_aircraft("plane-010");
        store.run_auto_distribute(strategy, &AlgorithmParams::default());
        assert_capacity_invariant(&store);

        store.clear_all_assignments();
        assert_capacity_invariant(&store);

        store.run_auto_distribute(strategy, &AlgorithmParams::with_max_per_position(1));
        assert_capacity_invariant(&store);
        assert_maintenance_invariant(&store);
    }
}

#[test]
fn test_sample_fleet_fits_in_sample_positions() {
    for strategy in Strategy::ALL {
        let mut store = FleetStore::new(sample_snapshot());
        let plan = store.run_auto_distribute(strategy, &AlgorithmParams::default());

        // 14 eligible aircraft, 28 slots.
        assert_eq!(plan.placements.len(), 14, "strategy {}", strategy);
        assert!(store.unassigned_aircraft().is_empty());
        assert_eq!(
            store.aircraft_by_id("plane-013").unwrap().status,
            AircraftStatus::Maintenance
        );
        assert_capacity_invariant(&store);
    }
}

#[test]
fn test_clear_is_idempotent() {
    let mut store = FleetStore::new(sample_snapshot());
    store.run_auto_distribute(Strategy::Cluster, &AlgorithmParams::default());

    store.clear_all_assignments();
    let once = store.snapshot();
    store.clear_all_assignments();
    assert_eq!(store.snapshot(), once);

    assert!(store.aircraft().iter().all(|a| a.assigned_position_id.is_none()));
    assert_eq!(store.unassigned_aircraft().len(), 14);
}

#[test]
fn test_clear_repairs_maintenance_holding_a_position() {
    let mut snap = sample_snapshot();
    snap.aircraft[12].assigned_position_id = Some("pos-m1".to_string());
    let mut store = FleetStore::new(snap);

    store.clear_all_assignments();
    let a = store.aircraft_by_id("plane-013").unwrap();
    assert!(a.assigned_position_id.is_none());
    assert_eq!(a.status, AircraftStatus::Maintenance);
}

#[test]
fn test_clear_keeps_dome_relation() {
    let mut store = FleetStore::new(sample_snapshot());
    store.clear_all_assignments();
    assert_eq!(
        store.aircraft_by_id("plane-001").unwrap().assigned_dome_id.as_deref(),
        Some("dome-101-a-1")
    );
    assert!(store.dome_occupied("dome-101-a-1"));
}

#[test]
fn test_maintenance_is_sticky() {
    let mut store = FleetStore::new(sample_snapshot());

    assert!(store
        .unassigned_aircraft()
        .iter()
        .all(|a| a.status != AircraftStatus::Maintenance));

    for p in store.positions().to_vec() {
        assert!(!store.assign_aircraft("plane-013", &p.id));
    }
    let a = store.aircraft_by_id("plane-013").unwrap();
    assert_eq!(a.status, AircraftStatus::Maintenance);
    assert!(a.assigned_position_id.is_none());

    for strategy in Strategy::ALL {
        store.run_auto_distribute(strategy, &AlgorithmParams::default());
        let a = store.aircraft_by_id("plane-013").unwrap();
        assert_eq!(a.status, AircraftStatus::Maintenance);
        assert!(a.assigned_position_id.is_none());
        store.clear_all_assignments();
    }
}
