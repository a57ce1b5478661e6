// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

use hardstand_core::fixtures::{load_snapshot, sample_snapshot, save_snapshot};
use hardstand_core::settings::{Settings, SettingsManager};
use hardstand_core::table::{assignment_table, export_csv, import_csv};
use hardstand_core::{AlgorithmParams, FleetStore, Strategy, CONFIG_DIR_ENV};
use std::collections::HashMap;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_settings_follow_config_dir_env() {
    let dir = tempdir().unwrap();
    let config_dir = dir.path().join(".hardstand");

    std::env::set_var(CONFIG_DIR_ENV, &config_dir);

    let manager = SettingsManager::new();
    assert_eq!(manager.path(), config_dir.join("settings.json"));

    let settings = Settings {
        strategy: Strategy::MinimizeDistance,
        algorithm: AlgorithmParams::with_max_per_position(2),
        acting_user: None,
    };
    manager.save(&settings).unwrap();

    let loaded = SettingsManager::new().load().unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn test_distribute_save_reload_keeps_assignments() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fleet.json");

    let mut store = FleetStore::new(sample_snapshot());
    store.run_auto_distribute(Strategy::SpreadEvenly, &AlgorithmParams::default());
    save_snapshot(&path, &store.snapshot()).unwrap();

    let reloaded = FleetStore::new(load_snapshot(&path).unwrap());
    for p in reloaded.positions() {
        assert_eq!(
            reloaded.position_occupancy(&p.id),
            store.position_occupancy(&p.id)
        );
    }
    assert!(reloaded.unassigned_aircraft().is_empty());
}

#[test]
fn test_load_rejects_overfull_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");

    let mut snap = sample_snapshot();
    for a in snap.aircraft.iter_mut().take(3) {
        a.assigned_position_id = Some("pos-g1".to_string());
    }
    save_snapshot(&path, &snap).unwrap();

    let err = load_snapshot(&path).unwrap_err();
    assert!(err.to_string().contains("pos-g1"));
}

#[test]
fn test_csv_file_roundtrip_of_notes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("assignments.csv");

    let mut store = FleetStore::new(sample_snapshot());
    store.run_auto_distribute(Strategy::Cluster, &AlgorithmParams::default());

    let mut notes = HashMap::new();
    notes.insert("pos-t2".to_string(), "\"quoted\" note".to_string());
    let rows = assignment_table(&store, &notes);

    export_csv(fs::File::create(&path).unwrap(), &rows).unwrap();
    let import = import_csv(fs::File::open(&path).unwrap(), &store).unwrap();

    assert_eq!(import.matched_rows, rows.len());
    assert_eq!(import.notes["pos-t2"], "\"quoted\" note");
}
