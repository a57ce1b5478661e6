// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

use crate::model::{
    Aircraft, AircraftSize, AircraftStatus, AircraftType, Base, Dome, Position, PositionType,
    Shelter, Squadron,
};
use crate::store::FleetSnapshot;
use crate::FleetError;
use log::info;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Reads and validates a snapshot from a JSON file.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<FleetSnapshot, FleetError> {
    let file = File::open(path.as_ref())?;
    let snapshot = read_snapshot(BufReader::new(file))?;
    info!(
        "Loaded fleet snapshot: path={} bases={} positions={} aircraft={}",
        path.as_ref().display(),
        snapshot.bases.len(),
        snapshot.positions.len(),
        snapshot.aircraft.len()
    );
    Ok(snapshot)
}

pub fn read_snapshot<R: Read>(reader: R) -> Result<FleetSnapshot, FleetError> {
    let snapshot: FleetSnapshot = serde_json::from_reader(reader)?;
    snapshot.validate()?;
    Ok(snapshot)
}

pub fn save_snapshot<P: AsRef<Path>>(path: P, snapshot: &FleetSnapshot) -> Result<(), FleetError> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn base(id: &str, name: &str, latitude: f64, longitude: f64, capacity: u32) -> Base {
    let mut metadata = BTreeMap::new();
    metadata.insert("region".to_string(), "Test Region A".into());
    metadata.insert("status".to_string(), "active".into());
    Base {
        id: id.to_string(),
        name: name.to_string(),
        latitude,
        longitude,
        capacity,
        metadata: Some(metadata),
    }
}

fn position(
    id: &str,
    base_id: &str,
    name: &str,
    latitude: f64,
    longitude: f64,
    position_type: PositionType,
    capacity: u32,
) -> Position {
    Position {
        id: id.to_string(),
        base_id: base_id.to_string(),
        name: name.to_string(),
        latitude,
        longitude,
        position_type,
        capacity,
    }
}

fn dome(id: &str, shelter_id: &str, name: &str, aircraft_id: Option<&str>) -> Dome {
    Dome {
        id: id.to_string(),
        shelter_id: shelter_id.to_string(),
        name: name.to_string(),
        aircraft_id: aircraft_id.map(str::to_string),
    }
}

/// Synthetic demo data with coarse, fictional coordinates.
pub fn sample_snapshot() -> FleetSnapshot {
    use AircraftSize::*;
    use AircraftType::*;
    use PositionType::{Apron, Hangar};

    let bases = vec![
        base("base-01", "Palmachim", 31.93, 34.72, 12),
        base("base-02", "Tel Nof", 31.82, 34.89, 10),
        base("base-03", "Gan Yavne", 31.78, 34.71, 8),
        base("base-04", "Mitzpe Ramon", 30.61, 34.80, 6),
        base("base-05", "Ramat David", 32.70, 35.18, 14),
    ];

    let positions = vec![
        position("pos-p1", "base-01", "Palmachim Apron 1", 31.931, 34.723, Apron, 3),
        position("pos-p2", "base-01", "Palmachim Hangar 2", 31.929, 34.718, Hangar, 2),
        position("pos-t1", "base-02", "Tel Nof Apron 1", 31.821, 34.893, Apron, 3),
        position("pos-t2", "base-02", "Tel Nof Hangar 2", 31.819, 34.885, Hangar, 4),
        position("pos-g1", "base-03", "Gan Yavne Apron 1", 31.781, 34.713, Apron, 2),
        position("pos-g2", "base-03", "Gan Yavne Hangar 2", 31.779, 34.707, Hangar, 2),
        position("pos-m1", "base-04", "Mitzpe Ramon Apron 1", 30.612, 34.803, Apron, 2),
        position("pos-m2", "base-04", "Mitzpe Ramon Hangar 2", 30.608, 34.798, Hangar, 2),
        position("pos-r1", "base-05", "Ramat David Apron 1", 32.702, 35.182, Apron, 3),
        position("pos-r2", "base-05", "Ramat David Hangar 2", 32.698, 35.178, Hangar, 3),
        position("pos-r3", "base-05", "Ramat David Apron 3", 32.705, 35.187, Apron, 2),
    ];

    let fleet = [
        ("plane-001", Fighter, "TFA-001", Small),
        ("plane-002", Fighter, "TFA-002", Small),
        ("plane-003", Fighter, "TFA-003", Small),
        ("plane-004", Fighter, "TFA-004", Small),
        ("plane-005", Bomber, "TBB-001", Large),
        ("plane-006", Bomber, "TBB-002", Large),
        ("plane-007", Transport, "TTC-001", Large),
        ("plane-008", Transport, "TTC-002", Large),
        ("plane-009", Recon, "TRD-001", Medium),
        ("plane-010", Recon, "TRD-002", Medium),
        ("plane-011", Helicopter, "THE-001", Small),
        ("plane-012", Helicopter, "THE-002", Small),
        ("plane-013", Fighter, "TFA-005", Small),
        ("plane-014", Fighter, "TFA-006", Small),
        ("plane-015", Bomber, "TBB-003", Large),
    ];

    let mut aircraft: Vec<Aircraft> = fleet
        .iter()
        .map(|(id, kind, callsign, size)| {
            let status = if *id == "plane-013" {
                AircraftStatus::Maintenance
            } else {
                AircraftStatus::Unassigned
            };
            Aircraft::new(*id, *kind, *callsign, *size, status)
        })
        .collect();

    aircraft[0].assigned_dome_id = Some("dome-101-a-1".to_string());
    aircraft[4].assigned_dome_id = Some("dome-201-a-1".to_string());

    let squadrons = vec![
        Squadron {
            id: "sq-101".to_string(),
            base_id: "base-01".to_string(),
            name: "Squadron 101".to_string(),
        },
        Squadron {
            id: "sq-201".to_string(),
            base_id: "base-05".to_string(),
            name: "Squadron 201".to_string(),
        },
    ];

    let shelter = |id: &str, squadron_id: &str, name: &str, aircraft_type| Shelter {
        id: id.to_string(),
        squadron_id: squadron_id.to_string(),
        name: name.to_string(),
        aircraft_type,
    };
    let shelters = vec![
        shelter("sh-101-a", "sq-101", "Shelter A", Fighter),
        shelter("sh-101-b", "sq-101", "Shelter B", Helicopter),
        shelter("sh-201-a", "sq-201", "Shelter A", Bomber),
        shelter("sh-201-b", "sq-201", "Shelter B", Transport),
    ];

    let domes = vec![
        dome("dome-101-a-1", "sh-101-a", "A1", Some("plane-001")),
        dome("dome-101-a-2", "sh-101-a", "A2", None),
        dome("dome-101-a-3", "sh-101-a", "A3", None),
        dome("dome-101-b-1", "sh-101-b", "B1", None),
        dome("dome-101-b-2", "sh-101-b", "B2", None),
        dome("dome-201-a-1", "sh-201-a", "A1", Some("plane-005")),
        dome("dome-201-a-2", "sh-201-a", "A2", None),
        dome("dome-201-b-1", "sh-201-b", "B1", None),
        dome("dome-201-b-2", "sh-201-b", "B2", None),
    ];

    FleetSnapshot {
        bases,
        positions,
        aircraft,
        squadrons,
        shelters,
        domes,
    }
}
