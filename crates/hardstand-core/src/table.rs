// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

use crate::store::FleetStore;
use crate::FleetError;
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::io::{Read, Write};

pub const CSV_HEADER: [&str; 5] = ["Base", "Position", "Capacity", "Assigned Aircraft", "Notes"];

/// One line of the admin assignment table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentRow {
    pub position_id: String,
    pub base: String,
    pub position_name: String,
    pub capacity: u32,
    /// Callsigns of the aircraft parked on the position.
    pub assigned_aircraft: Vec<String>,
    pub notes: String,
}

/// Result of reading an edited table back in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvImport {
    /// position id -> notes
    pub notes: HashMap<String, String>,
    pub matched_rows: usize,
    pub skipped_rows: usize,
}

/// One row per position, in store order. `notes` is keyed by position id.
pub fn assignment_table(store: &FleetStore, notes: &HashMap<String, String>) -> Vec<AssignmentRow> {
    store
        .positions()
        .iter()
        .map(|position| AssignmentRow {
            position_id: position.id.clone(),
            base: store
                .base(&position.base_id)
                .map(|b| b.name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            position_name: position.name.clone(),
            capacity: position.capacity,
            assigned_aircraft: store
                .assigned_aircraft(&position.id)
                .into_iter()
                .map(|a| a.callsign.clone())
                .collect(),
            notes: notes.get(&position.id).cloned().unwrap_or_default(),
        })
        .collect()
}

/// Case-insensitive match on base, position name or any callsign.
pub fn search_rows<'a>(rows: &'a [AssignmentRow], query: &str) -> Vec<&'a AssignmentRow> {
    let query = query.to_lowercase();
    rows.iter()
        .filter(|row| {
            row.base.to_lowercase().contains(&query)
                || row.position_name.to_lowercase().contains(&query)
                || row
                    .assigned_aircraft
                    .iter()
                    .any(|c| c.to_lowercase().contains(&query))
        })
        .collect()
}

/// Rows grouped under their base name, keeping first-seen base order.
pub fn group_by_base(rows: &[AssignmentRow]) -> Vec<(String, Vec<&AssignmentRow>)> {
    let mut groups: Vec<(String, Vec<&AssignmentRow>)> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|(base, _)| *base == row.base) {
            Some((_, members)) => members.push(row),
            None => groups.push((row.base.clone(), vec![row])),
        }
    }
    groups
}

pub fn export_csv<W: Write>(writer: W, rows: &[AssignmentRow]) -> Result<(), FleetError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for row in rows {
        wtr.write_record([
            row.base.as_str(),
            row.position_name.as_str(),
            row.capacity.to_string().as_str(),
            row.assigned_aircraft.join("; ").as_str(),
            row.notes.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Reads a table in the export layout and picks up the notes column.
///
/// Rows are matched to positions by position name. Assignments in the file are
/// informational only and are never applied to the store.
pub fn import_csv<R: Read>(reader: R, store: &FleetStore) -> Result<CsvImport, FleetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut import = CsvImport::default();

    for result in rdr.records() {
        let record = result?;
        if record.len() < 4 {
            import.skipped_rows += 1;
            debug!("Skipping short CSV row: fields={}", record.len());
            continue;
        }

        let position_name = record.get(1).unwrap_or_default();
        let Some(position) = store.positions().iter().find(|p| p.name == position_name) else {
            import.skipped_rows += 1;
            warn!("CSV row references unknown position: name={}", position_name);
            continue;
        };

        if let Some(notes) = record.get(4) {
            import.notes.insert(position.id.clone(), notes.to_string());
        }
        import.matched_rows += 1;
    }

    Ok(import)
}
