// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

//! Base → squadron → shelter → dome hierarchy.
//!
//! Domes hold at most one aircraft through `Dome::aircraft_id`, mirrored on
//! `Aircraft::assigned_dome_id`. This relation lives next to the position
//! relation and is never derived from it. Disagreements between the two are
//! surfaced by [`FleetStore::assignment_discrepancies`] and left to the caller.

use crate::model::{AircraftType, Dome, Shelter, Squadron};
use crate::store::FleetStore;
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DomeCounts {
    pub total: usize,
    pub occupied: usize,
    pub empty: usize,
}

impl DomeCounts {
    fn add(&mut self, occupied: bool) {
        self.total += 1;
        if occupied {
            self.occupied += 1;
        } else {
            self.empty += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseDomeSummary {
    pub base_id: String,
    pub base_name: String,
    pub domes: DomeCounts,
    pub by_aircraft_type: BTreeMap<AircraftType, DomeCounts>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AssignmentDiscrepancy {
    /// Parked on a position but not in any dome.
    PositionWithoutDome { aircraft_id: String },
    /// In a dome but not on any position.
    DomeWithoutPosition { aircraft_id: String },
    /// Aircraft points at a dome that does not exist.
    UnknownDome { aircraft_id: String, dome_id: String },
    /// Aircraft and dome point at different things.
    MismatchedDomeLink {
        aircraft_id: String,
        dome_id: String,
        dome_holds: Option<String>,
    },
    /// Dome holds an aircraft that does not exist.
    UnknownAircraftInDome { dome_id: String, aircraft_id: String },
}

impl FleetStore {
    pub fn dome(&self, id: &str) -> Option<&Dome> {
        self.domes.iter().find(|d| d.id == id)
    }

    pub fn shelter(&self, id: &str) -> Option<&Shelter> {
        self.shelters.iter().find(|s| s.id == id)
    }

    pub fn squadron(&self, id: &str) -> Option<&Squadron> {
        self.squadrons.iter().find(|s| s.id == id)
    }

    pub fn squadrons_for_base(&self, base_id: &str) -> Vec<&Squadron> {
        self.squadrons.iter().filter(|s| s.base_id == base_id).collect()
    }

    pub fn shelters_for_squadron(&self, squadron_id: &str) -> Vec<&Shelter> {
        self.shelters
            .iter()
            .filter(|s| s.squadron_id == squadron_id)
            .collect()
    }

    pub fn domes_for_shelter(&self, shelter_id: &str) -> Vec<&Dome> {
        self.domes.iter().filter(|d| d.shelter_id == shelter_id).collect()
    }

    /// `false` for unknown domes.
    pub fn dome_occupied(&self, dome_id: &str) -> bool {
        self.dome(dome_id).is_some_and(|d| d.is_occupied())
    }

    /// Puts an aircraft into an empty dome of a shelter built for its type.
    /// The aircraft leaves its previous dome; its position is not touched.
    pub fn assign_dome(&mut self, aircraft_id: &str, dome_id: &str) -> bool {
        let Some(dome) = self.dome(dome_id) else {
            warn!("Dome assignment rejected: unknown dome={}", dome_id);
            return false;
        };
        let Some(aircraft) = self.aircraft_by_id(aircraft_id) else {
            warn!("Dome assignment rejected: unknown aircraft={}", aircraft_id);
            return false;
        };

        match dome.aircraft_id.as_deref() {
            Some(holder) if holder == aircraft_id => return true,
            Some(holder) => {
                warn!(
                    "Dome assignment rejected: dome occupied: dome={} holder={}",
                    dome_id, holder
                );
                return false;
            }
            None => {}
        }

        let shelter_type = self.shelter(&dome.shelter_id).map(|s| s.aircraft_type);
        if shelter_type != Some(aircraft.aircraft_type) {
            warn!(
                "Dome assignment rejected: shelter type mismatch: aircraft={} type={} dome={}",
                aircraft_id, aircraft.aircraft_type, dome_id
            );
            return false;
        }

        let previous = aircraft.assigned_dome_id.clone();
        if let Some(previous) = previous.as_deref() {
            if let Some(old) = self.domes.iter_mut().find(|d| d.id == previous) {
                if old.aircraft_id.as_deref() == Some(aircraft_id) {
                    old.aircraft_id = None;
                }
            }
        }

        if let Some(dome) = self.domes.iter_mut().find(|d| d.id == dome_id) {
            dome.aircraft_id = Some(aircraft_id.to_string());
        }
        if let Some(aircraft) = self.aircraft_mut(aircraft_id) {
            aircraft.assigned_dome_id = Some(dome_id.to_string());
        }

        debug!(
            "Aircraft moved into dome: aircraft={} dome={} previous={:?}",
            aircraft_id, dome_id, previous
        );
        true
    }

    /// Empties the aircraft's dome. Unknown ids are ignored.
    pub fn unassign_dome(&mut self, aircraft_id: &str) {
        let Some(dome_id) = self
            .aircraft_mut(aircraft_id)
            .and_then(|a| a.assigned_dome_id.take())
        else {
            return;
        };

        if let Some(dome) = self.domes.iter_mut().find(|d| d.id == dome_id) {
            if dome.aircraft_id.as_deref() == Some(aircraft_id) {
                dome.aircraft_id = None;
            }
        }
        debug!("Aircraft left dome: aircraft={} dome={}", aircraft_id, dome_id);
    }

    /// "Base - Squadron - Shelter" for an aircraft sitting in a dome.
    pub fn dome_location_label(&self, aircraft_id: &str) -> Option<String> {
        let dome_id = self.aircraft_by_id(aircraft_id)?.assigned_dome_id.as_deref()?;
        let shelter = self.shelter(&self.dome(dome_id)?.shelter_id)?;
        let squadron = self.squadron(&shelter.squadron_id)?;
        let base = self.base(&squadron.base_id)?;
        Some(format!("{} - {} - {}", base.name, squadron.name, shelter.name))
    }

    /// Dome statistics per base, in base order.
    pub fn base_dome_summary(&self) -> Vec<BaseDomeSummary> {
        self.bases
            .iter()
            .map(|base| {
                let mut summary = BaseDomeSummary {
                    base_id: base.id.clone(),
                    base_name: base.name.clone(),
                    domes: DomeCounts::default(),
                    by_aircraft_type: BTreeMap::new(),
                };

                for squadron in self.squadrons_for_base(&base.id) {
                    for shelter in self.shelters_for_squadron(&squadron.id) {
                        let per_type = summary
                            .by_aircraft_type
                            .entry(shelter.aircraft_type)
                            .or_default();
                        for dome in self.domes_for_shelter(&shelter.id) {
                            summary.domes.add(dome.is_occupied());
                            per_type.add(dome.is_occupied());
                        }
                    }
                }

                summary
            })
            .collect()
    }

    /// Lists every place where the dome relation is inconsistent with itself
    /// or disagrees with the position relation. Read-only.
    pub fn assignment_discrepancies(&self) -> Vec<AssignmentDiscrepancy> {
        let mut found = Vec::new();

        for a in &self.aircraft {
            match (&a.assigned_position_id, &a.assigned_dome_id) {
                (Some(_), None) => found.push(AssignmentDiscrepancy::PositionWithoutDome {
                    aircraft_id: a.id.clone(),
                }),
                (None, Some(_)) => found.push(AssignmentDiscrepancy::DomeWithoutPosition {
                    aircraft_id: a.id.clone(),
                }),
                _ => {}
            }

            if let Some(dome_id) = &a.assigned_dome_id {
                match self.dome(dome_id) {
                    None => found.push(AssignmentDiscrepancy::UnknownDome {
                        aircraft_id: a.id.clone(),
                        dome_id: dome_id.clone(),
                    }),
                    Some(dome) if dome.aircraft_id.as_deref() != Some(a.id.as_str()) => {
                        found.push(AssignmentDiscrepancy::MismatchedDomeLink {
                            aircraft_id: a.id.clone(),
                            dome_id: dome_id.clone(),
                            dome_holds: dome.aircraft_id.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        for dome in &self.domes {
            if let Some(aircraft_id) = &dome.aircraft_id {
                if self.aircraft_by_id(aircraft_id).is_none() {
                    found.push(AssignmentDiscrepancy::UnknownAircraftInDome {
                        dome_id: dome.id.clone(),
                        aircraft_id: aircraft_id.clone(),
                    });
                }
            }
        }

        found
    }

    /// Makes `Aircraft::assigned_dome_id` agree with the domes, treating
    /// `Dome::aircraft_id` as authoritative. Only the dome relation is touched.
    /// Returns the number of fields changed.
    pub fn reconcile_dome_links(&mut self) -> usize {
        let mut repairs = 0;

        // Dome entries naming missing aircraft are dropped.
        let known: HashSet<String> = self.aircraft.iter().map(|a| a.id.clone()).collect();
        for dome in &mut self.domes {
            if let Some(holder) = &dome.aircraft_id {
                if !known.contains(holder) {
                    dome.aircraft_id = None;
                    repairs += 1;
                }
            }
        }

        // First dome claiming an aircraft wins; later duplicates are emptied.
        let mut holder_of: HashMap<String, String> = HashMap::new();
        for dome in &mut self.domes {
            if let Some(holder) = dome.aircraft_id.clone() {
                if holder_of.contains_key(&holder) {
                    dome.aircraft_id = None;
                    repairs += 1;
                } else {
                    holder_of.insert(holder, dome.id.clone());
                }
            }
        }

        let next = self
            .aircraft
            .iter()
            .map(|a| {
                let expected = holder_of.get(&a.id).cloned();
                let mut a = a.clone();
                if a.assigned_dome_id != expected {
                    a.assigned_dome_id = expected;
                    repairs += 1;
                }
                a
            })
            .collect();
        self.publish_aircraft(next);

        if repairs > 0 {
            info!("Reconciled dome links: repairs={}", repairs);
        }
        repairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_snapshot;

    #[test]
    fn test_sample_dome_summary() {
        let store = FleetStore::new(sample_snapshot());
        let summary = store.base_dome_summary();

        assert_eq!(summary.len(), store.bases().len());
        let palmachim = &summary[0];
        assert_eq!(palmachim.domes.total, 5);
        assert_eq!(palmachim.domes.occupied, 1);
        assert_eq!(palmachim.domes.empty, 4);
        assert_eq!(
            palmachim.by_aircraft_type[&AircraftType::Fighter],
            DomeCounts {
                total: 3,
                occupied: 1,
                empty: 2
            }
        );
        // Bases without squadrons report zeros.
        assert_eq!(summary[2].domes, DomeCounts::default());
    }

    #[test]
    fn test_assign_dome_checks_type_and_occupancy() {
        let mut store = FleetStore::new(sample_snapshot());

        // Bomber into a fighter shelter.
        assert!(!store.assign_dome("plane-005", "dome-101-a-2"));
        // Occupied by plane-001.
        assert!(!store.assign_dome("plane-002", "dome-101-a-1"));
        assert!(!store.assign_dome("plane-002", "dome-missing"));
        assert!(!store.assign_dome("ghost", "dome-101-a-2"));

        assert!(store.assign_dome("plane-002", "dome-101-a-2"));
        assert!(store.dome_occupied("dome-101-a-2"));
        assert_eq!(
            store.aircraft_by_id("plane-002").unwrap().assigned_dome_id.as_deref(),
            Some("dome-101-a-2")
        );
    }

    #[test]
    fn test_assign_dome_releases_previous_dome() {
        let mut store = FleetStore::new(sample_snapshot());
        assert!(store.assign_dome("plane-001", "dome-101-a-3"));

        assert!(!store.dome_occupied("dome-101-a-1"));
        assert!(store.dome_occupied("dome-101-a-3"));
        assert!(store.aircraft_by_id("plane-001").unwrap().assigned_position_id.is_none());
    }

    #[test]
    fn test_unassign_dome() {
        let mut store = FleetStore::new(sample_snapshot());
        store.unassign_dome("plane-001");
        store.unassign_dome("ghost");

        assert!(!store.dome_occupied("dome-101-a-1"));
        assert!(store.aircraft_by_id("plane-001").unwrap().assigned_dome_id.is_none());
    }

    #[test]
    fn test_location_label() {
        let store = FleetStore::new(sample_snapshot());
        let label = store.dome_location_label("plane-001").unwrap();
        assert!(label.ends_with(" - Squadron 101 - Shelter A"));
        assert_eq!(store.dome_location_label("plane-002"), None);
    }

    #[test]
    fn test_discrepancies_do_not_cross_universes() {
        let mut store = FleetStore::new(sample_snapshot());
        assert!(store.assign_aircraft("plane-002", "pos-p1"));

        let found = store.assignment_discrepancies();
        assert!(found.contains(&AssignmentDiscrepancy::DomeWithoutPosition {
            aircraft_id: "plane-001".to_string()
        }));
        assert!(found.contains(&AssignmentDiscrepancy::PositionWithoutDome {
            aircraft_id: "plane-002".to_string()
        }));

        // Reconciling dome links never touches positions.
        let repairs = store.reconcile_dome_links();
        assert_eq!(repairs, 0);
        assert_eq!(
            store.aircraft_by_id("plane-002").unwrap().assigned_position_id.as_deref(),
            Some("pos-p1")
        );
        assert!(store.aircraft_by_id("plane-002").unwrap().assigned_dome_id.is_none());
    }

    #[test]
    fn test_reconcile_repairs_broken_links() {
        let mut snap = sample_snapshot();
        // Aircraft claims a dome that does not hold it.
        snap.aircraft[2].assigned_dome_id = Some("dome-101-a-2".to_string());
        // Dome holds an aircraft that is gone.
        snap.domes[3].aircraft_id = Some("plane-404".to_string());
        let mut store = FleetStore::new(snap);

        let before = store.assignment_discrepancies();
        assert!(before.iter().any(|d| matches!(
            d,
            AssignmentDiscrepancy::MismatchedDomeLink { aircraft_id, .. } if aircraft_id == "plane-003"
        )));
        assert!(before.iter().any(|d| matches!(
            d,
            AssignmentDiscrepancy::UnknownAircraftInDome { aircraft_id, .. } if aircraft_id == "plane-404"
        )));

        assert_eq!(store.reconcile_dome_links(), 2);
        assert!(store.aircraft_by_id("plane-003").unwrap().assigned_dome_id.is_none());
        assert!(store.domes()[3].aircraft_id.is_none());
        assert_eq!(store.reconcile_dome_links(), 0);
    }
}
