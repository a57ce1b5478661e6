// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

use crate::model::{Aircraft, Base, Dome, Position, Shelter, Squadron, User};
use crate::FleetError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Serializable form of every collection the store holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub bases: Vec<Base>,
    pub positions: Vec<Position>,
    pub aircraft: Vec<Aircraft>,
    #[serde(default)]
    pub squadrons: Vec<Squadron>,
    #[serde(default)]
    pub shelters: Vec<Shelter>,
    #[serde(default)]
    pub domes: Vec<Dome>,
}

impl FleetSnapshot {
    /// Checks the structural invariants a loaded snapshot must satisfy:
    /// unique ids, resolvable parent references and no over-full position.
    pub fn validate(&self) -> Result<(), FleetError> {
        fn unique<'a>(
            kind: &str,
            ids: impl Iterator<Item = &'a String>,
        ) -> Result<HashSet<&'a str>, FleetError> {
            let mut seen = HashSet::new();
            for id in ids {
                if !seen.insert(id.as_str()) {
                    return Err(FleetError::InvalidSnapshot(format!(
                        "duplicate {} id '{}'",
                        kind, id
                    )));
                }
            }
            Ok(seen)
        }

        let base_ids = unique("base", self.bases.iter().map(|b| &b.id))?;
        let position_ids = unique("position", self.positions.iter().map(|p| &p.id))?;
        unique("aircraft", self.aircraft.iter().map(|a| &a.id))?;
        let squadron_ids = unique("squadron", self.squadrons.iter().map(|s| &s.id))?;
        let shelter_ids = unique("shelter", self.shelters.iter().map(|s| &s.id))?;
        unique("dome", self.domes.iter().map(|d| &d.id))?;

        if let Some(p) = self
            .positions
            .iter()
            .find(|p| !base_ids.contains(p.base_id.as_str()))
        {
            return Err(FleetError::InvalidSnapshot(format!(
                "position '{}' references unknown base '{}'",
                p.id, p.base_id
            )));
        }
        if let Some(s) = self
            .squadrons
            .iter()
            .find(|s| !base_ids.contains(s.base_id.as_str()))
        {
            return Err(FleetError::InvalidSnapshot(format!(
                "squadron '{}' references unknown base '{}'",
                s.id, s.base_id
            )));
        }
        if let Some(s) = self
            .shelters
            .iter()
            .find(|s| !squadron_ids.contains(s.squadron_id.as_str()))
        {
            return Err(FleetError::InvalidSnapshot(format!(
                "shelter '{}' references unknown squadron '{}'",
                s.id, s.squadron_id
            )));
        }
        if let Some(d) = self
            .domes
            .iter()
            .find(|d| !shelter_ids.contains(d.shelter_id.as_str()))
        {
            return Err(FleetError::InvalidSnapshot(format!(
                "dome '{}' references unknown shelter '{}'",
                d.id, d.shelter_id
            )));
        }

        for a in &self.aircraft {
            if let Some(pos) = &a.assigned_position_id {
                if !position_ids.contains(pos.as_str()) {
                    return Err(FleetError::InvalidSnapshot(format!(
                        "aircraft '{}' assigned to unknown position '{}'",
                        a.id, pos
                    )));
                }
            }
        }

        for p in &self.positions {
            let occupancy = self
                .aircraft
                .iter()
                .filter(|a| a.assigned_position_id.as_deref() == Some(p.id.as_str()))
                .count();
            if occupancy > p.capacity as usize {
                return Err(FleetError::InvalidSnapshot(format!(
                    "position '{}' holds {} aircraft but capacity is {}",
                    p.id, occupancy, p.capacity
                )));
            }
        }

        Ok(())
    }
}

/// In-memory state container for one session.
///
/// Entities are loaded once; afterwards only assignment, status and location
/// fields change. All mutation goes through `&mut self`, so a host that shares
/// the store between threads has to put it behind a `Mutex`.
#[derive(Debug, Clone, Default)]
pub struct FleetStore {
    pub(crate) bases: Vec<Base>,
    pub(crate) positions: Vec<Position>,
    pub(crate) aircraft: Vec<Aircraft>,
    pub(crate) squadrons: Vec<Squadron>,
    pub(crate) shelters: Vec<Shelter>,
    pub(crate) domes: Vec<Dome>,
    acting_user: Option<User>,
}

impl FleetStore {
    pub fn new(snapshot: FleetSnapshot) -> Self {
        let FleetSnapshot {
            bases,
            positions,
            aircraft,
            squadrons,
            shelters,
            domes,
        } = snapshot;

        Self {
            bases,
            positions,
            aircraft,
            squadrons,
            shelters,
            domes,
            acting_user: None,
        }
    }

    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot {
            bases: self.bases.clone(),
            positions: self.positions.clone(),
            aircraft: self.aircraft.clone(),
            squadrons: self.squadrons.clone(),
            shelters: self.shelters.clone(),
            domes: self.domes.clone(),
        }
    }

    pub fn bases(&self) -> &[Base] {
        &self.bases
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn aircraft(&self) -> &[Aircraft] {
        &self.aircraft
    }

    pub fn squadrons(&self) -> &[Squadron] {
        &self.squadrons
    }

    pub fn shelters(&self) -> &[Shelter] {
        &self.shelters
    }

    pub fn domes(&self) -> &[Dome] {
        &self.domes
    }

    pub fn base(&self, id: &str) -> Option<&Base> {
        self.bases.iter().find(|b| b.id == id)
    }

    pub fn position(&self, id: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.id == id)
    }

    pub fn aircraft_by_id(&self, id: &str) -> Option<&Aircraft> {
        self.aircraft.iter().find(|a| a.id == id)
    }

    /// Callsigns are not guaranteed unique; the first match wins.
    pub fn aircraft_by_callsign(&self, callsign: &str) -> Option<&Aircraft> {
        self.aircraft
            .iter()
            .find(|a| a.callsign.eq_ignore_ascii_case(callsign))
    }

    pub fn positions_for_base(&self, base_id: &str) -> Vec<&Position> {
        self.positions
            .iter()
            .filter(|p| p.base_id == base_id)
            .collect()
    }

    pub fn acting_user(&self) -> Option<&User> {
        self.acting_user.as_ref()
    }

    pub fn set_acting_user(&mut self, user: Option<User>) {
        self.acting_user = user;
    }

    pub(crate) fn aircraft_mut(&mut self, id: &str) -> Option<&mut Aircraft> {
        self.aircraft.iter_mut().find(|a| a.id == id)
    }

    /// Swaps in a fully built aircraft collection. Batch operations assemble
    /// their result off to the side and publish it through here in one step.
    pub(crate) fn publish_aircraft(&mut self, next: Vec<Aircraft>) {
        debug_assert_eq!(next.len(), self.aircraft.len());
        self.aircraft = next;
    }
}

impl From<FleetSnapshot> for FleetStore {
    fn from(snapshot: FleetSnapshot) -> Self {
        Self::new(snapshot)
    }
}
