// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

use crate::model::{Aircraft, AircraftStatus};
use crate::store::FleetStore;
use serde::Serialize;
use std::collections::HashMap;

/// Fleet-wide counters shown in the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FleetSummary {
    pub positions: usize,
    pub total_capacity: u32,
    pub assigned: usize,
    pub eligible: usize,
    pub maintenance: usize,
}

impl FleetStore {
    /// Number of aircraft whose position relation points at `position_id`.
    /// Unknown positions simply have no occupants.
    pub fn position_occupancy(&self, position_id: &str) -> u32 {
        self.aircraft
            .iter()
            .filter(|a| a.assigned_position_id.as_deref() == Some(position_id))
            .count() as u32
    }

    /// Spare slots left on a position, clamped at zero so a stale or
    /// inconsistent state never reads as negative room.
    pub fn available_capacity(&self, position_id: &str) -> u32 {
        match self.position(position_id) {
            Some(position) => position
                .capacity
                .saturating_sub(self.position_occupancy(position_id)),
            None => 0,
        }
    }

    pub fn assigned_aircraft(&self, position_id: &str) -> Vec<&Aircraft> {
        self.aircraft
            .iter()
            .filter(|a| a.assigned_position_id.as_deref() == Some(position_id))
            .collect()
    }

    /// The eligibility pool: no position and not in maintenance, in store order.
    pub fn unassigned_aircraft(&self) -> Vec<&Aircraft> {
        self.aircraft.iter().filter(|a| a.is_eligible()).collect()
    }

    /// Current occupancy of every known position in one pass over the fleet.
    pub fn occupancy_map(&self) -> HashMap<String, u32> {
        let mut map: HashMap<String, u32> = self
            .positions
            .iter()
            .map(|p| (p.id.clone(), 0))
            .collect();

        for a in &self.aircraft {
            if let Some(pos) = &a.assigned_position_id {
                if let Some(count) = map.get_mut(pos) {
                    *count += 1;
                }
            }
        }

        map
    }

    pub fn fleet_summary(&self) -> FleetSummary {
        FleetSummary {
            positions: self.positions.len(),
            total_capacity: self.positions.iter().map(|p| p.capacity).sum(),
            assigned: self
                .aircraft
                .iter()
                .filter(|a| a.assigned_position_id.is_some())
                .count(),
            eligible: self.aircraft.iter().filter(|a| a.is_eligible()).count(),
            maintenance: self
                .aircraft
                .iter()
                .filter(|a| a.status == AircraftStatus::Maintenance)
                .count(),
        }
    }
}
