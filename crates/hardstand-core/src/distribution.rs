// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

//! Batch placement of every eligible aircraft onto positions with spare room.
//!
//! Planning is a pure read of the store. The resulting [`DistributionPlan`] is
//! then published in a single swap of the aircraft collection, so callers never
//! observe a half-applied batch.

use crate::model::{Aircraft, AircraftStatus, Base, Position};
use crate::store::FleetStore;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Least-occupied position first.
    #[default]
    SpreadEvenly,
    /// Fullest position that still has room first.
    Cluster,
    /// Globally nearest aircraft/position pair first.
    MinimizeDistance,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::SpreadEvenly,
        Strategy::Cluster,
        Strategy::MinimizeDistance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::SpreadEvenly => "spread-evenly",
            Strategy::Cluster => "cluster",
            Strategy::MinimizeDistance => "minimize-distance",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown strategy '{}', expected one of: spread-evenly, cluster, minimize-distance",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmParams {
    /// Per-run cap on each position. 0 means "use the position's own capacity".
    #[serde(default)]
    pub max_per_position: u32,
}

impl AlgorithmParams {
    pub fn with_max_per_position(max_per_position: u32) -> Self {
        Self { max_per_position }
    }

    /// Cap applied to a position for this run. Never exceeds its real capacity.
    pub fn effective_cap(&self, capacity: u32) -> u32 {
        if self.max_per_position > 0 {
            self.max_per_position.min(capacity)
        } else {
            capacity
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub aircraft_id: String,
    pub position_id: String,
}

/// Outcome of one auto-distribution run, in placement order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DistributionPlan {
    pub strategy: Strategy,
    pub placements: Vec<Placement>,
    /// Eligible aircraft that found no room this run.
    pub unplaced: Vec<String>,
}

impl DistributionPlan {
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }

    pub fn position_for(&self, aircraft_id: &str) -> Option<&str> {
        self.placements
            .iter()
            .find(|p| p.aircraft_id == aircraft_id)
            .map(|p| p.position_id.as_str())
    }
}

/// Working occupancy entry for one position during a run.
#[derive(Debug, Clone)]
struct Slot<'a> {
    position: &'a Position,
    cap: u32,
    occupancy: u32,
}

impl Slot<'_> {
    fn has_room(&self) -> bool {
        self.occupancy < self.cap
    }
}

impl FleetStore {
    /// Computes where each eligible aircraft would go without changing anything.
    ///
    /// Working occupancy is seeded from the real occupancy, so aircraft that
    /// were placed before this run keep consuming their slots.
    pub fn plan_distribution(&self, strategy: Strategy, params: &AlgorithmParams) -> DistributionPlan {
        let pool = self.unassigned_aircraft();
        let seeded = self.occupancy_map();

        let mut slots: Vec<Slot> = self
            .positions
            .iter()
            .map(|position| Slot {
                position,
                cap: params.effective_cap(position.capacity),
                occupancy: seeded.get(&position.id).copied().unwrap_or(0),
            })
            .collect();

        let placements = match strategy {
            Strategy::SpreadEvenly => greedy_by_occupancy(&pool, &mut slots, false),
            Strategy::Cluster => greedy_by_occupancy(&pool, &mut slots, true),
            Strategy::MinimizeDistance => {
                let fallback = bases_centroid(&self.bases).unwrap_or((0.0, 0.0));
                nearest_pairs(&pool, &mut slots, fallback)
            }
        };

        let unplaced = pool
            .iter()
            .filter(|a| !placements.iter().any(|p| p.aircraft_id == a.id))
            .map(|a| a.id.clone())
            .collect();

        DistributionPlan {
            strategy,
            placements,
            unplaced,
        }
    }

    /// Plans a batch and publishes it in one update. Aircraft that already
    /// held a position are never moved; a shortfall just leaves the excess
    /// in the eligibility pool.
    pub fn run_auto_distribute(&mut self, strategy: Strategy, params: &AlgorithmParams) -> DistributionPlan {
        let plan = self.plan_distribution(strategy, params);
        self.apply_plan(&plan);

        info!(
            "Auto-distribution finished: strategy={} placed={} unplaced={}",
            strategy,
            plan.placements.len(),
            plan.unplaced.len()
        );
        plan
    }

    fn apply_plan(&mut self, plan: &DistributionPlan) {
        if plan.placements.is_empty() {
            return;
        }

        let targets: HashMap<&str, &str> = plan
            .placements
            .iter()
            .map(|p| (p.aircraft_id.as_str(), p.position_id.as_str()))
            .collect();

        let next = self
            .aircraft
            .iter()
            .map(|a| match targets.get(a.id.as_str()) {
                Some(position_id) => {
                    let mut a = a.clone();
                    a.assigned_position_id = Some((*position_id).to_string());
                    a.status = AircraftStatus::Assigned;
                    a
                }
                None => a.clone(),
            })
            .collect();

        self.publish_aircraft(next);
    }
}

/// Shared greedy scan for spread-evenly (ascending) and cluster (descending).
/// Sorting is stable, so equal occupancies keep whatever order they had.
fn greedy_by_occupancy(pool: &[&Aircraft], slots: &mut [Slot], descending: bool) -> Vec<Placement> {
    sort_slots(slots, descending);
    let mut placements = Vec::with_capacity(pool.len());

    for aircraft in pool {
        let Some(slot) = slots.iter_mut().find(|s| s.has_room()) else {
            // Nothing has room; later aircraft cannot fare better.
            break;
        };

        slot.occupancy += 1;
        debug!(
            "Placed aircraft: aircraft={} position={} occupancy={}/{}",
            aircraft.id, slot.position.id, slot.occupancy, slot.cap
        );
        placements.push(Placement {
            aircraft_id: aircraft.id.clone(),
            position_id: slot.position.id.clone(),
        });
        sort_slots(slots, descending);
    }

    placements
}

fn sort_slots(slots: &mut [Slot], descending: bool) {
    if descending {
        slots.sort_by_key(|s| Reverse(s.occupancy));
    } else {
        slots.sort_by_key(|s| s.occupancy);
    }
}

/// Repeatedly commits the single closest (aircraft, position-with-room) pair.
/// Ties go to the first pair found in pool order, then position order.
/// NaN distances sort after every real one.
fn nearest_pairs(pool: &[&Aircraft], slots: &mut [Slot], fallback_home: (f64, f64)) -> Vec<Placement> {
    let mut remaining: Vec<(&Aircraft, (f64, f64))> = pool
        .iter()
        .map(|a| (*a, a.home_or(fallback_home)))
        .collect();
    let mut placements = Vec::with_capacity(pool.len());

    while !remaining.is_empty() {
        let mut best: Option<(usize, usize, f64)> = None;

        for (ai, (_, home)) in remaining.iter().enumerate() {
            for (si, slot) in slots.iter().enumerate() {
                if !slot.has_room() {
                    continue;
                }
                let distance = planar_distance(
                    *home,
                    (slot.position.latitude, slot.position.longitude),
                );
                if best.map_or(true, |(_, _, d)| distance.total_cmp(&d).is_lt()) {
                    best = Some((ai, si, distance));
                }
            }
        }

        let Some((ai, si, distance)) = best else {
            break;
        };

        let (aircraft, _) = remaining.remove(ai);
        let slot = &mut slots[si];
        slot.occupancy += 1;
        debug!(
            "Placed aircraft: aircraft={} position={} distance={:.5}",
            aircraft.id, slot.position.id, distance
        );
        placements.push(Placement {
            aircraft_id: aircraft.id.clone(),
            position_id: slot.position.id.clone(),
        });
    }

    placements
}

/// Mean latitude/longitude of all bases, or `None` when there are none.
pub fn bases_centroid(bases: &[Base]) -> Option<(f64, f64)> {
    if bases.is_empty() {
        return None;
    }
    let n = bases.len() as f64;
    let lat = bases.iter().map(|b| b.latitude).sum::<f64>() / n;
    let lon = bases.iter().map(|b| b.longitude).sum::<f64>() / n;
    Some((lat, lon))
}

/// Euclidean distance in raw degrees. Positions sit within a few km of each
/// other, so no geodesic correction is applied.
pub fn planar_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}
