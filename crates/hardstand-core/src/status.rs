// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

use crate::model::{Aircraft, AircraftLocation, StatusUpdater};
use crate::store::FleetStore;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Aircraft list filters offered next to the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AircraftFilter {
    #[default]
    All,
    Suspicious,
    Air,
    Ground,
}

impl AircraftFilter {
    pub fn matches(&self, aircraft: &Aircraft) -> bool {
        match self {
            AircraftFilter::All => true,
            AircraftFilter::Suspicious => aircraft.location_uncertain,
            // Anything not sitting in a dome counts as airborne.
            AircraftFilter::Air => {
                !aircraft.location_uncertain
                    && (aircraft.location == Some(AircraftLocation::Air)
                        || aircraft.assigned_dome_id.is_none())
            }
            AircraftFilter::Ground => {
                !aircraft.location_uncertain
                    && aircraft.location == Some(AircraftLocation::Ground)
                    && aircraft.assigned_dome_id.is_some()
            }
        }
    }
}

impl FromStr for AircraftFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(AircraftFilter::All),
            "suspicious" => Ok(AircraftFilter::Suspicious),
            "air" => Ok(AircraftFilter::Air),
            "ground" => Ok(AircraftFilter::Ground),
            other => Err(format!(
                "unknown filter '{}', expected all, suspicious, air or ground",
                other
            )),
        }
    }
}

impl FleetStore {
    pub fn update_aircraft_location(
        &mut self,
        aircraft_id: &str,
        lat: f64,
        lon: f64,
        location: AircraftLocation,
    ) {
        self.update_aircraft_location_at(aircraft_id, lat, lon, location, Utc::now());
    }

    /// Records a confirmed fix. The reported coordinates become the aircraft's
    /// home and any earlier suspicion is cleared. Non-finite fixes are dropped.
    pub fn update_aircraft_location_at(
        &mut self,
        aircraft_id: &str,
        lat: f64,
        lon: f64,
        location: AircraftLocation,
        at: DateTime<Utc>,
    ) {
        if !lat.is_finite() || !lon.is_finite() {
            warn!(
                "Location update ignored: non-finite fix: aircraft={} lat={} lon={}",
                aircraft_id, lat, lon
            );
            return;
        }

        let Some(aircraft) = self.aircraft_mut(aircraft_id) else {
            debug!("Location update ignored: unknown aircraft={}", aircraft_id);
            return;
        };

        aircraft.location = Some(location);
        aircraft.location_uncertain = false;
        aircraft.uncertain_latitude = None;
        aircraft.uncertain_longitude = None;
        aircraft.home_latitude = Some(lat);
        aircraft.home_longitude = Some(lon);
        aircraft.last_status_update = Some(at);

        debug!(
            "Location updated: aircraft={} lat={} lon={} location={:?}",
            aircraft_id, lat, lon, location
        );
    }

    pub fn mark_aircraft_as_suspicious(&mut self, aircraft_id: &str, reason: &str) {
        self.mark_aircraft_as_suspicious_at(aircraft_id, reason, Utc::now());
    }

    /// Flags the aircraft's location as unknown. Position and dome
    /// assignments stay as they are.
    pub fn mark_aircraft_as_suspicious_at(
        &mut self,
        aircraft_id: &str,
        reason: &str,
        at: DateTime<Utc>,
    ) {
        let updater = self.acting_user().map(StatusUpdater::from_user);

        let Some(aircraft) = self.aircraft_mut(aircraft_id) else {
            debug!("Suspicion ignored: unknown aircraft={}", aircraft_id);
            return;
        };

        aircraft.location_uncertain = true;
        aircraft.suspicion_reason = Some(reason.to_string());
        aircraft.last_status_update = Some(at);
        aircraft.last_status_updated_by = updater;

        info!(
            "Aircraft marked suspicious: aircraft={} reason={:?}",
            aircraft_id, reason
        );
    }

    pub fn filter_aircraft(&self, filter: AircraftFilter) -> Vec<&Aircraft> {
        self.aircraft.iter().filter(|a| filter.matches(a)).collect()
    }
}
