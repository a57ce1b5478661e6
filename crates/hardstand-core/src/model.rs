// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Aggregate capacity of the base. Informational only, positions carry the real limits.
    pub capacity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionType {
    Hardpoint,
    Hangar,
    Apron,
    Runway,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub base_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type")]
    pub position_type: PositionType,
    /// Maximum number of aircraft parked here at the same time.
    pub capacity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AircraftType {
    Fighter,
    Bomber,
    Transport,
    Recon,
    Helicopter,
}

impl AircraftType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AircraftType::Fighter => "fighter",
            AircraftType::Bomber => "bomber",
            AircraftType::Transport => "transport",
            AircraftType::Recon => "recon",
            AircraftType::Helicopter => "helicopter",
        }
    }
}

impl fmt::Display for AircraftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AircraftSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AircraftStatus {
    Assigned,
    Unassigned,
    Maintenance,
    Deployed,
}

impl fmt::Display for AircraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AircraftStatus::Assigned => "assigned",
            AircraftStatus::Unassigned => "unassigned",
            AircraftStatus::Maintenance => "maintenance",
            AircraftStatus::Deployed => "deployed",
        };
        f.pad(s)
    }
}

/// Where an aircraft was last reported: parked or airborne.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AircraftLocation {
    Ground,
    Air,
}

impl FromStr for AircraftLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ground" => Ok(AircraftLocation::Ground),
            "air" => Ok(AircraftLocation::Air),
            other => Err(format!("unknown location '{}', expected ground or air", other)),
        }
    }
}

/// Audit identity stamped onto an aircraft when its status is changed by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdater {
    pub name: String,
    pub personal_number: String,
    pub phone: String,
}

impl StatusUpdater {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.username.clone(),
            personal_number: "N/A".to_string(),
            phone: "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aircraft {
    pub id: String,
    #[serde(rename = "type")]
    pub aircraft_type: AircraftType,
    pub callsign: String,
    pub size: AircraftSize,
    pub status: AircraftStatus,
    /// Position relation. At most one position at a time.
    #[serde(default)]
    pub assigned_position_id: Option<String>,
    /// Dome relation. Kept independently of `assigned_position_id`.
    #[serde(default)]
    pub assigned_dome_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<AircraftLocation>,
    #[serde(default)]
    pub location_uncertain: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertain_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertain_longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspicion_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status_update: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status_updated_by: Option<StatusUpdater>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Aircraft {
    /// Bare aircraft with no assignment, location or audit data.
    pub fn new(
        id: impl Into<String>,
        aircraft_type: AircraftType,
        callsign: impl Into<String>,
        size: AircraftSize,
        status: AircraftStatus,
    ) -> Self {
        Self {
            id: id.into(),
            aircraft_type,
            callsign: callsign.into(),
            size,
            status,
            assigned_position_id: None,
            assigned_dome_id: None,
            home_latitude: None,
            home_longitude: None,
            location: None,
            location_uncertain: false,
            uncertain_latitude: None,
            uncertain_longitude: None,
            suspicion_reason: None,
            last_status_update: None,
            last_status_updated_by: None,
            notes: None,
        }
    }

    pub fn with_home(mut self, latitude: f64, longitude: f64) -> Self {
        self.home_latitude = Some(latitude);
        self.home_longitude = Some(longitude);
        self
    }

    pub fn is_maintenance(&self) -> bool {
        self.status == AircraftStatus::Maintenance
    }

    /// Member of the auto-distribution eligibility pool.
    pub fn is_eligible(&self) -> bool {
        self.assigned_position_id.is_none() && !self.is_maintenance()
    }

    pub fn home(&self) -> Option<(f64, f64)> {
        match (self.home_latitude, self.home_longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Home coordinates, each missing half taken from `fallback`.
    pub fn home_or(&self, fallback: (f64, f64)) -> (f64, f64) {
        (
            self.home_latitude.unwrap_or(fallback.0),
            self.home_longitude.unwrap_or(fallback.1),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Squadron {
    pub id: String,
    pub base_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shelter {
    pub id: String,
    pub squadron_id: String,
    pub name: String,
    /// Only aircraft of this type may be parked in the shelter's domes.
    pub aircraft_type: AircraftType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dome {
    pub id: String,
    pub shelter_id: String,
    pub name: String,
    #[serde(default)]
    pub aircraft_id: Option<String>,
}

impl Dome {
    pub fn is_occupied(&self) -> bool {
        self.aircraft_id.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Viewer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: UserRole,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dashboard_aircraft_json() {
        let json = r#"{
            "id": "plane-001",
            "type": "fighter",
            "callsign": "TFA-001",
            "size": "small",
            "status": "unassigned",
            "assignedPositionId": null
        }"#;
        let aircraft: Aircraft = serde_json::from_str(json).unwrap();

        assert_eq!(aircraft.aircraft_type, AircraftType::Fighter);
        assert_eq!(aircraft.status, AircraftStatus::Unassigned);
        assert!(aircraft.assigned_dome_id.is_none());
        assert!(!aircraft.location_uncertain);
        assert!(aircraft.is_eligible());
    }

    #[test]
    fn test_maintenance_is_never_eligible() {
        let aircraft = Aircraft::new(
            "plane-013",
            AircraftType::Fighter,
            "TFA-005",
            AircraftSize::Small,
            AircraftStatus::Maintenance,
        );
        assert!(!aircraft.is_eligible());
    }

    #[test]
    fn test_home_requires_both_coordinates() {
        let mut aircraft = Aircraft::new(
            "a",
            AircraftType::Recon,
            "R-1",
            AircraftSize::Medium,
            AircraftStatus::Unassigned,
        );
        aircraft.home_latitude = Some(31.9);
        assert_eq!(aircraft.home(), None);
        assert_eq!(aircraft.home_or((30.0, 35.0)), (31.9, 35.0));

        let aircraft = aircraft.with_home(31.9, 34.7);
        assert_eq!(aircraft.home_or((30.0, 35.0)), (31.9, 34.7));
        assert_eq!(aircraft.home(), Some((31.9, 34.7)));
    }

    #[test]
    fn test_location_from_str() {
        assert_eq!("Air".parse::<AircraftLocation>(), Ok(AircraftLocation::Air));
        assert_eq!(
            " ground ".parse::<AircraftLocation>(),
            Ok(AircraftLocation::Ground)
        );
        assert!("water".parse::<AircraftLocation>().is_err());
    }
}
