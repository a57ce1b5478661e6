// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

pub mod assignment;
pub mod distribution;
pub mod fixtures;
pub mod model;
pub mod occupancy;
pub mod settings;
pub mod shelters;
pub mod status;
pub mod store;
pub mod table;

pub use distribution::{AlgorithmParams, DistributionPlan, Placement, Strategy};
pub use model::{
    Aircraft, AircraftLocation, AircraftSize, AircraftStatus, AircraftType, Base, Dome, Position,
    PositionType, Shelter, Squadron, StatusUpdater, User, UserRole,
};
pub use store::{FleetSnapshot, FleetStore};

use std::path::PathBuf;
use thiserror::Error;

/// Environment override for the settings directory. Tests point this at a temp dir.
pub const CONFIG_DIR_ENV: &str = "HARDSTAND_CONFIG_DIR";

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Directory holding `settings.json`.
///
/// `HARDSTAND_CONFIG_DIR` wins when set, otherwise the platform config dir is used.
pub fn get_config_root() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    directories::ProjectDirs::from("org", "hardstand", "Hardstand")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".hardstand"))
}
