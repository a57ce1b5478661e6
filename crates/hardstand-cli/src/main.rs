// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hardstand_core::fixtures::{load_snapshot, sample_snapshot, save_snapshot};
use hardstand_core::settings::{Settings, SettingsManager};
use hardstand_core::status::AircraftFilter;
use hardstand_core::table::{assignment_table, export_csv, import_csv};
use hardstand_core::{AircraftLocation, AlgorithmParams, FleetStore, Strategy, User, UserRole};
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::collections::HashMap;
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Fleet snapshot (JSON). Uses the built-in sample fleet when omitted.
    #[arg(short, long, env = "HARDSTAND_DATA")]
    data: Option<PathBuf>,

    /// Write the changed snapshot back to --data
    #[arg(long)]
    save: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show occupancy per position
    Status,
    /// Park an aircraft (id or callsign) on a position
    Assign { aircraft: String, position: String },
    /// Release an aircraft from its position
    Unassign { aircraft: String },
    /// Auto-distribute every unassigned aircraft
    Distribute {
        #[arg(short, long)]
        strategy: Option<Strategy>,
        /// Per-position cap for this run, 0 = use capacity
        #[arg(short, long)]
        max_per_position: Option<u32>,
        /// Print the plan without applying it
        #[arg(long)]
        dry_run: bool,
    },
    /// Release every aircraft from its position
    Clear,
    /// Record a confirmed location fix
    Locate {
        aircraft: String,
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        location: AircraftLocation,
    },
    /// Flag an aircraft's location as unknown
    Suspect { aircraft: String, reason: String },
    /// List aircraft
    List {
        #[arg(short, long, default_value = "all")]
        filter: AircraftFilter,
    },
    /// Dome occupancy per base
    Domes,
    /// Export the assignment table
    ExportCsv { path: PathBuf },
    /// Read notes back from an edited assignment table
    ImportCsv { path: PathBuf },
    /// Write the sample fleet to a snapshot file
    Init { path: PathBuf },
    /// Show or change saved settings
    Config {
        #[arg(short, long)]
        strategy: Option<Strategy>,
        #[arg(short, long)]
        max_per_position: Option<u32>,
        /// Username stamped on status changes
        #[arg(short, long)]
        user: Option<String>,
        #[arg(long, requires = "user")]
        admin: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialise logging")?;

    let settings_manager = SettingsManager::new();
    let settings = settings_manager.load()?;

    match &cli.command {
        Commands::Init { path } => {
            save_snapshot(path, &sample_snapshot())
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!("Sample fleet written to {:?}", path);
            Ok(())
        }
        Commands::Config {
            strategy,
            max_per_position,
            user,
            admin,
        } => update_settings(
            &settings_manager,
            settings,
            *strategy,
            *max_per_position,
            user.as_deref(),
            *admin,
        ),
        Commands::Status => with_fleet(&cli, &settings, |store| {
            print_status(store);
            Ok(false)
        }),
        Commands::Assign { aircraft, position } => with_fleet(&cli, &settings, |store| {
            let aircraft_id = resolve_aircraft(store, aircraft)?;
            if store.position(position).is_none() {
                bail!("Unknown position '{}'", position);
            }
            if store.assign_aircraft(&aircraft_id, position) {
                println!("Assigned {} to {}", aircraft_id, position);
                Ok(true)
            } else {
                println!(
                    "Could not assign {} to {} (full or in maintenance)",
                    aircraft_id, position
                );
                Ok(false)
            }
        }),
        Commands::Unassign { aircraft } => with_fleet(&cli, &settings, |store| {
            let aircraft_id = resolve_aircraft(store, aircraft)?;
            store.unassign_aircraft(&aircraft_id);
            println!("Unassigned {}", aircraft_id);
            Ok(true)
        }),
        Commands::Distribute {
            strategy,
            max_per_position,
            dry_run,
        } => with_fleet(&cli, &settings, |store| {
            let strategy = strategy.unwrap_or(settings.strategy);
            let params = match max_per_position {
                Some(max) => AlgorithmParams::with_max_per_position(*max),
                None => settings.algorithm,
            };

            let plan = if *dry_run {
                store.plan_distribution(strategy, &params)
            } else {
                store.run_auto_distribute(strategy, &params)
            };

            for placement in &plan.placements {
                println!("{} -> {}", placement.aircraft_id, placement.position_id);
            }
            if !plan.unplaced.is_empty() {
                println!("Left unassigned: {}", plan.unplaced.join(", "));
            }
            println!(
                "{} placed with {}{}",
                plan.placements.len(),
                plan.strategy,
                if *dry_run { " (dry run)" } else { "" }
            );
            Ok(!*dry_run && !plan.placements.is_empty())
        }),
        Commands::Clear => with_fleet(&cli, &settings, |store| {
            store.clear_all_assignments();
            println!("All position assignments cleared");
            Ok(true)
        }),
        Commands::Locate {
            aircraft,
            lat,
            lon,
            location,
        } => with_fleet(&cli, &settings, |store| {
            if !lat.is_finite() || !lon.is_finite() {
                bail!("Coordinates must be finite numbers");
            }
            let aircraft_id = resolve_aircraft(store, aircraft)?;
            store.update_aircraft_location(&aircraft_id, *lat, *lon, *location);
            println!("{} located at {}, {}", aircraft_id, lat, lon);
            Ok(true)
        }),
        Commands::Suspect { aircraft, reason } => with_fleet(&cli, &settings, |store| {
            let aircraft_id = resolve_aircraft(store, aircraft)?;
            store.mark_aircraft_as_suspicious(&aircraft_id, reason);
            println!("{} marked as suspicious", aircraft_id);
            Ok(true)
        }),
        Commands::List { filter } => with_fleet(&cli, &settings, |store| {
            for a in store.filter_aircraft(*filter) {
                let flag = if a.location_uncertain { "[?]" } else { "[ ]" };
                let position = a.assigned_position_id.as_deref().unwrap_or("-");
                let dome = store
                    .dome_location_label(&a.id)
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{} {:<10} {:<10} {:<10} {:<12} {:<10} {}",
                    flag, a.id, a.callsign, a.aircraft_type, a.status, position, dome
                );
            }
            Ok(false)
        }),
        Commands::Domes => with_fleet(&cli, &settings, |store| {
            for summary in store.base_dome_summary() {
                println!(
                    "{}: {} domes, {} occupied, {} empty",
                    summary.base_name,
                    summary.domes.total,
                    summary.domes.occupied,
                    summary.domes.empty
                );
                for (aircraft_type, counts) in &summary.by_aircraft_type {
                    println!(
                        "  {:<10} {}/{} occupied",
                        aircraft_type, counts.occupied, counts.total
                    );
                }
            }
            for discrepancy in store.assignment_discrepancies() {
                println!("! {:?}", discrepancy);
            }
            Ok(false)
        }),
        Commands::ExportCsv { path } => with_fleet(&cli, &settings, |store| {
            let rows = assignment_table(store, &HashMap::new());
            let file =
                File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
            export_csv(file, &rows)?;
            println!("{} rows written to {:?}", rows.len(), path);
            Ok(false)
        }),
        Commands::ImportCsv { path } => with_fleet(&cli, &settings, |store| {
            let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
            let import = import_csv(file, store)?;
            let mut notes: Vec<_> = import.notes.iter().filter(|(_, n)| !n.is_empty()).collect();
            notes.sort();
            for (position_id, note) in notes {
                println!("{}: {}", position_id, note);
            }
            println!(
                "{} rows matched, {} skipped",
                import.matched_rows, import.skipped_rows
            );
            Ok(false)
        }),
    }
}

/// Loads the fleet, runs `command` against it and writes the snapshot back
/// when `--save` is set and the command reports a change.
fn with_fleet<F>(cli: &Cli, settings: &Settings, command: F) -> Result<()>
where
    F: FnOnce(&mut FleetStore) -> Result<bool>,
{
    let snapshot = match &cli.data {
        Some(path) => {
            load_snapshot(path).with_context(|| format!("Failed to load fleet from {:?}", path))?
        }
        None => sample_snapshot(),
    };
    let mut store = FleetStore::new(snapshot);
    store.set_acting_user(settings.acting_user.clone());

    let changed = command(&mut store)?;

    if changed && cli.save {
        let Some(path) = &cli.data else {
            bail!("--save needs --data to know where to write");
        };
        save_snapshot(path, &store.snapshot())
            .with_context(|| format!("Failed to save fleet to {:?}", path))?;
        info!("Fleet saved: path={:?}", path);
    }

    Ok(())
}

fn update_settings(
    manager: &SettingsManager,
    mut settings: Settings,
    strategy: Option<Strategy>,
    max_per_position: Option<u32>,
    user: Option<&str>,
    admin: bool,
) -> Result<()> {
    if let Some(strategy) = strategy {
        settings.strategy = strategy;
    }
    if let Some(max) = max_per_position {
        settings.algorithm.max_per_position = max;
    }
    if let Some(username) = user {
        settings.acting_user = Some(User {
            id: username.to_string(),
            username: username.to_string(),
            role: if admin {
                UserRole::Admin
            } else {
                UserRole::Viewer
            },
        });
    }
    if strategy.is_some() || max_per_position.is_some() || user.is_some() {
        manager.save(&settings)?;
        info!("Settings saved: path={:?}", manager.path());
    }

    println!("Settings ({:?})", manager.path());
    println!("  strategy:         {}", settings.strategy);
    println!("  max per position: {}", settings.algorithm.max_per_position);
    match &settings.acting_user {
        Some(user) => println!("  acting user:      {} ({:?})", user.username, user.role),
        None => println!("  acting user:      -"),
    }
    Ok(())
}

/// Accepts an aircraft id or a callsign.
fn resolve_aircraft(store: &FleetStore, key: &str) -> Result<String> {
    store
        .aircraft_by_id(key)
        .or_else(|| store.aircraft_by_callsign(key))
        .map(|a| a.id.clone())
        .ok_or_else(|| anyhow::anyhow!("Unknown aircraft '{}'", key))
}

fn print_status(store: &FleetStore) {
    for base in store.bases() {
        println!("{}", base.name);
        for position in store.positions_for_base(&base.id) {
            let callsigns: Vec<_> = store
                .assigned_aircraft(&position.id)
                .into_iter()
                .map(|a| a.callsign.as_str())
                .collect();
            println!(
                "  {:<24} {}/{}  {}",
                position.name,
                store.position_occupancy(&position.id),
                position.capacity,
                callsigns.join(", ")
            );
        }
    }

    let summary = store.fleet_summary();
    println!(
        "{} positions, {} slots, {} assigned, {} waiting, {} in maintenance",
        summary.positions,
        summary.total_capacity,
        summary.assigned,
        summary.eligible,
        summary.maintenance
    );
}
