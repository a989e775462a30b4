#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Reactor Planner
//!
//! The simulation core of a voxel fission reactor planner.
//!
//! A reactor is a 3-D grid of typed blocks. Their adjacency decides which
//! moderators carry neutrons, which fuel cells go critical, which heat sinks
//! hold, and therefore how much power and heat the whole reactor makes.
//!
//! ## Key Modules
//!
//! * `config` - Block tables and fission constants, loaded from JSON or built in
//! * `error` - The crate's error type
//! * `planner_state` - The edit surface and the reactor simulation behind it
//!
//! ## Usage
//!
//! ```no_run
//! use cgmath::{Point3, Vector3};
//! use reactor_planner::{BlockType, PlannerConfig, PlannerState};
//!
//! let mut planner = PlannerState::new(PlannerConfig::default(), Vector3::new(3, 1, 1))?;
//! planner.place(BlockType::FuelCell, "HEU-235 Oxide", Point3::new(1, 1, 1))?;
//! planner.place(BlockType::Moderator, "Heavy Water", Point3::new(2, 1, 1))?;
//! planner.place(BlockType::FuelCell, "HEU-235 Oxide", Point3::new(3, 1, 1))?;
//! println!("{} RF/t", planner.stats().total_power);
//! # Ok::<(), reactor_planner::PlannerError>(())
//! ```

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use log::info;
use serde::Serialize;

pub mod config;
pub mod error;
pub mod planner_state;

pub use config::PlannerConfig;
pub use error::{PlannerError, Result};
pub use planner_state::reactor::analysis::clusters::Cluster;
pub use planner_state::reactor::analysis::stats::ReactorStats;
pub use planner_state::reactor::block::block_type::BlockType;
pub use planner_state::reactor::layout::Layout;
pub use planner_state::PlannerState;

/// Configuration picked up from the working directory when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "reactor-planner.json";

/// What the command line prints for a loaded layout.
#[derive(Serialize)]
struct Report<'a> {
    stats: &'a ReactorStats,
    clusters: &'a [Cluster],
}

/// Loads the configuration named on the command line, failing on any error.
///
/// With no name, [`DEFAULT_CONFIG_FILE`] is tried and the built-in tables are
/// the fallback.
fn command_line_config(path: Option<&Path>) -> anyhow::Result<PlannerConfig> {
    match path {
        Some(path) => PlannerConfig::from_path(path)
            .with_context(|| format!("loading configuration {}", path.display())),
        None => Ok(PlannerConfig::load_or_default(&[DEFAULT_CONFIG_FILE])),
    }
}

/// Entry point of the `reactor-planner` binary.
///
/// Usage: `reactor-planner <layout.json> [config.json]`
///
/// A named configuration must load and validate. Without one,
/// [`DEFAULT_CONFIG_FILE`] is tried before falling back to the built-in
/// tables. The stats snapshot and problem clusters are printed as JSON.
pub fn run() -> anyhow::Result<()> {
    let mut log_builder = env_logger::Builder::new();
    // Stdout carries the JSON report.
    log_builder
        .target(env_logger::Target::Stderr)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let mut args = env::args_os().skip(1).map(PathBuf::from);
    let Some(layout_path) = args.next() else {
        bail!("usage: reactor-planner <layout.json> [config.json]");
    };
    let config = command_line_config(args.next().as_deref())?;

    let layout = Layout::from_path(&layout_path)
        .with_context(|| format!("reading layout {}", layout_path.display()))?;
    let mut planner = PlannerState::new(config, layout.dimensions.into())?;
    planner
        .load_layout(&layout)
        .with_context(|| format!("loading layout {}", layout_path.display()))?;

    let stats = planner.stats();
    info!(
        "{} blocks: {:.1} power, {:.1} heat, {:.1}% efficiency, {} clusters",
        planner.grid().occupied_count(),
        stats.total_power,
        stats.total_heat,
        stats.efficiency_percent,
        stats.cluster_count
    );

    let report = Report {
        stats,
        clusters: planner.clusters(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_config_errors_are_not_swallowed() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(command_line_config(Some(&missing)).is_err());

        let malformed = dir.path().join("malformed.json");
        std::fs::write(&malformed, "{ not json").unwrap();
        assert!(command_line_config(Some(&malformed)).is_err());

        let zero_reach = dir.path().join("zero_reach.json");
        std::fs::write(&zero_reach, r#"{ "fission": { "neutron_reach": 0 } }"#).unwrap();
        let error = command_line_config(Some(&zero_reach)).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<PlannerError>(),
            Some(PlannerError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn named_config_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reach.json");
        std::fs::write(&path, r#"{ "fission": { "neutron_reach": 6 } }"#).unwrap();

        let config = command_line_config(Some(&path)).unwrap();
        assert_eq!(config.neutron_reach(), 6);
    }
}
