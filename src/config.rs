//! # Configuration Module
//!
//! Static block tables and fission constants consumed by the planner.
//!
//! The configuration is an explicit value: it is handed to
//! [`PlannerState`](crate::planner_state::PlannerState) on construction and can
//! only be swapped between passes. Nothing in the crate reads process-wide state,
//! so several reactors with different tables can live side by side.
//!
//! ## File Format
//!
//! Configurations are stored as JSON. Every section is optional and falls back
//! to the built-in NuclearCraft tables:
//!
//! ```json
//! {
//!   "fission": { "neutron_reach": 4, "fuel_cell_rules": [] },
//!   "moderators": { "Graphite": { "flux_factor": 10, "efficiency_factor": 1.1 } }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::planner_state::reactor::block::block_type::BlockType;
use crate::planner_state::reactor::pass::rules::PlacementRule;

/// Default neutron reach, in blocks.
pub const DEFAULT_NEUTRON_REACH: u32 = 4;

/// Fission constants shared by every block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FissionConfig {
    /// How many cells a neutron line may travel before it fizzles out.
    pub neutron_reach: u32,
    /// Placement rules every fuel cell must satisfy to be valid.
    pub fuel_cell_rules: Vec<PlacementRule>,
}

impl Default for FissionConfig {
    fn default() -> Self {
        Self {
            neutron_reach: DEFAULT_NEUTRON_REACH,
            fuel_cell_rules: Vec::new(),
        }
    }
}

/// Base figures of one fuel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelStats {
    pub base_efficiency: f64,
    pub base_heat: f64,
    /// Neutron flux a cell needs to go critical.
    pub criticality: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeratorStats {
    pub flux_factor: f64,
    pub efficiency_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectorStats {
    pub efficiency: f64,
    pub reflectivity: f64,
    #[serde(default)]
    pub rules: Vec<PlacementRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatSinkStats {
    /// Heat removed per tick while the sink is valid.
    pub cooling: f64,
    #[serde(default)]
    pub rules: Vec<PlacementRule>,
}

/// Every static table the planner needs, keyed by block display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub fission: FissionConfig,
    pub fuels: BTreeMap<String, FuelStats>,
    pub moderators: BTreeMap<String, ModeratorStats>,
    pub reflectors: BTreeMap<String, ReflectorStats>,
    pub heat_sinks: BTreeMap<String, HeatSinkStats>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let fuels = [
            ("LEU-235 Oxide", 1.15, 58.0, 66.0),
            ("HEU-235 Oxide", 1.15, 348.0, 33.0),
            ("LEU-233 Oxide", 1.1, 96.0, 60.0),
            ("TBU Oxide", 1.25, 40.0, 199.0),
        ]
        .into_iter()
        .map(|(name, base_efficiency, base_heat, criticality)| {
            (
                name.to_string(),
                FuelStats {
                    base_efficiency,
                    base_heat,
                    criticality,
                },
            )
        })
        .collect();

        let moderators = [
            ("Graphite", 10.0, 1.1),
            ("Beryllium", 22.0, 1.05),
            ("Heavy Water", 36.0, 1.0),
        ]
        .into_iter()
        .map(|(name, flux_factor, efficiency_factor)| {
            (
                name.to_string(),
                ModeratorStats {
                    flux_factor,
                    efficiency_factor,
                },
            )
        })
        .collect();

        let reflectors = [("Beryllium-Carbon", 0.5, 1.0), ("Lead-Steel", 0.25, 0.5)]
            .into_iter()
            .map(|(name, efficiency, reflectivity)| {
                (
                    name.to_string(),
                    ReflectorStats {
                        efficiency,
                        reflectivity,
                        rules: vec![PlacementRule::at_least(1, BlockType::Moderator)],
                    },
                )
            })
            .collect();

        let heat_sinks = [
            ("Water", 55.0, vec![PlacementRule::at_least(1, BlockType::FuelCell)]),
            ("Iron", 50.0, vec![PlacementRule::at_least(1, BlockType::Moderator)]),
            (
                "Redstone",
                85.0,
                vec![
                    PlacementRule::at_least(1, BlockType::FuelCell),
                    PlacementRule::at_least(1, BlockType::Moderator),
                ],
            ),
            (
                "Quartz",
                80.0,
                vec![PlacementRule::at_least_named(1, BlockType::HeatSink, "Redstone")],
            ),
            (
                "Lapis",
                120.0,
                vec![
                    PlacementRule::at_least(1, BlockType::FuelCell),
                    PlacementRule::at_least(1, BlockType::Casing),
                ],
            ),
            ("Conductor", 0.0, Vec::new()),
        ]
        .into_iter()
        .map(|(name, cooling, rules)| (name.to_string(), HeatSinkStats { cooling, rules }))
        .collect();

        Self {
            fission: FissionConfig::default(),
            fuels,
            moderators,
            reflectors,
            heat_sinks,
        }
    }
}

impl PlannerConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: PlannerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&content)?;
        info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Tries each candidate path in turn and falls back to the built-in tables.
    ///
    /// Unreadable or malformed files are skipped with a warning rather than
    /// aborting, so a stale file next to the binary never prevents startup.
    pub fn load_or_default<P: AsRef<Path>>(candidates: &[P]) -> Self {
        for path in candidates {
            let path = path.as_ref();
            if !path.exists() {
                continue;
            }
            match Self::from_path(path) {
                Ok(config) => return config,
                Err(err) => warn!("Skipping configuration {}: {}", path.display(), err),
            }
        }

        warn!("No usable configuration found, using built-in tables");
        Self::default()
    }

    /// Checks constants and factors for values no pass could work with.
    pub fn validate(&self) -> Result<()> {
        if self.fission.neutron_reach == 0 {
            return Err(PlannerError::invalid_config("neutron reach must be at least 1"));
        }
        validate_rules("fuel cells", &self.fission.fuel_cell_rules)?;

        for (name, fuel) in &self.fuels {
            check_factor(name, "base efficiency", fuel.base_efficiency)?;
            check_factor(name, "base heat", fuel.base_heat)?;
            check_factor(name, "criticality", fuel.criticality)?;
        }
        for (name, moderator) in &self.moderators {
            check_factor(name, "flux factor", moderator.flux_factor)?;
            check_factor(name, "efficiency factor", moderator.efficiency_factor)?;
        }
        for (name, reflector) in &self.reflectors {
            check_factor(name, "efficiency", reflector.efficiency)?;
            check_factor(name, "reflectivity", reflector.reflectivity)?;
            validate_rules(name, &reflector.rules)?;
        }
        for (name, sink) in &self.heat_sinks {
            check_factor(name, "cooling", sink.cooling)?;
            validate_rules(name, &sink.rules)?;
        }
        Ok(())
    }

    pub fn neutron_reach(&self) -> u32 {
        self.fission.neutron_reach
    }
}

fn check_factor(name: &str, what: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(PlannerError::invalid_config(format!(
            "{name}: {what} must be a finite, non-negative number (got {value})"
        )));
    }
    Ok(())
}

fn validate_rules(owner: &str, rules: &[PlacementRule]) -> Result<()> {
    for rule in rules {
        if rule.neighbour == BlockType::Air {
            return Err(PlannerError::invalid_config(format!(
                "{owner}: placement rules cannot count air"
            )));
        }
        if rule.count == 0 || rule.count > 6 {
            return Err(PlannerError::invalid_config(format!(
                "{owner}: rule count must be between 1 and 6 (got {})",
                rule.count
            )));
        }
    }
    Ok(())
}
