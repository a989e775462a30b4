//! # Fuel Cell Module
//!
//! Fuel cells are the neutron sources of the reactor. A cell's validity comes
//! from the static placement rules alone; its output comes from the moderated
//! neutron lines leaving it.
//!
//! ## Output Model
//!
//! Every face of a valid cell is walked like a moderator line. A walk that
//! crosses at least one moderator before reaching a valid source is a
//! *neutron line*:
//!
//! * line flux is the sum of the crossed moderators' flux factors, doubled and
//!   scaled by reflectivity when the line ends on a reflector
//! * line efficiency is the mean of their efficiency factors, scaled by the
//!   reflector's efficiency when the line ends on one
//!
//! The cell goes critical once its summed flux reaches the fuel's criticality.
//! A critical cell produces `base_heat` per line, at `base_efficiency` times
//! the mean line efficiency.

use cgmath::Point3;

use crate::config::FuelStats;
use crate::planner_state::reactor::grid::Grid;

use super::block_side::BlockSide;
use super::block_type::BlockType;

#[derive(Clone, Debug, PartialEq)]
pub struct FuelCell {
    fuel: String,
    stats: FuelStats,
    valid: bool,
    output: FuelCellOutput,
}

/// One moderated line between a fuel cell and another source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeutronLine {
    pub side: BlockSide,
    /// Number of moderators crossed.
    pub moderators: u32,
    pub flux: f64,
    pub efficiency: f64,
    /// What terminated the line: a fuel cell or a reflector.
    pub source: BlockType,
}

/// Figures a fuel cell derives from its neutron lines.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FuelCellOutput {
    pub flux: f64,
    pub line_count: u32,
    pub positional_efficiency: f64,
    pub efficiency: f64,
    /// Whether the cell reached criticality.
    pub active: bool,
    pub heat: f64,
    pub power: f64,
}

impl FuelCell {
    pub fn new(fuel: &str, stats: FuelStats) -> Self {
        FuelCell {
            fuel: fuel.to_string(),
            stats,
            valid: false,
            output: FuelCellOutput::default(),
        }
    }

    /// Name of the fuel this cell holds.
    pub fn fuel(&self) -> &str {
        &self.fuel
    }

    pub fn stats(&self) -> &FuelStats {
        &self.stats
    }

    /// Whether the cell satisfies its placement rules.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether the cell is valid and critical.
    pub fn is_active(&self) -> bool {
        self.valid && self.output.active
    }

    pub fn output(&self) -> &FuelCellOutput {
        &self.output
    }

    pub fn revert_to_setup(&mut self) {
        self.valid = false;
        self.output = FuelCellOutput::default();
    }

    pub(crate) fn reload(&mut self, stats: FuelStats) {
        self.stats = stats;
    }

    pub(crate) fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    pub(crate) fn apply(&mut self, output: FuelCellOutput) {
        self.output = output;
    }

    /// Collects the neutron lines leaving the cell at `position`.
    ///
    /// Lines ending on an adjacent source carry no moderator and are skipped.
    pub fn neutron_lines(grid: &Grid, position: Point3<i32>, reach: u32) -> Vec<NeutronLine> {
        BlockSide::all()
            .into_iter()
            .filter_map(|side| Self::neutron_line(grid, position, side, reach))
            .collect()
    }

    fn neutron_line(
        grid: &Grid,
        position: Point3<i32>,
        side: BlockSide,
        reach: u32,
    ) -> Option<NeutronLine> {
        let hit = grid.walk_line_to_valid_source(position, side, reach)?;
        if hit.distance < 2 {
            return None;
        }

        let step = side.offset();
        let mut flux = 0.0;
        let mut efficiency = 0.0;
        for i in 1..hit.distance {
            let moderator = grid.block_at(position + step * i as i32).as_moderator()?;
            flux += moderator.flux_factor();
            efficiency += moderator.efficiency_factor();
        }

        let moderators = hit.distance - 1;
        efficiency /= moderators as f64;

        if hit.block_type == BlockType::Reflector {
            let reflector = grid
                .block_at(position + step * hit.distance as i32)
                .as_reflector()?;
            flux *= 2.0 * reflector.reflectivity();
            efficiency *= reflector.efficiency();
        }

        Some(NeutronLine {
            side,
            moderators,
            flux,
            efficiency,
            source: hit.block_type,
        })
    }

    /// Turns a set of neutron lines into the cell's output figures.
    pub fn evaluate(&self, lines: &[NeutronLine]) -> FuelCellOutput {
        let line_count = lines.len() as u32;
        let flux: f64 = lines.iter().map(|line| line.flux).sum();

        if line_count == 0 || flux < self.stats.criticality {
            return FuelCellOutput {
                flux,
                line_count,
                ..FuelCellOutput::default()
            };
        }

        let positional_efficiency =
            lines.iter().map(|line| line.efficiency).sum::<f64>() / line_count as f64;
        let heat = self.stats.base_heat * line_count as f64;
        let efficiency = self.stats.base_efficiency * positional_efficiency;

        FuelCellOutput {
            flux,
            line_count,
            positional_efficiency,
            efficiency,
            active: true,
            heat,
            power: heat * efficiency,
        }
    }
}
