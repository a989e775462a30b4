//! # Flux/Validity Pass
//!
//! Recomputes every derived flag and figure of a grid in one ordered sweep.
//!
//! ## Tiers
//!
//! 1. Fuel cells and reflectors: validity from placement rules, counted by type.
//! 2. Moderators: activation from line walks against tier-1 validity.
//! 3. Fuel cells: neutron lines, flux and criticality.
//! 4. Heat sinks: placement rules counting valid neighbours, grown to a fixpoint.
//!
//! Each tier only reads what earlier tiers wrote, so tiers one to three need no
//! iteration. Heat sinks may depend on each other; their validity only ever
//! grows while the fourth tier runs, so it settles after at most one round per
//! sink.
//!
//! Every tier first computes its results against a shared borrow of the grid
//! and only then writes them back, so no block sees a half-updated tier.

use cgmath::Point3;
use log::{debug, trace};
use web_time::Instant;

use crate::config::PlannerConfig;

use super::analysis::clusters::{find_clusters, Cluster};
use super::analysis::stats::{aggregate, ReactorStats};
use super::block::block_type::BlockType;
use super::block::fuel_cell::{FuelCell, FuelCellOutput};
use super::block::moderator::{Moderator, ModeratorActivation};
use super::block::BlockKind;
use super::grid::Grid;
use rules::{rules_satisfied, PlacementRule, RuleMode};

pub mod rules;

/// Everything a pass derives besides per-block state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PassOutcome {
    pub clusters: Vec<Cluster>,
    pub stats: ReactorStats,
}

/// Runs a full pass over `grid` and returns the cluster and stats results.
///
/// The pass is a pure function of the grid's layout and `config`: running it
/// twice on an unchanged grid yields identical state.
pub fn run(grid: &mut Grid, config: &PlannerConfig) -> PassOutcome {
    let started = Instant::now();

    revert_to_setup(grid);
    resolve_intrinsic_validity(grid, config);
    resolve_moderators(grid, config.neutron_reach());
    resolve_fuel_cell_output(grid, config.neutron_reach());
    let rounds = resolve_heat_sinks(grid, config);

    let clusters = find_clusters(grid);
    let stats = aggregate(grid, &clusters);

    debug!(
        "Pass over {} blocks took {:?} ({} heat sink rounds, {} clusters)",
        grid.occupied_count(),
        started.elapsed(),
        rounds,
        clusters.len()
    );

    PassOutcome { clusters, stats }
}

fn revert_to_setup(grid: &mut Grid) {
    let positions: Vec<_> = grid.occupied_blocks().map(|block| block.position()).collect();
    for position in positions {
        if let Some(block) = grid.block_at_mut(position) {
            block.revert_to_setup();
        }
    }
}

/// Tier one: fuel cells and reflectors against the static rule table.
fn resolve_intrinsic_validity(grid: &mut Grid, config: &PlannerConfig) {
    let verdicts: Vec<(Point3<i32>, bool)> = grid
        .occupied_blocks()
        .filter_map(|block| {
            let rules: &[PlacementRule] = match block.block_type() {
                BlockType::FuelCell => &config.fission.fuel_cell_rules,
                BlockType::Reflector => config
                    .reflectors
                    .get(block.display_name())
                    .map(|stats| stats.rules.as_slice())
                    .unwrap_or(&[]),
                _ => return None,
            };
            let position = block.position();
            Some((
                position,
                rules_satisfied(grid, position, rules, RuleMode::Placement),
            ))
        })
        .collect();

    for (position, valid) in verdicts {
        match grid.block_at_mut(position).map(|block| block.kind_mut()) {
            Some(BlockKind::FuelCell(cell)) => cell.set_valid(valid),
            Some(BlockKind::Reflector(reflector)) => reflector.set_valid(valid),
            _ => {}
        }
    }
}

/// Tier two: moderator activation.
fn resolve_moderators(grid: &mut Grid, reach: u32) {
    let activations: Vec<(Point3<i32>, ModeratorActivation)> = grid
        .positions_of(BlockType::Moderator)
        .into_iter()
        .map(|position| (position, Moderator::activation(grid, position, reach)))
        .collect();

    for (position, activation) in activations {
        if let Some(BlockKind::Moderator(moderator)) =
            grid.block_at_mut(position).map(|block| block.kind_mut())
        {
            moderator.apply(activation);
        }
    }
}

/// Tier three: neutron lines and criticality of valid fuel cells.
fn resolve_fuel_cell_output(grid: &mut Grid, reach: u32) {
    let outputs: Vec<(Point3<i32>, FuelCellOutput)> = grid
        .occupied_blocks()
        .filter_map(|block| {
            let cell = block.as_fuel_cell().filter(|cell| cell.is_valid())?;
            let lines = FuelCell::neutron_lines(grid, block.position(), reach);
            Some((block.position(), cell.evaluate(&lines)))
        })
        .collect();

    for (position, output) in outputs {
        if let Some(BlockKind::FuelCell(cell)) =
            grid.block_at_mut(position).map(|block| block.kind_mut())
        {
            cell.apply(output);
        }
    }
}

/// Tier four: heat sinks, grown until no further sink becomes valid.
///
/// Returns the number of rounds run.
fn resolve_heat_sinks(grid: &mut Grid, config: &PlannerConfig) -> usize {
    let mut pending = grid.positions_of(BlockType::HeatSink);
    let mut rounds = 0;

    loop {
        rounds += 1;
        let (satisfied, unsatisfied): (Vec<_>, Vec<_>) =
            pending.into_iter().partition(|&position| {
                let block = grid.block_at(position);
                let rules = config
                    .heat_sinks
                    .get(block.display_name())
                    .map(|stats| stats.rules.as_slice())
                    .unwrap_or(&[]);
                rules_satisfied(grid, position, rules, RuleMode::Validated)
            });

        if satisfied.is_empty() {
            break;
        }
        trace!("Heat sink round {}: {} sinks became valid", rounds, satisfied.len());

        for position in satisfied {
            if let Some(BlockKind::HeatSink(sink)) =
                grid.block_at_mut(position).map(|block| block.kind_mut())
            {
                sink.set_valid(true);
            }
        }
        pending = unsatisfied;
    }

    rounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner_state::reactor::block::Block;
    use cgmath::Vector3;

    fn place(grid: &mut Grid, config: &PlannerConfig, block_type: BlockType, name: &str, at: [i32; 3]) {
        let block =
            Block::from_config(block_type, name, Point3::new(at[0], at[1], at[2]), config).unwrap();
        grid.set_block(block).unwrap();
    }

    fn is_valid(grid: &Grid, at: [i32; 3]) -> bool {
        grid.block_at(Point3::new(at[0], at[1], at[2])).is_valid()
    }

    #[test]
    fn fuel_cell_rules_use_block_types() {
        let mut config = PlannerConfig::default();
        config
            .fission
            .fuel_cell_rules
            .push(PlacementRule::at_least(1, BlockType::Casing));

        let mut grid = Grid::new(Vector3::new(3, 3, 3)).unwrap();
        place(&mut grid, &config, BlockType::FuelCell, "LEU-235 Oxide", [1, 2, 2]);
        place(&mut grid, &config, BlockType::FuelCell, "LEU-235 Oxide", [2, 2, 2]);

        run(&mut grid, &config);

        assert!(is_valid(&grid, [1, 2, 2]));
        assert!(!is_valid(&grid, [2, 2, 2]));
    }

    #[test]
    fn heat_sinks_need_valid_neighbours() {
        let config = PlannerConfig::default();
        let mut grid = Grid::new(Vector3::new(3, 3, 3)).unwrap();
        // Iron needs a valid moderator; this one is never active.
        place(&mut grid, &config, BlockType::Moderator, "Graphite", [2, 2, 2]);
        place(&mut grid, &config, BlockType::HeatSink, "Iron", [2, 2, 1]);
        // Water needs a valid fuel cell.
        place(&mut grid, &config, BlockType::FuelCell, "LEU-235 Oxide", [1, 1, 3]);
        place(&mut grid, &config, BlockType::HeatSink, "Water", [2, 1, 3]);

        run(&mut grid, &config);

        assert!(!is_valid(&grid, [2, 2, 1]));
        assert!(is_valid(&grid, [2, 1, 3]));
    }

    #[test]
    fn heat_sink_chains_settle() {
        let config = PlannerConfig::default();
        let mut grid = Grid::new(Vector3::new(5, 1, 1)).unwrap();
        // cell | redstone?  redstone needs a moderator as well, so it stays
        // invalid and the quartz next to it follows.
        place(&mut grid, &config, BlockType::FuelCell, "LEU-235 Oxide", [1, 1, 1]);
        place(&mut grid, &config, BlockType::HeatSink, "Redstone", [2, 1, 1]);
        place(&mut grid, &config, BlockType::HeatSink, "Quartz", [3, 1, 1]);
        run(&mut grid, &config);
        assert!(!is_valid(&grid, [2, 1, 1]));
        assert!(!is_valid(&grid, [3, 1, 1]));

        // cell | moderator | cell makes the moderator valid; redstone below it
        // touches both, and quartz beside the redstone follows a round later.
        let mut grid = Grid::new(Vector3::new(3, 2, 2)).unwrap();
        place(&mut grid, &config, BlockType::FuelCell, "LEU-235 Oxide", [1, 2, 1]);
        place(&mut grid, &config, BlockType::Moderator, "Graphite", [2, 2, 1]);
        place(&mut grid, &config, BlockType::FuelCell, "LEU-235 Oxide", [3, 2, 1]);
        place(&mut grid, &config, BlockType::HeatSink, "Quartz", [2, 1, 2]);
        place(&mut grid, &config, BlockType::HeatSink, "Redstone", [2, 1, 1]);
        place(&mut grid, &config, BlockType::FuelCell, "LEU-235 Oxide", [1, 1, 1]);

        run(&mut grid, &config);

        assert!(is_valid(&grid, [2, 2, 1]));
        assert!(is_valid(&grid, [2, 1, 1]));
        assert!(is_valid(&grid, [2, 1, 2]));
    }

    #[test]
    fn pass_is_idempotent() {
        let config = PlannerConfig::default();
        let mut grid = Grid::new(Vector3::new(5, 1, 1)).unwrap();
        place(&mut grid, &config, BlockType::FuelCell, "LEU-235 Oxide", [1, 1, 1]);
        place(&mut grid, &config, BlockType::Moderator, "Heavy Water", [2, 1, 1]);
        place(&mut grid, &config, BlockType::Moderator, "Heavy Water", [3, 1, 1]);
        place(&mut grid, &config, BlockType::FuelCell, "LEU-235 Oxide", [4, 1, 1]);

        let first = run(&mut grid, &config);
        let snapshot = grid.clone();
        let second = run(&mut grid, &config);

        assert_eq!(first, second);
        for (before, after) in snapshot.occupied_blocks().zip(grid.occupied_blocks()) {
            assert_eq!(before, after);
        }
    }
}
