//! # Stats Aggregator
//!
//! Folds the per-block results of a pass into one reactor-wide snapshot.
//! Nothing here is cached between passes; the snapshot is rebuilt from the
//! grid every time.

use serde::Serialize;

use crate::planner_state::reactor::block::BlockKind;
use crate::planner_state::reactor::grid::Grid;

use super::clusters::{find_invalid_clusters, Cluster};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReactorStats {
    pub total_power: f64,
    pub total_heat: f64,
    /// Cooling of every valid heat sink.
    pub total_cooling: f64,
    /// Heat left after cooling; negative when the reactor is over-cooled.
    pub net_heat: f64,
    /// `100 * power / heat`, zero for a reactor that makes no heat.
    pub efficiency_percent: f64,
    pub active_moderator_count: usize,
    pub valid_fuel_cell_count: usize,
    pub invalid_fuel_cell_count: usize,
    /// Valid fuel cells that did not reach criticality.
    pub inactive_fuel_cell_count: usize,
    /// Clusters of problem cells: invalid or subcritical.
    pub cluster_count: usize,
    /// Clusters formed by invalid cells alone.
    pub invalid_cluster_count: usize,
}

/// Builds the stats snapshot of a grid that has just been through a pass.
pub fn aggregate(grid: &Grid, clusters: &[Cluster]) -> ReactorStats {
    let mut stats = ReactorStats {
        cluster_count: clusters.len(),
        invalid_cluster_count: find_invalid_clusters(grid).len(),
        ..Default::default()
    };

    for block in grid.occupied_blocks() {
        match block.kind() {
            BlockKind::FuelCell(cell) if !cell.is_valid() => stats.invalid_fuel_cell_count += 1,
            BlockKind::FuelCell(cell) => {
                stats.valid_fuel_cell_count += 1;
                if cell.is_active() {
                    stats.total_heat += cell.output().heat;
                    stats.total_power += cell.output().power;
                } else {
                    stats.inactive_fuel_cell_count += 1;
                }
            }
            BlockKind::Moderator(moderator) if moderator.is_active() => {
                stats.active_moderator_count += 1
            }
            BlockKind::HeatSink(sink) => stats.total_cooling += sink.effective_cooling(),
            _ => {}
        }
    }

    stats.net_heat = stats.total_heat - stats.total_cooling;
    stats.efficiency_percent = if stats.total_heat > 0.0 {
        100.0 * stats.total_power / stats.total_heat
    } else {
        0.0
    };

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::planner_state::reactor::block::block_type::BlockType;
    use crate::planner_state::reactor::block::Block;
    use crate::planner_state::reactor::pass;
    use cgmath::{Point3, Vector3};

    fn build(dims: Vector3<i32>, blocks: &[(BlockType, &str, [i32; 3])]) -> (Grid, pass::PassOutcome) {
        let config = PlannerConfig::default();
        let mut grid = Grid::new(dims).unwrap();
        for (block_type, name, [x, y, z]) in blocks {
            let block =
                Block::from_config(*block_type, name, Point3::new(*x, *y, *z), &config).unwrap();
            grid.set_block(block).unwrap();
        }
        let outcome = pass::run(&mut grid, &config);
        (grid, outcome)
    }

    #[test]
    fn empty_grid_has_zero_efficiency() {
        let (_, outcome) = build(Vector3::new(3, 3, 3), &[]);
        assert_eq!(outcome.stats, ReactorStats::default());
    }

    #[test]
    fn critical_pair_produces_power() {
        // Two HEU cells share one heavy water line: flux 36 >= 33 on both.
        let (_, outcome) = build(
            Vector3::new(3, 1, 1),
            &[
                (BlockType::FuelCell, "HEU-235 Oxide", [1, 1, 1]),
                (BlockType::Moderator, "Heavy Water", [2, 1, 1]),
                (BlockType::FuelCell, "HEU-235 Oxide", [3, 1, 1]),
            ],
        );
        let stats = outcome.stats;

        assert_eq!(stats.valid_fuel_cell_count, 2);
        assert_eq!(stats.inactive_fuel_cell_count, 0);
        assert_eq!(stats.active_moderator_count, 1);
        assert_eq!(stats.total_heat, 2.0 * 348.0);
        assert!((stats.total_power - 2.0 * 348.0 * 1.15).abs() < 1e-9);
        assert!((stats.efficiency_percent - 115.0).abs() < 1e-9);
        assert_eq!(stats.cluster_count, 0);
    }

    #[test]
    fn subcritical_cells_count_as_inactive() {
        // Graphite gives 10 flux, below LEU-235's criticality of 66.
        let (_, outcome) = build(
            Vector3::new(3, 1, 1),
            &[
                (BlockType::FuelCell, "LEU-235 Oxide", [1, 1, 1]),
                (BlockType::Moderator, "Graphite", [2, 1, 1]),
                (BlockType::FuelCell, "LEU-235 Oxide", [3, 1, 1]),
            ],
        );
        let stats = outcome.stats;

        assert_eq!(stats.valid_fuel_cell_count, 2);
        assert_eq!(stats.inactive_fuel_cell_count, 2);
        assert_eq!(stats.active_moderator_count, 1);
        assert_eq!(stats.total_heat, 0.0);
        assert_eq!(stats.efficiency_percent, 0.0);
        assert_eq!(stats.cluster_count, 2);
        assert_eq!(stats.invalid_cluster_count, 0);
    }

    #[test]
    fn cooling_is_subtracted_from_heat() {
        let (_, outcome) = build(
            Vector3::new(3, 2, 1),
            &[
                (BlockType::FuelCell, "HEU-235 Oxide", [1, 1, 1]),
                (BlockType::Moderator, "Heavy Water", [2, 1, 1]),
                (BlockType::FuelCell, "HEU-235 Oxide", [3, 1, 1]),
                (BlockType::HeatSink, "Water", [1, 2, 1]),
                (BlockType::HeatSink, "Iron", [2, 2, 1]),
            ],
        );
        let stats = outcome.stats;

        assert_eq!(stats.total_cooling, 55.0 + 50.0);
        assert_eq!(stats.net_heat, stats.total_heat - 105.0);
    }
}
