//! # Moderator Module
//!
//! Moderators slow neutrons down on their way between two sources. A moderator
//! is active when it sits on a straight line that resolves to a valid source in
//! both directions, and it can support heat sinks only when one of those sources
//! is a fuel cell right next to it.

use cgmath::Point3;

use crate::config::ModeratorStats;
use crate::planner_state::reactor::grid::Grid;

use super::block_side::BlockSide;

#[derive(Clone, Debug, PartialEq)]
pub struct Moderator {
    flux_factor: f64,
    efficiency_factor: f64,
    active: bool,
    has_adjacent_valid_fuel_cell: bool,
}

/// The outcome of evaluating one moderator against the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeratorActivation {
    pub active: bool,
    pub has_adjacent_valid_fuel_cell: bool,
}

impl Moderator {
    pub fn new(stats: &ModeratorStats) -> Self {
        Moderator {
            flux_factor: stats.flux_factor,
            efficiency_factor: stats.efficiency_factor,
            active: false,
            has_adjacent_valid_fuel_cell: false,
        }
    }

    pub fn flux_factor(&self) -> f64 {
        self.flux_factor
    }

    pub fn efficiency_factor(&self) -> f64 {
        self.efficiency_factor
    }

    /// Whether the moderator lies on at least one resolved neutron line.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_adjacent_valid_fuel_cell(&self) -> bool {
        self.has_adjacent_valid_fuel_cell
    }

    /// A moderator supports heat sinks only when it is active and touches a valid fuel cell.
    pub fn is_valid(&self) -> bool {
        self.active && self.has_adjacent_valid_fuel_cell
    }

    pub fn revert_to_setup(&mut self) {
        self.active = false;
        self.has_adjacent_valid_fuel_cell = false;
    }

    pub(crate) fn reload(&mut self, stats: &ModeratorStats) {
        self.flux_factor = stats.flux_factor;
        self.efficiency_factor = stats.efficiency_factor;
    }

    pub(crate) fn apply(&mut self, activation: ModeratorActivation) {
        self.active = activation.active;
        self.has_adjacent_valid_fuel_cell = activation.has_adjacent_valid_fuel_cell;
    }

    /// Evaluates the moderator at `position` against the current grid.
    ///
    /// Each axis is walked in both directions. Any axis resolving on both sides
    /// activates the moderator; the adjacency flag is raised when a resolving
    /// axis ends on a valid fuel cell one step away. Every axis is considered
    /// for activation, so an axis that already raised the adjacency flag does
    /// not hide a later one.
    ///
    /// # Arguments
    /// * `grid` - The lattice, with fuel cell and reflector validity already resolved
    /// * `position` - Where the moderator sits
    /// * `reach` - The configured neutron reach
    pub fn activation(grid: &Grid, position: Point3<i32>, reach: u32) -> ModeratorActivation {
        let mut activation = ModeratorActivation::default();

        for (positive, negative) in BlockSide::axis_pairs() {
            let forward = grid.walk_line_to_valid_source(position, positive, reach);
            let backward = grid.walk_line_to_valid_source(position, negative, reach);

            let (Some(forward), Some(backward)) = (forward, backward) else {
                continue;
            };

            activation.active = true;
            if forward.is_adjacent_fuel_cell() || backward.is_adjacent_fuel_cell() {
                activation.has_adjacent_valid_fuel_cell = true;
            }

            if activation.has_adjacent_valid_fuel_cell {
                break;
            }
        }

        activation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::planner_state::reactor::block::block_type::BlockType;
    use crate::planner_state::reactor::block::Block;
    use crate::planner_state::reactor::pass;
    use cgmath::Vector3;

    fn place(grid: &mut Grid, config: &PlannerConfig, block_type: BlockType, name: &str, x: i32, y: i32, z: i32) {
        let block = Block::from_config(block_type, name, Point3::new(x, y, z), config).unwrap();
        grid.set_block(block).unwrap();
    }

    fn moderator_at(grid: &Grid, x: i32, y: i32, z: i32) -> &Moderator {
        grid.block_at(Point3::new(x, y, z)).as_moderator().unwrap()
    }

    #[test]
    fn lone_moderator_stays_inactive() {
        let config = PlannerConfig::default();
        let mut grid = Grid::new(Vector3::new(3, 3, 3)).unwrap();
        place(&mut grid, &config, BlockType::Moderator, "Graphite", 2, 2, 2);

        pass::run(&mut grid, &config);

        let moderator = moderator_at(&grid, 2, 2, 2);
        assert!(!moderator.is_active());
        assert!(!moderator.has_adjacent_valid_fuel_cell());
        assert!(!moderator.is_valid());
    }

    #[test]
    fn one_sided_source_does_not_activate() {
        let config = PlannerConfig::default();
        let mut grid = Grid::new(Vector3::new(5, 1, 1)).unwrap();
        place(&mut grid, &config, BlockType::FuelCell, "LEU-235 Oxide", 1, 1, 1);
        place(&mut grid, &config, BlockType::Moderator, "Graphite", 2, 1, 1);

        pass::run(&mut grid, &config);

        assert!(!moderator_at(&grid, 2, 1, 1).is_active());
    }

    #[test]
    fn adjacency_only_counts_on_resolving_axes() {
        // X axis: cell | moderator | air        (adjacent cell, unresolved)
        // Z axis: reflector | moderator | reflector (resolved)
        let config = PlannerConfig::default();
        let mut grid = Grid::new(Vector3::new(3, 1, 3)).unwrap();
        place(&mut grid, &config, BlockType::Moderator, "Graphite", 2, 1, 2);
        place(&mut grid, &config, BlockType::FuelCell, "LEU-235 Oxide", 1, 1, 2);
        place(&mut grid, &config, BlockType::Reflector, "Beryllium-Carbon", 2, 1, 1);
        place(&mut grid, &config, BlockType::Reflector, "Beryllium-Carbon", 2, 1, 3);

        pass::run(&mut grid, &config);

        let moderator = moderator_at(&grid, 2, 1, 2);
        assert!(moderator.is_active());
        assert!(!moderator.has_adjacent_valid_fuel_cell());
    }

    #[test]
    fn reflector_line_activates_without_adjacency() {
        // cell | moderator | moderator | reflector, reach 4 so the reflector
        // must sit within two steps of the moderator next to it.
        let config = PlannerConfig::default();
        let mut grid = Grid::new(Vector3::new(4, 1, 1)).unwrap();
        place(&mut grid, &config, BlockType::FuelCell, "LEU-235 Oxide", 1, 1, 1);
        place(&mut grid, &config, BlockType::Moderator, "Graphite", 2, 1, 1);
        place(&mut grid, &config, BlockType::Moderator, "Graphite", 3, 1, 1);
        place(&mut grid, &config, BlockType::Reflector, "Beryllium-Carbon", 4, 1, 1);

        pass::run(&mut grid, &config);

        let near_cell = moderator_at(&grid, 2, 1, 1);
        let near_reflector = moderator_at(&grid, 3, 1, 1);
        assert!(near_cell.is_active() && near_cell.has_adjacent_valid_fuel_cell());
        assert!(near_reflector.is_active());
        assert!(!near_reflector.has_adjacent_valid_fuel_cell());
    }
}
