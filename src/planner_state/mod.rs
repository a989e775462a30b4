//! # Planner State Module
//!
//! The edit surface of the planner. [`PlannerState`] owns the configuration,
//! the reactor grid and the results of the last pass, and recomputes them after
//! every structural change.
//!
//! ## Key Components
//!
//! * `PlannerState` - The state container every caller goes through
//! * `reactor` - Blocks, grid, the Flux/Validity pass and its analyses
//!
//! ## Lifecycle
//!
//! Every edit (`place`, `remove`, `reset`, `load_layout`, `set_config`) ends
//! with a full pass, so the query surface always reflects the current layout.
//! Edits that fail leave the grid, the configuration and the last results
//! exactly as they were.

use std::path::Path;

use cgmath::{Point3, Vector3};
use log::{info, trace};

use crate::config::PlannerConfig;
use crate::error::Result;
use reactor::analysis::clusters::Cluster;
use reactor::analysis::stats::ReactorStats;
use reactor::block::block_type::BlockType;
use reactor::block::Block;
use reactor::grid::Grid;
use reactor::layout::Layout;
use reactor::pass;

pub mod reactor;

/// The planner's single source of truth.
#[derive(Clone, Debug)]
pub struct PlannerState {
    config: PlannerConfig,
    grid: Grid,
    clusters: Vec<Cluster>,
    stats: ReactorStats,
}

impl PlannerState {
    /// Creates an empty reactor of the given interior dimensions.
    ///
    /// # Arguments
    /// * `config` - The block tables to plan with
    /// * `dims` - Interior size, every axis at least 1
    ///
    /// # Errors
    /// `PlannerError::InvalidConfig` for an unusable configuration and
    /// `PlannerError::Validation` for non-positive dimensions.
    pub fn new(config: PlannerConfig, dims: Vector3<i32>) -> Result<Self> {
        config.validate()?;
        let mut state = PlannerState {
            grid: Grid::new(dims)?,
            config,
            clusters: Vec::new(),
            stats: ReactorStats::default(),
        };
        state.recompute();
        info!("Planner created with a {}x{}x{} reactor", dims.x, dims.y, dims.z);
        Ok(state)
    }

    /// Replaces the reactor with an empty one of `dims`.
    pub fn reset(&mut self, dims: Vector3<i32>) -> Result<()> {
        self.grid = Grid::new(dims)?;
        self.recompute();
        info!("Reactor reset to {}x{}x{}", dims.x, dims.y, dims.z);
        Ok(())
    }

    /// Places a configured block at `position`, replacing whatever was there.
    ///
    /// # Arguments
    /// * `block_type` - What to place; Air clears the cell
    /// * `name` - Display name, or the fuel name for fuel cells
    /// * `position` - Interior position
    ///
    /// # Returns
    /// The block that was replaced.
    pub fn place(
        &mut self,
        block_type: BlockType,
        name: &str,
        position: Point3<i32>,
    ) -> Result<Block> {
        let block = Block::from_config(block_type, name, position, &self.config)?;
        let previous = self.grid.set_block(block)?;
        trace!(
            "Placed {} {:?} at ({}, {}, {})",
            block_type,
            name,
            position.x,
            position.y,
            position.z
        );
        self.recompute();
        Ok(previous)
    }

    /// Places a copy of `block` at `position`, as a palette would.
    pub fn place_copy(&mut self, block: &Block, position: Point3<i32>) -> Result<Block> {
        let previous = self.grid.set_block(block.copy_to(position))?;
        trace!(
            "Copied {} to ({}, {}, {})",
            block.display_name(),
            position.x,
            position.y,
            position.z
        );
        self.recompute();
        Ok(previous)
    }

    /// Clears the cell at `position` and returns what it held.
    pub fn remove(&mut self, position: Point3<i32>) -> Result<Block> {
        let previous = self.grid.remove_block(position)?;
        trace!("Removed block at ({}, {}, {})", position.x, position.y, position.z);
        self.recompute();
        Ok(previous)
    }

    /// Swaps in a new configuration and re-reads every placed block from it.
    ///
    /// # Errors
    /// Fails when `config` is invalid or lacks a name a placed block uses; the
    /// current configuration and grid stay in place.
    pub fn set_config(&mut self, config: PlannerConfig) -> Result<()> {
        config.validate()?;

        let mut staged = self.grid.clone();
        let positions: Vec<_> = staged.occupied_blocks().map(|block| block.position()).collect();
        for position in positions {
            if let Some(block) = staged.block_at_mut(position) {
                block.reload_values_from_config(&config)?;
            }
        }

        self.grid = staged;
        self.config = config;
        self.recompute();
        info!("Configuration swapped, {} blocks reloaded", self.grid.occupied_count());
        Ok(())
    }

    /// Replaces the reactor with the one stored in `layout`.
    ///
    /// The layout is built into a staging grid first; the live grid only
    /// changes once the whole layout has been accepted.
    pub fn load_layout(&mut self, layout: &Layout) -> Result<()> {
        self.grid = layout.build_grid(&self.config)?;
        self.recompute();
        info!(
            "Loaded a {}x{}x{} layout with {} blocks",
            layout.dimensions.x,
            layout.dimensions.y,
            layout.dimensions.z,
            self.grid.occupied_count()
        );
        Ok(())
    }

    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let layout = Layout::from_path(path)?;
        self.load_layout(&layout)
    }

    pub fn to_layout(&self) -> Layout {
        Layout::from_grid(&self.grid)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_layout().save_to_path(path)
    }

    /// Suggested file name for saving the current reactor, e.g.
    /// `"LEU-235 Oxide 3 x 3 x 3.json"`.
    pub fn default_file_name(&self, fuel: &str) -> String {
        let dims = self.grid.dims();
        format!("{} {} x {} x {}.json", fuel, dims.x, dims.y, dims.z)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The block at `position`, or the Air sentinel outside the interior.
    pub fn block_at(&self, position: Point3<i32>) -> &Block {
        self.grid.block_at(position)
    }

    pub fn stats(&self) -> &ReactorStats {
        &self.stats
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn dimensions(&self) -> Vector3<i32> {
        self.grid.dims()
    }

    fn recompute(&mut self) {
        let outcome = pass::run(&mut self.grid, &self.config);
        self.clusters = outcome.clusters;
        self.stats = outcome.stats;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;

    fn planner(x: i32, y: i32, z: i32) -> PlannerState {
        PlannerState::new(PlannerConfig::default(), Vector3::new(x, y, z)).unwrap()
    }

    #[test]
    fn edits_trigger_a_pass() {
        let mut planner = planner(3, 1, 1);
        planner
            .place(BlockType::FuelCell, "HEU-235 Oxide", Point3::new(1, 1, 1))
            .unwrap();
        planner
            .place(BlockType::Moderator, "Heavy Water", Point3::new(2, 1, 1))
            .unwrap();
        assert_eq!(planner.stats().active_moderator_count, 0);

        let cell = planner.block_at(Point3::new(1, 1, 1)).clone();
        planner.place_copy(&cell, Point3::new(3, 1, 1)).unwrap();
        assert_eq!(planner.stats().active_moderator_count, 1);
        assert!(planner.block_at(Point3::new(2, 1, 1)).is_valid());

        let removed = planner.remove(Point3::new(3, 1, 1)).unwrap();
        assert_eq!(removed.block_type(), BlockType::FuelCell);
        assert_eq!(planner.stats().active_moderator_count, 0);
    }

    #[test]
    fn out_of_bounds_edits_fail() {
        let mut planner = planner(2, 2, 2);
        let error = planner
            .place(BlockType::Casing, "Casing", Point3::new(3, 1, 1))
            .unwrap_err();
        assert!(matches!(error, PlannerError::OutOfBounds { x: 3, y: 1, z: 1 }));
        assert!(planner.remove(Point3::new(0, 1, 1)).is_err());
        assert_eq!(planner.grid().occupied_count(), 0);
    }

    #[test]
    fn reset_clears_the_reactor() {
        let mut planner = planner(2, 2, 2);
        planner
            .place(BlockType::HeatSink, "Water", Point3::new(1, 1, 1))
            .unwrap();
        planner.reset(Vector3::new(4, 1, 2)).unwrap();

        assert_eq!(planner.dimensions(), Vector3::new(4, 1, 2));
        assert_eq!(planner.grid().occupied_count(), 0);
        assert!(planner.reset(Vector3::new(0, 1, 1)).is_err());
        assert_eq!(planner.dimensions(), Vector3::new(4, 1, 2));
    }

    #[test]
    fn config_swap_reloads_blocks() {
        let mut planner = planner(3, 1, 1);
        for (x, block_type, name) in [
            (1, BlockType::FuelCell, "LEU-235 Oxide"),
            (2, BlockType::Moderator, "Graphite"),
            (3, BlockType::FuelCell, "LEU-235 Oxide"),
        ] {
            planner.place(block_type, name, Point3::new(x, 1, 1)).unwrap();
        }
        assert_eq!(planner.stats().total_heat, 0.0);

        let mut config = PlannerConfig::default();
        if let Some(graphite) = config.moderators.get_mut("Graphite") {
            graphite.flux_factor = 70.0;
        }
        planner.set_config(config).unwrap();

        assert_eq!(planner.stats().total_heat, 2.0 * 58.0);
        assert_eq!(
            planner
                .block_at(Point3::new(2, 1, 1))
                .as_moderator()
                .map(|moderator| moderator.flux_factor()),
            Some(70.0)
        );
    }

    #[test]
    fn config_swap_rejects_missing_names() {
        let mut planner = planner(1, 1, 1);
        planner
            .place(BlockType::Moderator, "Graphite", Point3::new(1, 1, 1))
            .unwrap();

        let mut config = PlannerConfig::default();
        config.moderators.remove("Graphite");
        let error = planner.set_config(config).unwrap_err();

        assert!(matches!(error, PlannerError::Configuration { .. }));
        assert!(planner.config().moderators.contains_key("Graphite"));
        assert_eq!(planner.block_at(Point3::new(1, 1, 1)).display_name(), "Graphite");
    }

    #[test]
    fn default_file_name_names_fuel_and_size() {
        let planner = planner(3, 4, 5);
        assert_eq!(
            planner.default_file_name("LEU-235 Oxide"),
            "LEU-235 Oxide 3 x 4 x 5.json"
        );
    }
}
