//! # Layout Module
//!
//! The persisted form of a reactor: its dimensions and every non-Air block,
//! stored as JSON.
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "dimensions": { "x": 3, "y": 3, "z": 3 },
//!   "blocks": [
//!     { "position": [1, 1, 1], "block_type": "FuelCell", "name": "LEU-235 Oxide" }
//!   ]
//! }
//! ```
//!
//! A fuel cell stores its fuel as `name`; every other block stores its display
//! name. Derived pass state is never written.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use cgmath::{Point3, Vector3};
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};

use super::block::block_type::BlockType;
use super::block::Block;
use super::grid::Grid;

/// Newest layout format this crate reads and the one it writes.
pub const LAYOUT_FORMAT_VERSION: u32 = 1;

fn default_format_version() -> u32 {
    LAYOUT_FORMAT_VERSION
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDimensions {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl From<Vector3<i32>> for LayoutDimensions {
    fn from(dims: Vector3<i32>) -> Self {
        LayoutDimensions {
            x: dims.x,
            y: dims.y,
            z: dims.z,
        }
    }
}

impl From<LayoutDimensions> for Vector3<i32> {
    fn from(dims: LayoutDimensions) -> Self {
        Vector3::new(dims.x, dims.y, dims.z)
    }
}

/// One stored block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedBlock {
    pub position: [i32; 3],
    /// Block type key, e.g. `"Moderator"`.
    pub block_type: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    pub dimensions: LayoutDimensions,
    #[serde(default)]
    pub blocks: Vec<PlacedBlock>,
}

impl Layout {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let layout = Self::from_json_str(&fs::read_to_string(path)?)?;
        info!(
            "Read layout {} ({} blocks)",
            path.display(),
            layout.blocks.len()
        );
        Ok(layout)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json_string()?)?;
        info!("Saved layout {} ({} blocks)", path.display(), self.blocks.len());
        Ok(())
    }

    /// Captures the placed blocks of `grid`, sorted by position.
    pub fn from_grid(grid: &Grid) -> Self {
        let mut blocks: Vec<PlacedBlock> = grid
            .occupied_blocks()
            .map(|block| {
                let position = block.position();
                PlacedBlock {
                    position: [position.x, position.y, position.z],
                    block_type: block.block_type().key().to_string(),
                    name: block.variant_key().to_string(),
                }
            })
            .collect();
        blocks.sort_by_key(|block| block.position);

        Layout {
            format_version: LAYOUT_FORMAT_VERSION,
            dimensions: grid.dims().into(),
            blocks,
        }
    }

    /// Builds a fresh grid holding every stored block.
    ///
    /// The grid has not been through a pass yet.
    ///
    /// # Errors
    /// * `PlannerError::Validation` for a newer format version, non-positive
    ///   dimensions, unknown or Air block types, positions outside the interior
    ///   and duplicate positions
    /// * `PlannerError::Configuration` for names `config` does not know
    pub fn build_grid(&self, config: &PlannerConfig) -> Result<Grid> {
        if self.format_version > LAYOUT_FORMAT_VERSION {
            return Err(PlannerError::validation(format!(
                "layout format {} is newer than the supported format {}",
                self.format_version, LAYOUT_FORMAT_VERSION
            )));
        }

        let mut grid = Grid::new(self.dimensions.into())?;
        let mut seen = HashSet::with_capacity(self.blocks.len());

        for placed in &self.blocks {
            let [x, y, z] = placed.position;
            let position = Point3::new(x, y, z);

            let block_type = BlockType::from_key(&placed.block_type).ok_or_else(|| {
                PlannerError::validation(format!(
                    "unknown block type {:?} at ({}, {}, {})",
                    placed.block_type, x, y, z
                ))
            })?;
            if block_type == BlockType::Air {
                return Err(PlannerError::validation(format!(
                    "layouts store no Air, found one at ({}, {}, {})",
                    x, y, z
                )));
            }
            if !grid.contains(position) {
                return Err(PlannerError::validation(format!(
                    "block at ({}, {}, {}) lies outside the {}x{}x{} interior",
                    x, y, z, self.dimensions.x, self.dimensions.y, self.dimensions.z
                )));
            }
            if !seen.insert(placed.position) {
                return Err(PlannerError::validation(format!(
                    "two blocks share position ({}, {}, {})",
                    x, y, z
                )));
            }

            grid.set_block(Block::from_config(block_type, &placed.name, position, config)?)?;
        }

        Ok(grid)
    }
}
