//! # Block Module
//!
//! This module provides the block model of the reactor lattice: one [`Block`]
//! per cell, carrying its display name, its position and a closed
//! [`BlockKind`] variant with the per-type state.
//!
//! Blocks never hold references to their neighbours. Every adjacency question
//! is answered by looking positions up in the [`Grid`](super::grid::Grid), which
//! owns all blocks.
//!
//! ## Per-pass State
//!
//! Variant fields such as a moderator's `active` flag or a fuel cell's flux are
//! derived. [`Block::revert_to_setup`] clears them at the start of every pass,
//! and they are never persisted.

use cgmath::Point3;

use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use block_type::BlockType;
use fuel_cell::FuelCell;
use heat_sink::HeatSink;
use moderator::Moderator;
use reflector::Reflector;

pub mod block_side;
pub mod block_type;
pub mod fuel_cell;
pub mod heat_sink;
pub mod moderator;
pub mod reflector;

/// Display name shared by every fuel cell; the fuel itself is kept on the variant.
pub const FUEL_CELL_NAME: &str = "Fuel Cell";
/// Display name of casing blocks.
pub const CASING_NAME: &str = "Casing";

/// The "no block" position carried by the air sentinel.
pub const NO_POSITION: Point3<i32> = Point3 { x: 0, y: 0, z: 0 };

/// Returned by grid lookups that fall outside the interior.
pub static AIR_SENTINEL: Block = Block {
    display_name: String::new(),
    position: NO_POSITION,
    kind: BlockKind::Air,
};

/// The variant-specific part of a block.
#[derive(Clone, Debug, PartialEq)]
pub enum BlockKind {
    Air,
    FuelCell(FuelCell),
    Moderator(Moderator),
    Reflector(Reflector),
    HeatSink(HeatSink),
    Casing,
}

/// A single positioned block of the reactor.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    display_name: String,
    position: Point3<i32>,
    kind: BlockKind,
}

impl Block {
    /// Creates an air block at `position`.
    pub fn air(position: Point3<i32>) -> Self {
        Block {
            display_name: String::new(),
            position,
            kind: BlockKind::Air,
        }
    }

    /// Creates a casing block at `position`.
    pub fn casing(position: Point3<i32>) -> Self {
        Block {
            display_name: CASING_NAME.to_string(),
            position,
            kind: BlockKind::Casing,
        }
    }

    /// Builds a block of `block_type` from its configured figures.
    ///
    /// # Arguments
    /// * `block_type` - The kind of block to build
    /// * `name` - The display name, or the fuel name for fuel cells
    /// * `position` - Where the block will be placed
    /// * `config` - The tables the figures are read from
    ///
    /// # Errors
    /// `PlannerError::Configuration` when `name` has no entry for `block_type`.
    pub fn from_config(
        block_type: BlockType,
        name: &str,
        position: Point3<i32>,
        config: &PlannerConfig,
    ) -> Result<Self> {
        let missing = || PlannerError::Configuration {
            block_type,
            name: name.to_string(),
        };

        let (display_name, kind) = match block_type {
            BlockType::Air => return Ok(Block::air(position)),
            BlockType::Casing => return Ok(Block::casing(position)),
            BlockType::FuelCell => {
                let stats = config.fuels.get(name).ok_or_else(missing)?;
                (
                    FUEL_CELL_NAME.to_string(),
                    BlockKind::FuelCell(FuelCell::new(name, *stats)),
                )
            }
            BlockType::Moderator => {
                let stats = config.moderators.get(name).ok_or_else(missing)?;
                (name.to_string(), BlockKind::Moderator(Moderator::new(stats)))
            }
            BlockType::Reflector => {
                let stats = config.reflectors.get(name).ok_or_else(missing)?;
                (name.to_string(), BlockKind::Reflector(Reflector::new(stats)))
            }
            BlockType::HeatSink => {
                let stats = config.heat_sinks.get(name).ok_or_else(missing)?;
                (name.to_string(), BlockKind::HeatSink(HeatSink::new(stats)))
            }
        };

        Ok(Block {
            display_name,
            position,
            kind,
        })
    }

    pub fn block_type(&self) -> BlockType {
        match self.kind {
            BlockKind::Air => BlockType::Air,
            BlockKind::FuelCell(_) => BlockType::FuelCell,
            BlockKind::Moderator(_) => BlockType::Moderator,
            BlockKind::Reflector(_) => BlockType::Reflector,
            BlockKind::HeatSink(_) => BlockType::HeatSink,
            BlockKind::Casing => BlockType::Casing,
        }
    }

    pub fn display_name(&self) -> &str {
        match self.kind {
            BlockKind::Air => "Air",
            _ => &self.display_name,
        }
    }

    /// The name a layout stores for this block: the fuel for fuel cells,
    /// the display name for everything else.
    pub fn variant_key(&self) -> &str {
        match &self.kind {
            BlockKind::FuelCell(cell) => cell.fuel(),
            _ => self.display_name(),
        }
    }

    pub fn position(&self) -> Point3<i32> {
        self.position
    }

    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut BlockKind {
        &mut self.kind
    }

    pub fn is_air(&self) -> bool {
        matches!(self.kind, BlockKind::Air)
    }

    /// Whether the block currently counts as valid.
    ///
    /// Air is never valid and casings always are. The other variants answer
    /// from the state of the last pass.
    pub fn is_valid(&self) -> bool {
        match &self.kind {
            BlockKind::Air => false,
            BlockKind::FuelCell(cell) => cell.is_valid(),
            BlockKind::Moderator(moderator) => moderator.is_valid(),
            BlockKind::Reflector(reflector) => reflector.is_valid(),
            BlockKind::HeatSink(sink) => sink.is_valid(),
            BlockKind::Casing => true,
        }
    }

    /// Clears every value derived by a pass.
    pub fn revert_to_setup(&mut self) {
        match &mut self.kind {
            BlockKind::FuelCell(cell) => cell.revert_to_setup(),
            BlockKind::Moderator(moderator) => moderator.revert_to_setup(),
            BlockKind::Reflector(reflector) => reflector.revert_to_setup(),
            BlockKind::HeatSink(sink) => sink.revert_to_setup(),
            BlockKind::Air | BlockKind::Casing => {}
        }
    }

    /// The same configured block at another position, with no pass state.
    pub fn copy_to(&self, position: Point3<i32>) -> Block {
        let mut copy = Block {
            display_name: self.display_name.clone(),
            position,
            kind: self.kind.clone(),
        };
        copy.revert_to_setup();
        copy
    }

    /// Re-reads the static figures of this block from `config`.
    ///
    /// # Errors
    /// `PlannerError::Configuration` when the block's name vanished from `config`.
    pub fn reload_values_from_config(&mut self, config: &PlannerConfig) -> Result<()> {
        let block_type = self.block_type();
        let missing = |name: &str| PlannerError::Configuration {
            block_type,
            name: name.to_string(),
        };

        match &mut self.kind {
            BlockKind::FuelCell(cell) => {
                let stats = config.fuels.get(cell.fuel()).ok_or_else(|| missing(cell.fuel()))?;
                cell.reload(*stats);
            }
            BlockKind::Moderator(moderator) => {
                let stats = config
                    .moderators
                    .get(&self.display_name)
                    .ok_or_else(|| missing(&self.display_name))?;
                moderator.reload(stats);
            }
            BlockKind::Reflector(reflector) => {
                let stats = config
                    .reflectors
                    .get(&self.display_name)
                    .ok_or_else(|| missing(&self.display_name))?;
                reflector.reload(stats);
            }
            BlockKind::HeatSink(sink) => {
                let stats = config
                    .heat_sinks
                    .get(&self.display_name)
                    .ok_or_else(|| missing(&self.display_name))?;
                sink.reload(stats);
            }
            BlockKind::Air | BlockKind::Casing => {}
        }
        Ok(())
    }

    pub fn as_fuel_cell(&self) -> Option<&FuelCell> {
        match &self.kind {
            BlockKind::FuelCell(cell) => Some(cell),
            _ => None,
        }
    }

    pub fn as_moderator(&self) -> Option<&Moderator> {
        match &self.kind {
            BlockKind::Moderator(moderator) => Some(moderator),
            _ => None,
        }
    }

    pub fn as_reflector(&self) -> Option<&Reflector> {
        match &self.kind {
            BlockKind::Reflector(reflector) => Some(reflector),
            _ => None,
        }
    }
}
