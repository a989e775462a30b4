//! # Block Type Module
//!
//! This module defines the closed set of block types a reactor can contain and
//! the string keys used for them in persisted layouts.

use std::fmt;

use phf::phf_map;
use serde::{Deserialize, Serialize};

/// Enumerates every kind of block that can occupy a reactor cell.
///
/// `BlockType` is the field-less tag of [`BlockKind`](super::BlockKind); it is
/// what line walks report and what placement rules count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockType {
    /// An empty cell. Opaque to neutron lines.
    Air,

    /// A fuel cell holding one configured fuel.
    FuelCell,

    /// A moderator. The only block neutron lines pass through.
    Moderator,

    /// A reflector, which bounces a line back when it sits close enough to the source.
    Reflector,

    /// A heat sink or conductor.
    HeatSink,

    /// An interior casing block. Every position of the casing ring counts as one too.
    Casing,
}

/// Persisted layout keys for each block type.
///
/// Both the canonical name and a few spellings seen in older save files are accepted.
static BLOCK_TYPE_KEYS: phf::Map<&'static str, BlockType> = phf_map! {
    "Air" => BlockType::Air,
    "FuelCell" => BlockType::FuelCell,
    "Fuel Cell" => BlockType::FuelCell,
    "Moderator" => BlockType::Moderator,
    "Reflector" => BlockType::Reflector,
    "HeatSink" => BlockType::HeatSink,
    "Heat Sink" => BlockType::HeatSink,
    "Conductor" => BlockType::HeatSink,
    "Casing" => BlockType::Casing,
};

impl BlockType {
    /// Every block type, in declaration order.
    pub const ALL: [BlockType; 6] = [
        BlockType::Air,
        BlockType::FuelCell,
        BlockType::Moderator,
        BlockType::Reflector,
        BlockType::HeatSink,
        BlockType::Casing,
    ];

    /// Looks up a block type from its persisted key.
    ///
    /// # Returns
    /// `None` when the key is not a known block type.
    pub fn from_key(key: &str) -> Option<Self> {
        BLOCK_TYPE_KEYS.get(key).copied()
    }

    /// The canonical persisted key of this block type.
    pub fn key(self) -> &'static str {
        match self {
            BlockType::Air => "Air",
            BlockType::FuelCell => "FuelCell",
            BlockType::Moderator => "Moderator",
            BlockType::Reflector => "Reflector",
            BlockType::HeatSink => "HeatSink",
            BlockType::Casing => "Casing",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_keys_parse_back() {
        for block_type in BlockType::ALL {
            assert_eq!(BlockType::from_key(block_type.key()), Some(block_type));
        }
    }

    #[test]
    fn legacy_spellings_are_accepted() {
        assert_eq!(BlockType::from_key("Fuel Cell"), Some(BlockType::FuelCell));
        assert_eq!(BlockType::from_key("Conductor"), Some(BlockType::HeatSink));
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert_eq!(BlockType::from_key("Cryotheum"), None);
        assert_eq!(BlockType::from_key("moderator"), None);
    }
}
