//! # Block Type Module
//!
//! This module defines the identifiers of every block in the voxel world.
//! It provides conversion from the compact storage integer and from the
//! lowercase names used in configuration files.

use std::fmt;

use num_derive::{FromPrimitive, ToPrimitive};

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminants are the stable integer tags used on the wire to the host
/// renderer and in configuration. `FromPrimitive` allows conversion back from
/// those integers.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive, ToPrimitive)]
pub enum BlockId {
    /// Absence of solid matter.
    Empty = 0,

    /// Surface block placed on top of every terrain column.
    Grass = 1,

    /// Sub-surface filler produced by terrain generation.
    Dirt = 2,

    /// Placed by resource generation and used for cabin floors and bunkers.
    Stone = 3,

    /// Coal ore.
    Coal = 4,

    /// Iron ore.
    Iron = 5,

    /// Tree trunks and cabin walls.
    Wood = 6,

    /// Tree canopies and cabin roofs.
    Leaves = 7,

    /// Cloud layer near the top of the world.
    Cloud = 8,

    /// Light source hung from bunker ceilings.
    Lamp = 9,
}

/// Lookup from configuration names to block identifiers.
static BLOCK_NAMES: phf::Map<&'static str, BlockId> = phf::phf_map! {
    "empty" => BlockId::Empty,
    "grass" => BlockId::Grass,
    "dirt" => BlockId::Dirt,
    "stone" => BlockId::Stone,
    "coal" => BlockId::Coal,
    "iron" => BlockId::Iron,
    "wood" => BlockId::Wood,
    "leaves" => BlockId::Leaves,
    "cloud" => BlockId::Cloud,
    "lamp" => BlockId::Lamp,
};

impl BlockId {
    /// Every block identifier in discriminant order.
    pub const ALL: [BlockId; 10] = [
        BlockId::Empty,
        BlockId::Grass,
        BlockId::Dirt,
        BlockId::Stone,
        BlockId::Coal,
        BlockId::Iron,
        BlockId::Wood,
        BlockId::Leaves,
        BlockId::Cloud,
        BlockId::Lamp,
    ];

    /// Number of distinct block identifiers.
    pub const COUNT: usize = Self::ALL.len();

    /// Converts a `BlockTypeSize` to a `BlockId`.
    ///
    /// # Returns
    /// `None` if the integer does not name a block.
    pub fn from_u8(btype: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(btype)
    }

    /// Resolves a lowercase configuration name such as `"coal"`.
    pub fn from_name(name: &str) -> Option<Self> {
        BLOCK_NAMES.get(name).copied()
    }

    /// The lowercase name accepted by [`BlockId::from_name`].
    pub fn name(self) -> &'static str {
        BLOCK_NAMES
            .entries()
            .find(|(_, id)| **id == self)
            .map(|(name, _)| *name)
            .unwrap_or("empty")
    }

    /// The compact storage form of this identifier.
    #[inline]
    pub fn as_u8(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Index into per-block tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// `true` for [`BlockId::Empty`].
    #[inline]
    pub fn is_empty(self) -> bool {
        self == BlockId::Empty
    }

    /// Blocks that count as terrain when searching for the ground surface.
    #[inline]
    pub fn is_ground(self) -> bool {
        matches!(self, BlockId::Grass | BlockId::Dirt | BlockId::Stone)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_tags_round_trip() {
        for id in BlockId::ALL {
            assert_eq!(BlockId::from_u8(id.as_u8()), Some(id));
        }
        assert_eq!(BlockId::from_u8(BlockId::COUNT as u8), None);
    }

    #[test]
    fn names_resolve() {
        assert_eq!(BlockId::from_name("iron"), Some(BlockId::Iron));
        assert_eq!(BlockId::from_name("obsidian"), None);
        assert_eq!(BlockId::Lamp.name(), "lamp");
    }

    #[test]
    fn ground_blocks() {
        assert!(BlockId::Grass.is_ground());
        assert!(BlockId::Stone.is_ground());
        assert!(!BlockId::Wood.is_ground());
        assert!(!BlockId::Coal.is_ground());
        assert!(!BlockId::Empty.is_ground());
    }
}
