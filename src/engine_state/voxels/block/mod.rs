//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel world.
//! It includes block identifiers, block faces, the static block registry and the
//! per-cell data stored in chunks.

use block_type::BlockId;

pub mod block_side;
pub mod block_type;
pub mod registry;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Represents a single voxel cell in a chunk.
///
/// `render_slot` is a back-reference into the chunk's current instance batch for
/// this cell's block type. It is only meaningful while that batch exists: every
/// mesh rebuild clears and reassigns all slots at once.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VoxelCell {
    /// The block occupying this cell.
    pub id: BlockId,
    /// Instance index in the current batch, if the cell was drawn.
    pub render_slot: Option<u32>,
}

impl VoxelCell {
    /// An empty cell with no render slot.
    pub const EMPTY: VoxelCell = VoxelCell {
        id: BlockId::Empty,
        render_slot: None,
    };

    /// Creates a cell holding `id` with no render slot.
    pub fn new(id: BlockId) -> Self {
        VoxelCell {
            id,
            render_slot: None,
        }
    }

    /// `true` unless the cell is [`BlockId::Empty`].
    #[inline]
    pub fn is_solid(&self) -> bool {
        !self.id.is_empty()
    }
}

impl Default for VoxelCell {
    fn default() -> Self {
        VoxelCell::EMPTY
    }
}
