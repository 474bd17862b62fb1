//! # Chunk Iteration Module
//!
//! This module provides an iterator for traversing all non-Empty cells of a
//! chunk in storage order (X fastest, then Z, then Y), together with their
//! chunk-local positions.

use cgmath::Point3;

use crate::engine_state::voxels::block::VoxelCell;

use super::{Chunk, ChunkDims};

/// An iterator over all non-Empty cells in a chunk.
///
/// The iterator keeps a single offset into the chunk's cell vector and derives
/// each position from it, skipping Empty cells as it goes.
pub struct SolidCellIterator<'a> {
    /// The cells being iterated over
    cells: &'a [VoxelCell],
    /// Grid extent, used to turn offsets into positions
    dims: ChunkDims,
    /// Offset of the next cell to inspect
    current_offset: usize,
}

impl<'a> SolidCellIterator<'a> {
    /// Creates a new `SolidCellIterator` for the given chunk.
    ///
    /// # Arguments
    /// * `chunk_ref` - A reference to the chunk to iterate over
    ///
    /// # Returns
    /// A new `SolidCellIterator` positioned before the first cell
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        SolidCellIterator {
            cells: chunk_ref.cells(),
            dims: chunk_ref.dims(),
            current_offset: 0,
        }
    }
}

impl<'a> Iterator for SolidCellIterator<'a> {
    type Item = (Point3<usize>, &'a VoxelCell);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(cell) = self.cells.get(self.current_offset) {
            let offset = self.current_offset;
            self.current_offset += 1;
            if cell.is_solid() {
                return Some((self.dims.position_of(offset), cell));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.cells.len() - self.current_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockId;
    use crate::engine_state::voxels::generation::GenerationParams;
    use crate::engine_state::voxels::world::ChunkCoord;

    #[test]
    fn yields_solid_cells_in_storage_order() {
        let mut chunk = Chunk::new(
            ChunkCoord::new(0, 0),
            ChunkDims::new(4, 4),
            GenerationParams::default(),
        );
        chunk.set_block_id(3, 2, 0, BlockId::Wood);
        chunk.set_block_id(1, 0, 2, BlockId::Dirt);
        chunk.set_block_id(0, 0, 0, BlockId::Grass);

        let visited: Vec<_> = chunk
            .iter_solid()
            .map(|(p, cell)| (p.x, p.y, p.z, cell.id))
            .collect();
        assert_eq!(
            visited,
            vec![
                (0, 0, 0, BlockId::Grass),
                (1, 0, 2, BlockId::Dirt),
                (3, 2, 0, BlockId::Wood),
            ]
        );
    }
}
