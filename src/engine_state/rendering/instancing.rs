//! Instanced draw batches and the occlusion mask used to build them.
//!
//! A chunk is drawn as one batch of unit-cube instances per block type. Only
//! cells with at least one Empty face neighbour get an instance.

use bitvec::prelude::BitVec;

use crate::engine_state::voxels::block::block_type::BlockId;
use crate::engine_state::voxels::block::VoxelCell;
use crate::engine_state::voxels::chunk::ChunkDims;

/// Per-instance data uploaded to the host renderer.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes), the cell centre in chunk-local space
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// Centre of the cell, relative to the chunk's world origin
    pub position: [f32; 3],
}

/// All visible instances of one block type in one chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceBatch {
    /// The block every instance shows.
    pub block: BlockId,
    /// Maximum number of instances the batch could ever hold (the chunk volume).
    pub capacity: usize,
    /// Instance data; an instance's index is its render slot.
    pub instances: Vec<InstanceRaw>,
}

impl InstanceBatch {
    /// Creates an empty batch.
    pub fn new(block: BlockId, capacity: usize) -> Self {
        InstanceBatch {
            block,
            capacity,
            instances: Vec::new(),
        }
    }

    /// Appends an instance and returns its slot.
    pub fn push(&mut self, position: [f32; 3]) -> u32 {
        let slot = self.instances.len() as u32;
        self.instances.push(InstanceRaw { position });
        slot
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// `true` if no instances were pushed.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// The instances as a flat `[x0, y0, z0, x1, ...]` buffer.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

/// The full renderable representation of one chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    /// Non-empty batches, ordered by block id.
    batches: Vec<InstanceBatch>,
}

impl ChunkMesh {
    /// The batches, ordered by block id.
    pub fn batches(&self) -> &[InstanceBatch] {
        &self.batches
    }

    /// The batch for `block`, if any of its cells are visible.
    pub fn batch(&self, block: BlockId) -> Option<&InstanceBatch> {
        self.batches.iter().find(|batch| batch.block == block)
    }

    /// Total instances across all batches.
    pub fn instance_count(&self) -> usize {
        self.batches.iter().map(InstanceBatch::len).sum()
    }

    /// `true` if nothing in the chunk is visible.
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

/// Collects instances into per-block batches during a mesh build.
pub struct MeshBuilder {
    /// Indexed by `BlockId::index`; Empty never gets a batch.
    batches: Vec<Option<InstanceBatch>>,
    capacity: usize,
}

impl MeshBuilder {
    /// Starts a build for a chunk holding at most `capacity` solid cells.
    pub fn new(capacity: usize) -> Self {
        MeshBuilder {
            batches: vec![None; BlockId::COUNT],
            capacity,
        }
    }

    /// Adds an instance of `block` and returns its render slot.
    pub fn push(&mut self, block: BlockId, position: [f32; 3]) -> u32 {
        let capacity = self.capacity;
        self.batches[block.index()]
            .get_or_insert_with(|| InstanceBatch::new(block, capacity))
            .push(position)
    }

    /// Finishes the build, discarding empty batches.
    pub fn finish(self) -> ChunkMesh {
        ChunkMesh {
            batches: self
                .batches
                .into_iter()
                .flatten()
                .filter(|batch| !batch.is_empty())
                .collect(),
        }
    }
}

/// One solidity bit per cell, padded by a clear border on every side.
///
/// The mask is `(width + 2) × (height + 2) × (width + 2)`; the border is never
/// set, so neighbours outside the chunk read as Empty without bounds checks.
pub struct OcclusionMask {
    solid_array: BitVec,
    width_wrapped: usize,
    plane_wrapped: usize,
}

impl OcclusionMask {
    /// Builds the mask from a chunk's cells (storage order, see [`ChunkDims`]).
    pub fn from_cells(dims: ChunkDims, cells: &[VoxelCell]) -> Self {
        let width_wrapped = dims.width + 2;
        let plane_wrapped = width_wrapped * width_wrapped;
        let mut mask = OcclusionMask {
            solid_array: BitVec::repeat(false, plane_wrapped * (dims.height + 2)),
            width_wrapped,
            plane_wrapped,
        };
        for (index, cell) in cells.iter().enumerate() {
            if cell.is_solid() {
                let p = dims.position_of(index);
                let wrapped = mask.wrapped_index(p.x + 1, p.y + 1, p.z + 1);
                mask.solid_array.set(wrapped, true);
            }
        }
        mask
    }

    #[inline]
    fn wrapped_index(&self, i: usize, j: usize, k: usize) -> usize {
        i + self.width_wrapped * k + self.plane_wrapped * j
    }

    /// Checks the solidity bit of a padded coordinate.
    #[inline]
    fn is_block_solid(&self, i: usize, j: usize, k: usize) -> bool {
        self.solid_array[self.wrapped_index(i, j, k)]
    }

    /// `true` if all six face neighbours of local `(x, y, z)` are solid.
    pub fn is_occluded(&self, x: usize, y: usize, z: usize) -> bool {
        // Accounts for the padding
        let (i, j, k) = (x + 1, y + 1, z + 1);
        self.is_block_solid(i - 1, j, k)
            && self.is_block_solid(i + 1, j, k)
            && self.is_block_solid(i, j - 1, k)
            && self.is_block_solid(i, j + 1, k)
            && self.is_block_solid(i, j, k - 1)
            && self.is_block_solid(i, j, k + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_drops_empty_batches_and_orders_by_id() {
        let mut builder = MeshBuilder::new(64);
        assert_eq!(builder.push(BlockId::Wood, [0.5, 0.5, 0.5]), 0);
        assert_eq!(builder.push(BlockId::Dirt, [1.5, 0.5, 0.5]), 0);
        assert_eq!(builder.push(BlockId::Wood, [2.5, 0.5, 0.5]), 1);
        let mesh = builder.finish();

        let blocks: Vec<_> = mesh.batches().iter().map(|b| b.block).collect();
        assert_eq!(blocks, vec![BlockId::Dirt, BlockId::Wood]);
        assert_eq!(mesh.instance_count(), 3);
        assert!(mesh.batch(BlockId::Stone).is_none());
        assert_eq!(mesh.batch(BlockId::Wood).unwrap().capacity, 64);
    }

    #[test]
    fn mask_border_reads_empty() {
        let dims = ChunkDims::new(1, 1);
        let mask = OcclusionMask::from_cells(dims, &[VoxelCell::new(BlockId::Stone)]);
        assert!(!mask.is_occluded(0, 0, 0));
    }

    #[test]
    fn floats_follow_instance_order() {
        let mut batch = InstanceBatch::new(BlockId::Cloud, 8);
        batch.push([0.5, 1.5, 2.5]);
        batch.push([3.5, 4.5, 5.5]);
        assert_eq!(batch.as_floats(), &[0.5, 1.5, 2.5, 3.5, 4.5, 5.5]);
    }
}
