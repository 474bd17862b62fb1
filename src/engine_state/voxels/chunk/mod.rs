//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a dense `width × height × width` grid
//! of voxel cells at one horizontal chunk coordinate. A chunk owns its own
//! generation passes (see `chunk_generation`) and builds the instanced draw
//! batches the host renders.
//!
//! ## Storage
//!
//! Cells live in one flat vector in row-major order, X fastest, then Z, then Y:
//!
//! ```text
//! index = x + width * (z + width * y)
//! ```
//!
//! Every cell is stored, Empty included, so reads and writes are O(1). Solidity
//! for occlusion culling is copied into a padded bit mask at mesh time (see
//! [`OcclusionMask`]), which keeps the neighbour checks free of bounds tests.
//!
//! ## Visuals
//!
//! A chunk is pure data. The host may attach an opaque [`VisualHandle`]; the
//! chunk pushes its current mesh into it on [`Chunk::sync_visual`] and hands it
//! back on [`Chunk::release_visual`].

use cgmath::Point3;
use log::trace;

use super::block::block_type::BlockId;
use super::block::VoxelCell;
use super::generation::GenerationParams;
use super::world::ChunkCoord;
use crate::engine_state::rendering::instancing::{ChunkMesh, MeshBuilder, OcclusionMask};
use crate::engine_state::rendering::visual::VisualHandle;
use chunk_iteration::SolidCellIterator;

mod chunk_generation;
pub mod chunk_iteration;

/// The extent of a chunk in blocks.
///
/// `width` is shared by X and Z. `height` is world-global: every chunk spans the
/// full vertical extent of the world.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkDims {
    /// Edge length along X and Z.
    pub width: usize,
    /// Extent along Y.
    pub height: usize,
}

impl ChunkDims {
    /// Creates a new set of dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        ChunkDims { width, height }
    }

    /// Number of cells in one chunk.
    #[inline]
    pub fn volume(&self) -> usize {
        self.width * self.width * self.height
    }

    /// `true` if the local coordinate lies inside the grid.
    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && (z as usize) < self.width
    }

    /// Converts a local coordinate to a storage index.
    ///
    /// # Returns
    /// `None` if the coordinate is outside the grid.
    #[inline]
    pub fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.contains(x, y, z) {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        Some(x + self.width * (z + self.width * y))
    }

    /// Converts a storage index back to a local coordinate.
    #[inline]
    pub fn position_of(&self, index: usize) -> Point3<usize> {
        let x = index % self.width;
        let z = (index / self.width) % self.width;
        let y = index / (self.width * self.width);
        Point3::new(x, y, z)
    }
}

/// One column-aligned section of the world.
pub struct Chunk {
    /// Position in chunk coordinates (not block coordinates).
    coord: ChunkCoord,

    /// Grid extent.
    dims: ChunkDims,

    /// Parameters the generation passes read.
    params: GenerationParams,

    /// Every cell of the grid, see the module docs for the layout.
    cells: Vec<VoxelCell>,

    /// The current draw batches, if meshes have been generated.
    mesh: Option<ChunkMesh>,

    /// How many times `generate_meshes` has run.
    mesh_generation: u64,

    /// Host-side representation of this chunk.
    visual: Option<Box<dyn VisualHandle>>,
}

impl Chunk {
    /// Creates a new, completely empty chunk.
    ///
    /// # Arguments
    /// * `coord` - The chunk coordinates of the new chunk
    /// * `dims` - Grid extent
    /// * `params` - Generation parameters used by the generation passes
    ///
    /// # Returns
    /// A new `Chunk` filled with Empty cells and no mesh.
    pub fn new(coord: ChunkCoord, dims: ChunkDims, params: GenerationParams) -> Self {
        Chunk {
            coord,
            dims,
            params,
            cells: vec![VoxelCell::EMPTY; dims.volume()],
            mesh: None,
            mesh_generation: 0,
            visual: None,
        }
    }

    /// The chunk coordinate.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// The grid extent.
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// The generation parameters this chunk was created with.
    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Block coordinate of local `(0, 0, 0)`.
    pub fn world_origin(&self) -> Point3<i32> {
        let width = self.dims.width as i32;
        Point3::new(self.coord.x * width, 0, self.coord.z * width)
    }

    /// `true` if the world column `(x, z)` falls inside this chunk.
    pub fn contains_world_column(&self, x: i32, z: i32) -> bool {
        let origin = self.world_origin();
        let width = self.dims.width as i32;
        (origin.x..origin.x + width).contains(&x) && (origin.z..origin.z + width).contains(&z)
    }

    /// Gets the cell at the specified chunk-relative coordinates.
    ///
    /// # Returns
    /// `None` if the coordinates are out of range. This is distinct from
    /// `Some` cell holding [`BlockId::Empty`].
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<&VoxelCell> {
        self.dims.index(x, y, z).map(|index| &self.cells[index])
    }

    /// Sets the block id at the specified chunk-relative coordinates.
    ///
    /// The cell's render slot is cleared; it is reassigned by the next mesh build.
    /// Out-of-range writes are ignored.
    ///
    /// # Returns
    /// `true` if the write landed inside the grid.
    pub fn set_block_id(&mut self, x: i32, y: i32, z: i32, id: BlockId) -> bool {
        match self.dims.index(x, y, z) {
            Some(index) => {
                self.cells[index] = VoxelCell::new(id);
                true
            }
            None => false,
        }
    }

    /// The block id at `(x, y, z)`, or `None` out of range.
    #[inline]
    pub fn block_id(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        self.get_block(x, y, z).map(|cell| cell.id)
    }

    /// The instance slot of the cell at `(x, y, z)` in the current mesh.
    pub fn render_slot(&self, x: i32, y: i32, z: i32) -> Option<u32> {
        self.get_block(x, y, z).and_then(|cell| cell.render_slot)
    }

    /// Topmost ground block in the local column `(x, z)`, plus one.
    ///
    /// Ground blocks are Grass, Dirt and Stone. Returns 0 if the column has none
    /// or lies outside the chunk.
    pub fn get_ground_height(&self, x: i32, z: i32) -> i32 {
        (0..self.dims.height as i32)
            .rev()
            .find(|&y| self.block_id(x, y, z).is_some_and(BlockId::is_ground))
            .map_or(0, |y| y + 1)
    }

    /// Iterates every non-Empty cell in storage order.
    pub fn iter_solid(&self) -> SolidCellIterator<'_> {
        SolidCellIterator::new(self)
    }

    /// The cells in storage order.
    pub fn cells(&self) -> &[VoxelCell] {
        &self.cells
    }

    /// The current draw batches.
    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    /// How many times meshes have been generated for this chunk.
    pub fn mesh_generation(&self) -> u64 {
        self.mesh_generation
    }

    /// Rebuilds the instanced draw batches from scratch.
    ///
    /// Every render slot from the previous build is invalidated. A cell is drawn
    /// unless all six face neighbours are solid; neighbours outside the chunk
    /// count as Empty. Each drawn cell is anchored at its centre
    /// `(x + 0.5, y + 0.5, z + 0.5)` and records its slot in its block's batch.
    pub fn generate_meshes(&mut self) {
        let dims = self.dims;
        let mask = OcclusionMask::from_cells(dims, &self.cells);
        let mut builder = MeshBuilder::new(dims.volume());

        for (index, cell) in self.cells.iter_mut().enumerate() {
            cell.render_slot = None;
            if cell.id.is_empty() {
                continue;
            }
            let position = dims.position_of(index);
            if mask.is_occluded(position.x, position.y, position.z) {
                continue;
            }
            let centre = [
                position.x as f32 + 0.5,
                position.y as f32 + 0.5,
                position.z as f32 + 0.5,
            ];
            cell.render_slot = Some(builder.push(cell.id, centre));
        }

        let mesh = builder.finish();
        trace!(
            "Meshed chunk {}: {} instances in {} batches",
            self.coord,
            mesh.instance_count(),
            mesh.batches().len()
        );
        self.mesh = Some(mesh);
        self.mesh_generation += 1;
    }

    /// Gives the chunk a host-side visual. Any previous handle is released.
    pub fn attach_visual(&mut self, visual: Box<dyn VisualHandle>) {
        self.release_visual();
        self.visual = Some(visual);
    }

    /// Pushes the current mesh into the attached visual, if both exist.
    pub fn sync_visual(&mut self) {
        if let (Some(visual), Some(mesh)) = (self.visual.as_mut(), self.mesh.as_ref()) {
            visual.sync(self.coord, mesh);
        }
    }

    /// Detaches and releases the visual, if any.
    pub fn release_visual(&mut self) {
        if let Some(mut visual) = self.visual.take() {
            visual.release(self.coord);
        }
    }

    /// `true` if a visual is attached.
    pub fn has_visual(&self) -> bool {
        self.visual.is_some()
    }
}

impl Drop for Chunk {
    fn drop(&mut self) {
        self.release_visual();
    }
}
