//! Host-side visuals for chunks.
//!
//! The voxel core never talks to a renderer directly. A host that wants to draw
//! the world supplies a [`VisualFactory`]; the world asks it for one
//! [`VisualHandle`] per loaded chunk, pushes every rebuilt [`ChunkMesh`] into
//! that handle and releases it when the chunk unloads.

use cgmath::Point3;

use super::instancing::ChunkMesh;
use crate::engine_state::voxels::world::ChunkCoord;

/// An opaque, host-owned representation of one chunk (a scene-graph group,
/// a set of GPU instance buffers, ...).
pub trait VisualHandle {
    /// Replaces whatever the handle shows with `mesh`.
    fn sync(&mut self, coord: ChunkCoord, mesh: &ChunkMesh);

    /// Called once when the chunk unloads; detach from the scene here.
    fn release(&mut self, _coord: ChunkCoord) {}
}

/// Creates visuals for newly loaded chunks.
pub trait VisualFactory {
    /// Creates the handle for the chunk at `coord` whose local origin sits at
    /// block coordinate `origin`.
    fn create(&mut self, coord: ChunkCoord, origin: Point3<i32>) -> Box<dyn VisualHandle>;
}
