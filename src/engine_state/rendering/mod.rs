//! Renderer-facing side of the voxel engine.
//!
//! This module turns chunk data into something a host renderer can draw without
//! depending on any particular graphics API:
//!
//! * `instancing` - per-block instance batches and the occlusion mask
//! * `appearance` - per-block textures, tints and material flags
//! * `visual` - the traits a host implements to receive chunk meshes

pub mod appearance;
pub mod instancing;
pub mod visual;

// Re-export commonly used types
pub use appearance::BlockAppearance;
pub use instancing::{ChunkMesh, InstanceBatch, InstanceRaw};
pub use visual::{VisualFactory, VisualHandle};
