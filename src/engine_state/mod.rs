//! # Engine State Module
//!
//! The per-frame driver around the voxel world.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the world and runs one frame at a time
//! * `rendering` - Instance batches, block appearance and the host visual traits
//! * `voxels` - Handles voxel data, chunks, and world generation
//!
//! ## Frame Order
//!
//! The world must catch up with the player before physics runs, because
//! collision queries the solidity of chunks that may have just been loaded.
//! [`EngineState::frame`] is therefore the first thing a host calls each frame.

use std::time::Duration;

use cgmath::{Point3, Vector3};
use log::{debug, trace};

use crate::config::WorldConfig;
use voxels::block::block_type::BlockId;
use voxels::world::{UpdateReport, World};

pub mod rendering;
pub mod voxels;

/// How far the player can reach when mining or placing, in blocks.
pub const INTERACTION_DISTANCE: f32 = 3.0;

/// An axis-aligned box in world space, used for the player's body.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Point3<f32>,
    /// Maximum corner.
    pub max: Point3<f32>,
}

impl BoundingBox {
    /// Creates a box from its corners.
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        BoundingBox { min, max }
    }

    /// A player-sized box standing at `feet`.
    pub fn player(feet: Point3<f32>, radius: f32, height: f32) -> Self {
        BoundingBox {
            min: Point3::new(feet.x - radius, feet.y, feet.z - radius),
            max: Point3::new(feet.x + radius, feet.y + height, feet.z + radius),
        }
    }

    /// `true` if the box overlaps the unit cube of `cell`. Touching faces do not count.
    pub fn overlaps_cell(&self, cell: Point3<i32>) -> bool {
        let lo = Point3::new(cell.x as f32, cell.y as f32, cell.z as f32);
        self.min.x < lo.x + 1.0
            && self.max.x > lo.x
            && self.min.y < lo.y + 1.0
            && self.max.y > lo.y
            && self.min.z < lo.z + 1.0
            && self.max.z > lo.z
    }
}

/// What one frame did.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Frame counter, starting at 1.
    pub frame: u64,
    /// Chunk streaming done this frame.
    pub update: UpdateReport,
    /// Wall time spent in the world this frame.
    pub world_time: Duration,
}

/// The main state container: the world plus the player-facing actions on it.
pub struct EngineState {
    /// The voxel world
    pub world: World,
    frames: u64,
}

impl EngineState {
    /// Creates an engine around a fresh world.
    pub fn new(config: WorldConfig) -> Self {
        Self::with_world(World::new(config))
    }

    /// Creates an engine around an existing world.
    pub fn with_world(world: World) -> Self {
        EngineState { world, frames: 0 }
    }

    /// Runs one frame: streams chunks around `player_position`.
    ///
    /// Call before resolving physics for the frame.
    pub fn frame(&mut self, player_position: Point3<f32>) -> FrameReport {
        let start = web_time::Instant::now();
        self.frames += 1;

        let update = self.world.update(player_position);
        let report = FrameReport {
            frame: self.frames,
            update,
            world_time: start.elapsed(),
        };

        if update.changed() {
            debug!(
                "Frame {}: streamed +{} / -{} chunks in {:?}",
                report.frame, update.loaded, update.unloaded, report.world_time
            );
        }
        report
    }

    /// Frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Removes the block the player is looking at, if it is within reach.
    ///
    /// # Returns
    /// The mined cell and the block it held.
    pub fn mine(
        &mut self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
    ) -> Option<(Point3<i32>, BlockId)> {
        let hit = self.world.raycast(origin, direction, INTERACTION_DISTANCE)?;
        let cell = hit.block;
        self.world.set_block(cell.x, cell.y, cell.z, BlockId::Empty, true);
        trace!("Mined {} at {:?}", hit.id, cell);
        Some((cell, hit.id))
    }

    /// Places `id` against the face the player is looking at.
    ///
    /// Refused when nothing is in reach, when `id` is Empty, when the target
    /// cell is occupied or not resident, or when the new block would overlap
    /// `player_box`.
    ///
    /// # Returns
    /// The cell the block went into.
    pub fn place(
        &mut self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        id: BlockId,
        player_box: BoundingBox,
    ) -> Option<Point3<i32>> {
        if id.is_empty() {
            return None;
        }
        let hit = self.world.raycast(origin, direction, INTERACTION_DISTANCE)?;
        let cell = hit.placement();
        if player_box.overlaps_cell(cell) {
            trace!("Refused placement at {:?}: overlaps player", cell);
            return None;
        }
        match self.world.get_block(cell.x, cell.y, cell.z) {
            Some(target) if !target.is_solid() => {}
            _ => return None,
        }
        self.world.set_block(cell.x, cell.y, cell.z, id, true);
        trace!("Placed {} at {:?}", id, cell);
        Some(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_box_overlap() {
        let body = BoundingBox::player(Point3::new(0.5, 10.0, 0.5), 0.3, 1.8);
        assert!(body.overlaps_cell(Point3::new(0, 10, 0)));
        assert!(body.overlaps_cell(Point3::new(0, 11, 0)));
        assert!(!body.overlaps_cell(Point3::new(0, 9, 0)));
        assert!(!body.overlaps_cell(Point3::new(1, 10, 0)));
        assert!(!body.overlaps_cell(Point3::new(0, 12, 0)));
    }
}
