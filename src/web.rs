//! # Browser Bindings
//!
//! The `wasm-bindgen` surface a JavaScript host drives: one [`WebWorld`] per
//! page, updated once per animation frame with the player's position, queried
//! by the host's physics and fed into its instanced meshes.
//!
//! Block ids cross the boundary as their integer tags; `-1` means "no block"
//! (the chunk is not resident or the cell is outside the world).

use log::warn;
use wasm_bindgen::prelude::*;

use crate::config::{CabinSite, WorldConfig};
use crate::engine_state::rendering::BlockAppearance;
use crate::engine_state::voxels::block::block_type::BlockId;
use crate::engine_state::voxels::structures::DoorSide;
use crate::engine_state::voxels::world::ChunkCoord;
use crate::engine_state::EngineState;

/// Installs the panic hook and the console logger.
#[wasm_bindgen]
pub fn run_web() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    crate::init_logging();
}

/// A voxel world owned by the page.
#[wasm_bindgen]
pub struct WebWorld {
    engine: EngineState,
}

#[wasm_bindgen]
impl WebWorld {
    /// Creates a world from a JSON `WorldConfig`; an empty string gives the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WebWorld, JsError> {
        let config = if config_json.trim().is_empty() {
            WorldConfig::default()
        } else {
            WorldConfig::from_json_str(config_json)?
        };
        Ok(WebWorld {
            engine: EngineState::new(config),
        })
    }

    /// Streams chunks around the player; returns how many were loaded.
    pub fn update(&mut self, x: f32, y: f32, z: f32) -> u32 {
        self.engine.frame(cgmath::Point3::new(x, y, z)).update.loaded as u32
    }

    /// Whether world `(x, y, z)` blocks movement.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.engine.world.is_solid(x, y, z)
    }

    /// The block id at world `(x, y, z)`, or `-1` for no block.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> i32 {
        self.engine
            .world
            .get_block(x, y, z)
            .map_or(-1, |cell| cell.id.as_u8() as i32)
    }

    /// Writes a block and remeshes; returns `false` if the write was dropped.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: u8) -> bool {
        match BlockId::from_u8(id) {
            Some(id) => self.engine.world.set_block(x, y, z, id, true),
            None => {
                warn!("Ignoring unknown block id {}", id);
                false
            }
        }
    }

    /// Topmost ground block in column `(x, z)`, plus one.
    pub fn get_ground_height(&self, x: i32, z: i32) -> i32 {
        self.engine.world.get_ground_height(x, z)
    }

    /// Registers a default-sized cabin. `door` is one of `"north"`, `"south"`,
    /// `"east"` or `"west"`; returns `false` and adds nothing for any other side.
    pub fn add_cabin(&mut self, x: i32, z: i32, door: &str, bunker: bool) -> bool {
        let Some(side) = DoorSide::from_name(door) else {
            warn!("Ignoring cabin with unknown door side {:?}", door);
            return false;
        };
        self.engine.world.add_cabin_site(CabinSite {
            door: side,
            bunker,
            ..CabinSite::at(x, z)
        });
        true
    }

    /// Resident chunks as a flat `[x0, z0, x1, z1, ...]` list.
    pub fn resident_chunks(&self) -> Vec<i32> {
        self.engine
            .world
            .resident_coords()
            .into_iter()
            .flat_map(|coord| [coord.x, coord.z])
            .collect()
    }

    /// Block ids that have instances in chunk `(cx, cz)`.
    pub fn chunk_batch_blocks(&self, cx: i32, cz: i32) -> Vec<u8> {
        self.engine
            .world
            .chunk(ChunkCoord::new(cx, cz))
            .and_then(|chunk| chunk.mesh())
            .map(|mesh| mesh.batches().iter().map(|batch| batch.block.as_u8()).collect())
            .unwrap_or_default()
    }

    /// Chunk-local instance centres of one block in chunk `(cx, cz)`, flattened.
    pub fn chunk_instances(&self, cx: i32, cz: i32, block: u8) -> Vec<f32> {
        let Some(block) = BlockId::from_u8(block) else {
            return Vec::new();
        };
        self.engine
            .world
            .chunk(ChunkCoord::new(cx, cz))
            .and_then(|chunk| chunk.mesh())
            .and_then(|mesh| mesh.batch(block))
            .map(|batch| batch.as_floats().to_vec())
            .unwrap_or_default()
    }

    /// The `0xRRGGBB` tint of a block, or `-1` for Empty and unknown ids.
    pub fn block_tint(&self, block: u8) -> i32 {
        BlockId::from_u8(block)
            .and_then(BlockAppearance::of)
            .map_or(-1, |appearance| appearance.tint as i32)
    }

    /// Whether a block needs alpha blending.
    pub fn block_transparent(&self, block: u8) -> bool {
        BlockId::from_u8(block)
            .and_then(BlockAppearance::of)
            .is_some_and(|appearance| appearance.transparent)
    }
}
