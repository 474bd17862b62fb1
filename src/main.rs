//! # Voxel World Headless Driver
//!
//! Walks a scripted player path through a generated world and logs chunk
//! streaming, without any renderer. Useful for profiling generation.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --release -- [world.json]
//! ```

use cgmath::{Point3, Vector3};
use log::{error, info};

use voxel_world::engine_state::BoundingBox;
use voxel_world::{BlockId, CabinSite, EngineState, WorldConfig};

/// Blocks walked per frame.
const WALK_SPEED: f32 = 0.5;
/// Frames in the scripted walk.
const WALK_FRAMES: u32 = 400;

fn main() {
    voxel_world::init_logging();

    let config = match std::env::args().nth(1) {
        Some(path) => match WorldConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(err) => {
                error!("Could not load {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => {
            let mut config = WorldConfig::default();
            config.cabins.push(CabinSite {
                bunker: true,
                ..CabinSite::at(24, 8)
            });
            config
        }
    };

    let mut engine = EngineState::new(config);
    let start = web_time::Instant::now();

    for step in 0..WALK_FRAMES {
        let x = step as f32 * WALK_SPEED;
        let z = (step as f32 * 0.05).sin() * 20.0;
        let ground = engine.world.get_ground_height(x.floor() as i32, z.floor() as i32);
        let feet = Point3::new(x, ground.max(1) as f32, z);
        engine.frame(feet);

        // Dig and build a little along the way
        if step % 50 == 25 {
            let eye = feet + Vector3::new(0.0, 1.6, 0.0);
            let look = Vector3::new(1.0, -1.0, 0.0);
            if let Some((cell, id)) = engine.mine(eye, look) {
                info!("Mined {} at {:?}", id, cell);
            }
            let body = BoundingBox::player(feet, 0.3, 1.8);
            if let Some(cell) = engine.place(eye, look, BlockId::Lamp, body) {
                info!("Placed lamp at {:?}", cell);
            }
        }
    }

    let stats = engine.world.stats();
    info!(
        "Walked {} frames in {:?}: {} chunks loaded, {} unloaded, {} meshes built, {} resident",
        engine.frame_count(),
        start.elapsed(),
        stats.chunks_loaded,
        stats.chunks_unloaded,
        stats.meshes_built,
        engine.world.chunk_count()
    );
}
