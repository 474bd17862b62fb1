#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A streaming voxel world engine: chunked procedural terrain with ores, trees
//! and clouds, carved cabins, occlusion-culled instance batches, and a chunk
//! manager that keeps the world resident around a moving player.
//!
//! The crate builds as a native library and as a browser module. It owns no
//! renderer; hosts receive per-chunk instance batches through
//! [`engine_state::rendering::VisualHandle`] or, in the browser, through the
//! `web` bindings.
//!
//! ## Key Modules
//!
//! * `config` - `WorldConfig` and JSON loading
//! * `engine_state` - The per-frame driver, rendering-facing data and the voxel core
//! * `error` - Configuration errors
//!
//! ## Usage
//!
//! ```rust
//! use voxel_world::{EngineState, WorldConfig};
//!
//! voxel_world::init_logging();
//!
//! let mut engine = EngineState::new(WorldConfig::default());
//! let report = engine.frame(cgmath::Point3::new(8.0, 20.0, 8.0));
//! assert_eq!(report.update.loaded, 25);
//!
//! let ground = engine.world.get_ground_height(8, 8);
//! assert!(ground >= 2);
//! ```
//!
//! ## Performance Considerations
//!
//! * Chunk generation and meshing run synchronously, so crossing a chunk border
//!   costs one row of chunks in that frame
//! * Updates are free while the player stays inside one chunk
//! * Fully enclosed cells are never instanced

pub mod config;
pub mod engine_state;
pub mod error;
#[cfg(target_family = "wasm")]
pub mod web;

pub use config::{CabinSite, WorldConfig};
pub use engine_state::voxels::block::block_type::BlockId;
pub use engine_state::voxels::world::{ChunkCoord, World};
pub use engine_state::EngineState;
pub use error::ConfigError;

/// Installs the native logger: stdout, filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored. In the browser the
/// logger is installed by `web::run_web` instead.
pub fn init_logging() {
    cfg_if::cfg_if! {
        if #[cfg(target_family = "wasm")] {
            let _ = console_log::init_with_level(log::Level::Info);
        } else {
            let _ = env_logger::Builder::new()
                .target(env_logger::Target::Stdout)
                .parse_env("RUST_LOG")
                .try_init();
        }
    }
}
