//! # Voxel Engine Core
//!
//! This module contains the voxel world itself: the data model, the procedural
//! generation that fills it and the chunk manager that streams it around the
//! player.
//!
//! ## Architecture
//!
//! * **Block**: block identifiers, faces, the static registry and per-cell data
//! * **Generation**: the seedable RNG and gradient noise every pass draws from
//! * **Chunk**: a dense grid of cells with its generation passes and mesh build
//! * **Structures**: cabins (and bunkers) carved into generated terrain
//! * **World**: the resident chunk set and chunk-oblivious voxel access
//!
//! ## Data Flow
//!
//! 1. `World::update` works out which chunks must be resident
//! 2. Each missing chunk is generated, has its cabins carved and is meshed
//! 3. Block edits go through the world, which remeshes the affected chunks
//!
//! Everything runs synchronously on the caller's thread.

pub mod block;
pub mod chunk;
pub mod generation;
pub mod structures;
pub mod world;
