//! # Error Types
//!
//! The voxel core never fails: out-of-range reads return `None` and unresolvable
//! writes are dropped. Errors only arise while loading configuration.

use thiserror::Error;

use crate::engine_state::voxels::block::block_type::BlockId;

/// Errors produced while loading or resolving a [`crate::config::WorldConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid JSON for `WorldConfig`.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// An ore override names a block that does not exist.
    #[error("unknown block name: {0}")]
    UnknownBlock(String),

    /// An ore override names a block that resource generation never places.
    #[error("block {0} is not an ore")]
    NotAnOre(BlockId),
}
