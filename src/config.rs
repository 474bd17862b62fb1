//! # World Configuration
//!
//! Everything the host can tune: chunk dimensions, render distance, seed, the
//! terrain, tree and cloud parameters, ore overrides and the cabin sites that
//! are carved into the terrain as chunks load.
//!
//! Configurations are plain serde structs. Every field has a default, so a JSON
//! document only needs to name what it changes:
//!
//! ```json
//! { "seed": 7, "render_distance": 3, "ores": { "coal": { "scarcity": 0.7 } } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use cgmath::{Point2, Vector3};
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::block::block_type::BlockId;
use crate::engine_state::voxels::block::registry::{OreParams, OreTable};
use crate::engine_state::voxels::structures::{CabinSpec, DoorSide};
use crate::error::ConfigError;

/// Height-map noise parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Divisor applied to world X/Z before sampling; larger values give broader hills.
    pub scale: f64,
    /// Multiplier applied to the noise sample.
    pub magnitude: f64,
    /// Added to the scaled sample, as a fraction of the world height.
    pub offset: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        TerrainParams {
            scale: 30.0,
            magnitude: 0.5,
            offset: 0.2,
        }
    }
}

/// Tree placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    /// Probability that a grass cell grows a tree.
    pub chance: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        TreeParams { chance: 0.02 }
    }
}

/// Cloud layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudParams {
    /// Divisor applied to world X/Z before sampling.
    pub scale: f64,
    /// Clouds form where the sample exceeds this.
    pub threshold: f64,
    /// Probability of a second cloud block below the first.
    pub thickness_chance: f64,
    /// How far below the top of the world the cloud layer sits.
    pub depth_below_top: usize,
}

impl Default for CloudParams {
    fn default() -> Self {
        CloudParams {
            scale: 20.0,
            threshold: 0.5,
            thickness_chance: 0.5,
            depth_below_top: 6,
        }
    }
}

/// Partial replacement of an ore's registry parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OreOverride {
    /// Per-axis noise scale.
    pub scale: Option<[f64; 3]>,
    /// Noise threshold.
    pub scarcity: Option<f64>,
}

/// A point of interest where a cabin is carved when its chunks load.
///
/// The floor height is not stored: it is resolved from the terrain at load time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CabinSite {
    /// Centre column, world X.
    pub x: i32,
    /// Centre column, world Z.
    pub z: i32,
    /// Footprint along X.
    pub width: i32,
    /// Footprint along Z.
    pub depth: i32,
    /// Wall height in blocks.
    pub wall_height: i32,
    /// Wall that carries the door.
    pub door: DoorSide,
    /// Dig a bunker with a staircase below the cabin.
    pub bunker: bool,
}

impl Default for CabinSite {
    fn default() -> Self {
        let spec = CabinSpec::default();
        CabinSite {
            x: 0,
            z: 0,
            width: spec.width,
            depth: spec.depth,
            wall_height: spec.wall_height,
            door: spec.door,
            bunker: spec.bunker,
        }
    }
}

impl CabinSite {
    /// A default-sized cabin centred on `(x, z)`.
    pub fn at(x: i32, z: i32) -> Self {
        CabinSite {
            x,
            z,
            ..CabinSite::default()
        }
    }

    /// The cabin to carve once the floor height is known.
    pub fn to_spec(&self, floor_y: i32) -> CabinSpec {
        CabinSpec {
            x: self.x,
            y: floor_y,
            z: self.z,
            width: self.width,
            depth: self.depth,
            wall_height: self.wall_height,
            door: self.door,
            bunker: self.bunker,
        }
    }

    /// The horizontal rectangle the carving can write to. Independent of the
    /// floor height, so it is known before the terrain is sampled.
    pub fn horizontal_bounds(&self) -> (Point2<i32>, Point2<i32>) {
        self.to_spec(0).horizontal_bounds()
    }
}

/// Complete world configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Horizontal chunk edge length, shared by X and Z.
    pub chunk_width: usize,
    /// Vertical extent of every chunk.
    pub world_height: usize,
    /// Radius, in chunks, kept resident around the player.
    pub render_distance: u32,
    /// World seed.
    pub seed: u64,
    /// Give each chunk its own random stream instead of reusing the world seed.
    pub seed_per_chunk: bool,
    /// Terrain noise.
    pub terrain: TerrainParams,
    /// Trees.
    pub trees: TreeParams,
    /// Clouds.
    pub clouds: CloudParams,
    /// Ore overrides keyed by lowercase block name.
    pub ores: BTreeMap<String, OreOverride>,
    /// Cabins carved into the terrain.
    pub cabins: Vec<CabinSite>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            chunk_width: 16,
            world_height: 32,
            render_distance: 2,
            seed: 0,
            seed_per_chunk: false,
            terrain: TerrainParams::default(),
            trees: TreeParams::default(),
            clouds: CloudParams::default(),
            ores: BTreeMap::new(),
            cabins: Vec::new(),
        }
    }
}

impl WorldConfig {
    /// Parses a JSON document and checks that its ore overrides resolve.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.ore_table()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serializes the configuration back to JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The registry ore parameters with this configuration's overrides applied.
    pub fn ore_table(&self) -> Result<OreTable, ConfigError> {
        let mut table = OreTable::defaults();
        for (name, ore_override) in &self.ores {
            let id = BlockId::from_name(name)
                .ok_or_else(|| ConfigError::UnknownBlock(name.clone()))?;
            let current = table.params(id).ok_or(ConfigError::NotAnOre(id))?;
            let params = OreParams {
                scale: ore_override
                    .scale
                    .map(|[x, y, z]| Vector3::new(x, y, z))
                    .unwrap_or(current.scale),
                scarcity: ore_override.scarcity.unwrap_or(current.scarcity),
            };
            table.set_params(id, params);
        }
        Ok(table)
    }
}
