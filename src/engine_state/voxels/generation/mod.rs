//! # World Generation
//!
//! Deterministic randomness for procedural generation:
//!
//! * `rng` - the seedable [`WorldRng`]
//! * `noise` - [`GradientNoise`], 2D/3D simplex noise seeded from a `WorldRng`
//!
//! [`GenerationParams`] bundles everything a chunk needs to generate itself.

pub mod noise;
pub mod rng;

use log::warn;

pub use self::noise::GradientNoise;
pub use self::rng::WorldRng;

use self::rng::derive_seed;

use crate::config::{CloudParams, TerrainParams, TreeParams, WorldConfig};
use crate::engine_state::voxels::block::registry::OreTable;

/// One procedural pass over a chunk. Each pass samples its own noise field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GenerationPass {
    /// Height map and trees.
    Terrain,
    /// Ore replacement.
    Resources,
    /// Cloud layer.
    Clouds,
}

/// Generation parameters shared by every chunk of a world.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationParams {
    /// World seed.
    pub seed: u64,
    /// Derive a separate random stream per chunk.
    pub seed_per_chunk: bool,
    /// Height-map noise.
    pub terrain: TerrainParams,
    /// Trees.
    pub trees: TreeParams,
    /// Clouds.
    pub clouds: CloudParams,
    /// Ore rules with their effective parameters.
    pub ores: OreTable,
}

impl GenerationParams {
    /// Resolves the parameters described by `config`.
    ///
    /// Ore overrides that do not resolve are logged and skipped; use
    /// [`WorldConfig::ore_table`] to surface them as errors instead.
    pub fn from_config(config: &WorldConfig) -> Self {
        let ores = config.ore_table().unwrap_or_else(|err| {
            warn!("Ignoring ore overrides: {}", err);
            OreTable::defaults()
        });
        GenerationParams {
            seed: config.seed,
            seed_per_chunk: config.seed_per_chunk,
            terrain: config.terrain,
            trees: config.trees,
            clouds: config.clouds,
            ores,
        }
    }

    /// A fresh generator for one generation pass over the chunk at `(chunk_x, chunk_z)`.
    ///
    /// The choice stream comes from the world seed, or from the chunk's derived
    /// seed with `seed_per_chunk`. The noise table stream depends only on the
    /// world seed and the pass, so every chunk samples the same fields.
    pub fn rng_for_pass(&self, pass: GenerationPass, chunk_x: i32, chunk_z: i32) -> WorldRng {
        let rng = if self.seed_per_chunk {
            WorldRng::for_chunk(self.seed, chunk_x, chunk_z)
        } else {
            WorldRng::new(self.seed)
        };
        rng.with_table_seed(derive_seed(self.seed, pass as i32, 0))
    }

    /// The terrain surface height of one column.
    ///
    /// The grass block sits at the returned `y`. The result is clamped to
    /// `[1, world_height - 1]` inclusive.
    pub fn surface_height(
        &self,
        noise: &GradientNoise,
        world_x: i32,
        world_z: i32,
        world_height: usize,
    ) -> usize {
        let value = noise.noise2(
            world_x as f64 / self.terrain.scale,
            world_z as f64 / self.terrain.scale,
        );
        let scaled = value * self.terrain.magnitude + self.terrain.offset;
        let height = (world_height as f64 * scaled).floor() as i64;
        height.clamp(1, world_height as i64 - 1) as usize
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}

/// Computes unmodified terrain heights anywhere in the world.
///
/// Uses the same noise table as the terrain pass, so its answer matches what a
/// freshly generated chunk contains, whether or not that chunk is resident.
pub struct TerrainSampler<'a> {
    params: &'a GenerationParams,
    noise: GradientNoise,
    world_height: usize,
}

impl<'a> TerrainSampler<'a> {
    /// Creates a sampler for `params`.
    pub fn new(params: &'a GenerationParams, world_height: usize) -> Self {
        let noise = GradientNoise::new(&mut params.rng_for_pass(GenerationPass::Terrain, 0, 0));
        TerrainSampler {
            params,
            noise,
            world_height,
        }
    }

    /// The `y` of the grass block in column `(world_x, world_z)`.
    pub fn surface_height(&self, world_x: i32, world_z: i32) -> usize {
        self.params
            .surface_height(&self.noise, world_x, world_z, self.world_height)
    }

    /// One above the surface: where structures stand.
    pub fn ground_height(&self, world_x: i32, world_z: i32) -> i32 {
        self.surface_height(world_x, world_z) as i32 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_height_is_clamped() {
        let mut params = GenerationParams::default();
        let noise = GradientNoise::new(&mut WorldRng::new(0));

        params.terrain.offset = -10.0;
        assert_eq!(params.surface_height(&noise, 5, 5, 32), 1);

        params.terrain.offset = 10.0;
        assert_eq!(params.surface_height(&noise, 5, 5, 32), 31);
    }

    #[test]
    fn sampler_matches_direct_computation() {
        let params = GenerationParams::default();
        let sampler = TerrainSampler::new(&params, 32);
        let noise = GradientNoise::new(&mut params.rng_for_pass(GenerationPass::Terrain, 0, 0));
        for x in -20..20 {
            assert_eq!(
                sampler.surface_height(x, 3 * x),
                params.surface_height(&noise, x, 3 * x, 32)
            );
        }
    }

    #[test]
    fn passes_sample_different_fields() {
        let params = GenerationParams::default();
        let terrain = GradientNoise::new(&mut params.rng_for_pass(GenerationPass::Terrain, 0, 0));
        let clouds = GradientNoise::new(&mut params.rng_for_pass(GenerationPass::Clouds, 0, 0));
        let resources =
            GradientNoise::new(&mut params.rng_for_pass(GenerationPass::Resources, 3, -1));

        let points: Vec<(f64, f64)> = (0..32)
            .map(|i| (i as f64 * 0.37 + 0.1, i as f64 * 0.61 + 0.2))
            .collect();
        let differing = |a: &GradientNoise, b: &GradientNoise| {
            points
                .iter()
                .filter(|&&(x, z)| (a.noise2(x, z) - b.noise2(x, z)).abs() > 1e-6)
                .count()
        };
        assert!(differing(&terrain, &clouds) > 16);
        assert!(differing(&terrain, &resources) > 16);
    }

    #[test]
    fn pass_fields_do_not_depend_on_the_chunk() {
        let mut params = GenerationParams::default();
        params.seed_per_chunk = true;
        let a = GradientNoise::new(&mut params.rng_for_pass(GenerationPass::Clouds, 0, 0));
        let b = GradientNoise::new(&mut params.rng_for_pass(GenerationPass::Clouds, 5, -9));
        for i in 0..16 {
            let (x, z) = (i as f64 * 0.7, i as f64 * -0.3);
            assert_eq!(a.noise2(x, z).to_bits(), b.noise2(x, z).to_bits());
        }
    }
}
