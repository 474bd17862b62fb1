//! # Chunk Generation
//!
//! The procedural passes that populate a chunk: terrain (with trees), ore
//! resources and clouds. Each pass samples noise at **world** coordinates, so
//! neighbouring chunks line up at their borders.

use log::trace;

use super::Chunk;
use crate::engine_state::voxels::block::block_type::BlockId;
use crate::engine_state::voxels::block::registry::{OreParams, OreRule};
use crate::engine_state::voxels::generation::{GenerationPass, GradientNoise, WorldRng};

const CANOPY_HEIGHT: i32 = 2;
const CANOPY_RADIUS: i32 = 2;
const CANOPY_CORNER_DROP_CHANCE: f64 = 0.5;
const MIN_TRUNK_HEIGHT: i32 = 4;
const TRUNK_HEIGHT_VARIANCE: f64 = 3.0;

impl Chunk {
    /// Runs terrain, resources and clouds in order.
    ///
    /// Each pass draws from its own fresh generator, so a pass always sees the
    /// same random sequence no matter which passes ran before it, and samples
    /// its own noise field.
    pub fn generate(&mut self) {
        let start = web_time::Instant::now();
        let (cx, cz) = (self.coord.x, self.coord.z);

        let mut rng = self.params.rng_for_pass(GenerationPass::Terrain, cx, cz);
        self.generate_terrain(&mut rng);
        let mut rng = self.params.rng_for_pass(GenerationPass::Resources, cx, cz);
        self.generate_resources(&mut rng);
        let mut rng = self.params.rng_for_pass(GenerationPass::Clouds, cx, cz);
        self.generate_clouds(&mut rng);

        trace!("Generated chunk {} in {:?}", self.coord, start.elapsed());
    }

    /// Fills every column with Dirt up to the surface height and Grass at it.
    ///
    /// Cells above the surface are left as they are, which keeps canopies that
    /// earlier columns grew into this one. A tree may sprout on each Grass cell.
    pub fn generate_terrain(&mut self, rng: &mut WorldRng) {
        let noise = GradientNoise::new(rng);
        let origin = self.world_origin();
        let width = self.dims.width as i32;

        for x in 0..width {
            for z in 0..width {
                let height = self.params.surface_height(
                    &noise,
                    origin.x + x,
                    origin.z + z,
                    self.dims.height,
                ) as i32;

                for y in 0..height {
                    self.set_block_id(x, y, z, BlockId::Dirt);
                }
                self.set_block_id(x, height, z, BlockId::Grass);

                if rng.random() < self.params.trees.chance {
                    self.generate_tree(x, height + 1, z, rng);
                }
            }
        }
    }

    /// Grows a tree whose trunk starts at local `(x, y, z)`.
    ///
    /// The trunk is 4 to 6 Wood blocks. The canopy is two layers of radius 2
    /// ending at the top of the trunk; the trunk column is skipped below the top
    /// layer and each corner is dropped with probability one half. Leaves only
    /// fill Empty cells, and anything outside the chunk is dropped.
    pub fn generate_tree(&mut self, x: i32, y: i32, z: i32, rng: &mut WorldRng) {
        let trunk_height =
            MIN_TRUNK_HEIGHT + (rng.random() * TRUNK_HEIGHT_VARIANCE).floor() as i32;

        for i in 0..trunk_height {
            self.set_block_id(x, y + i, z, BlockId::Wood);
        }

        for cy in 0..CANOPY_HEIGHT {
            for cx in -CANOPY_RADIUS..=CANOPY_RADIUS {
                for cz in -CANOPY_RADIUS..=CANOPY_RADIUS {
                    if cx == 0 && cz == 0 && cy < CANOPY_HEIGHT - 1 {
                        continue;
                    }
                    if cx.abs() == CANOPY_RADIUS
                        && cz.abs() == CANOPY_RADIUS
                        && rng.random() < CANOPY_CORNER_DROP_CHANCE
                    {
                        continue;
                    }

                    let (lx, ly, lz) = (x + cx, y + trunk_height - CANOPY_HEIGHT + cy, z + cz);
                    if self.block_id(lx, ly, lz) == Some(BlockId::Empty) {
                        self.set_block_id(lx, ly, lz, BlockId::Leaves);
                    }
                }
            }
        }
    }

    /// Applies every ore rule of this chunk's ore table, in order.
    ///
    /// All rules share one noise field, scaled per ore.
    pub fn generate_resources(&mut self, rng: &mut WorldRng) {
        let noise = GradientNoise::new(rng);
        let ores = self.params.ores.clone();
        for (rule, params) in ores.iter() {
            self.apply_ore_rule(&noise, rule, params);
        }
    }

    /// Replaces `rule.target` with `rule.id` wherever the scaled 3D noise
    /// exceeds the ore's scarcity.
    pub fn apply_ore_rule(&mut self, noise: &GradientNoise, rule: &OreRule, params: &OreParams) {
        let origin = self.world_origin();
        let width = self.dims.width as i32;
        let height = self.dims.height as i32;

        for x in 0..width {
            for y in 0..height {
                for z in 0..width {
                    if self.block_id(x, y, z) != Some(rule.target) {
                        continue;
                    }
                    let value = noise.noise3(
                        (origin.x + x) as f64 / params.scale.x,
                        y as f64 / params.scale.y,
                        (origin.z + z) as f64 / params.scale.z,
                    );
                    if value > params.scarcity {
                        self.set_block_id(x, y, z, rule.id);
                    }
                }
            }
        }
    }

    /// Scatters Cloud blocks on a layer near the top of the world, some of them
    /// two blocks thick.
    pub fn generate_clouds(&mut self, rng: &mut WorldRng) {
        let noise = GradientNoise::new(rng);
        let clouds = self.params.clouds;
        let Some(cloud_y) = self.dims.height.checked_sub(clouds.depth_below_top) else {
            return;
        };
        let cloud_y = cloud_y as i32;
        let origin = self.world_origin();
        let width = self.dims.width as i32;

        for x in 0..width {
            for z in 0..width {
                let value = noise.noise2(
                    (origin.x + x) as f64 / clouds.scale,
                    (origin.z + z) as f64 / clouds.scale,
                );
                if value > clouds.threshold {
                    self.set_block_id(x, cloud_y, z, BlockId::Cloud);
                    if rng.random() > clouds.thickness_chance {
                        self.set_block_id(x, cloud_y - 1, z, BlockId::Cloud);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::engine_state::voxels::chunk::{Chunk, ChunkDims};
    use crate::engine_state::voxels::generation::{GenerationParams, WorldRng};
    use crate::engine_state::voxels::block::block_type::BlockId;
    use crate::engine_state::voxels::world::ChunkCoord;

    fn chunk_with(params: GenerationParams) -> Chunk {
        Chunk::new(ChunkCoord::new(0, 0), ChunkDims::new(16, 32), params)
    }

    #[test]
    fn every_column_has_exactly_one_grass_cell() {
        let mut params = GenerationParams::default();
        params.trees.chance = 0.0;
        let mut chunk = chunk_with(params);
        chunk.generate_terrain(&mut WorldRng::new(0));

        for x in 0..16 {
            for z in 0..16 {
                let grass: Vec<i32> = (0..32)
                    .filter(|&y| chunk.block_id(x, y, z) == Some(BlockId::Grass))
                    .collect();
                assert_eq!(grass.len(), 1, "column ({}, {})", x, z);
                assert!((1..=31).contains(&grass[0]));
                assert_eq!(chunk.get_ground_height(x, z), grass[0] + 1);
            }
        }
    }

    #[test]
    fn tree_has_trunk_and_canopy() {
        let mut chunk = chunk_with(GenerationParams::default());
        chunk.generate_tree(8, 5, 8, &mut WorldRng::new(3));

        let trunk = (5..32)
            .take_while(|&y| chunk.block_id(8, y, 8) == Some(BlockId::Wood))
            .count() as i32;
        assert!((4..=6).contains(&trunk));

        let top = 5 + trunk - 1;
        assert_eq!(chunk.block_id(8, top + 1, 8), Some(BlockId::Empty));
        for (dx, dz) in [(1, 0), (-1, 0), (0, 1), (0, -1), (2, 1)] {
            assert_eq!(chunk.block_id(8 + dx, top, 8 + dz), Some(BlockId::Leaves));
            assert_eq!(chunk.block_id(8 + dx, top - 1, 8 + dz), Some(BlockId::Leaves));
        }
    }

    #[test]
    fn tree_at_edge_stays_in_bounds() {
        let mut chunk = chunk_with(GenerationParams::default());
        chunk.generate_tree(0, 28, 15, &mut WorldRng::new(1));
        assert_eq!(chunk.block_id(0, 28, 15), Some(BlockId::Wood));
        assert_eq!(chunk.cells().len(), 16 * 16 * 32);
    }

    #[test]
    fn leaves_do_not_replace_solid_cells() {
        let mut chunk = chunk_with(GenerationParams::default());
        chunk.set_block_id(9, 8, 8, BlockId::Stone);
        chunk.generate_tree(8, 5, 8, &mut WorldRng::new(0));
        assert_eq!(chunk.block_id(9, 8, 8), Some(BlockId::Stone));
    }

    #[test]
    fn clouds_only_on_cloud_layer() {
        let mut params = GenerationParams::default();
        params.clouds.threshold = -2.0;
        let mut chunk = chunk_with(params);
        chunk.generate_clouds(&mut WorldRng::new(0));

        for (position, cell) in chunk.iter_solid() {
            assert_eq!(cell.id, BlockId::Cloud);
            assert!(position.y == 26 || position.y == 25, "{:?}", position);
        }
        assert_eq!(
            chunk.iter_solid().filter(|(p, _)| p.y == 26).count(),
            16 * 16
        );
    }
}
