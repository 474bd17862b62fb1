//! # World Module
//!
//! This module provides the `World` struct which manages the resident set of
//! chunks around the player. It serves as the central coordinator for chunk
//! loading, unloading and chunk-oblivious voxel access.
//!
//! ## Architecture
//!
//! The world only keeps the chunks within `render_distance` of the player's
//! chunk (a `(2r + 1)²` square). Nothing is retained for chunks that leave that
//! square: revisiting a coordinate regenerates it from the seed, carving any
//! registered cabins again.
//!
//! ## Chunk Lifecycle
//!
//! `Absent → Loading → Resident → Absent`. Loading is synchronous and runs to
//! completion inside one call: terrain, resources, clouds, cabins, then meshes.
//!
//! ## Coordinates
//!
//! World block coordinates map to a chunk by floor division and to a local cell
//! by `rem_euclid`, so negative coordinates behave like positive ones.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use cgmath::{InnerSpace, Point3, Vector3};
use log::{debug, info, trace};

use super::block::block_side::BlockSide;
use super::block::block_type::BlockId;
use super::block::VoxelCell;
use super::chunk::{Chunk, ChunkDims};
use super::generation::{GenerationParams, TerrainSampler};
use super::structures::{self, BlockWriter, CabinSpec, ChunkWriter};
use crate::config::{CabinSite, WorldConfig};
use crate::engine_state::rendering::visual::VisualFactory;

/// A chunk position on the horizontal chunk grid (not block coordinates).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Chunk index along X.
    pub x: i32,
    /// Chunk index along Z.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    pub fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// The chunk owning world column `(x, z)`.
    pub fn from_world(x: i32, z: i32, width: usize) -> Self {
        let width = width as i32;
        ChunkCoord::new(x.div_euclid(width), z.div_euclid(width))
    }

    /// The chunk across the given horizontal face.
    pub fn neighbour(self, side: BlockSide) -> Self {
        let offset = side.offset();
        ChunkCoord::new(self.x + offset.x, self.z + offset.z)
    }

    /// Chebyshev distance in chunks.
    pub fn distance(self, other: ChunkCoord) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.z - other.z).unsigned_abs())
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// What one [`World::update`] call did.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct UpdateReport {
    /// Chunks loaded.
    pub loaded: usize,
    /// Chunks unloaded.
    pub unloaded: usize,
    /// Wall time spent.
    pub elapsed: Duration,
}

impl UpdateReport {
    /// `true` if residency changed.
    pub fn changed(&self) -> bool {
        self.loaded > 0 || self.unloaded > 0
    }
}

/// Running totals for the session.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Chunks generated.
    pub chunks_loaded: u64,
    /// Chunks evicted.
    pub chunks_unloaded: u64,
    /// Mesh builds, initial builds included.
    pub meshes_built: u64,
}

/// The first solid cell along a ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RaycastHit {
    /// The cell that was hit.
    pub block: Point3<i32>,
    /// The face the ray entered through.
    pub face: BlockSide,
    /// Distance from the ray origin to the entry point.
    pub distance: f32,
    /// The block in the hit cell.
    pub id: BlockId,
}

impl RaycastHit {
    /// The cell adjacent to the hit face, where a new block would go.
    pub fn placement(&self) -> Point3<i32> {
        self.block + self.face.offset()
    }
}

/// Manages the set of resident chunks and provides voxel access in world coordinates.
///
/// # Examples
///
/// ```
/// use voxel_world::{World, WorldConfig};
///
/// let mut world = World::new(WorldConfig::default());
/// world.update(cgmath::Point3::new(0.0, 20.0, 0.0));
///
/// // Render distance 2 keeps a 5x5 square resident
/// assert_eq!(world.chunk_count(), 25);
/// assert!(world.get_block(0, 0, 0).is_some());
/// ```
pub struct World {
    config: WorldConfig,
    dims: ChunkDims,
    params: GenerationParams,

    /// Resident chunks by coordinate.
    chunks: HashMap<ChunkCoord, Chunk>,

    /// Player chunk and render distance of the last residency pass. Cleared
    /// whenever the resident set changes outside of `update`.
    last_center: Option<(ChunkCoord, u32)>,

    /// Creates visuals for newly loaded chunks, if a host is attached.
    visuals: Option<Box<dyn VisualFactory>>,

    stats: WorldStats,
}

impl World {
    /// Creates a world with no resident chunks.
    ///
    /// Nothing is generated until the first [`World::update`] or [`World::load_chunk`].
    pub fn new(config: WorldConfig) -> Self {
        let dims = ChunkDims::new(config.chunk_width, config.world_height);
        let params = GenerationParams::from_config(&config);
        info!(
            "Creating world: seed {}, chunks {}x{}x{}, render distance {}",
            config.seed, dims.width, dims.height, dims.width, config.render_distance
        );
        World {
            config,
            dims,
            params,
            chunks: HashMap::new(),
            last_center: None,
            visuals: None,
            stats: WorldStats::default(),
        }
    }

    /// Creates a world that gives every loaded chunk a visual from `factory`.
    pub fn with_visuals(config: WorldConfig, factory: Box<dyn VisualFactory>) -> Self {
        let mut world = World::new(config);
        world.visuals = Some(factory);
        world
    }

    /// The active configuration.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Chunk extent.
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// The resolved generation parameters.
    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Session totals.
    pub fn stats(&self) -> WorldStats {
        self.stats
    }

    /// Replaces the configuration and regenerates every resident chunk.
    ///
    /// Residency itself is re-evaluated on the next [`World::update`], so a new
    /// chunk width or render distance takes effect there.
    pub fn reconfigure(&mut self, config: WorldConfig) {
        let resident = self.resident_coords();
        for coord in &resident {
            self.unload_chunk(*coord);
        }

        self.dims = ChunkDims::new(config.chunk_width, config.world_height);
        self.params = GenerationParams::from_config(&config);
        self.config = config;
        self.last_center = None;

        for coord in resident {
            self.load_chunk(coord);
        }
        info!(
            "Reconfigured world: seed {}, {} chunks regenerated",
            self.config.seed,
            self.chunks.len()
        );
    }

    /// Changes the render distance; residency follows on the next update.
    pub fn set_render_distance(&mut self, render_distance: u32) {
        self.config.render_distance = render_distance;
    }

    /// Brings the resident set in line with the player's position.
    ///
    /// Loads every chunk within the render distance of the player's chunk and
    /// unloads every other one. Does nothing if the player's chunk, the render
    /// distance and the resident set are all unchanged since the last call.
    pub fn update(&mut self, position: Point3<f32>) -> UpdateReport {
        let width = self.dims.width as f32;
        let center = ChunkCoord::new(
            (position.x / width).floor() as i32,
            (position.z / width).floor() as i32,
        );
        let render_distance = self.config.render_distance;
        if self.last_center == Some((center, render_distance)) {
            return UpdateReport::default();
        }

        let start = web_time::Instant::now();
        let mut report = UpdateReport::default();
        let r = render_distance as i32;

        for x in center.x - r..=center.x + r {
            for z in center.z - r..=center.z + r {
                if self.load_chunk(ChunkCoord::new(x, z)) {
                    report.loaded += 1;
                }
            }
        }

        let stale: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|coord| coord.distance(center) > render_distance)
            .copied()
            .collect();
        for coord in stale {
            if self.unload_chunk(coord) {
                report.unloaded += 1;
            }
        }

        self.last_center = Some((center, render_distance));
        report.elapsed = start.elapsed();
        debug!(
            "Player chunk {}: loaded {}, unloaded {}, resident {} in {:?}",
            center,
            report.loaded,
            report.unloaded,
            self.chunks.len(),
            report.elapsed
        );
        report
    }

    /// Generates the chunk at `coord` and makes it resident.
    ///
    /// Runs terrain, resources and clouds, carves every cabin site that reaches
    /// into the chunk, builds meshes and creates the chunk's visual.
    ///
    /// # Returns
    /// `false` if the chunk was already resident.
    pub fn load_chunk(&mut self, coord: ChunkCoord) -> bool {
        if self.chunks.contains_key(&coord) {
            return false;
        }

        let mut chunk = Chunk::new(coord, self.dims, self.params.clone());
        chunk.generate();

        let sampler = TerrainSampler::new(&self.params, self.dims.height);
        for site in self.config.cabins.iter().filter(|site| self.site_reaches(site, coord)) {
            let spec = site.to_spec(sampler.ground_height(site.x, site.z));
            trace!("Carving cabin at ({}, {}, {}) into {}", spec.x, spec.y, spec.z, coord);
            structures::generate_cabin(&mut ChunkWriter::new(&mut chunk), &spec);
        }

        chunk.generate_meshes();
        self.stats.meshes_built += 1;

        if let Some(factory) = self.visuals.as_mut() {
            let origin = chunk.world_origin();
            chunk.attach_visual(factory.create(coord, origin));
            chunk.sync_visual();
        }

        self.chunks.insert(coord, chunk);
        self.last_center = None;
        self.stats.chunks_loaded += 1;
        debug!("Loaded chunk {}", coord);
        true
    }

    /// Drops the chunk at `coord`, releasing its visual.
    ///
    /// # Returns
    /// `false` if the chunk was not resident.
    pub fn unload_chunk(&mut self, coord: ChunkCoord) -> bool {
        match self.chunks.remove(&coord) {
            Some(mut chunk) => {
                chunk.release_visual();
                self.last_center = None;
                self.stats.chunks_unloaded += 1;
                debug!("Unloaded chunk {}", coord);
                true
            }
            None => false,
        }
    }

    /// `true` if the chunk at `coord` is loaded.
    pub fn is_resident(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Every resident coordinate, sorted.
    pub fn resident_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        coords.sort();
        coords
    }

    /// The resident chunk at `coord`.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Number of resident chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Splits a world coordinate into its chunk and local coordinates.
    fn resolve(&self, x: i32, y: i32, z: i32) -> (ChunkCoord, Point3<i32>) {
        let width = self.dims.width as i32;
        (
            ChunkCoord::from_world(x, z, self.dims.width),
            Point3::new(x.rem_euclid(width), y, z.rem_euclid(width)),
        )
    }

    /// The cell at world `(x, y, z)`.
    ///
    /// # Returns
    /// `None` if the owning chunk is not resident or `y` is outside the world.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<&VoxelCell> {
        let (coord, local) = self.resolve(x, y, z);
        self.chunks
            .get(&coord)
            .and_then(|chunk| chunk.get_block(local.x, local.y, local.z))
    }

    /// `true` if world `(x, y, z)` holds a non-Empty block. Cells of absent
    /// chunks are not solid.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_block(x, y, z).is_some_and(VoxelCell::is_solid)
    }

    /// Writes `id` at world `(x, y, z)`.
    ///
    /// Writes into absent chunks or outside the world height are dropped. With
    /// `update_mesh` the owning chunk is remeshed, plus each horizontally
    /// adjacent resident chunk whose border the cell touches.
    ///
    /// # Returns
    /// `true` if the write landed.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId, update_mesh: bool) -> bool {
        let (coord, local) = self.resolve(x, y, z);
        let written = self
            .chunks
            .get_mut(&coord)
            .is_some_and(|chunk| chunk.set_block_id(local.x, local.y, local.z, id));
        if !written {
            trace!("Dropped write of {} at ({}, {}, {})", id, x, y, z);
            return false;
        }

        if update_mesh {
            self.remesh(coord);
            let last = self.dims.width as i32 - 1;
            for side in BlockSide::horizontal() {
                let on_border = match side {
                    BlockSide::FRONT => local.x == 0,
                    BlockSide::BACK => local.x == last,
                    BlockSide::LEFT => local.z == 0,
                    BlockSide::RIGHT => local.z == last,
                    _ => false,
                };
                if on_border {
                    self.remesh(coord.neighbour(side));
                }
            }
        }
        true
    }

    /// Rebuilds the meshes of a resident chunk and syncs its visual.
    ///
    /// # Returns
    /// `false` if the chunk is not resident.
    pub fn remesh(&mut self, coord: ChunkCoord) -> bool {
        match self.chunks.get_mut(&coord) {
            Some(chunk) => {
                chunk.generate_meshes();
                chunk.sync_visual();
                self.stats.meshes_built += 1;
                true
            }
            None => false,
        }
    }

    /// Topmost ground block in world column `(x, z)`, plus one. 0 if the
    /// column's chunk is not resident or the column has no ground.
    pub fn get_ground_height(&self, x: i32, z: i32) -> i32 {
        let (coord, local) = self.resolve(x, 0, z);
        self.chunks
            .get(&coord)
            .map_or(0, |chunk| chunk.get_ground_height(local.x, local.z))
    }

    /// Carves a cabin into the resident chunks it touches, remeshing each of
    /// them once afterwards.
    pub fn generate_cabin(&mut self, spec: &CabinSpec) {
        structures::generate_cabin(self, spec);

        let (min, max) = spec.horizontal_bounds();
        let from = ChunkCoord::from_world(min.x, min.y, self.dims.width);
        let to = ChunkCoord::from_world(max.x, max.y, self.dims.width);
        for x in from.x..=to.x {
            for z in from.z..=to.z {
                self.remesh(ChunkCoord::new(x, z));
            }
        }
    }

    /// Registers a cabin site. It is carved into chunks as they load, and into
    /// any resident chunk it reaches right away.
    pub fn add_cabin_site(&mut self, site: CabinSite) {
        self.config.cabins.push(site);
        if self.chunks.keys().any(|coord| self.site_reaches(&site, *coord)) {
            let sampler = TerrainSampler::new(&self.params, self.dims.height);
            let spec = site.to_spec(sampler.ground_height(site.x, site.z));
            self.generate_cabin(&spec);
        }
    }

    /// `true` if carving `site` can write into the chunk at `coord`.
    fn site_reaches(&self, site: &CabinSite, coord: ChunkCoord) -> bool {
        let width = self.dims.width as i32;
        let (min, max) = site.horizontal_bounds();
        let (min_x, min_z) = (coord.x * width, coord.z * width);
        max.x >= min_x && min.x < min_x + width && max.y >= min_z && min.y < min_z + width
    }

    /// Finds the first solid cell along a ray.
    ///
    /// Walks the grid cell by cell (Amanatides-Woo), so no solid cell the ray
    /// passes through can be skipped. Cells of absent chunks are transparent.
    ///
    /// # Arguments
    /// * `origin` - Ray start in world space
    /// * `direction` - Ray direction; need not be normalized
    /// * `max_distance` - Cells entered beyond this distance are ignored
    ///
    /// # Returns
    /// `None` on a miss, and for a zero or non-finite direction, origin or distance.
    pub fn raycast(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RaycastHit> {
        let finite = [origin.x, origin.y, origin.z, direction.x, direction.y, direction.z]
            .iter()
            .all(|v| v.is_finite());
        if !finite || !max_distance.is_finite() || direction.magnitude2() == 0.0 {
            return None;
        }
        let dir = direction.normalize();
        let origin = [origin.x, origin.y, origin.z];
        let dir = [dir.x, dir.y, dir.z];

        let mut cell = [0i32; 3];
        let mut step = [0i32; 3];
        let mut t_max = [f32::INFINITY; 3];
        let mut t_delta = [f32::INFINITY; 3];
        for axis in 0..3 {
            cell[axis] = origin[axis].floor() as i32;
            if dir[axis] > 0.0 {
                step[axis] = 1;
                t_max[axis] = (cell[axis] as f32 + 1.0 - origin[axis]) / dir[axis];
                t_delta[axis] = 1.0 / dir[axis];
            } else if dir[axis] < 0.0 {
                step[axis] = -1;
                t_max[axis] = (origin[axis] - cell[axis] as f32) / -dir[axis];
                t_delta[axis] = 1.0 / -dir[axis];
            }
        }

        // A hit in the starting cell is reported on the face the ray looks out of
        let dominant = (0..3)
            .max_by(|&a, &b| dir[a].abs().total_cmp(&dir[b].abs()))
            .unwrap_or(0);
        let mut face = entry_face(dominant, -step[dominant]);
        let mut distance = 0.0;

        loop {
            if let Some(hit) = self.get_block(cell[0], cell[1], cell[2]) {
                if hit.is_solid() {
                    return Some(RaycastHit {
                        block: Point3::new(cell[0], cell[1], cell[2]),
                        face,
                        distance,
                        id: hit.id,
                    });
                }
            }

            let axis = if t_max[0] < t_max[1] {
                if t_max[0] < t_max[2] { 0 } else { 2 }
            } else if t_max[1] < t_max[2] {
                1
            } else {
                2
            };
            distance = t_max[axis];
            if distance > max_distance {
                return None;
            }
            cell[axis] += step[axis];
            t_max[axis] += t_delta[axis];
            face = entry_face(axis, step[axis]);
        }
    }

    /// Every solid cell whose unit cube overlaps the box `[min, max]`.
    ///
    /// Cells run from `floor(min)` to `ceil(max) - 1` on each axis, so a box
    /// resting exactly on a face does not pick up the cell on the other side.
    pub fn solid_cells_in_box(&self, min: Point3<f32>, max: Point3<f32>) -> Vec<Point3<i32>> {
        let mut cells = Vec::new();
        for x in min.x.floor() as i32..max.x.ceil() as i32 {
            for y in min.y.floor() as i32..max.y.ceil() as i32 {
                for z in min.z.floor() as i32..max.z.ceil() as i32 {
                    if self.is_solid(x, y, z) {
                        cells.push(Point3::new(x, y, z));
                    }
                }
            }
        }
        cells
    }
}

/// The face a ray crosses when it steps along `axis` in direction `step`.
fn entry_face(axis: usize, step: i32) -> BlockSide {
    match (axis, step > 0) {
        (0, true) => BlockSide::FRONT,
        (0, false) => BlockSide::BACK,
        (1, true) => BlockSide::BOTTOM,
        (1, false) => BlockSide::TOP,
        (_, true) => BlockSide::LEFT,
        (_, false) => BlockSide::RIGHT,
    }
}

impl BlockWriter for World {
    /// Writes without remeshing; [`World::generate_cabin`] remeshes afterwards.
    fn write_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        self.set_block(x, y, z, id, false);
    }
}
