//! # Chunk Generation Benchmark
//!
//! Measures the per-chunk cost a player pays when crossing a chunk border:
//! generation, mesh building and a full residency update.
//!
//! Run with: `cargo bench --bench chunk_generation`

#![allow(missing_docs)]

use cgmath::Point3;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use voxel_world::engine_state::voxels::chunk::{Chunk, ChunkDims};
use voxel_world::engine_state::voxels::generation::{GenerationParams, GenerationPass};
use voxel_world::{ChunkCoord, World, WorldConfig};

fn bench_generation(c: &mut Criterion) {
    let params = GenerationParams::default();
    let coord = ChunkCoord::new(3, -2);
    let (x, z) = (coord.x, coord.z);

    c.bench_function("terrain_and_resources_16x32", |b| {
        b.iter(|| {
            let mut chunk = Chunk::new(coord, ChunkDims::new(16, 32), params.clone());
            chunk.generate_terrain(&mut params.rng_for_pass(GenerationPass::Terrain, x, z));
            chunk.generate_resources(&mut params.rng_for_pass(GenerationPass::Resources, x, z));
            black_box(chunk)
        });
    });
}

fn bench_meshing(c: &mut Criterion) {
    let mut chunk = Chunk::new(
        ChunkCoord::new(0, 0),
        ChunkDims::new(16, 32),
        GenerationParams::default(),
    );
    chunk.generate();

    c.bench_function("generate_meshes_16x32", |b| {
        b.iter(|| {
            chunk.generate_meshes();
            black_box(chunk.mesh().map(|mesh| mesh.instance_count()))
        });
    });
}

fn bench_world_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_update");
    group.sample_size(10);

    for render_distance in [1u32, 2, 4] {
        group.bench_with_input(
            BenchmarkId::from_parameter(render_distance),
            &render_distance,
            |b, &render_distance| {
                b.iter(|| {
                    let mut world = World::new(WorldConfig {
                        render_distance,
                        ..WorldConfig::default()
                    });
                    black_box(world.update(Point3::new(0.0, 20.0, 0.0)))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_generation, bench_meshing, bench_world_update);
criterion_main!(benches);
