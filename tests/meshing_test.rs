//! # Meshing Integration Tests
//!
//! Occlusion culling and render-slot bookkeeping on generated chunks, plus
//! bounds safety of the chunk accessors.

use voxel_world::engine_state::voxels::block::block_side::BlockSide;
use voxel_world::engine_state::voxels::chunk::{Chunk, ChunkDims};
use voxel_world::engine_state::voxels::generation::GenerationParams;
use voxel_world::{BlockId, ChunkCoord};

fn generated_chunk(coord: ChunkCoord) -> Chunk {
    let mut chunk = Chunk::new(coord, ChunkDims::new(16, 32), GenerationParams::default());
    chunk.generate();
    chunk.generate_meshes();
    chunk
}

fn neighbour_is_solid(chunk: &Chunk, x: i32, y: i32, z: i32, side: BlockSide) -> bool {
    let offset = side.offset();
    chunk
        .block_id(x + offset.x, y + offset.y, z + offset.z)
        .is_some_and(|id| !id.is_empty())
}

#[test]
fn drawn_cells_are_exactly_the_exposed_ones() {
    for coord in [ChunkCoord::new(0, 0), ChunkCoord::new(-3, 2)] {
        let chunk = generated_chunk(coord);
        let mesh = chunk.mesh().unwrap();
        let mut drawn = 0;

        for y in 0..32 {
            for z in 0..16 {
                for x in 0..16 {
                    let id = chunk.block_id(x, y, z).unwrap();
                    let buried = BlockSide::all()
                        .into_iter()
                        .all(|side| neighbour_is_solid(&chunk, x, y, z, side));
                    let slot = chunk.render_slot(x, y, z);

                    if id.is_empty() || buried {
                        assert_eq!(slot, None, "({}, {}, {}) {:?}", x, y, z, id);
                        continue;
                    }

                    let slot = slot.expect("exposed cell must be drawn") as usize;
                    let batch = mesh.batch(id).unwrap();
                    let expected = [x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5];
                    assert_eq!(batch.instances[slot].position, expected);
                    drawn += 1;
                }
            }
        }
        assert_eq!(drawn, mesh.instance_count());
    }
}

#[test]
fn batches_are_non_empty_and_sized_to_the_chunk() {
    let chunk = generated_chunk(ChunkCoord::new(1, 1));
    let mesh = chunk.mesh().unwrap();
    assert!(!mesh.is_empty());
    let mut previous = None;
    for batch in mesh.batches() {
        assert!(!batch.is_empty());
        assert_ne!(batch.block, BlockId::Empty);
        assert_eq!(batch.capacity, 16 * 16 * 32);
        assert_eq!(batch.as_floats().len(), batch.len() * 3);
        assert!(previous < Some(batch.block));
        previous = Some(batch.block);
    }
    // Every column's surface is exposed
    assert!(mesh.batch(BlockId::Grass).is_some());
}

#[test]
fn out_of_range_indices_never_touch_the_grid() {
    let mut chunk = generated_chunk(ChunkCoord::new(0, 0));
    let snapshot: Vec<_> = chunk.cells().to_vec();

    let bad_horizontal = [i32::MIN, -17, -1, 16, 33, i32::MAX];
    let bad_vertical = [i32::MIN, -1, 32, 33, i32::MAX];
    let mut samples = Vec::new();
    for &v in &bad_horizontal {
        samples.extend([(v, 0, 0), (0, 0, v), (v, 5, v)]);
    }
    for &v in &bad_vertical {
        samples.extend([(0, v, 0), (15, v, 15)]);
    }
    for (x, y, z) in samples {
        assert!(chunk.get_block(x, y, z).is_none());
        assert!(chunk.block_id(x, y, z).is_none());
        assert!(!chunk.set_block_id(x, y, z, BlockId::Lamp));
    }
    // 16..31 is in range for the vertical axis only
    assert!(chunk.get_block(0, 16, 0).is_some());
    assert!(chunk.get_block(16, 16, 0).is_none());

    assert_eq!(chunk.cells(), snapshot.as_slice());
}
