//! # Structure Generation
//!
//! Carves hand-shaped structures into already generated terrain. Currently that
//! is one structure: a wooden cabin with a leaf roof, optionally sitting on top
//! of a stone bunker reached by a staircase.
//!
//! Carving goes through [`BlockWriter`], so the same routine can write into a
//! single chunk that is still being loaded ([`ChunkWriter`]) or into the whole
//! world (`World` implements the trait).

use cgmath::Point2;
use serde::{Deserialize, Serialize};

use super::block::block_type::BlockId;
use super::chunk::Chunk;

/// Extra headroom cleared above the walls.
const CLEARANCE_ABOVE: i32 = 5;
/// Horizontal padding of the cleared volume around the footprint.
const CLEARANCE_MARGIN: i32 = 2;
/// Door opening height.
const DOOR_HEIGHT: i32 = 3;
/// Bunker floor distance below the cabin floor, and the number of stair steps minus one.
const BUNKER_DEPTH: i32 = 6;

/// The wall that carries the door.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorSide {
    /// Maximum-Z wall.
    North,
    /// Minimum-Z wall.
    South,
    /// Maximum-X wall.
    East,
    /// Minimum-X wall.
    West,
}

impl DoorSide {
    /// Parses the lowercase name used in configuration files, e.g. `"north"`.
    pub fn from_name(name: &str) -> Option<DoorSide> {
        serde_json::from_value(serde_json::Value::String(name.to_owned())).ok()
    }
}

/// Everything needed to carve one cabin.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CabinSpec {
    /// Centre column, world X.
    pub x: i32,
    /// Floor level: the first cell above the stone floor.
    pub y: i32,
    /// Centre column, world Z.
    pub z: i32,
    /// Footprint along X.
    pub width: i32,
    /// Footprint along Z.
    pub depth: i32,
    /// Wall height in blocks; the roof sits directly above.
    pub wall_height: i32,
    /// Wall that carries the door.
    pub door: DoorSide,
    /// Dig a bunker with a staircase below the cabin.
    pub bunker: bool,
}

impl Default for CabinSpec {
    fn default() -> Self {
        CabinSpec {
            x: 0,
            y: 0,
            z: 0,
            width: 6,
            depth: 6,
            wall_height: 4,
            door: DoorSide::South,
            bunker: false,
        }
    }
}

impl CabinSpec {
    fn half_width(&self) -> i32 {
        self.width.div_euclid(2)
    }

    fn half_depth(&self) -> i32 {
        self.depth.div_euclid(2)
    }

    fn bunker_half_extents(&self) -> (i32, i32) {
        ((self.width * 2).div_euclid(2), (self.depth * 2).div_euclid(2))
    }

    /// Top step of the staircase; the second lane runs along `x - 1`.
    fn stair_corner(&self) -> Point2<i32> {
        Point2::new(self.x + self.half_width() - 1, self.z + self.half_depth() - 1)
    }

    /// The inclusive horizontal rectangle the carving can write to, as
    /// `(min, max)` world `(x, z)` corners.
    pub fn horizontal_bounds(&self) -> (Point2<i32>, Point2<i32>) {
        let (hw, hd) = (self.half_width(), self.half_depth());
        let mut min = Point2::new(self.x - hw - CLEARANCE_MARGIN, self.z - hd - CLEARANCE_MARGIN);
        let mut max = Point2::new(self.x + hw + CLEARANCE_MARGIN, self.z + hd + CLEARANCE_MARGIN);
        if self.bunker {
            let (hbw, hbd) = self.bunker_half_extents();
            let stairs = self.stair_corner();
            min.x = min.x.min(self.x - hbw).min(stairs.x - 1);
            max.x = max.x.max(self.x + hbw).max(stairs.x);
            // The lowest step and its second row sit BUNKER_DEPTH + 1 cells towards -Z
            min.y = min.y.min(self.z - hbd).min(stairs.y - BUNKER_DEPTH - 1);
            max.y = max.y.max(self.z + hbd).max(stairs.y);
        }
        (min, max)
    }

    fn is_door(&self, ix: i32, iy: i32, iz: i32) -> bool {
        if iy < self.y || iy >= self.y + DOOR_HEIGHT {
            return false;
        }
        let (hw, hd) = (self.half_width(), self.half_depth());
        match self.door {
            DoorSide::South => iz == self.z - hd && ix == self.x,
            DoorSide::North => iz == self.z + hd && ix == self.x,
            DoorSide::West => ix == self.x - hw && iz == self.z,
            DoorSide::East => ix == self.x + hw && iz == self.z,
        }
    }
}

/// A sink for world-coordinate block writes.
pub trait BlockWriter {
    /// Writes `id` at world `(x, y, z)`. Writes that cannot land are dropped.
    fn write_block(&mut self, x: i32, y: i32, z: i32, id: BlockId);
}

/// Writes into one chunk, dropping anything outside its horizontal extent.
pub struct ChunkWriter<'a> {
    chunk: &'a mut Chunk,
}

impl<'a> ChunkWriter<'a> {
    /// Wraps `chunk`.
    pub fn new(chunk: &'a mut Chunk) -> Self {
        ChunkWriter { chunk }
    }
}

impl BlockWriter for ChunkWriter<'_> {
    fn write_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        if !self.chunk.contains_world_column(x, z) {
            return;
        }
        let origin = self.chunk.world_origin();
        self.chunk.set_block_id(x - origin.x, y, z - origin.z, id);
    }
}

/// Carves the cabin described by `spec` through `writer`.
///
/// Order matters: the volume above the footprint is cleared first, then the
/// stone floor, the wooden walls with their door, the leaf roof and finally the
/// optional bunker. Carving the same spec twice over the same terrain yields
/// the same blocks.
pub fn generate_cabin<W: BlockWriter + ?Sized>(writer: &mut W, spec: &CabinSpec) {
    let CabinSpec {
        x,
        y,
        z,
        wall_height,
        ..
    } = *spec;
    let (hw, hd) = (spec.half_width(), spec.half_depth());

    // Clear
    for iy in y..y + wall_height + CLEARANCE_ABOVE {
        for ix in x - hw - CLEARANCE_MARGIN..=x + hw + CLEARANCE_MARGIN {
            for iz in z - hd - CLEARANCE_MARGIN..=z + hd + CLEARANCE_MARGIN {
                writer.write_block(ix, iy, iz, BlockId::Empty);
            }
        }
    }

    // Floor
    for ix in x - hw..=x + hw {
        for iz in z - hd..=z + hd {
            writer.write_block(ix, y - 1, iz, BlockId::Stone);
        }
    }

    // Walls
    for iy in y..y + wall_height {
        for ix in x - hw..=x + hw {
            for iz in z - hd..=z + hd {
                let edge_x = ix == x - hw || ix == x + hw;
                let edge_z = iz == z - hd || iz == z + hd;
                if !(edge_x || edge_z) {
                    continue;
                }
                let id = if spec.is_door(ix, iy, iz) {
                    BlockId::Empty
                } else {
                    BlockId::Wood
                };
                writer.write_block(ix, iy, iz, id);
            }
        }
    }

    // Roof
    for ix in x - hw - 1..=x + hw + 1 {
        for iz in z - hd - 1..=z + hd + 1 {
            writer.write_block(ix, y + wall_height, iz, BlockId::Leaves);
        }
    }

    if spec.bunker {
        generate_bunker(writer, spec);
    }
}

/// A stone room twice the cabin's footprint, dug below its floor, with lamps
/// under the ceiling corners and a two-wide staircase up into the cabin.
fn generate_bunker<W: BlockWriter + ?Sized>(writer: &mut W, spec: &CabinSpec) {
    let CabinSpec { x, y, z, .. } = *spec;
    let (hw, hd) = (spec.half_width(), spec.half_depth());
    let bunker_y = y - BUNKER_DEPTH - 1;
    let (hbw, hbd) = spec.bunker_half_extents();

    // Hollow out the room, walls on its perimeter
    for iy in bunker_y..y - 1 {
        for ix in x - hbw..=x + hbw {
            for iz in z - hbd..=z + hbd {
                let edge = ix == x - hbw || ix == x + hbw || iz == z - hbd || iz == z + hbd;
                let id = if edge { BlockId::Stone } else { BlockId::Empty };
                writer.write_block(ix, iy, iz, id);
            }
        }
    }

    // Floor
    for ix in x - hbw..=x + hbw {
        for iz in z - hbd..=z + hbd {
            writer.write_block(ix, bunker_y - 1, iz, BlockId::Stone);
        }
    }

    // Ceiling, except where the cabin floor already is, and lamps
    for ix in x - hbw..=x + hbw {
        for iz in z - hbd..=z + hbd {
            let under_cabin = (ix - x).abs() <= hw && (iz - z).abs() <= hd;
            if !under_cabin {
                writer.write_block(ix, y - 1, iz, BlockId::Stone);
            }
            if (ix - x).abs() == hbw - 1 && (iz - z).abs() == hbd - 1 {
                writer.write_block(ix, y - 2, iz, BlockId::Lamp);
            }
        }
    }

    // Stairs, descending towards -Z
    let Point2 {
        x: stair_x,
        y: stair_z,
    } = spec.stair_corner();
    for i in 0..=BUNKER_DEPTH {
        let step_y = y - 1 - i;
        let step_z = stair_z - i;

        for dx in 0..=1 {
            for dz in 0..=1 {
                for headroom in 1..=3 {
                    let (hx, hy, hz) = (stair_x - dx, step_y + headroom, step_z - dz);
                    writer.write_block(hx, hy, hz, BlockId::Empty);
                }
            }
        }

        writer.write_block(stair_x, step_y, step_z, BlockId::Stone);
        writer.write_block(stair_x - 1, step_y, step_z, BlockId::Stone);

        if i == 0 {
            for dx in 0..=1 {
                for dz in 0..=1 {
                    writer.write_block(stair_x - dx, y - 1, step_z - dz, BlockId::Empty);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Records every write, last one wins.
    #[derive(Default)]
    struct MapWriter {
        blocks: HashMap<(i32, i32, i32), BlockId>,
    }

    impl BlockWriter for MapWriter {
        fn write_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
            self.blocks.insert((x, y, z), id);
        }
    }

    impl MapWriter {
        fn get(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
            self.blocks.get(&(x, y, z)).copied()
        }
    }

    fn cabin(door: DoorSide, bunker: bool) -> MapWriter {
        let mut writer = MapWriter::default();
        let spec = CabinSpec {
            x: 10,
            y: 20,
            z: -5,
            door,
            bunker,
            ..CabinSpec::default()
        };
        generate_cabin(&mut writer, &spec);
        writer
    }

    #[test]
    fn floor_walls_and_roof() {
        let w = cabin(DoorSide::South, false);
        // Floor below the footprint
        assert_eq!(w.get(10, 19, -5), Some(BlockId::Stone));
        assert_eq!(w.get(13, 19, -2), Some(BlockId::Stone));
        // Walls on the perimeter, interior cleared
        assert_eq!(w.get(7, 20, -5), Some(BlockId::Wood));
        assert_eq!(w.get(13, 23, -3), Some(BlockId::Wood));
        assert_eq!(w.get(10, 21, -5), Some(BlockId::Empty));
        // Roof one larger than the footprint
        assert_eq!(w.get(6, 24, -9), Some(BlockId::Leaves));
        assert_eq!(w.get(14, 24, -1), Some(BlockId::Leaves));
        assert_eq!(w.get(5, 24, -5), Some(BlockId::Empty));
    }

    #[test]
    fn door_is_one_wide_and_three_tall() {
        let w = cabin(DoorSide::South, false);
        for iy in 20..23 {
            assert_eq!(w.get(10, iy, -8), Some(BlockId::Empty));
            assert_eq!(w.get(9, iy, -8), Some(BlockId::Wood));
            assert_eq!(w.get(11, iy, -8), Some(BlockId::Wood));
        }
        assert_eq!(w.get(10, 23, -8), Some(BlockId::Wood));
    }

    #[test]
    fn door_sides() {
        let cases = [
            (DoorSide::North, (10, -2)),
            (DoorSide::South, (10, -8)),
            (DoorSide::East, (13, -5)),
            (DoorSide::West, (7, -5)),
        ];
        for (side, (dx, dz)) in cases {
            let w = cabin(side, false);
            assert_eq!(w.get(dx, 20, dz), Some(BlockId::Empty), "{:?}", side);
            for (other, (ox, oz)) in cases {
                if other != side {
                    assert_eq!(w.get(ox, 20, oz), Some(BlockId::Wood), "{:?} on {:?}", other, side);
                }
            }
        }
    }

    #[test]
    fn bunker_layout() {
        let w = cabin(DoorSide::South, true);
        // Floor and walls of the room
        assert_eq!(w.get(10, 12, -5), Some(BlockId::Stone));
        assert_eq!(w.get(4, 15, -5), Some(BlockId::Stone));
        assert_eq!(w.get(5, 15, -5), Some(BlockId::Empty));
        // Ceiling outside the cabin floor, lamps in the corners
        assert_eq!(w.get(5, 19, -10), Some(BlockId::Stone));
        assert_eq!(w.get(5, 18, -10), Some(BlockId::Lamp));
        assert_eq!(w.get(15, 18, 0), Some(BlockId::Lamp));
        // Top step is an opening in the cabin floor, the next one a stair
        assert_eq!(w.get(12, 19, -3), Some(BlockId::Empty));
        assert_eq!(w.get(11, 19, -4), Some(BlockId::Empty));
        assert_eq!(w.get(12, 18, -4), Some(BlockId::Stone));
        assert_eq!(w.get(11, 18, -4), Some(BlockId::Stone));
        assert_eq!(w.get(12, 13, -9), Some(BlockId::Stone));
    }

    #[test]
    fn bounds_cover_every_write() {
        for (width, depth) in [(6, 6), (4, 4), (2, 2), (5, 3), (3, 7), (1, 1), (10, 2)] {
            for bunker in [false, true] {
                let spec = CabinSpec {
                    x: 10,
                    y: 20,
                    z: -5,
                    width,
                    depth,
                    bunker,
                    ..CabinSpec::default()
                };
                let mut w = MapWriter::default();
                generate_cabin(&mut w, &spec);
                let (min, max) = spec.horizontal_bounds();
                for &(x, _, z) in w.blocks.keys() {
                    assert!(
                        (min.x..=max.x).contains(&x) && (min.y..=max.y).contains(&z),
                        "{}x{} bunker {}: ({}, {}) outside {:?}..={:?}",
                        width,
                        depth,
                        bunker,
                        x,
                        z,
                        min,
                        max
                    );
                }
            }
        }
    }

    #[test]
    fn small_bunker_stairs_extend_the_bounds() {
        let spec = CabinSpec {
            width: 4,
            depth: 4,
            bunker: true,
            ..CabinSpec::default()
        };
        let mut w = MapWriter::default();
        generate_cabin(&mut w, &spec);
        let lowest = w.blocks.keys().map(|&(_, _, z)| z).min();
        assert_eq!(lowest, Some(-6));
        assert_eq!(spec.horizontal_bounds().0.y, -6);
    }

    #[test]
    fn door_sides_parse_like_configuration() {
        assert_eq!(DoorSide::from_name("north"), Some(DoorSide::North));
        assert_eq!(DoorSide::from_name("west"), Some(DoorSide::West));
        assert_eq!(DoorSide::from_name("North"), None);
        assert_eq!(DoorSide::from_name("up"), None);
        assert_eq!(DoorSide::from_name(""), None);
    }

    #[test]
    fn carving_twice_is_stable() {
        let spec = CabinSpec {
            bunker: true,
            ..CabinSpec::default()
        };
        let mut once = MapWriter::default();
        generate_cabin(&mut once, &spec);
        let mut twice = MapWriter::default();
        generate_cabin(&mut twice, &spec);
        generate_cabin(&mut twice, &spec);
        assert_eq!(once.blocks, twice.blocks);
    }
}
