//! Renderer-facing block appearance.
//!
//! Kept apart from the block registry so that generation and tests never depend
//! on anything visual.

use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::block::block_type::BlockId;

/// How a host should draw one block type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlockAppearance {
    /// Texture array index per face, in `BlockSide` order:
    /// [Front, Back, Bottom, Top, Left, Right]
    pub textures: [usize; 6],
    /// Base colour as `0xRRGGBB`.
    pub tint: u32,
    /// Needs alpha blending.
    pub transparent: bool,
    /// Emits light.
    pub emissive: bool,
}

const fn uniform(texture: usize, tint: u32) -> BlockAppearance {
    BlockAppearance {
        textures: [texture; 6],
        tint,
        transparent: false,
        emissive: false,
    }
}

/// Indexed by `BlockId as usize`. Empty is never drawn.
static BLOCK_APPEARANCES: [Option<BlockAppearance>; BlockId::COUNT] = [
    None,
    // GRASS (top: 3, bottom: 1, sides: 2)
    Some(BlockAppearance {
        textures: [2, 2, 1, 3, 2, 2],
        tint: 0x00ff00,
        transparent: false,
        emissive: false,
    }),
    Some(uniform(1, 0x8b4513)),
    Some(uniform(4, 0x808080)),
    Some(uniform(5, 0x2f2f2f)),
    Some(uniform(6, 0xd8af93)),
    Some(uniform(0, 0x6b4423)),
    Some(BlockAppearance {
        textures: [7; 6],
        tint: 0x2e8b57,
        transparent: true,
        emissive: false,
    }),
    Some(BlockAppearance {
        textures: [8; 6],
        tint: 0xffffff,
        transparent: true,
        emissive: false,
    }),
    Some(BlockAppearance {
        textures: [9; 6],
        tint: 0xffd27f,
        transparent: false,
        emissive: true,
    }),
];

impl BlockAppearance {
    /// The appearance of `id`, or `None` for Empty.
    pub fn of(id: BlockId) -> Option<&'static BlockAppearance> {
        BLOCK_APPEARANCES[id.index()].as_ref()
    }

    /// The texture index of one face.
    pub fn texture_index(&self, side: BlockSide) -> usize {
        self.textures[side as usize]
    }
}
