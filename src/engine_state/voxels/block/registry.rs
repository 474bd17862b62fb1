//! # Block Registry
//!
//! Pure data describing each block: its display name and, for ores, the noise
//! parameters that decide where it replaces another block. Nothing here knows
//! about rendering; the visual layer keeps its own appearance table.

use cgmath::Vector3;

use super::block_type::BlockId;

/// Noise parameters that place an ore.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OreParams {
    /// Per-axis divisor applied to world coordinates before sampling 3D noise.
    pub scale: Vector3<f64>,
    /// Noise threshold; a cell becomes ore only where the sample exceeds this.
    pub scarcity: f64,
}

/// One step of resource generation: `id` may only replace cells currently holding `target`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OreRule {
    /// The ore placed.
    pub id: BlockId,
    /// The block it replaces.
    pub target: BlockId,
}

/// Static metadata for one block type.
#[derive(Copy, Clone, Debug)]
pub struct BlockDefinition {
    /// The block this entry describes.
    pub id: BlockId,
    /// Human readable name.
    pub display_name: &'static str,
    /// Ore placement parameters, for blocks produced by resource generation.
    pub ore: Option<OreParams>,
}

const fn plain(id: BlockId, display_name: &'static str) -> BlockDefinition {
    BlockDefinition {
        id,
        display_name,
        ore: None,
    }
}

const fn ore(
    id: BlockId,
    display_name: &'static str,
    scale: f64,
    scarcity: f64,
) -> BlockDefinition {
    BlockDefinition {
        id,
        display_name,
        ore: Some(OreParams {
            scale: Vector3 {
                x: scale,
                y: scale,
                z: scale,
            },
            scarcity,
        }),
    }
}

/// Indexed by `BlockId as usize`.
static BLOCK_DEFINITIONS: [BlockDefinition; BlockId::COUNT] = [
    plain(BlockId::Empty, "Empty"),
    plain(BlockId::Grass, "Grass"),
    plain(BlockId::Dirt, "Dirt"),
    ore(BlockId::Stone, "Stone", 30.0, 0.5),
    ore(BlockId::Coal, "Coal Ore", 20.0, 0.8),
    ore(BlockId::Iron, "Iron Ore", 40.0, 0.9),
    plain(BlockId::Wood, "Wood"),
    plain(BlockId::Leaves, "Leaves"),
    plain(BlockId::Cloud, "Cloud"),
    plain(BlockId::Lamp, "Lamp"),
];

/// Resource generation order. Stone must come first so the ores that replace
/// it have something to replace.
pub static ORE_RULES: [OreRule; 3] = [
    OreRule {
        id: BlockId::Stone,
        target: BlockId::Dirt,
    },
    OreRule {
        id: BlockId::Coal,
        target: BlockId::Stone,
    },
    OreRule {
        id: BlockId::Iron,
        target: BlockId::Stone,
    },
];

/// Read-only access to the static block table.
pub struct BlockRegistry;

impl BlockRegistry {
    /// The definition of `id`.
    pub fn get(id: BlockId) -> &'static BlockDefinition {
        &BLOCK_DEFINITIONS[id.index()]
    }

    /// Default ore parameters for `id`, if it is an ore.
    pub fn ore_params(id: BlockId) -> Option<OreParams> {
        Self::get(id).ore
    }

    /// The ordered resource rules.
    pub fn ore_rules() -> &'static [OreRule] {
        &ORE_RULES
    }
}

/// The effective ore parameters used by one generation pass.
///
/// Starts from the registry defaults; configuration may override the scale
/// and scarcity of individual ores.
#[derive(Clone, Debug, PartialEq)]
pub struct OreTable {
    entries: Vec<(OreRule, OreParams)>,
}

impl OreTable {
    /// The registry defaults, in rule order.
    pub fn defaults() -> Self {
        let entries = BlockRegistry::ore_rules()
            .iter()
            .filter_map(|rule| BlockRegistry::ore_params(rule.id).map(|params| (*rule, params)))
            .collect();
        OreTable { entries }
    }

    /// Replaces the parameters of `id`. Returns `false` if `id` has no rule.
    pub fn set_params(&mut self, id: BlockId, params: OreParams) -> bool {
        let mut found = false;
        for (rule, existing) in self.entries.iter_mut() {
            if rule.id == id {
                *existing = params;
                found = true;
            }
        }
        found
    }

    /// The parameters currently in effect for `id`.
    pub fn params(&self, id: BlockId) -> Option<OreParams> {
        self.entries
            .iter()
            .find(|(rule, _)| rule.id == id)
            .map(|(_, params)| *params)
    }

    /// Rules with their parameters, in application order.
    pub fn iter(&self) -> impl Iterator<Item = &(OreRule, OreParams)> {
        self.entries.iter()
    }
}

impl Default for OreTable {
    fn default() -> Self {
        Self::defaults()
    }
}
