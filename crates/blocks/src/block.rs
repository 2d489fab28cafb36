use glam::Vec3;
use serde::{Deserialize, Serialize};

/// The block vocabulary carried in instance tags.
///
/// Discriminants are the wire ids the instancing system packs into the low
/// eight tag bits. Air is never instanced; it exists so scene data can name
/// empty cells.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockType {
    #[default]
    Air = 0,
    Dirt = 1,
    Stone = 2,
    Sand = 3,
    Grass = 4,
    Wood = 5,
    Leaves = 6,
    Water = 7,
}

impl BlockType {
    /// Decode a wire id. Ids outside 0..=7 are a named boundary, not a
    /// silent fallback: callers get `None` and choose what to do.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Air),
            1 => Some(Self::Dirt),
            2 => Some(Self::Stone),
            3 => Some(Self::Sand),
            4 => Some(Self::Grass),
            5 => Some(Self::Wood),
            6 => Some(Self::Leaves),
            7 => Some(Self::Water),
            _ => None,
        }
    }

    /// Wire id for tag packing.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Whether neighboring faces against this block can be hidden.
    pub fn is_solid(self) -> bool {
        match self {
            Self::Air | Self::Leaves | Self::Water => false,
            Self::Dirt | Self::Stone | Self::Sand | Self::Grass | Self::Wood => true,
        }
    }

    /// Texture-array layer for a face of this block type.
    ///
    /// Grass is the one orientation-dependent block: grass top when the
    /// normal points up, dirt when it points down, the grass side strip
    /// otherwise. Everything else uses a single layer regardless of face.
    /// Air shares the dirt layer; it only reaches here through a degenerate
    /// tag and the shading boundary logs that case.
    pub fn texture_layer(self, normal: Vec3) -> u32 {
        match self {
            Self::Air => 0,
            Self::Dirt => 0,
            Self::Stone => 1,
            Self::Sand => 2,
            Self::Grass => {
                if normal.y > 0.0 {
                    4
                } else if normal.y < 0.0 {
                    0
                } else {
                    3
                }
            }
            Self::Wood => 5,
            Self::Leaves => 6,
            Self::Water => 7,
        }
    }
}
