use crate::BlockType;
use glam::Vec3;
use serde::{Deserialize, Serialize};

const BLOCK_ID_MASK: u32 = 0xff;
const HIDE_SHIFT: u32 = 8;
const SELECTED_BIT: u32 = 1 << 14;

/// Height of a water block whose top face is exposed to non-water. The
/// surface sits slightly below the cell so shorelines read as a step.
const WATER_SURFACE_HEIGHT: f32 = 0.9;

/// One of the six axis-aligned block faces, in tag-bit order.
///
/// `Face::NegX` maps to hide bit 8, `Face::PosZ` to bit 13.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    NegX,
    PosX,
    NegY,
    PosY,
    NegZ,
    PosZ,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::NegX,
        Face::PosX,
        Face::NegY,
        Face::PosY,
        Face::NegZ,
        Face::PosZ,
    ];

    /// Index into the hide-bit range and neighbor arrays.
    pub fn index(self) -> usize {
        match self {
            Face::NegX => 0,
            Face::PosX => 1,
            Face::NegY => 2,
            Face::PosY => 3,
            Face::NegZ => 4,
            Face::PosZ => 5,
        }
    }

    /// Outward unit normal of this face.
    pub fn outward(self) -> Vec3 {
        match self {
            Face::NegX => Vec3::NEG_X,
            Face::PosX => Vec3::X,
            Face::NegY => Vec3::NEG_Y,
            Face::PosY => Vec3::Y,
            Face::NegZ => Vec3::NEG_Z,
            Face::PosZ => Vec3::Z,
        }
    }

    /// Directional sign test: does a fragment with this world normal belong
    /// to this face?
    pub fn matches(self, normal: Vec3) -> bool {
        match self {
            Face::NegX => normal.x < 0.0,
            Face::PosX => normal.x > 0.0,
            Face::NegY => normal.y < 0.0,
            Face::PosY => normal.y > 0.0,
            Face::NegZ => normal.z < 0.0,
            Face::PosZ => normal.z > 0.0,
        }
    }
}

/// Per-face hide flags, decoded once from the raw tag.
///
/// An explicit struct of six booleans rather than ad-hoc bit tests, so the
/// culling rules read as face logic instead of shifts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceVisibility {
    hidden: [bool; 6],
}

impl FaceVisibility {
    /// No faces hidden.
    pub fn all_visible() -> Self {
        Self::default()
    }

    pub fn hidden(&self, face: Face) -> bool {
        self.hidden[face.index()]
    }

    pub fn set_hidden(&mut self, face: Face, hidden: bool) {
        self.hidden[face.index()] = hidden;
    }

    /// True if any hidden face's direction matches the given normal.
    pub fn culls(&self, normal: Vec3) -> bool {
        Face::ALL
            .iter()
            .any(|&face| self.hidden(face) && face.matches(normal))
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.iter().filter(|h| **h).count()
    }
}

/// The packed per-instance tag set by the host instancing system.
///
/// Layout: bits 0–7 block id, bits 8–13 per-face hide flags (tag-bit order
/// of [`Face`]), bit 14 selected. Remaining bits are reserved and preserved
/// through round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceTag(pub u32);

impl InstanceTag {
    /// Tag for a block with every face visible and no selection.
    pub fn new(block: BlockType) -> Self {
        Self(block.id() as u32)
    }

    /// Build the tag for a block from its six neighbors: a face is hidden
    /// when the neighbor on that side is solid or is the same block type
    /// (interior faces of merged volumes, e.g. water against water).
    pub fn for_neighbors(block: BlockType, neighbors: [BlockType; 6]) -> Self {
        let mut tag = Self::new(block);
        for face in Face::ALL {
            let neighbor = neighbors[face.index()];
            if neighbor.is_solid() || neighbor == block {
                tag = tag.with_hidden(face);
            }
        }
        tag
    }

    /// Raw block id from the low eight bits.
    pub fn block_id(self) -> u8 {
        (self.0 & BLOCK_ID_MASK) as u8
    }

    /// Decoded block type, `None` for ids outside the vocabulary.
    pub fn block_type(self) -> Option<BlockType> {
        BlockType::from_id(self.block_id())
    }

    /// Decode the six hide flags.
    pub fn visibility(self) -> FaceVisibility {
        let mut vis = FaceVisibility::all_visible();
        for face in Face::ALL {
            let bit = 1u32 << (HIDE_SHIFT + face.index() as u32);
            vis.set_hidden(face, self.0 & bit != 0);
        }
        vis
    }

    /// Read but not consumed by shading; carried for the host's pickers.
    pub fn selected(self) -> bool {
        self.0 & SELECTED_BIT != 0
    }

    pub fn with_hidden(self, face: Face) -> Self {
        Self(self.0 | 1 << (HIDE_SHIFT + face.index() as u32))
    }

    pub fn with_visible(self, face: Face) -> Self {
        Self(self.0 & !(1 << (HIDE_SHIFT + face.index() as u32)))
    }

    pub fn with_selected(self, selected: bool) -> Self {
        if selected {
            Self(self.0 | SELECTED_BIT)
        } else {
            Self(self.0 & !SELECTED_BIT)
        }
    }
}

/// What the host instances for one block: its tag plus the mesh height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockSurface {
    pub tag: InstanceTag,
    pub height: f32,
}

impl BlockSurface {
    /// Tag and height for a block given its neighbors.
    ///
    /// Water with non-water above keeps its top face visible and drops to
    /// the surface height, so still water renders a lowered, visible
    /// surface instead of a culled full cell.
    pub fn of(block: BlockType, neighbors: [BlockType; 6]) -> Self {
        let mut tag = InstanceTag::for_neighbors(block, neighbors);
        let mut height = 1.0;

        if block == BlockType::Water && neighbors[Face::PosY.index()] != BlockType::Water {
            height = WATER_SURFACE_HEIGHT;
            tag = tag.with_visible(Face::PosY);
        }

        Self { tag, height }
    }
}
