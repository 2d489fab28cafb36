//! Block vocabulary for the bloxel shading kernel: block types, the packed
//! per-instance tag, per-face visibility, and texture-array layer selection.
//!
//! # Invariants
//! - The tag layout is fixed: bits 0–7 block id, bits 8–13 per-face hide
//!   flags, bit 14 selected. Raw tags round-trip bit-exactly.
//! - Unknown block ids decode to `None`; callers decide the fallback. There
//!   is no implicit default block.
//! - Layer selection is a total function of (block type, normal).

mod block;
mod tag;

pub use block::BlockType;
pub use tag::{BlockSurface, Face, FaceVisibility, InstanceTag};

pub fn crate_info() -> &'static str {
    "bloxel-blocks v0.1.0"
}
