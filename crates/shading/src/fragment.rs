use bloxel_blocks::InstanceTag;
use bloxel_common::Rgba;
use bloxel_oit::{OitAccumulator, OitFragment};
use glam::{Vec2, Vec3};

/// The host-supplied values for one fragment invocation.
///
/// Everything here has the lifetime of exactly one invocation; nothing is
/// shared or persisted between fragments.
#[derive(Debug, Clone, Copy)]
pub struct FragmentInput {
    /// Per-instance tag bits (block id, hide flags, selection).
    pub tag: InstanceTag,
    /// Fragment position: screen x/y in pixels, z the depth in `[0, 1]`.
    pub position: Vec3,
    /// World-space surface normal, unit length.
    pub world_normal: Vec3,
    /// Surface texture coordinates.
    pub uv: Vec2,
    /// Host front-facing flag.
    pub front_facing: bool,
    /// Global elapsed time in seconds, monotonically increasing.
    pub time: f32,
}

/// The explicit outcome of a fragment program.
///
/// The GPU original expressed two of these as `discard`: culled faces
/// simply vanish, and blended fragments are pushed into the OIT accumulator
/// before discarding. Returning the outcome lets the host decide how to act
/// and makes the routing testable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FragmentOutput {
    /// Write this color through the normal output path.
    Shaded(Rgba),
    /// Hand this fragment to the OIT accumulator; nothing is written now.
    Deferred(OitFragment),
    /// Intentionally not written (face culling).
    Culled,
}

impl FragmentOutput {
    /// Perform the side-effecting half of the original control flow:
    /// deferred fragments go into the accumulator, shaded colors come back
    /// to be written, culled fragments produce nothing.
    pub fn route(self, accumulator: &mut impl OitAccumulator) -> Option<Rgba> {
        match self {
            FragmentOutput::Shaded(color) => Some(color),
            FragmentOutput::Deferred(fragment) => {
                accumulator.accumulate(fragment);
                None
            }
            FragmentOutput::Culled => None,
        }
    }

    pub fn is_culled(&self) -> bool {
        matches!(self, FragmentOutput::Culled)
    }

    /// The shaded or deferred color, if any.
    pub fn color(&self) -> Option<Rgba> {
        match self {
            FragmentOutput::Shaded(color) => Some(*color),
            FragmentOutput::Deferred(fragment) => Some(fragment.color),
            FragmentOutput::Culled => None,
        }
    }
}
