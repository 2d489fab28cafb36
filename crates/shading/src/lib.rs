//! The two fragment programs of the bloxel renderer: textured block faces
//! and the animated translucent grid overlay, both routed through deferred
//! (order-independent) transparency.
//!
//! # Invariants
//! - Shading is pure: every entry point is a function of its inputs and the
//!   read-only resources passed in. No ambient state, no globals.
//! - Shading cannot fail. Culling and deferral are designed outcomes,
//!   expressed in [`FragmentOutput`] rather than an implicit discard.
//! - Lighting and accumulation are seams ([`bloxel_lighting::LightingModel`],
//!   [`bloxel_oit::OitAccumulator`]); the host decides their implementations.

mod block;
mod fragment;
mod grid;
pub mod wgsl;

pub use block::shade_block_face;
pub use fragment::{FragmentInput, FragmentOutput};
pub use grid::{line_brightness, on_grid_line, shade_grid_overlay};

/// Grid periods per unit of texture space, shared by both programs.
pub const GRID_FREQUENCY: f32 = 15.0;
/// Half-width of the thin axis of a grid line, in fractions of a period.
pub const LINE_HALF_WIDTH_TIGHT: f32 = 0.015;
/// Half-width of the thick crossing axis, in fractions of a period.
pub const LINE_HALF_WIDTH_WIDE: f32 = 0.075;
/// Water multiplies its sampled alpha by this on top of the texture.
pub const WATER_ALPHA_FACTOR: f32 = 0.5;
/// Layer used when a tag carries an id outside the block vocabulary.
pub const FALLBACK_LAYER: u32 = 0;

pub fn crate_info() -> &'static str {
    "bloxel-shading v0.1.0"
}
