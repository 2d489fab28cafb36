//! Shared types for the bloxel shading kernel: linear color and small
//! GPU-semantics math helpers.
//!
//! # Invariants
//! - `Rgba` is linear-light; sRGB conversion happens only at the image
//!   output boundary.
//! - `fract` matches GPU semantics: the result is in `[0, 1)` for every
//!   finite input, including negatives.

mod color;

pub use color::Rgba;

/// Fractional part with GPU semantics: `x - floor(x)`, always in `[0, 1)`.
///
/// `f32::fract` keeps the sign of the input, which is wrong for periodic
/// texture-space tests on negative coordinates.
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

pub fn crate_info() -> &'static str {
    "bloxel-common v0.1.0"
}
