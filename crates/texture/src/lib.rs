//! CPU-side 2D texture array and sampler.
//!
//! The shading kernel reads a host-owned texture array: one multi-layer
//! image resource indexed by (layer, uv). This crate is the read-only CPU
//! model of that resource.
//!
//! # Invariants
//! - All layers share one width/height; assembly from mismatched layers is
//!   an error, never a resize.
//! - Sampling never fails: coordinates wrap or clamp per the sampler, and
//!   out-of-range layer indices clamp to the last layer, matching GPU
//!   array-layer semantics.

mod array;

pub use array::{Filter, Sampler, TextureArray, TextureError, TextureLayer, Wrap};

pub fn crate_info() -> &'static str {
    "bloxel-texture v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("texture"));
    }
}
