//! Material model and the standard lighting stage.
//!
//! The shading kernel hands every resolved base color through a host
//! lighting evaluation before output routing. This crate provides that seam
//! as a trait plus one standard directional implementation, so tests and
//! offline rendering run the same path a host renderer would.
//!
//! # Invariants
//! - Lighting never touches alpha; transparency is decided by the material's
//!   alpha mode and the sampled texel alone.
//! - Lighting models are pure: same surface in, same color out.

mod material;
mod model;

pub use material::{AlphaMode, Material};
pub use model::{DirectionalLighting, LightingModel, Surface, post_process};

pub fn crate_info() -> &'static str {
    "bloxel-lighting v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("lighting"));
    }
}
