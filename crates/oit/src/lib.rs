//! Order-independent transparency (OIT) accumulation.
//!
//! Translucent fragments are not blended in draw order; shaders hand them
//! to an accumulator and discard, and a later resolve composites the
//! collected contributions. This crate provides the accumulator seam and a
//! weighted-blended reference buffer.
//!
//! # Invariants
//! - Accumulation is commutative: any permutation of the same fragments
//!   resolves to the same image.
//! - Fragments outside the buffer are clipped, never an error.

mod buffer;

pub use buffer::{CollectingAccumulator, OitBuffer, OitFragment};

/// The external accumulation entry point a shader pushes into.
pub trait OitAccumulator {
    fn accumulate(&mut self, fragment: OitFragment);
}

pub fn crate_info() -> &'static str {
    "bloxel-oit v0.1.0"
}
