use bloxel_common::Rgba;
use serde::{Deserialize, Serialize};

/// How a shaded fragment's alpha is interpreted by the output stage.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AlphaMode {
    /// Alpha is ignored; the fragment always writes.
    #[default]
    Opaque,
    /// Alpha-tested: fragments below the cutoff are discarded by the host,
    /// surviving fragments write as opaque.
    Mask(f32),
    /// Blended: the fragment is deferred to the transparency pass.
    Blend,
}

impl AlphaMode {
    /// True only for modes routed through the deferred transparency pass.
    pub fn is_transparent(self) -> bool {
        matches!(self, AlphaMode::Blend)
    }
}

/// Host material state resolved for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub base_color: Rgba,
    pub reflectance: f32,
    pub alpha_mode: AlphaMode,
}

impl Material {
    /// Material the block draw uses: blended, low reflectance.
    pub fn blocks() -> Self {
        Self {
            base_color: Rgba::WHITE,
            reflectance: 0.1,
            alpha_mode: AlphaMode::Blend,
        }
    }

    /// Material the ground overlay uses: blended, near-matte.
    pub fn ground() -> Self {
        Self {
            base_color: Rgba::WHITE,
            reflectance: 0.05,
            alpha_mode: AlphaMode::Blend,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Rgba::WHITE,
            reflectance: 0.5,
            alpha_mode: AlphaMode::Opaque,
        }
    }
}
