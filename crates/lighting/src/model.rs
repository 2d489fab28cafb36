use crate::Material;
use bloxel_common::Rgba;
use glam::Vec3;

/// Everything the lighting stage sees about one fragment.
#[derive(Debug, Clone, Copy)]
pub struct Surface {
    /// Fragment position as supplied by the host (screen x/y plus depth).
    pub position: Vec3,
    /// World-space surface normal (unit length).
    pub normal: Vec3,
    /// Host front-facing flag; back faces are lit with the flipped normal.
    pub front_facing: bool,
    /// Resolved base color for this fragment (texel x material tint).
    pub base_color: Rgba,
    /// Material state of the draw.
    pub material: Material,
}

/// The host's standard lighting evaluation, as a seam.
///
/// Implementations must be pure and must pass alpha through untouched.
pub trait LightingModel {
    fn shade(&self, surface: &Surface) -> Rgba;
}

/// Single directional light with an ambient floor.
///
/// Diffuse is Lambert; reflectance adds a view-independent highlight where
/// the surface faces the light head-on, a cheap stand-in for the host's
/// full specular term.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLighting {
    /// Direction the light travels, normalized at construction.
    pub direction: Vec3,
    pub ambient: f32,
    pub diffuse: f32,
}

impl DirectionalLighting {
    pub fn new(direction: Vec3, ambient: f32, diffuse: f32) -> Self {
        Self {
            direction: direction.normalize(),
            ambient,
            diffuse,
        }
    }
}

impl Default for DirectionalLighting {
    fn default() -> Self {
        Self::new(Vec3::new(-0.3, -1.0, -0.5), 0.3, 0.7)
    }
}

impl LightingModel for DirectionalLighting {
    fn shade(&self, surface: &Surface) -> Rgba {
        let normal = if surface.front_facing {
            surface.normal
        } else {
            -surface.normal
        };

        let ndotl = normal.dot(-self.direction).max(0.0);
        let intensity = self.ambient + self.diffuse * ndotl;
        let highlight = surface.material.reflectance * ndotl.powi(16);

        let lit = surface.base_color.scale_rgb(intensity);
        Rgba::new(
            lit.r + highlight,
            lit.g + highlight,
            lit.b + highlight,
            surface.base_color.a,
        )
    }
}

/// Post-lighting processing: bring the lit color back into displayable
/// range. Alpha is untouched.
pub fn post_process(color: Rgba) -> Rgba {
    Rgba::new(
        color.r.clamp(0.0, 1.0),
        color.g.clamp(0.0, 1.0),
        color.b.clamp(0.0, 1.0),
        color.a,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AlphaMode;

    fn surface(normal: Vec3, base: Rgba) -> Surface {
        Surface {
            position: Vec3::ZERO,
            normal,
            front_facing: true,
            base_color: base,
            material: Material {
                base_color: Rgba::WHITE,
                reflectance: 0.0,
                alpha_mode: AlphaMode::Opaque,
            },
        }
    }

    #[test]
    fn facing_light_is_brighter_than_facing_away() {
        let light = DirectionalLighting::new(Vec3::NEG_Y, 0.3, 0.7);
        let up = light.shade(&surface(Vec3::Y, Rgba::WHITE));
        let down = light.shade(&surface(Vec3::NEG_Y, Rgba::WHITE));
        assert!(up.r > down.r);
        // Facing away still gets the ambient floor
        assert!((down.r - 0.3).abs() < 1e-5);
    }

    #[test]
    fn alpha_passes_through() {
        let light = DirectionalLighting::default();
        let out = light.shade(&surface(Vec3::Y, Rgba::new(1.0, 1.0, 1.0, 0.4)));
        assert_eq!(out.a, 0.4);
    }

    #[test]
    fn back_faces_light_with_flipped_normal() {
        let light = DirectionalLighting::new(Vec3::NEG_Y, 0.0, 1.0);
        let mut s = surface(Vec3::NEG_Y, Rgba::WHITE);
        s.front_facing = false;
        let back = light.shade(&s);
        // Flipped normal faces the light directly
        assert!((back.r - 1.0).abs() < 1e-5);
    }

    #[test]
    fn reflectance_adds_highlight() {
        let light = DirectionalLighting::new(Vec3::NEG_Y, 0.3, 0.7);
        let mut s = surface(Vec3::Y, Rgba::splat(0.5));
        let matte = light.shade(&s);
        s.material.reflectance = 0.5;
        let shiny = light.shade(&s);
        assert!(shiny.r > matte.r);
    }

    #[test]
    fn post_process_clamps_rgb_only() {
        let out = post_process(Rgba::new(1.7, -0.2, 0.5, 0.8));
        assert_eq!(out.r, 1.0);
        assert_eq!(out.g, 0.0);
        assert_eq!(out.a, 0.8);
    }
}
