use crate::{
    FragmentInput, FragmentOutput, GRID_FREQUENCY, LINE_HALF_WIDTH_TIGHT, LINE_HALF_WIDTH_WIDE,
};
use bloxel_common::{Rgba, fract};
use bloxel_lighting::{LightingModel, Material, Surface, post_process};
use bloxel_oit::OitFragment;

/// Peak brightness of a shimmering grid line.
const LINE_INTENSITY: f32 = 0.01;
/// Alpha of fragments on a grid line.
const LINE_ALPHA: f32 = 0.8;
/// Alpha of the faint wash between lines.
const WASH_ALPHA: f32 = 0.2;
/// Scale of the (u + v) phase offset feeding the shimmer, tied to the grid
/// so the wave travels one period per grid cell diagonal.
const PHASE_SCALE: f32 = GRID_FREQUENCY;

/// Periodicity check: is `v` within `half_width` of a grid boundary?
///
/// Scales by the grid frequency, takes the fractional part and tests the
/// near-zero / near-one band. For half-widths below one half, a tight band
/// is strictly nested inside any wider one.
pub fn on_grid_line(v: f32, half_width: f32) -> bool {
    let t = fract(v * GRID_FREQUENCY);
    t < half_width || t > 1.0 - half_width
}

/// Time-varying brightness of a grid line at diagonal coordinate `u + v`.
///
/// A sine of the elapsed time (angular frequency 1, so 2π-periodic) phase
/// shifted along the diagonal, remapped to `[0, 1]` and scaled down to the
/// line intensity.
pub fn line_brightness(time: f32, u_plus_v: f32) -> f32 {
    ((time + u_plus_v * PHASE_SCALE).sin() + 1.0) * 0.5 * LINE_INTENSITY
}

/// Shade one grid-overlay fragment.
///
/// Lines are crosshair-shaped: a pixel is on a line when one axis is inside
/// the tight band while the other is inside the wide band. On-line pixels
/// shimmer near-black at high alpha; everything else is a faint tint. The
/// overlay never writes through the normal output path — every fragment is
/// deferred to the OIT stage.
pub fn shade_grid_overlay(
    input: &FragmentInput,
    material: &Material,
    lighting: &impl LightingModel,
) -> FragmentOutput {
    let u = input.uv.x;
    let v = input.uv.y;

    let on_line = (on_grid_line(u, LINE_HALF_WIDTH_TIGHT) && on_grid_line(v, LINE_HALF_WIDTH_WIDE))
        || (on_grid_line(v, LINE_HALF_WIDTH_TIGHT) && on_grid_line(u, LINE_HALF_WIDTH_WIDE));

    let base = if on_line {
        let brightness = line_brightness(input.time, u + v);
        Rgba::new(brightness, brightness, brightness, LINE_ALPHA)
    } else {
        Rgba::new(0.0, 0.0, 0.0, WASH_ALPHA)
    };

    let surface = Surface {
        position: input.position,
        normal: input.world_normal,
        front_facing: input.front_facing,
        base_color: base.modulate(material.base_color),
        material: *material,
    };
    let color = post_process(lighting.shade(&surface));

    FragmentOutput::Deferred(OitFragment {
        position: input.position,
        color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloxel_blocks::InstanceTag;
    use glam::{Vec2, Vec3};
    use std::f32::consts::{PI, TAU};

    struct Passthrough;

    impl LightingModel for Passthrough {
        fn shade(&self, surface: &Surface) -> Rgba {
            surface.base_color
        }
    }

    fn overlay(uv: Vec2, time: f32) -> FragmentOutput {
        let input = FragmentInput {
            tag: InstanceTag(0),
            position: Vec3::new(0.0, 0.0, 0.5),
            world_normal: Vec3::Y,
            uv,
            front_facing: true,
            time,
        };
        shade_grid_overlay(&input, &Material::ground(), &Passthrough)
    }

    fn alpha_at(uv: Vec2) -> f32 {
        overlay(uv, 0.0).color().unwrap().a
    }

    #[test]
    fn check_detects_band_edges() {
        // 0.001 in texture space is 0.015 periods at frequency 15
        assert!(on_grid_line(0.0, LINE_HALF_WIDTH_TIGHT));
        assert!(on_grid_line(0.0005, LINE_HALF_WIDTH_TIGHT));
        assert!(!on_grid_line(0.002, LINE_HALF_WIDTH_TIGHT));
        // Near-one side of the period
        assert!(on_grid_line(1.0 / GRID_FREQUENCY - 0.0005, LINE_HALF_WIDTH_TIGHT));
        // Period centers are never on a line
        assert!(!on_grid_line(0.5 / GRID_FREQUENCY, LINE_HALF_WIDTH_WIDE));
    }

    #[test]
    fn check_handles_negative_coordinates() {
        assert!(on_grid_line(-1.0 / GRID_FREQUENCY, LINE_HALF_WIDTH_TIGHT));
        assert!(!on_grid_line(-0.5 / GRID_FREQUENCY, LINE_HALF_WIDTH_WIDE));
    }

    #[test]
    fn tight_band_nested_in_wide_band() {
        for i in 0..1000 {
            let v = i as f32 * 0.00143;
            if on_grid_line(v, LINE_HALF_WIDTH_TIGHT) {
                assert!(on_grid_line(v, LINE_HALF_WIDTH_WIDE), "nesting broken at {v}");
            }
        }
    }

    #[test]
    fn line_detection_is_crosshair_shaped() {
        // Both axes on a boundary: intersection, on a line.
        assert_eq!(alpha_at(Vec2::new(0.0, 0.0)), 0.8);
        // One axis tight, the other inside the wide band only.
        assert_eq!(alpha_at(Vec2::new(0.0, 0.003)), 0.8);
        // One axis tight, the other outside the wide band: off the line —
        // lines are crosshairs at intersections, not full rules.
        assert_eq!(alpha_at(Vec2::new(0.0, 0.5 / GRID_FREQUENCY)), 0.2);
        // Far from any boundary.
        assert_eq!(
            alpha_at(Vec2::new(0.5 / GRID_FREQUENCY, 0.5 / GRID_FREQUENCY)),
            0.2
        );
    }

    #[test]
    fn line_detection_is_symmetric_in_u_and_v() {
        for (u, v) in [
            (0.0, 0.003),
            (0.001, 0.004),
            (0.0, 0.5 / GRID_FREQUENCY),
            (0.21, 0.47),
        ] {
            assert_eq!(
                alpha_at(Vec2::new(u, v)),
                alpha_at(Vec2::new(v, u)),
                "asymmetric at ({u}, {v})"
            );
        }
    }

    #[test]
    fn brightness_oscillates_in_range() {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for i in 0..1000 {
            let b = line_brightness(i as f32 * 0.0321, 0.7);
            min = min.min(b);
            max = max.max(b);
        }
        assert!(min >= 0.0);
        assert!(max <= LINE_INTENSITY + 1e-6);
        // The wave actually spans the range
        assert!(max - min > LINE_INTENSITY * 0.9);
    }

    #[test]
    fn brightness_is_two_pi_periodic() {
        for i in 0..10 {
            let t = i as f32 * 0.77;
            assert!((line_brightness(t, 0.3) - line_brightness(t + TAU, 0.3)).abs() < 1e-4);
        }
        // And not constant over a half period
        assert!((line_brightness(0.0, 0.0) - line_brightness(PI, 0.0)).abs() > 1e-4);
    }

    #[test]
    fn overlay_always_defers() {
        for uv in [Vec2::ZERO, Vec2::splat(0.02), Vec2::new(0.3, 0.7)] {
            assert!(
                matches!(overlay(uv, 1.0), FragmentOutput::Deferred(_)),
                "overlay wrote normally at {uv:?}"
            );
        }
    }

    #[test]
    fn off_line_wash_is_near_black() {
        let color = overlay(Vec2::splat(0.5 / GRID_FREQUENCY), 0.0)
            .color()
            .unwrap();
        assert_eq!(color.r, 0.0);
        assert_eq!(color.a, 0.2);
    }
}
