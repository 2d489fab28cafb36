use crate::OitAccumulator;
use bloxel_common::Rgba;
use glam::Vec3;

/// One translucent fragment handed off for deferred compositing.
///
/// `position` is screen-space: x/y in pixels, z the depth in `[0, 1]`
/// (0 nearest).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OitFragment {
    pub position: Vec3,
    pub color: Rgba,
}

/// Weighted-blended OIT buffer.
///
/// Per pixel it keeps a depth-weighted premultiplied color sum and a
/// revealage product. Both are commutative in accumulation order, which is
/// what makes the resolve order-independent.
#[derive(Debug, Clone)]
pub struct OitBuffer {
    width: u32,
    height: u32,
    /// Premultiplied (r, g, b, weighted-alpha) sums.
    accum: Vec<[f32; 4]>,
    /// Product of (1 - alpha) over all fragments on the pixel.
    revealage: Vec<f32>,
}

impl OitBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let pixels = (width * height) as usize;
        Self {
            width,
            height,
            accum: vec![[0.0; 4]; pixels],
            revealage: vec![1.0; pixels],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Composite the accumulated transparency over a background color,
    /// producing the final image row-major.
    pub fn resolve(&self, background: Rgba) -> Vec<Rgba> {
        let _span = tracing::debug_span!("oit_resolve", width = self.width, height = self.height)
            .entered();

        self.accum
            .iter()
            .zip(&self.revealage)
            .map(|(&accum, &revealage)| Self::composite(accum, revealage, background))
            .collect()
    }

    /// Resolved color of a single pixel, without touching the rest of the
    /// buffer.
    pub fn resolve_pixel(&self, x: u32, y: u32, background: Rgba) -> Rgba {
        let idx = (y * self.width + x) as usize;
        Self::composite(self.accum[idx], self.revealage[idx], background)
    }

    fn composite(accum: [f32; 4], revealage: f32, background: Rgba) -> Rgba {
        if revealage >= 1.0 {
            return background;
        }
        let weight_sum = accum[3].max(1e-5);
        let avg = Rgba::new(
            accum[0] / weight_sum,
            accum[1] / weight_sum,
            accum[2] / weight_sum,
            1.0,
        );
        avg.lerp(background, revealage).with_alpha(1.0)
    }

    /// Depth weight: nearer fragments count more. Any pure function of
    /// depth keeps accumulation commutative.
    fn weight(depth: f32) -> f32 {
        1.0 - depth.clamp(0.0, 1.0) * 0.99
    }
}

impl OitAccumulator for OitBuffer {
    fn accumulate(&mut self, fragment: OitFragment) {
        let x = fragment.position.x as i64;
        let y = fragment.position.y as i64;
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;

        let a = fragment.color.a.clamp(0.0, 1.0);
        let w = a * Self::weight(fragment.position.z);
        let accum = &mut self.accum[idx];
        accum[0] += fragment.color.r * w;
        accum[1] += fragment.color.g * w;
        accum[2] += fragment.color.b * w;
        accum[3] += w;
        self.revealage[idx] *= 1.0 - a;

        tracing::trace!(x, y, alpha = a, "accumulated fragment");
    }
}

/// Accumulator that just records fragments, for tests and inspection.
#[derive(Debug, Default)]
pub struct CollectingAccumulator {
    pub fragments: Vec<OitFragment>,
}

impl OitAccumulator for CollectingAccumulator {
    fn accumulate(&mut self, fragment: OitFragment) {
        self.fragments.push(fragment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(x: f32, depth: f32, color: Rgba) -> OitFragment {
        OitFragment {
            position: Vec3::new(x, 0.0, depth),
            color,
        }
    }

    #[test]
    fn empty_buffer_resolves_to_background() {
        let buffer = OitBuffer::new(2, 2);
        let bg = Rgba::new(0.1, 0.2, 0.3, 1.0);
        assert!(buffer.resolve(bg).iter().all(|c| *c == bg));
    }

    #[test]
    fn single_fragment_tints_background() {
        let mut buffer = OitBuffer::new(1, 1);
        buffer.accumulate(frag(0.0, 0.5, Rgba::new(1.0, 0.0, 0.0, 0.5)));
        let out = buffer.resolve_pixel(0, 0, Rgba::BLACK);
        assert!(out.r > 0.0);
        assert_eq!(out.g, 0.0);
        // Half-transparent red over black stays darker than pure red
        assert!(out.r < 1.0);
    }

    #[test]
    fn accumulation_is_order_independent() {
        let fragments = [
            frag(0.0, 0.2, Rgba::new(1.0, 0.0, 0.0, 0.6)),
            frag(0.0, 0.5, Rgba::new(0.0, 1.0, 0.0, 0.4)),
            frag(0.0, 0.9, Rgba::new(0.0, 0.0, 1.0, 0.8)),
        ];

        let mut forward = OitBuffer::new(1, 1);
        for f in fragments {
            forward.accumulate(f);
        }
        let mut reversed = OitBuffer::new(1, 1);
        for f in fragments.iter().rev() {
            reversed.accumulate(*f);
        }

        let a = forward.resolve_pixel(0, 0, Rgba::BLACK);
        let b = reversed.resolve_pixel(0, 0, Rgba::BLACK);
        assert!((a.r - b.r).abs() < 1e-5);
        assert!((a.g - b.g).abs() < 1e-5);
        assert!((a.b - b.b).abs() < 1e-5);
    }

    #[test]
    fn nearer_fragments_dominate() {
        let mut buffer = OitBuffer::new(1, 1);
        buffer.accumulate(frag(0.0, 0.05, Rgba::new(1.0, 0.0, 0.0, 0.5)));
        buffer.accumulate(frag(0.0, 0.95, Rgba::new(0.0, 0.0, 1.0, 0.5)));
        let out = buffer.resolve_pixel(0, 0, Rgba::BLACK);
        assert!(out.r > out.b);
    }

    #[test]
    fn out_of_bounds_fragments_are_clipped() {
        let mut buffer = OitBuffer::new(2, 2);
        buffer.accumulate(frag(-1.0, 0.5, Rgba::WHITE));
        buffer.accumulate(frag(7.0, 0.5, Rgba::WHITE));
        assert!(buffer.resolve(Rgba::BLACK).iter().all(|c| *c == Rgba::BLACK));
    }

    #[test]
    fn opaque_fragment_fully_covers_background() {
        let mut buffer = OitBuffer::new(1, 1);
        buffer.accumulate(frag(0.0, 0.5, Rgba::new(0.2, 0.4, 0.6, 1.0)));
        let out = buffer.resolve_pixel(0, 0, Rgba::WHITE);
        assert!((out.r - 0.2).abs() < 1e-5);
        assert!((out.b - 0.6).abs() < 1e-5);
    }

    #[test]
    fn resolve_pixel_agrees_with_full_resolve() {
        let mut buffer = OitBuffer::new(3, 2);
        buffer.accumulate(frag(0.0, 0.2, Rgba::new(1.0, 0.0, 0.0, 0.6)));
        buffer.accumulate(frag(0.0, 0.7, Rgba::new(0.0, 1.0, 0.0, 0.3)));
        buffer.accumulate(frag(2.0, 0.5, Rgba::new(0.0, 0.0, 1.0, 0.8)));

        let bg = Rgba::new(0.1, 0.2, 0.3, 1.0);
        let image = buffer.resolve(bg);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(
                    buffer.resolve_pixel(x, y, bg),
                    image[(y * 3 + x) as usize],
                    "mismatch at ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn collecting_accumulator_records() {
        let mut acc = CollectingAccumulator::default();
        acc.accumulate(frag(0.0, 0.5, Rgba::WHITE));
        assert_eq!(acc.fragments.len(), 1);
    }
}
