use bloxel_common::{Rgba, fract};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Errors from texture array assembly.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("texture array needs at least one layer")]
    Empty,
    #[error("layer {layer} is {got_width}x{got_height}, expected {width}x{height}")]
    LayerMismatch {
        layer: usize,
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },
    #[error("byte buffer holds {got} bytes, expected {expected}")]
    ByteLength { expected: usize, got: usize },
}

/// One 2D image slice destined for a texture array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureLayer {
    width: u32,
    height: u32,
    texels: Vec<Rgba>,
}

impl TextureLayer {
    /// Build a layer procedurally from texel coordinates.
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> Rgba) -> Self {
        let mut texels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                texels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            texels,
        }
    }

    /// A single-color layer.
    pub fn solid(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            texels: vec![color; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// How texture coordinates outside `[0, 1]` are handled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wrap {
    #[default]
    Repeat,
    Clamp,
}

/// Texel filtering mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    #[default]
    Nearest,
    Linear,
}

/// Sampler state paired with a texture array at bind time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sampler {
    pub wrap: Wrap,
    pub filter: Filter,
}

impl Sampler {
    pub fn new(wrap: Wrap, filter: Filter) -> Self {
        Self { wrap, filter }
    }
}

/// A read-only 2D texture array: equally sized layers selected by index.
#[derive(Debug, Clone, Serialize)]
pub struct TextureArray {
    width: u32,
    height: u32,
    layers: u32,
    texels: Vec<Rgba>,
}

// Deserialization goes through an unchecked mirror so the texel count is
// validated against the dimensions before a value can exist. Sampling
// indexes `texels` without bounds checks of its own.
impl<'de> Deserialize<'de> for TextureArray {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            width: u32,
            height: u32,
            layers: u32,
            texels: Vec<Rgba>,
        }

        let raw = Raw::deserialize(deserializer)?;
        if raw.layers == 0 {
            return Err(serde::de::Error::custom(TextureError::Empty));
        }
        let expected = (raw.width * raw.height * raw.layers) as usize;
        if raw.texels.len() != expected {
            return Err(serde::de::Error::custom(format!(
                "texel buffer holds {} entries, expected {expected}",
                raw.texels.len()
            )));
        }
        Ok(Self {
            width: raw.width,
            height: raw.height,
            layers: raw.layers,
            texels: raw.texels,
        })
    }
}

impl TextureArray {
    /// Assemble an array from individual layers. All layers must share one
    /// size; the first layer sets it.
    pub fn from_layers(layers: Vec<TextureLayer>) -> Result<Self, TextureError> {
        let first = layers.first().ok_or(TextureError::Empty)?;
        let (width, height) = (first.width, first.height);

        for (i, layer) in layers.iter().enumerate() {
            if layer.width != width || layer.height != height {
                return Err(TextureError::LayerMismatch {
                    layer: i,
                    width,
                    height,
                    got_width: layer.width,
                    got_height: layer.height,
                });
            }
        }

        let count = layers.len() as u32;
        let mut texels = Vec::with_capacity((width * height * count) as usize);
        for layer in layers {
            texels.extend_from_slice(&layer.texels);
        }

        tracing::debug!(width, height, layers = count, "assembled texture array");
        Ok(Self {
            width,
            height,
            layers: count,
            texels,
        })
    }

    /// Upload from tightly packed sRGB8 bytes, layer after layer.
    pub fn from_rgba8(
        width: u32,
        height: u32,
        layers: u32,
        bytes: &[u8],
    ) -> Result<Self, TextureError> {
        if layers == 0 {
            return Err(TextureError::Empty);
        }
        let expected = (width * height * layers) as usize * 4;
        if bytes.len() != expected {
            return Err(TextureError::ByteLength {
                expected,
                got: bytes.len(),
            });
        }

        let texels = bytemuck::cast_slice::<u8, [u8; 4]>(bytes)
            .iter()
            .map(|texel| Rgba::from_srgb8(*texel))
            .collect();

        Ok(Self {
            width,
            height,
            layers,
            texels,
        })
    }

    /// Build every layer procedurally from (layer, x, y).
    pub fn from_fn(
        width: u32,
        height: u32,
        layers: u32,
        f: impl Fn(u32, u32, u32) -> Rgba,
    ) -> Result<Self, TextureError> {
        let slices = (0..layers)
            .map(|layer| TextureLayer::from_fn(width, height, |x, y| f(layer, x, y)))
            .collect();
        Self::from_layers(slices)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layer_count(&self) -> u32 {
        self.layers
    }

    /// Sample one layer at the given texture coordinates.
    ///
    /// Layer indices past the end clamp to the last layer.
    pub fn sample(&self, sampler: &Sampler, layer: u32, uv: Vec2) -> Rgba {
        let layer = layer.min(self.layers - 1);
        match sampler.filter {
            Filter::Nearest => {
                let (x, y) = self.texel_coords(sampler.wrap, uv);
                self.texel(layer, x, y)
            }
            Filter::Linear => self.sample_linear(sampler.wrap, layer, uv),
        }
    }

    fn sample_linear(&self, wrap: Wrap, layer: u32, uv: Vec2) -> Rgba {
        // Texel centers sit at half-integer positions.
        let fx = self.wrap_coord(wrap, uv.x) * self.width as f32 - 0.5;
        let fy = self.wrap_coord(wrap, uv.y) * self.height as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;

        let xi = |x: f32| self.wrap_texel(wrap, x as i64, self.width);
        let yi = |y: f32| self.wrap_texel(wrap, y as i64, self.height);

        let c00 = self.texel(layer, xi(x0), yi(y0));
        let c10 = self.texel(layer, xi(x0 + 1.0), yi(y0));
        let c01 = self.texel(layer, xi(x0), yi(y0 + 1.0));
        let c11 = self.texel(layer, xi(x0 + 1.0), yi(y0 + 1.0));

        c00.lerp(c10, tx).lerp(c01.lerp(c11, tx), ty)
    }

    fn wrap_coord(&self, wrap: Wrap, v: f32) -> f32 {
        match wrap {
            Wrap::Repeat => fract(v),
            Wrap::Clamp => v.clamp(0.0, 1.0),
        }
    }

    fn wrap_texel(&self, wrap: Wrap, i: i64, extent: u32) -> u32 {
        let extent = extent as i64;
        let wrapped = match wrap {
            Wrap::Repeat => i.rem_euclid(extent),
            Wrap::Clamp => i.clamp(0, extent - 1),
        };
        wrapped as u32
    }

    fn texel_coords(&self, wrap: Wrap, uv: Vec2) -> (u32, u32) {
        let u = self.wrap_coord(wrap, uv.x);
        let v = self.wrap_coord(wrap, uv.y);
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        (x, y)
    }

    fn texel(&self, layer: u32, x: u32, y: u32) -> Rgba {
        let idx = (layer * self.width * self.height + y * self.width + x) as usize;
        self.texels[idx]
    }
}
