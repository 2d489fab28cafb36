use anyhow::{Context, bail};
use bloxel_blocks::{BlockType, InstanceTag};
use bloxel_common::Rgba;
use bloxel_lighting::{DirectionalLighting, Material};
use bloxel_oit::OitBuffer;
use bloxel_shading::{FragmentInput, FragmentOutput, shade_block_face, shade_grid_overlay};
use bloxel_texture::{Sampler, TextureArray};
use clap::{Parser, Subcommand};
use glam::{Vec2, Vec3};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bloxel-cli", about = "Inspect and preview bloxel fragment shading")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Shade a single block-face fragment and print the outcome
    Fragment {
        /// Raw instance tag bits (block id | hide flags << 8 | selected << 14)
        #[arg(short, long, default_value = "2")]
        tag: u32,
        /// World normal as "x,y,z"
        #[arg(short, long, default_value = "0,1,0")]
        normal: String,
        /// Texture coordinates as "u,v"
        #[arg(long, default_value = "0.5,0.5")]
        uv: String,
        /// Elapsed time in seconds
        #[arg(long, default_value = "0")]
        time: f32,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render the grid overlay to a PNG through the OIT resolve
    Grid {
        /// Output image edge length in pixels
        #[arg(short, long, default_value = "512")]
        size: u32,
        /// Elapsed time driving the shimmer
        #[arg(long, default_value = "0")]
        time: f32,
        /// Output path
        #[arg(short, long, default_value = "grid.png")]
        out: String,
    },
    /// Render one block face with the debug texture palette
    Face {
        /// Block name: dirt, stone, sand, grass, wood, leaves, water
        #[arg(short, long, default_value = "grass")]
        block: String,
        /// Face normal as "x,y,z"
        #[arg(short, long, default_value = "0,1,0")]
        normal: String,
        /// Output image edge length in pixels
        #[arg(short, long, default_value = "256")]
        size: u32,
        /// Output path
        #[arg(short, long, default_value = "face.png")]
        out: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("bloxel-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common:   {}", bloxel_common::crate_info());
            println!("blocks:   {}", bloxel_blocks::crate_info());
            println!("texture:  {}", bloxel_texture::crate_info());
            println!("lighting: {}", bloxel_lighting::crate_info());
            println!("oit:      {}", bloxel_oit::crate_info());
            println!("shading:  {}", bloxel_shading::crate_info());
        }
        Commands::Fragment {
            tag,
            normal,
            uv,
            time,
            json,
        } => {
            let normal = parse_vec3(&normal)?;
            let uv = parse_vec2(&uv)?;
            let report = shade_one(InstanceTag(tag), normal, uv, time);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
        }
        Commands::Grid { size, time, out } => {
            let image = render_grid(size, time);
            save_png(&out, size, &image)?;
            println!("Wrote {size}x{size} grid overlay to {out}");
        }
        Commands::Face {
            block,
            normal,
            size,
            out,
        } => {
            let block = parse_block(&block)?;
            let normal = parse_vec3(&normal)?;
            let image = render_face(block, normal, size);
            save_png(&out, size, &image)?;
            println!("Wrote {size}x{size} {block:?} face to {out}");
        }
    }

    Ok(())
}

/// Report for one shaded fragment.
#[derive(Debug, Serialize)]
struct FragmentReport {
    block: Option<BlockType>,
    layer: u32,
    selected: bool,
    outcome: &'static str,
    color: Option<Rgba>,
}

impl std::fmt::Display for FragmentReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "block={:?} layer={} selected={} outcome={}",
            self.block, self.layer, self.selected, self.outcome
        )?;
        if let Some(c) = self.color {
            write!(
                f,
                " color=({:.3}, {:.3}, {:.3}, {:.3})",
                c.r, c.g, c.b, c.a
            )?;
        }
        Ok(())
    }
}

fn shade_one(tag: InstanceTag, normal: Vec3, uv: Vec2, time: f32) -> FragmentReport {
    let textures = debug_block_textures();
    let input = FragmentInput {
        tag,
        position: Vec3::new(0.0, 0.0, 0.5),
        world_normal: normal,
        uv,
        front_facing: true,
        time,
    };
    let output = shade_block_face(
        &input,
        &textures,
        &Sampler::default(),
        &Material::blocks(),
        &DirectionalLighting::default(),
    );

    let block = tag.block_type();
    let layer = match block {
        Some(BlockType::Air) | None => bloxel_shading::FALLBACK_LAYER,
        Some(b) => b.texture_layer(normal),
    };
    let outcome = match output {
        FragmentOutput::Shaded(_) => "shaded",
        FragmentOutput::Deferred(_) => "deferred",
        FragmentOutput::Culled => "culled",
    };

    FragmentReport {
        block,
        layer,
        selected: tag.selected(),
        outcome,
        color: output.color(),
    }
}

fn render_grid(size: u32, time: f32) -> Vec<Rgba> {
    tracing::debug!(size, time, "rendering grid overlay");
    let lighting = DirectionalLighting::default();
    let material = Material::ground();
    let mut buffer = OitBuffer::new(size, size);

    for y in 0..size {
        for x in 0..size {
            let uv = Vec2::new(
                (x as f32 + 0.5) / size as f32,
                (y as f32 + 0.5) / size as f32,
            );
            let input = FragmentInput {
                tag: InstanceTag(0),
                position: Vec3::new(x as f32, y as f32, 0.4),
                world_normal: Vec3::Y,
                uv,
                front_facing: true,
                time,
            };
            // The overlay always defers; route pushes it into the buffer.
            shade_grid_overlay(&input, &material, &lighting).route(&mut buffer);
        }
    }

    // Dark green ground showing through the translucent overlay.
    buffer.resolve(Rgba::new(0.02, 0.18, 0.07, 1.0))
}

fn render_face(block: BlockType, normal: Vec3, size: u32) -> Vec<Rgba> {
    tracing::debug!(?block, size, "rendering block face");
    let textures = debug_block_textures();
    let lighting = DirectionalLighting::default();
    let material = Material::blocks();
    let tag = InstanceTag::new(block);
    let mut buffer = OitBuffer::new(size, size);
    let mut image = vec![Rgba::BLACK; (size * size) as usize];

    for y in 0..size {
        for x in 0..size {
            let uv = Vec2::new(
                (x as f32 + 0.5) / size as f32,
                (y as f32 + 0.5) / size as f32,
            );
            let input = FragmentInput {
                tag,
                position: Vec3::new(x as f32, y as f32, 0.5),
                world_normal: normal,
                uv,
                front_facing: true,
                time: 0.0,
            };
            let output = shade_block_face(&input, &textures, &Sampler::default(), &material, &lighting);
            if let Some(color) = output.route(&mut buffer) {
                image[(y * size + x) as usize] = color;
            }
        }
    }

    // Composite the deferred fragments over what was written directly.
    let resolved = buffer.resolve(Rgba::BLACK);
    for (dst, oit) in image.iter_mut().zip(resolved) {
        if *dst == Rgba::BLACK {
            *dst = oit;
        }
    }
    image
}

/// Eight-layer debug palette: one tint per block texture with a subtle
/// checker so UV orientation is visible.
fn debug_block_textures() -> TextureArray {
    let tints = [
        Rgba::new(0.45, 0.30, 0.18, 1.0), // dirt
        Rgba::new(0.55, 0.55, 0.58, 1.0), // stone
        Rgba::new(0.86, 0.80, 0.55, 1.0), // sand
        Rgba::new(0.40, 0.45, 0.20, 1.0), // grass side
        Rgba::new(0.30, 0.60, 0.22, 1.0), // grass top
        Rgba::new(0.50, 0.36, 0.20, 1.0), // wood
        Rgba::new(0.20, 0.45, 0.15, 0.9), // leaves
        Rgba::new(0.15, 0.35, 0.75, 0.7), // water
    ];
    TextureArray::from_fn(16, 16, tints.len() as u32, |layer, x, y| {
        let tint = tints[layer as usize];
        if (x / 4 + y / 4) % 2 == 0 {
            tint
        } else {
            tint.scale_rgb(0.85)
        }
    })
    .expect("debug palette layers share one size")
}

fn parse_block(name: &str) -> anyhow::Result<BlockType> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "dirt" => BlockType::Dirt,
        "stone" => BlockType::Stone,
        "sand" => BlockType::Sand,
        "grass" => BlockType::Grass,
        "wood" => BlockType::Wood,
        "leaves" => BlockType::Leaves,
        "water" => BlockType::Water,
        other => bail!("unknown block {other:?}"),
    })
}

fn parse_vec3(s: &str) -> anyhow::Result<Vec3> {
    let parts = parse_floats(s, 3)?;
    Ok(Vec3::new(parts[0], parts[1], parts[2]))
}

fn parse_vec2(s: &str) -> anyhow::Result<Vec2> {
    let parts = parse_floats(s, 2)?;
    Ok(Vec2::new(parts[0], parts[1]))
}

fn parse_floats(s: &str, count: usize) -> anyhow::Result<Vec<f32>> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .with_context(|| format!("expected {count} comma-separated numbers, got {s:?}"))?;
    if parts.len() != count {
        bail!("expected {count} comma-separated numbers, got {s:?}");
    }
    Ok(parts)
}

fn save_png(path: &str, size: u32, pixels: &[Rgba]) -> anyhow::Result<()> {
    let bytes: Vec<u8> = pixels.iter().flat_map(|c| c.to_srgb8()).collect();
    let image = image::RgbaImage::from_raw(size, size, bytes)
        .context("pixel buffer does not match image size")?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing {path}"))?;
    Ok(())
}
