//! GPU equivalents of the two fragment programs, for hosts that run the
//! shading on-device. The Rust entry points in this crate are the tested
//! reference; these sources mirror them constant for constant.

/// WGSL fragment shader for textured block faces.
pub const BLOCK_SHADER: &str = r#"
#import bevy_pbr::{
    forward_io::VertexOutput,
    mesh_functions::get_tag,
    pbr_fragment::pbr_input_from_standard_material,
    pbr_functions::{apply_pbr_lighting, main_pass_post_lighting_processing},
    pbr_types::{STANDARD_MATERIAL_FLAGS_ALPHA_MODE_OPAQUE, STANDARD_MATERIAL_FLAGS_ALPHA_MODE_MASK},
    oit::oit_draw,
}

@group(2) @binding(100) var blocks: texture_2d_array<f32>;
@group(2) @binding(101) var blocks_sampler: sampler;

const WATER_ALPHA_FACTOR: f32 = 0.5;

@fragment
fn fragment(in: VertexOutput, @builtin(front_facing) is_front: bool) -> @location(0) vec4<f32> {
    let tag = get_tag(in.instance_index);
    let normal = in.world_normal;

    // Per-face culling from tag bits 8..13 (-X, +X, -Y, +Y, -Z, +Z).
    if (tag & (1u << 8u)) != 0u && normal.x < 0.0 { discard; }
    if (tag & (1u << 9u)) != 0u && normal.x > 0.0 { discard; }
    if (tag & (1u << 10u)) != 0u && normal.y < 0.0 { discard; }
    if (tag & (1u << 11u)) != 0u && normal.y > 0.0 { discard; }
    if (tag & (1u << 12u)) != 0u && normal.z < 0.0 { discard; }
    if (tag & (1u << 13u)) != 0u && normal.z > 0.0 { discard; }

    let block = tag & 0xffu;
    var layer = 0u;
    switch block {
        case 1u: { layer = 0u; } // dirt
        case 2u: { layer = 1u; } // stone
        case 3u: { layer = 2u; } // sand
        case 4u: {               // grass: top / bottom / side
            if normal.y > 0.0 {
                layer = 4u;
            } else if normal.y < 0.0 {
                layer = 0u;
            } else {
                layer = 3u;
            }
        }
        case 5u: { layer = 5u; } // wood
        case 6u: { layer = 6u; } // leaves
        case 7u: { layer = 7u; } // water
        default: { layer = 0u; }
    }

    var color = textureSample(blocks, blocks_sampler, in.uv, layer);
    if block == 7u {
        color.a = color.a * WATER_ALPHA_FACTOR;
    }

    var pbr_input = pbr_input_from_standard_material(in, is_front);
    pbr_input.material.base_color = color;
    var out = apply_pbr_lighting(pbr_input);
    out = main_pass_post_lighting_processing(pbr_input, out);

    let alpha_mode = pbr_input.material.flags &
        (STANDARD_MATERIAL_FLAGS_ALPHA_MODE_OPAQUE | STANDARD_MATERIAL_FLAGS_ALPHA_MODE_MASK);
    if alpha_mode == 0u {
        oit_draw(in.position, out);
        discard;
    }

    return out;
}
"#;

/// WGSL fragment shader for the animated grid overlay.
pub const GRID_SHADER: &str = r#"
#import bevy_pbr::{
    forward_io::VertexOutput,
    mesh_view_bindings::globals,
    pbr_fragment::pbr_input_from_standard_material,
    pbr_functions::{apply_pbr_lighting, main_pass_post_lighting_processing},
    oit::oit_draw,
}

const GRID_FREQUENCY: f32 = 15.0;
const LINE_HALF_WIDTH_TIGHT: f32 = 0.015;
const LINE_HALF_WIDTH_WIDE: f32 = 0.075;
const PHASE_SCALE: f32 = 15.0;
const LINE_INTENSITY: f32 = 0.01;

fn check(v: f32, half_width: f32) -> bool {
    let t = fract(v * GRID_FREQUENCY);
    return t < half_width || t > 1.0 - half_width;
}

@fragment
fn fragment(in: VertexOutput, @builtin(front_facing) is_front: bool) -> @location(0) vec4<f32> {
    let u = in.uv.x;
    let v = in.uv.y;

    let on_line = (check(u, LINE_HALF_WIDTH_TIGHT) && check(v, LINE_HALF_WIDTH_WIDE))
        || (check(v, LINE_HALF_WIDTH_TIGHT) && check(u, LINE_HALF_WIDTH_WIDE));

    var color = vec4<f32>(0.0, 0.0, 0.0, 0.2);
    if on_line {
        let brightness = (sin(globals.time + (u + v) * PHASE_SCALE) + 1.0) * 0.5 * LINE_INTENSITY;
        color = vec4<f32>(brightness, brightness, brightness, 0.8);
    }

    var pbr_input = pbr_input_from_standard_material(in, is_front);
    pbr_input.material.base_color = color;
    var out = apply_pbr_lighting(pbr_input);
    out = main_pass_post_lighting_processing(pbr_input, out);

    oit_draw(in.position, out);
    discard;
}
"#;
