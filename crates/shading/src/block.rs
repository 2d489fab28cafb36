use crate::{FALLBACK_LAYER, FragmentInput, FragmentOutput, WATER_ALPHA_FACTOR};
use bloxel_blocks::BlockType;
use bloxel_lighting::{LightingModel, Material, Surface, post_process};
use bloxel_oit::OitFragment;
use bloxel_texture::{Sampler, TextureArray};

/// Shade one block-face fragment.
///
/// The pipeline is: face culling against the tag's hide flags, block-type
/// decode, texture-array layer selection, sampling, the water transparency
/// adjustment, the standard lighting stage, and finally routing on the
/// material's alpha mode — blended fragments are deferred to the OIT stage,
/// everything else is a normal shaded output.
pub fn shade_block_face(
    input: &FragmentInput,
    textures: &TextureArray,
    sampler: &Sampler,
    material: &Material,
    lighting: &impl LightingModel,
) -> FragmentOutput {
    // 1. Face culling: any hidden face whose direction matches the normal.
    if input.tag.visibility().culls(input.world_normal) {
        return FragmentOutput::Culled;
    }

    // 2–3. Block-type decode and layer selection. Ids outside the
    // vocabulary (and Air, which is never legitimately instanced) fall back
    // to the default layer; the instancing system only emits 1..=7.
    let block = input.tag.block_type();
    let layer = match block {
        Some(BlockType::Air) | None => {
            tracing::debug!(id = input.tag.block_id(), "unknown block id, using fallback layer");
            FALLBACK_LAYER
        }
        Some(block) => block.texture_layer(input.world_normal),
    };

    // 4. Sample the array texture.
    let mut texel = textures.sample(sampler, layer, input.uv);

    // 5. Water is more transparent than its texture encodes.
    if block == Some(BlockType::Water) {
        texel.a *= WATER_ALPHA_FACTOR;
    }

    // 6. Standard lighting and post-lighting processing.
    let surface = Surface {
        position: input.position,
        normal: input.world_normal,
        front_facing: input.front_facing,
        base_color: texel.modulate(material.base_color),
        material: *material,
    };
    let color = post_process(lighting.shade(&surface));

    // 7. Blended materials defer to the OIT accumulator instead of writing.
    if material.alpha_mode.is_transparent() {
        FragmentOutput::Deferred(OitFragment {
            position: input.position,
            color,
        })
    } else {
        FragmentOutput::Shaded(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloxel_blocks::{Face, InstanceTag};
    use bloxel_common::Rgba;
    use bloxel_lighting::AlphaMode;
    use bloxel_texture::TextureLayer;
    use glam::{Vec2, Vec3};

    /// Eight layers, each a solid color whose red channel encodes the
    /// layer index, so tests can read back which layer was sampled.
    fn debug_textures() -> TextureArray {
        TextureArray::from_layers(
            (0..8)
                .map(|i| TextureLayer::solid(2, 2, Rgba::new(i as f32 / 10.0, 0.0, 0.0, 1.0)))
                .collect(),
        )
        .unwrap()
    }

    /// Lighting that returns the base color untouched, isolating the
    /// shader's own logic.
    struct Passthrough;

    impl LightingModel for Passthrough {
        fn shade(&self, surface: &Surface) -> Rgba {
            surface.base_color
        }
    }

    fn input(tag: InstanceTag, normal: Vec3) -> FragmentInput {
        FragmentInput {
            tag,
            position: Vec3::new(0.0, 0.0, 0.5),
            world_normal: normal,
            uv: Vec2::splat(0.5),
            front_facing: true,
            time: 0.0,
        }
    }

    fn shade(tag: InstanceTag, normal: Vec3, material: &Material) -> FragmentOutput {
        shade_block_face(
            &input(tag, normal),
            &debug_textures(),
            &Sampler::default(),
            material,
            &Passthrough,
        )
    }

    fn sampled_layer(out: FragmentOutput) -> u32 {
        (out.color().expect("fragment should produce a color").r * 10.0).round() as u32
    }

    #[test]
    fn stone_top_face_samples_layer_one() {
        // Tag 0b0000_0010: Stone, no hide flags, not selected.
        let out = shade(InstanceTag(0b10), Vec3::Y, &Material::blocks());
        assert!(!out.is_culled());
        assert_eq!(sampled_layer(out), 1);
    }

    #[test]
    fn hidden_face_is_culled() {
        let tag = InstanceTag::new(BlockType::Stone).with_hidden(Face::NegX);
        let out = shade(tag, Vec3::NEG_X, &Material::blocks());
        assert_eq!(out, FragmentOutput::Culled);

        // Same flag, opposite normal: not culled.
        let out = shade(tag, Vec3::X, &Material::blocks());
        assert!(!out.is_culled());
    }

    #[test]
    fn cull_checks_every_face() {
        for face in Face::ALL {
            let tag = InstanceTag::new(BlockType::Dirt).with_hidden(face);
            assert!(shade(tag, face.outward(), &Material::blocks()).is_culled());
            assert!(!shade(tag, -face.outward(), &Material::blocks()).is_culled());
        }
    }

    #[test]
    fn grass_faces_pick_top_bottom_side_layers() {
        let tag = InstanceTag::new(BlockType::Grass);
        let m = Material::blocks();
        assert_eq!(sampled_layer(shade(tag, Vec3::Y, &m)), 4);
        assert_eq!(sampled_layer(shade(tag, Vec3::NEG_Y, &m)), 0);
        assert_eq!(sampled_layer(shade(tag, Vec3::X, &m)), 3);
    }

    #[test]
    fn unknown_block_falls_back_to_layer_zero() {
        let out = shade(InstanceTag(0xbb), Vec3::Y, &Material::blocks());
        assert_eq!(sampled_layer(out), 0);
    }

    #[test]
    fn water_halves_sampled_alpha() {
        let out = shade(InstanceTag::new(BlockType::Water), Vec3::Y, &Material::blocks());
        assert_eq!(out.color().unwrap().a, 0.5);

        // Every other block keeps the texture's alpha.
        for block in [BlockType::Dirt, BlockType::Grass, BlockType::Leaves] {
            let out = shade(InstanceTag::new(block), Vec3::Y, &Material::blocks());
            assert_eq!(out.color().unwrap().a, 1.0, "{block:?}");
        }
    }

    #[test]
    fn blend_material_defers_to_oit() {
        let out = shade(InstanceTag::new(BlockType::Stone), Vec3::Y, &Material::blocks());
        assert!(matches!(out, FragmentOutput::Deferred(_)));
    }

    #[test]
    fn opaque_material_writes_normally() {
        let mut material = Material::blocks();
        material.alpha_mode = AlphaMode::Opaque;
        let out = shade(InstanceTag::new(BlockType::Stone), Vec3::Y, &material);
        assert!(matches!(out, FragmentOutput::Shaded(_)));
    }

    #[test]
    fn mask_material_writes_normally() {
        let mut material = Material::blocks();
        material.alpha_mode = AlphaMode::Mask(0.5);
        let out = shade(InstanceTag::new(BlockType::Leaves), Vec3::Z, &material);
        assert!(matches!(out, FragmentOutput::Shaded(_)));
    }

    #[test]
    fn deferred_fragment_carries_position() {
        let tag = InstanceTag::new(BlockType::Water);
        let mut inp = input(tag, Vec3::Y);
        inp.position = Vec3::new(12.0, 34.0, 0.25);
        let out = shade_block_face(
            &inp,
            &debug_textures(),
            &Sampler::default(),
            &Material::blocks(),
            &Passthrough,
        );
        match out {
            FragmentOutput::Deferred(fragment) => {
                assert_eq!(fragment.position, inp.position);
            }
            other => panic!("expected deferred fragment, got {other:?}"),
        }
    }

    #[test]
    fn selected_bit_does_not_change_shading() {
        let plain = shade(InstanceTag::new(BlockType::Stone), Vec3::Y, &Material::blocks());
        let selected = shade(
            InstanceTag::new(BlockType::Stone).with_selected(true),
            Vec3::Y,
            &Material::blocks(),
        );
        assert_eq!(plain.color(), selected.color());
    }
}
