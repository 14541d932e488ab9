//! Frame rendering for a [`Scene`]

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core::camera::Camera;
use crate::core::Result;
use crate::evaluate::{FrameContext, ParticleUniforms};
use crate::render::buffer::{CameraBuffer, InstanceLayers};
use crate::render::context::GpuContext;
use crate::render::pipeline::{MeshPipeline, SpriteKind, SpritePipeline};
use crate::render::texture::{star_pattern, upload_star_pattern};
use crate::scene::palette::{self, linear};
use crate::scene::Scene;

/// Seed for the star pattern when the scene has none
const STAR_PATTERN_SEED: u64 = 0x5eed_57a2;

/// Colours handed to each sprite shader as `(color_a, color_b)`
pub fn sprite_colors(kind: SpriteKind) -> (Vec3, Vec3) {
    match kind {
        SpriteKind::Foliage => (linear(palette::EMERALD), linear(palette::GOLD)),
        SpriteKind::TreeSnow => (linear(palette::SNOW), Vec3::ZERO),
        SpriteKind::Fireworks => (linear(palette::HIGH_GOLD), Vec3::new(1.0, 1.0, 0.8)),
        SpriteKind::Snow => (linear(palette::SNOW), Vec3::splat(1.5)),
    }
}

/// All GPU state needed to draw one scene
pub struct SceneRenderer {
    camera: CameraBuffer,
    sprites: Vec<SpritePipeline>,
    meshes: MeshPipeline,
    instances: InstanceLayers,
    clear_color: wgpu::Color,
}

impl SceneRenderer {
    pub fn new(gpu: &GpuContext, scene: &Scene) -> Self {
        let device = &gpu.device;
        let format = gpu.format();
        let camera = CameraBuffer::new(device);

        let sprites = SpriteKind::ALL
            .iter()
            .map(|&kind| {
                let records: &[u8] = match kind {
                    SpriteKind::Foliage => bytemuck::cast_slice(scene.foliage().population().particles()),
                    SpriteKind::TreeSnow => bytemuck::cast_slice(scene.tree_snow().population().particles()),
                    SpriteKind::Fireworks => bytemuck::cast_slice(scene.fireworks().population().particles()),
                    SpriteKind::Snow => bytemuck::cast_slice(scene.snow().flakes()),
                };
                SpritePipeline::new(device, format, camera.bind_group_layout(), kind, records)
            })
            .collect();

        let mut rng = StdRng::seed_from_u64(scene.config().seed.unwrap_or(STAR_PATTERN_SEED));
        let pattern = upload_star_pattern(device, &gpu.queue, &star_pattern(&mut rng));
        let meshes = MeshPipeline::new(device, &gpu.queue, format, camera.bind_group_layout(), &pattern);

        let config = scene.config();
        let instances = InstanceLayers::new(device, |layer| config.layer_capacity(layer));
        log::info!("Renderer ready: {} instances across mesh layers", instances.total());

        let bg = linear(palette::DARK_BG);
        Self {
            camera,
            sprites,
            meshes,
            instances,
            clear_color: wgpu::Color {
                r: bg.x as f64,
                g: bg.y as f64,
                b: bg.z as f64,
                a: 1.0,
            },
        }
    }

    fn sprite_context(scene: &Scene, kind: SpriteKind) -> FrameContext {
        match kind {
            SpriteKind::Foliage => scene.foliage_context(),
            SpriteKind::TreeSnow => scene.tree_snow_context(),
            SpriteKind::Fireworks => scene.fireworks_context(),
            SpriteKind::Snow => scene.snow_context(),
        }
    }

    /// Upload this frame's state and draw it. A lost surface skips the frame.
    pub fn render(&mut self, gpu: &mut GpuContext, scene: &Scene, camera: &Camera) -> Result<()> {
        let Some(frame) = gpu.acquire()? else {
            return Ok(());
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let (width, height) = gpu.size();

        self.camera.update(&gpu.queue, camera, width, height);

        let tree_radius = scene.config().layout.radius;
        for sprite in &self.sprites {
            let (color_a, color_b) = sprite_colors(sprite.kind());
            let ctx = Self::sprite_context(scene, sprite.kind());
            sprite.update(&gpu.queue, &ParticleUniforms::new(&ctx, color_a, color_b, tree_radius));
        }

        scene.write_instances(&mut self.instances);
        self.instances.upload(&gpu.queue);
        self.meshes.update(&gpu.queue, scene.lights(), scene.time());

        let mut encoder = gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame_encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: gpu.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            // Opaque meshes first so sprites depth-test against them
            self.meshes.draw(&mut pass, self.camera.bind_group(), &self.instances);
            for sprite in &self.sprites {
                sprite.draw(&mut pass, self.camera.bind_group());
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_colors_are_linear() {
        let (emerald, gold) = sprite_colors(SpriteKind::Foliage);
        assert_eq!(emerald, linear(palette::EMERALD));
        assert!(gold.x > emerald.x && gold.y > emerald.y);
        let (snow, sparkle) = sprite_colors(SpriteKind::Snow);
        assert_eq!(snow, Vec3::ONE);
        assert!(sparkle.min_element() > 1.0);
    }
}
