//! Point-sprite pipelines
//!
//! Each sprite population keeps its particle records in an instance-rate
//! vertex buffer that never changes after upload. The vertex shader expands
//! every instance into a camera-facing quad (six vertices) and evaluates the
//! population's motion from a small per-frame uniform block.

use wgpu::util::DeviceExt;

use crate::evaluate::ParticleUniforms;
use crate::population::{FireworkParticle, FoliageParticle, SnowFlake, TreeSnowParticle};
use crate::render::context::DEPTH_FORMAT;

/// Which sprite population a pipeline draws
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    Foliage,
    TreeSnow,
    Fireworks,
    Snow,
}

const FOLIAGE_ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32,
    2 => Float32x3,
    3 => Float32,
    4 => Float32,
];

const TREE_SNOW_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32,
    2 => Float32x3,
    3 => Float32,
];

const FIREWORK_ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
    0 => Float32,
    1 => Float32,
    2 => Float32,
    3 => Float32,
    4 => Float32,
    5 => Float32x3,
];

const SNOW_ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32,
    2 => Float32,
    3 => Float32,
    4 => Float32x3,
];

impl SpriteKind {
    pub const ALL: [SpriteKind; 4] = [SpriteKind::Foliage, SpriteKind::TreeSnow, SpriteKind::Fireworks, SpriteKind::Snow];

    pub fn label(self) -> &'static str {
        match self {
            SpriteKind::Foliage => "foliage",
            SpriteKind::TreeSnow => "tree_snow",
            SpriteKind::Fireworks => "fireworks",
            SpriteKind::Snow => "snow",
        }
    }

    fn shader_source(self) -> &'static str {
        macro_rules! sprite_shader {
            ($file:literal) => {
                concat!(
                    include_str!("../../../shaders/sprite_common.wgsl"),
                    include_str!(concat!("../../../shaders/", $file)),
                )
            };
        }
        match self {
            SpriteKind::Foliage => sprite_shader!("foliage.wgsl"),
            SpriteKind::TreeSnow => sprite_shader!("tree_snow.wgsl"),
            SpriteKind::Fireworks => sprite_shader!("fireworks.wgsl"),
            SpriteKind::Snow => sprite_shader!("snow.wgsl"),
        }
    }

    /// Size in bytes of one particle record
    pub fn stride(self) -> usize {
        match self {
            SpriteKind::Foliage => std::mem::size_of::<FoliageParticle>(),
            SpriteKind::TreeSnow => std::mem::size_of::<TreeSnowParticle>(),
            SpriteKind::Fireworks => std::mem::size_of::<FireworkParticle>(),
            SpriteKind::Snow => std::mem::size_of::<SnowFlake>(),
        }
    }

    fn attributes(self) -> &'static [wgpu::VertexAttribute] {
        match self {
            SpriteKind::Foliage => &FOLIAGE_ATTRIBUTES,
            SpriteKind::TreeSnow => &TREE_SNOW_ATTRIBUTES,
            SpriteKind::Fireworks => &FIREWORK_ATTRIBUTES,
            SpriteKind::Snow => &SNOW_ATTRIBUTES,
        }
    }

    pub fn desc(self) -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: self.attributes(),
        }
    }
}

/// Additive blending; sprites glow where they overlap
const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// One sprite population on the GPU
pub struct SpritePipeline {
    kind: SpriteKind,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// `None` for an empty population
    particles: Option<wgpu::Buffer>,
    count: u32,
}

impl SpritePipeline {
    /// Build the pipeline and upload `particles`, the population's raw records
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        kind: SpriteKind,
        particles: &[u8],
    ) -> Self {
        let label = kind.label();
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(kind.shader_source().into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particle_uniforms"),
            size: std::mem::size_of::<ParticleUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("particle_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("particle_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("particle_pipeline_layout"),
            bind_group_layouts: &[camera_layout, &bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[kind.desc()],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            // Test against the meshes, never occlude other sprites
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(ADDITIVE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let count = (particles.len() / kind.stride()) as u32;
        let particles = (count > 0).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: particles,
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        log::debug!("Sprite pipeline {}: {} particles", label, count);

        Self {
            kind,
            pipeline,
            uniform_buffer,
            bind_group,
            particles,
            count,
        }
    }

    pub fn kind(&self) -> SpriteKind {
        self.kind
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Write this frame's uniform block
    pub fn update(&self, queue: &wgpu::Queue, uniforms: &ParticleUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Draw every particle as a six-vertex quad instance
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, camera_bind_group: &wgpu::BindGroup) {
        let Some(particles) = &self.particles else {
            log::trace!("{} has no particle buffer, skipped", self.kind.label());
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera_bind_group, &[]);
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, particles.slice(..));
        pass.draw(0..6, 0..self.count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_cover_each_record() {
        for kind in SpriteKind::ALL {
            let attributes = kind.attributes();
            let last = attributes[attributes.len() - 1];
            let end = last.offset + last.format.size();
            assert_eq!(end as usize, kind.stride(), "{}", kind.label());
        }
    }

    #[test]
    fn test_record_sizes() {
        assert_eq!(SpriteKind::Foliage.stride(), 36);
        assert_eq!(SpriteKind::TreeSnow.stride(), 32);
        assert_eq!(SpriteKind::Fireworks.stride(), 32);
        assert_eq!(SpriteKind::Snow.stride(), 36);
    }
}
