//! Instanced mesh pipeline for leaf blocks, ornaments and the top star

use bytemuck::{Pod, Zeroable};

use crate::evaluate::MeshLayer;
use crate::render::buffer::InstanceLayers;
use crate::render::context::DEPTH_FORMAT;
use crate::render::mesh::{layer_geometry, GpuMesh, Vertex};
use crate::scene::{LightRig, MaterialLook, PointLight};

/// Point light as laid out in WGSL (32 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct GpuPointLight {
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    /// Zero means unlimited
    pub range: f32,
}

impl From<PointLight> for GpuPointLight {
    fn from(light: PointLight) -> Self {
        Self {
            position: light.position.to_array(),
            intensity: light.intensity,
            color: light.color.to_array(),
            range: light.range,
        }
    }
}

/// Light rig uniform (must match `Lights` in `mesh.wgsl`)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct LightsUniform {
    /// Spot position (12 bytes, offset 0)
    pub spot_position: [f32; 3],
    /// Ambient intensity (4 bytes, offset 12)
    pub ambient: f32,
    /// Spot direction (12 bytes, offset 16)
    pub spot_direction: [f32; 3],
    /// Cosine of the cone half-angle (4 bytes, offset 28)
    pub spot_cos_outer: f32,
    /// Spot colour (12 bytes, offset 32)
    pub spot_color: [f32; 3],
    /// Spot intensity (4 bytes, offset 44)
    pub spot_intensity: f32,
    /// Cosine where the penumbra ends (4 bytes, offset 48)
    pub spot_cos_inner: f32,
    pub _pad: [f32; 3],
    /// Accent, rim and star lights (96 bytes, offset 64)
    pub points: [GpuPointLight; 3],
}

impl LightsUniform {
    pub fn from_rig(rig: &LightRig) -> Self {
        let key = &rig.key;
        Self {
            spot_position: key.position.to_array(),
            ambient: rig.ambient,
            spot_direction: key.direction.to_array(),
            spot_cos_outer: key.angle.cos(),
            spot_color: key.color.to_array(),
            spot_intensity: key.intensity,
            spot_cos_inner: (key.angle * (1.0 - key.penumbra.clamp(0.0, 1.0))).cos(),
            _pad: [0.0; 3],
            points: rig.points().map(GpuPointLight::from),
        }
    }
}

/// Surface parameters for one layer (must match `Material` in `mesh.wgsl`)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    pub color: [f32; 3],
    pub emissive_intensity: f32,
    pub emissive: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    /// 1.0 skips lighting
    pub unlit: f32,
    /// 1.0 modulates roughness with the star pattern
    pub patterned: f32,
    pub _pad: f32,
}

impl MaterialUniform {
    pub fn new(look: &MaterialLook, emissive_intensity: f32) -> Self {
        Self {
            color: look.color.to_array(),
            emissive_intensity,
            emissive: look.emissive.to_array(),
            metalness: look.metalness,
            roughness: look.roughness,
            unlit: if look.unlit { 1.0 } else { 0.0 },
            patterned: if look.patterned { 1.0 } else { 0.0 },
            _pad: 0.0,
        }
    }
}

/// Layers whose emissive intensity changes every frame
fn is_animated(layer: MeshLayer) -> bool {
    matches!(layer, MeshLayer::Ball | MeshLayer::Heart | MeshLayer::TopStar)
}

struct LayerResources {
    mesh: GpuMesh,
    look: MaterialLook,
    material_buffer: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
}

/// Lit, instanced rendering of every mesh layer
pub struct MeshPipeline {
    pipeline: wgpu::RenderPipeline,
    lights_buffer: wgpu::Buffer,
    lights_bind_group: wgpu::BindGroup,
    layers: Vec<LayerResources>,
}

impl MeshPipeline {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        star_pattern: &wgpu::TextureView,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/mesh.wgsl").into()),
        });

        let uniform_entry = |binding: u32, visibility: wgpu::ShaderStages| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let lights_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lights_bind_group_layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::FRAGMENT)],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[camera_layout, &lights_layout, &material_layout],
            immediate_size: 0,
        });

        // Repeating sampler for the star pattern
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("star_pattern_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc(), InstanceLayers::desc()],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
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
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let lights_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lights_uniform"),
            size: std::mem::size_of::<LightsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lights_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lights_bind_group"),
            layout: &lights_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: lights_buffer.as_entire_binding(),
            }],
        });

        let layers = MeshLayer::ALL
            .iter()
            .map(|&layer| {
                let look = MaterialLook::for_layer(layer);
                let material_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(layer.label()),
                    size: std::mem::size_of::<MaterialUniform>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let uniform = MaterialUniform::new(&look, look.emissive_intensity);
                queue.write_buffer(&material_buffer, 0, bytemuck::bytes_of(&uniform));

                let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(layer.label()),
                    layout: &material_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: material_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(star_pattern),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::Sampler(&sampler),
                        },
                    ],
                });

                LayerResources {
                    mesh: GpuMesh::upload(device, layer.label(), &layer_geometry(layer)),
                    look,
                    material_buffer,
                    material_bind_group,
                }
            })
            .collect();

        Self {
            pipeline,
            lights_buffer,
            lights_bind_group,
            layers,
        }
    }

    /// Write the light rig and the animated materials for `time`
    pub fn update(&self, queue: &wgpu::Queue, rig: &LightRig, time: f32) {
        queue.write_buffer(&self.lights_buffer, 0, bytemuck::bytes_of(&LightsUniform::from_rig(rig)));
        for (&layer, resources) in MeshLayer::ALL.iter().zip(&self.layers) {
            if is_animated(layer) {
                let uniform = MaterialUniform::new(&resources.look, resources.look.emissive_at(layer, time));
                queue.write_buffer(&resources.material_buffer, 0, bytemuck::bytes_of(&uniform));
            }
        }
    }

    /// Draw every layer that has instances
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, camera_bind_group: &wgpu::BindGroup, instances: &InstanceLayers) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera_bind_group, &[]);
        pass.set_bind_group(1, &self.lights_bind_group, &[]);

        for (&layer, resources) in MeshLayer::ALL.iter().zip(&self.layers) {
            let Some((instance_buffer, count)) = instances.layer(layer) else {
                log::trace!("no instance buffer for {}, skipped", layer.label());
                continue;
            };
            pass.set_bind_group(2, &resources.material_bind_group, &[]);
            pass.set_vertex_buffer(0, resources.mesh.vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, instance_buffer.slice(..));
            pass.set_index_buffer(resources.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..resources.mesh.index_count, 0, 0..count);
        }
    }
}
