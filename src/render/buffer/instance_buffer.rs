//! Per-layer instance transform buffers

use crate::evaluate::{InstanceRaw, InstanceSink, MeshLayer};

/// Host staging and GPU storage for one mesh layer
struct LayerBuffer {
    staging: Vec<InstanceRaw>,
    buffer: Option<wgpu::Buffer>,
}

/// Instance matrices for every mesh layer.
///
/// The host fills the staging slices through [`InstanceSink`]; [`upload`]
/// copies them to the GPU. A layer with no instances has no buffer and is
/// skipped by both.
///
/// [`upload`]: InstanceLayers::upload
pub struct InstanceLayers {
    layers: Vec<LayerBuffer>,
}

impl InstanceLayers {
    /// Allocate `capacity(layer)` instances per layer
    pub fn new(device: &wgpu::Device, capacity: impl Fn(MeshLayer) -> usize) -> Self {
        let layers = MeshLayer::ALL
            .iter()
            .map(|&layer| {
                let count = capacity(layer);
                let buffer = (count > 0).then(|| {
                    device.create_buffer(&wgpu::BufferDescriptor {
                        label: Some(layer.label()),
                        size: (count * std::mem::size_of::<InstanceRaw>()) as u64,
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                        mapped_at_creation: false,
                    })
                });
                LayerBuffer {
                    staging: vec![InstanceRaw::default(); count],
                    buffer,
                }
            })
            .collect();
        Self { layers }
    }

    /// Copy every staged layer to its GPU buffer
    pub fn upload(&self, queue: &wgpu::Queue) {
        for layer in &self.layers {
            if let Some(buffer) = &layer.buffer {
                queue.write_buffer(buffer, 0, bytemuck::cast_slice(&layer.staging));
            }
        }
    }

    /// GPU buffer and instance count for `layer`, if it has any instances
    pub fn layer(&self, layer: MeshLayer) -> Option<(&wgpu::Buffer, u32)> {
        let entry = self.layers.get(layer.index())?;
        entry
            .buffer
            .as_ref()
            .map(|buffer| (buffer, entry.staging.len() as u32))
    }

    pub fn total(&self) -> usize {
        self.layers.iter().map(|l| l.staging.len()).sum()
    }

    /// Instance layout at vertex slot 1: the model matrix as four columns
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

impl InstanceSink for InstanceLayers {
    fn slots(&mut self, layer: MeshLayer) -> Option<&mut [InstanceRaw]> {
        let entry = self.layers.get_mut(layer.index())?;
        entry.buffer.as_ref()?;
        Some(entry.staging.as_mut_slice())
    }
}
