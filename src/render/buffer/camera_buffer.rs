//! GPU uniform buffer for camera data

use bytemuck::{Pod, Zeroable};
use crate::core::camera::Camera;

/// Camera uniform data for GPU (must match `Camera` in the WGSL shaders)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    /// View-projection matrix (64 bytes, offset 0)
    pub view_proj: [[f32; 4]; 4],
    /// View matrix, used for sprite depth (64 bytes, offset 64)
    pub view: [[f32; 4]; 4],
    /// Camera position in world space (12 bytes, offset 128)
    pub position: [f32; 3],
    /// Padding after position for vec3 alignment (4 bytes, offset 140)
    pub _pos_pad: f32,
    /// Surface size in pixels (8 bytes, offset 144)
    pub viewport: [f32; 2],
    /// Final padding to 160 bytes (8 bytes, offset 152)
    pub _pad: [f32; 2],
}

impl CameraUniform {
    pub fn new(camera: &Camera, viewport: [f32; 2]) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            position: camera.position.to_array(),
            _pos_pad: 0.0,
            viewport,
            _pad: [0.0; 2],
        }
    }
}

/// GPU buffer for camera uniform
pub struct CameraBuffer {
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl CameraBuffer {
    /// Create new camera buffer
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera_uniform"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
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
            label: Some("camera_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group_layout,
            bind_group,
        }
    }

    /// Update buffer with camera data for a surface of `width` x `height` pixels
    pub fn update(&self, queue: &wgpu::Queue, camera: &Camera, width: u32, height: u32) {
        let uniform = CameraUniform::new(camera, [width as f32, height as f32]);
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&uniform));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_uniform_size() {
        // Must be exactly 160 bytes to match WGSL struct layout
        let size = std::mem::size_of::<CameraUniform>();
        assert_eq!(size, 160, "CameraUniform must be exactly 160 bytes, got {} bytes", size);
    }

    #[test]
    fn test_from_camera() {
        let camera = Camera::look_at(Vec3::new(0.0, 2.0, 18.0), Vec3::ZERO, Vec3::Y, 45.0);
        let uniform = CameraUniform::new(&camera, [1280.0, 720.0]);
        assert_eq!(uniform.position, [0.0, 2.0, 18.0]);
        assert_eq!(uniform.viewport, [1280.0, 720.0]);
        assert_eq!(uniform.view, camera.view_matrix().to_cols_array_2d());
    }
}
