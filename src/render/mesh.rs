//! Procedural geometry for the instanced mesh layers
//!
//! Every shape is built once on the host as a [`MeshData`] and uploaded as a
//! [`GpuMesh`]. Flat-shaded solids carry per-face normals; the sphere and the
//! torus knot carry smooth ones.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec2, Vec3};
use wgpu::util::DeviceExt;

use crate::evaluate::MeshLayer;

/// Mesh vertex (must match `VertexIn` in `mesh.wgsl`)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x2,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Indexed triangle list on the host
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn push_vertex(&mut self, position: Vec3, normal: Vec3, uv: Vec2) -> u32 {
        self.vertices.push(Vertex::new(position, normal, uv));
        (self.vertices.len() - 1) as u32
    }

    /// Flat triangle facing away from the origin
    fn push_outward_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let mut normal = (b - a).cross(c - a).normalize_or_zero();
        let (b, c) = if normal.dot(a + b + c) < 0.0 {
            normal = -normal;
            (c, b)
        } else {
            (b, c)
        };
        for p in [a, b, c] {
            let uv = Vec2::new(0.5 + p.x * 0.5, 0.5 - p.y * 0.5);
            let i = self.push_vertex(p, normal, uv);
            self.indices.push(i);
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds, `None` when empty
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.vertices.iter().map(|v| Vec3::from(v.position)).fold(None, |acc, p| match acc {
            None => Some((p, p)),
            Some((min, max)) => Some((min.min(p), max.max(p))),
        })
    }

    /// Translate so the bounding box is centred on the origin
    pub fn centered(mut self) -> Self {
        if let Some((min, max)) = self.bounds() {
            let center = (min + max) * 0.5;
            for v in &mut self.vertices {
                v.position = (Vec3::from(v.position) - center).to_array();
            }
        }
        self
    }

    pub fn rotated(mut self, rotation: Quat) -> Self {
        for v in &mut self.vertices {
            v.position = (rotation * Vec3::from(v.position)).to_array();
            v.normal = (rotation * Vec3::from(v.normal)).to_array();
        }
        self
    }
}

/// Axis-aligned box centred on the origin
pub fn cuboid(size: Vec3) -> MeshData {
    let h = size * 0.5;
    let mut mesh = MeshData::default();
    // (normal, u axis, v axis)
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    for (normal, u, v) in faces {
        let base = mesh.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = (normal + u * su + v * sv) * h;
            mesh.push_vertex(p, normal, Vec2::new((su + 1.0) * 0.5, (1.0 - sv) * 0.5));
        }
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Smooth UV sphere
pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let theta = v * PI;
        for seg in 0..=segments {
            let u = seg as f32 / segments as f32;
            let phi = u * TAU;
            let normal = Vec3::new(-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin());
            mesh.push_vertex(normal * radius, normal, Vec2::new(u, v));
        }
    }
    let stride = segments + 1;
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * stride + seg;
            let b = a + stride;
            if ring != 0 {
                mesh.indices.extend_from_slice(&[a, b, a + 1]);
            }
            if ring != rings - 1 {
                mesh.indices.extend_from_slice(&[a + 1, b, b + 1]);
            }
        }
    }
    mesh
}

/// Regular octahedron with flat faces
pub fn octahedron(radius: f32) -> MeshData {
    let mut mesh = MeshData::default();
    for sx in [-1.0f32, 1.0] {
        for sy in [-1.0f32, 1.0] {
            for sz in [-1.0f32, 1.0] {
                mesh.push_outward_triangle(Vec3::X * sx * radius, Vec3::Y * sy * radius, Vec3::Z * sz * radius);
            }
        }
    }
    mesh
}

/// Icosahedron with each face split `2^detail`-fold per edge, projected onto the sphere
pub fn icosahedron(radius: f32, detail: u32) -> MeshData {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;
    let corners = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ];
    const FACES: [[usize; 3]; 20] = [
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    let mut triangles: Vec<[Vec3; 3]> = FACES
        .iter()
        .map(|f| [corners[f[0]], corners[f[1]], corners[f[2]]].map(|p| p.normalize()))
        .collect();
    for _ in 0..detail {
        triangles = triangles
            .into_iter()
            .flat_map(|[a, b, c]| {
                let ab = ((a + b) * 0.5).normalize();
                let bc = ((b + c) * 0.5).normalize();
                let ca = ((c + a) * 0.5).normalize();
                [[a, ab, ca], [ab, b, bc], [ca, bc, c], [ab, bc, ca]]
            })
            .collect();
    }

    let mut mesh = MeshData::default();
    for [a, b, c] in triangles {
        mesh.push_outward_triangle(a * radius, b * radius, c * radius);
    }
    mesh
}

/// Outline of a five-point star, first point on +X, counter-clockwise
pub fn star_outline(outer: f32, inner: f32) -> Vec<Vec2> {
    (0..10)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = i as f32 / 5.0 * PI;
            Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let s = 1.0 - t;
    p0 * (s * s * s) + p1 * (3.0 * s * s * t) + p2 * (3.0 * s * t * t) + p3 * (t * t * t)
}

/// Heart outline traced from six cubic segments, point upward
pub fn heart_outline(steps_per_curve: u32) -> Vec<Vec2> {
    let v = Vec2::new;
    let curves = [
        [v(0.25, 0.25), v(0.25, 0.25), v(0.2, 0.0), v(0.0, 0.0)],
        [v(0.0, 0.0), v(-0.3, 0.0), v(-0.3, 0.35), v(-0.3, 0.35)],
        [v(-0.3, 0.35), v(-0.3, 0.55), v(-0.1, 0.77), v(0.25, 0.95)],
        [v(0.25, 0.95), v(0.6, 0.77), v(0.8, 0.55), v(0.8, 0.35)],
        [v(0.8, 0.35), v(0.8, 0.35), v(0.8, 0.0), v(0.5, 0.0)],
        [v(0.5, 0.0), v(0.35, 0.0), v(0.25, 0.25), v(0.25, 0.25)],
    ];
    let steps = steps_per_curve.max(1);
    let mut points = Vec::with_capacity(curves.len() * steps as usize);
    for [p0, p1, p2, p3] in curves {
        for s in 0..steps {
            let p = cubic_bezier(p0, p1, p2, p3, s as f32 / steps as f32);
            if points.last().is_none_or(|last: &Vec2| last.distance_squared(p) > 1e-10) {
                points.push(p);
            }
        }
    }
    points
}

fn signed_area(outline: &[Vec2]) -> f32 {
    let n = outline.len();
    (0..n).map(|i| outline[i].perp_dot(outline[(i + 1) % n])).sum::<f32>() * 0.5
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0
}

/// Ear-clipping triangulation of a simple counter-clockwise polygon
fn triangulate(outline: &[Vec2]) -> Vec<[usize; 3]> {
    let mut remaining: Vec<usize> = (0..outline.len()).collect();
    let mut triangles = Vec::with_capacity(outline.len().saturating_sub(2));
    while remaining.len() > 3 {
        let n = remaining.len();
        let ear = (0..n).find(|&i| {
            let (ia, ib, ic) = (remaining[(i + n - 1) % n], remaining[i], remaining[(i + 1) % n]);
            let (a, b, c) = (outline[ia], outline[ib], outline[ic]);
            if (b - a).perp_dot(c - b) <= 0.0 {
                return false;
            }
            remaining
                .iter()
                .filter(|&&j| j != ia && j != ib && j != ic)
                .all(|&j| !point_in_triangle(outline[j], a, b, c))
        });
        // Degenerate input: clip the first vertex anyway so the loop ends
        let i = ear.unwrap_or(0);
        triangles.push([remaining[(i + n - 1) % n], remaining[i], remaining[(i + 1) % n]]);
        remaining.remove(i);
    }
    if remaining.len() == 3 {
        triangles.push([remaining[0], remaining[1], remaining[2]]);
    }
    triangles
}

/// Extrude a closed outline from z = 0 to z = `depth`
pub fn extrude(outline: &[Vec2], depth: f32) -> MeshData {
    let mut points = outline.to_vec();
    if signed_area(&points) < 0.0 {
        points.reverse();
    }
    let mut mesh = MeshData::default();
    let uv = |p: Vec2| Vec2::new(0.5 + p.x * 0.5, 0.5 - p.y * 0.5);
    let triangles = triangulate(&points);

    let front = mesh.vertices.len() as u32;
    for &p in &points {
        mesh.push_vertex(p.extend(depth), Vec3::Z, uv(p));
    }
    let back = mesh.vertices.len() as u32;
    for &p in &points {
        mesh.push_vertex(p.extend(0.0), Vec3::NEG_Z, uv(p));
    }
    for [a, b, c] in &triangles {
        let (a, b, c) = (*a as u32, *b as u32, *c as u32);
        mesh.indices.extend_from_slice(&[front + a, front + b, front + c]);
        mesh.indices.extend_from_slice(&[back + a, back + c, back + b]);
    }

    let n = points.len();
    let perimeter: f32 = (0..n).map(|i| points[i].distance(points[(i + 1) % n])).sum();
    let mut travelled = 0.0;
    for i in 0..n {
        let (a, b) = (points[i], points[(i + 1) % n]);
        let edge = b - a;
        let normal = Vec3::new(edge.y, -edge.x, 0.0).normalize_or_zero();
        let (u0, u1) = (travelled / perimeter, (travelled + edge.length()) / perimeter);
        travelled += edge.length();
        let base = mesh.vertices.len() as u32;
        mesh.push_vertex(a.extend(0.0), normal, Vec2::new(u0, 1.0));
        mesh.push_vertex(b.extend(0.0), normal, Vec2::new(u1, 1.0));
        mesh.push_vertex(b.extend(depth), normal, Vec2::new(u1, 0.0));
        mesh.push_vertex(a.extend(depth), normal, Vec2::new(u0, 0.0));
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// (p, q) torus knot swept with a circular tube
pub fn torus_knot(radius: f32, tube: f32, tubular: u32, radial: u32, p: u32, q: u32) -> MeshData {
    let curve = |u: f32| {
        let quo = q as f32 / p as f32 * u;
        let cs = quo.cos();
        Vec3::new(
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * 0.5 * u.sin(),
            radius * quo.sin() * 0.5,
        )
    };

    let mut mesh = MeshData::default();
    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * p as f32 * TAU;
        let p1 = curve(u);
        let p2 = curve(u + 0.01);
        let tangent = p2 - p1;
        let binormal = tangent.cross(p2 + p1).normalize_or_zero();
        let normal = binormal.cross(tangent).normalize_or_zero();
        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let position = p1 + normal * (-tube * v.cos()) + binormal * (tube * v.sin());
            let n = (position - p1).normalize_or_zero();
            mesh.push_vertex(position, n, Vec2::new(i as f32 / tubular as f32, j as f32 / radial as f32));
        }
    }
    let stride = radial + 1;
    for i in 1..=tubular {
        for j in 1..=radial {
            let a = stride * (i - 1) + (j - 1);
            let b = stride * i + (j - 1);
            let c = stride * i + j;
            let d = stride * (i - 1) + j;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    mesh
}

/// Host geometry for each mesh layer
pub fn layer_geometry(layer: MeshLayer) -> MeshData {
    match layer {
        MeshLayer::LeafBlock | MeshLayer::GiftBox | MeshLayer::RedCube => cuboid(Vec3::ONE),
        MeshLayer::RibbonH => cuboid(Vec3::new(1.04, 0.18, 1.04)),
        MeshLayer::RibbonV => cuboid(Vec3::new(0.18, 1.04, 1.04)),
        MeshLayer::Bow => torus_knot(0.2, 0.05, 64, 8, 2, 3),
        MeshLayer::Ball | MeshLayer::SilverBauble => uv_sphere(1.0, 32, 32),
        MeshLayer::Star => octahedron(1.0),
        MeshLayer::Bauble => icosahedron(1.0, 1),
        MeshLayer::Heart => extrude(&heart_outline(12), 0.1)
            .centered()
            .rotated(Quat::from_rotation_x(PI)),
        MeshLayer::SilverStar | MeshLayer::TopStar => extrude(&star_outline(1.0, 0.4), 0.2),
    }
}

/// Uploaded vertex and index buffers
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(mesh: &MeshData) {
        assert!(!mesh.indices.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        for v in &mesh.vertices {
            let len = Vec3::from(v.normal).length();
            assert!((len - 1.0).abs() < 1e-3, "normal length {len}");
        }
    }

    #[test]
    fn test_vertex_size() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn test_every_layer_builds() {
        for layer in MeshLayer::ALL {
            assert_well_formed(&layer_geometry(layer));
        }
    }

    #[test]
    fn test_cuboid_extent() {
        let mesh = cuboid(Vec3::new(1.04, 0.18, 1.04));
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        let (min, max) = mesh.bounds().unwrap();
        assert!((max - min - Vec3::new(1.04, 0.18, 1.04)).length() < 1e-6);
    }

    #[test]
    fn test_sphere_vertices_on_radius() {
        let mesh = uv_sphere(2.0, 16, 8);
        for v in &mesh.vertices {
            assert!((Vec3::from(v.position).length() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_icosahedron_detail() {
        assert_eq!(icosahedron(1.0, 0).triangle_count(), 20);
        assert_eq!(icosahedron(1.0, 1).triangle_count(), 80);
        assert_eq!(octahedron(1.0).triangle_count(), 8);
    }

    #[test]
    fn test_flat_faces_point_outward() {
        let mesh = icosahedron(1.0, 1);
        for tri in mesh.indices.chunks(3) {
            let v = mesh.vertices[tri[0] as usize];
            assert!(Vec3::from(v.normal).dot(Vec3::from(v.position)) > 0.0);
        }
    }

    #[test]
    fn test_star_outline() {
        let outline = star_outline(1.0, 0.4);
        assert_eq!(outline.len(), 10);
        assert!((outline[0] - Vec2::X).length() < 1e-6);
        assert!((outline[1].length() - 0.4).abs() < 1e-6);
        assert!(signed_area(&outline) > 0.0);
    }

    #[test]
    fn test_star_extrusion() {
        let mesh = extrude(&star_outline(1.0, 0.4), 0.2);
        // Two caps of eight triangles plus two per side
        assert_eq!(mesh.triangle_count(), 2 * 8 + 2 * 10);
        let (min, max) = mesh.bounds().unwrap();
        assert!((min.z).abs() < 1e-6 && (max.z - 0.2).abs() < 1e-6);
        assert!((max.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_heart_is_centred_and_flipped() {
        let mut outline = heart_outline(12);
        assert!(outline.len() > 30);
        if signed_area(&outline) < 0.0 {
            outline.reverse();
        }
        let mesh = layer_geometry(MeshLayer::Heart);
        let (min, max) = mesh.bounds().unwrap();
        assert!(((min + max) * 0.5).length() < 1e-4);
        // The outline's point at y = 0.95 ends up at the bottom
        assert!(max.y - min.y > 0.9);
        assert_eq!(triangulate(&outline).len(), outline.len() - 2);
    }

    #[test]
    fn test_torus_knot_grid() {
        let mesh = torus_knot(0.2, 0.05, 64, 8, 2, 3);
        assert_eq!(mesh.vertices.len(), 65 * 9);
        assert_eq!(mesh.triangle_count(), 64 * 8 * 2);
        let (min, max) = mesh.bounds().unwrap();
        assert!(max.x < 0.4 && min.x > -0.4);
    }
}
