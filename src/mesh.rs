//! 3D mesh primitives and spatial transforms.
//!
//! [`Vertex3d`] is the vertex format shared by every mesh (position, normal,
//! UV — 32 bytes). [`Mesh`] owns GPU-resident vertex/index buffers and is
//! immutable after creation. The five primitive constructors (cube, sphere,
//! cone, cylinder, torus) generate their geometry in pure functions so the
//! index math can be unit-tested without a device.
//!
//! All primitives use counter-clockwise winding for front faces, matching
//! the mesh pipeline's back-face culling.

use crate::gpu::GpuContext;
use glam::{Mat4, Quat, Vec3};

/// A vertex with position, normal, and texture coordinates.
///
/// `#[repr(C)]` plus the bytemuck derives give it a stable 32-byte layout
/// for direct upload into vertex buffers.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex3d {
    /// Vertex buffer layout: position (location 0), normal (location 1),
    /// uv (location 2), 32 bytes per vertex.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// GPU-resident geometry with vertex and index buffers.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    /// Uploads raw vertex and index data to the GPU.
    pub fn new(gpu: &GpuContext, vertices: &[Vertex3d], indices: &[u32]) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// A unit cube centered at the origin, one set of vertices per face for
    /// flat normals.
    pub fn cube(gpu: &GpuContext) -> Self {
        let (vertices, indices) = cube_geometry();
        Self::new(gpu, &vertices, &indices)
    }

    /// A UV sphere of radius 1 centered at the origin.
    ///
    /// `segments` divides the equator, `rings` divides pole to pole.
    pub fn sphere(gpu: &GpuContext, segments: u32, rings: u32) -> Self {
        let (vertices, indices) = sphere_geometry(segments, rings);
        Self::new(gpu, &vertices, &indices)
    }

    /// A cone of radius 1 and height 1, base at y = -0.5, apex at y = 0.5.
    pub fn cone(gpu: &GpuContext, segments: u32) -> Self {
        let (vertices, indices) = cone_geometry(segments);
        Self::new(gpu, &vertices, &indices)
    }

    /// A cylinder of radius 1 and height 1 centered at the origin.
    pub fn cylinder(gpu: &GpuContext, segments: u32) -> Self {
        let (vertices, indices) = cylinder_geometry(segments);
        Self::new(gpu, &vertices, &indices)
    }

    /// A torus in the XZ plane: ring radius 1, tube radius 0.4.
    pub fn torus(gpu: &GpuContext, radial_segments: u32, tubular_segments: u32) -> Self {
        let (vertices, indices) = torus_geometry(radial_segments, tubular_segments);
        Self::new(gpu, &vertices, &indices)
    }
}

pub(crate) fn cube_geometry() -> (Vec<Vertex3d>, Vec<u32>) {
    // One face per (normal, tangent, bitangent) triple; normal = u cross v
    // keeps the winding counter-clockwise from outside.
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, tangent, bitangent) in FACES {
        let n = Vec3::from(normal);
        let u = Vec3::from(tangent);
        let v = Vec3::from(bitangent);
        let base = vertices.len() as u32;

        for (su, sv, uv) in [
            (-1.0, -1.0, [0.0, 0.0]),
            (1.0, -1.0, [1.0, 0.0]),
            (1.0, 1.0, [1.0, 1.0]),
            (-1.0, 1.0, [0.0, 1.0]),
        ] {
            let position = (n + u * su + v * sv) * 0.5;
            vertices.push(Vertex3d::new(position.to_array(), normal, uv));
        }

        indices.extend([base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    (vertices, indices)
}

pub(crate) fn sphere_geometry(segments: u32, rings: u32) -> (Vec<Vertex3d>, Vec<u32>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let phi = std::f32::consts::PI * ring as f32 / rings as f32;
        let y = phi.cos();
        let ring_radius = phi.sin();

        for seg in 0..=segments {
            let theta = std::f32::consts::TAU * seg as f32 / segments as f32;
            let x = ring_radius * theta.cos();
            let z = ring_radius * theta.sin();

            vertices.push(Vertex3d::new(
                [x, y, z],
                [x, y, z],
                [seg as f32 / segments as f32, ring as f32 / rings as f32],
            ));
        }
    }

    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let below = current + segments + 1;

            indices.extend([current, current + 1, below]);
            indices.extend([current + 1, below + 1, below]);
        }
    }

    (vertices, indices)
}

pub(crate) fn cone_geometry(segments: u32) -> (Vec<Vertex3d>, Vec<u32>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Slanted side: for radius == height the lateral normal at angle theta
    // is normalize(cos theta, 1, sin theta).
    let base = vertices.len() as u32;
    for seg in 0..=segments {
        let theta = std::f32::consts::TAU * seg as f32 / segments as f32;
        let normal = Vec3::new(theta.cos(), 1.0, theta.sin()).normalize();
        vertices.push(Vertex3d::new(
            [theta.cos(), -0.5, theta.sin()],
            normal.to_array(),
            [seg as f32 / segments as f32, 1.0],
        ));
    }
    // One apex vertex per segment so each triangle gets a mid-angle normal.
    let apex_base = vertices.len() as u32;
    for seg in 0..segments {
        let theta = std::f32::consts::TAU * (seg as f32 + 0.5) / segments as f32;
        let normal = Vec3::new(theta.cos(), 1.0, theta.sin()).normalize();
        vertices.push(Vertex3d::new(
            [0.0, 0.5, 0.0],
            normal.to_array(),
            [(seg as f32 + 0.5) / segments as f32, 0.0],
        ));
    }
    for seg in 0..segments {
        indices.extend([base + seg, apex_base + seg, base + seg + 1]);
    }

    // Base cap, facing down.
    let center = vertices.len() as u32;
    vertices.push(Vertex3d::new([0.0, -0.5, 0.0], [0.0, -1.0, 0.0], [0.5, 0.5]));
    let cap_base = vertices.len() as u32;
    for seg in 0..=segments {
        let theta = std::f32::consts::TAU * seg as f32 / segments as f32;
        vertices.push(Vertex3d::new(
            [theta.cos(), -0.5, theta.sin()],
            [0.0, -1.0, 0.0],
            [0.5 + theta.cos() * 0.5, 0.5 + theta.sin() * 0.5],
        ));
    }
    for seg in 0..segments {
        indices.extend([center, cap_base + seg, cap_base + seg + 1]);
    }

    (vertices, indices)
}

pub(crate) fn cylinder_geometry(segments: u32) -> (Vec<Vertex3d>, Vec<u32>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Side wall: paired bottom/top rings with radial normals.
    let side_base = vertices.len() as u32;
    for seg in 0..=segments {
        let theta = std::f32::consts::TAU * seg as f32 / segments as f32;
        let (x, z) = (theta.cos(), theta.sin());
        let u = seg as f32 / segments as f32;
        vertices.push(Vertex3d::new([x, -0.5, z], [x, 0.0, z], [u, 1.0]));
        vertices.push(Vertex3d::new([x, 0.5, z], [x, 0.0, z], [u, 0.0]));
    }
    for seg in 0..segments {
        let bottom = side_base + seg * 2;
        let top = bottom + 1;
        indices.extend([bottom, top, bottom + 2]);
        indices.extend([bottom + 2, top, top + 2]);
    }

    // End caps.
    for (y, normal) in [(0.5, [0.0, 1.0, 0.0]), (-0.5, [0.0, -1.0, 0.0])] {
        let center = vertices.len() as u32;
        vertices.push(Vertex3d::new([0.0, y, 0.0], normal, [0.5, 0.5]));
        let cap_base = vertices.len() as u32;
        for seg in 0..=segments {
            let theta = std::f32::consts::TAU * seg as f32 / segments as f32;
            vertices.push(Vertex3d::new(
                [theta.cos(), y, theta.sin()],
                normal,
                [0.5 + theta.cos() * 0.5, 0.5 + theta.sin() * 0.5],
            ));
        }
        for seg in 0..segments {
            if y > 0.0 {
                indices.extend([center, cap_base + seg + 1, cap_base + seg]);
            } else {
                indices.extend([center, cap_base + seg, cap_base + seg + 1]);
            }
        }
    }

    (vertices, indices)
}

pub(crate) fn torus_geometry(radial_segments: u32, tubular_segments: u32) -> (Vec<Vertex3d>, Vec<u32>) {
    const RING_RADIUS: f32 = 1.0;
    const TUBE_RADIUS: f32 = 0.4;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for j in 0..=radial_segments {
        let phi = std::f32::consts::TAU * j as f32 / radial_segments as f32;
        for i in 0..=tubular_segments {
            let theta = std::f32::consts::TAU * i as f32 / tubular_segments as f32;
            let ring = RING_RADIUS + TUBE_RADIUS * phi.cos();
            vertices.push(Vertex3d::new(
                [ring * theta.cos(), TUBE_RADIUS * phi.sin(), ring * theta.sin()],
                [phi.cos() * theta.cos(), phi.sin(), phi.cos() * theta.sin()],
                [
                    i as f32 / tubular_segments as f32,
                    j as f32 / radial_segments as f32,
                ],
            ));
        }
    }

    for j in 0..radial_segments {
        for i in 0..tubular_segments {
            let a = j * (tubular_segments + 1) + i;
            let b = a + tubular_segments + 1;

            indices.extend([a, b, a + 1]);
            indices.extend([b, b + 1, a + 1]);
        }
    }

    (vertices, indices)
}

/// Position, rotation, and scale, combined into a model matrix in SRT order.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform: origin, no rotation, unit scale.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// The scale-rotate-translate model matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(vertices: &[Vertex3d]) -> impl Iterator<Item = Vec3> + '_ {
        vertices.iter().map(|v| Vec3::from(v.position))
    }

    #[test]
    fn cube_spans_unit_bounds() {
        let (vertices, indices) = cube_geometry();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        for p in positions(&vertices) {
            assert_eq!(p.abs().max_element(), 0.5);
        }
    }

    #[test]
    fn sphere_vertices_sit_on_unit_radius() {
        let (vertices, indices) = sphere_geometry(16, 8);
        assert_eq!(vertices.len(), 17 * 9);
        assert_eq!(indices.len() as u32, 16 * 8 * 6);
        for p in positions(&vertices) {
            assert!((p.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn sphere_triangles_wind_outward() {
        let (vertices, indices) = sphere_geometry(16, 8);
        for tri in indices.chunks(3) {
            let [a, b, c] =
                [tri[0], tri[1], tri[2]].map(|i| Vec3::from(vertices[i as usize].position));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            // Degenerate pole triangles have zero area; skip them.
            if normal.length() > 1e-6 {
                assert!(normal.dot(centroid) > 0.0);
            }
        }
    }

    #[test]
    fn cone_base_and_apex_heights() {
        let (vertices, _) = cone_geometry(12);
        for p in positions(&vertices) {
            assert!(p.y == -0.5 || p.y == 0.5);
            if p.y == 0.5 {
                assert_eq!(p.x, 0.0);
                assert_eq!(p.z, 0.0);
            }
        }
    }

    #[test]
    fn cylinder_wall_radius_is_one() {
        let (vertices, _) = cylinder_geometry(12);
        for v in &vertices {
            let p = Vec3::from(v.position);
            let radial = Vec3::new(p.x, 0.0, p.z).length();
            // Wall and cap-rim vertices sit on the unit circle, cap centers
            // at the axis.
            assert!(radial < 1.0 + 1e-5);
            if Vec3::from(v.normal).y == 0.0 {
                assert!((radial - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn torus_vertices_stay_on_tube() {
        let (vertices, _) = torus_geometry(8, 16);
        for p in positions(&vertices) {
            let ring_distance = Vec3::new(p.x, 0.0, p.z).length() - 1.0;
            let tube = (ring_distance * ring_distance + p.y * p.y).sqrt();
            assert!((tube - 0.4).abs() < 1e-5);
        }
    }

    #[test]
    fn normals_are_unit_length() {
        let (vertices, _) = cone_geometry(12);
        for v in &vertices {
            assert!((Vec3::from(v.normal).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn transform_matrix_applies_srt() {
        let t = Transform::new()
            .position(Vec3::new(1.0, 2.0, 3.0))
            .scale(Vec3::splat(2.0));
        let p = t.matrix() * Vec3::ONE.extend(1.0);
        assert_eq!(p.truncate(), Vec3::new(3.0, 4.0, 5.0));
    }
}
