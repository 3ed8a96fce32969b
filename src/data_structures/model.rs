//! GPU meshes built from procedural geometry.
//!
//! A [`GpuMesh`] is uploaded once, when a scene is assembled, and never
//! written again. Its [`Primitive`] decides which pipeline draws it.

use wgpu::util::DeviceExt;

use crate::geometry::{Geometry, LineSet, PointCloud};

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex for MeshVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
}

impl Vertex for LineVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

/// One corner of a camera-facing point quad.
///
/// All four corners of a quad share `center`; `corner` is the offset in view
/// space, already scaled by the point size.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointVertex {
    pub center: [f32; 3],
    pub corner: [f32; 2],
}

impl Vertex for PointVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<PointVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Lit, translucent triangles.
    Triangles,
    /// Unlit line segments.
    Lines,
    /// Unlit camera-facing quads.
    Points,
}

#[derive(Debug)]
pub struct GpuMesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    pub primitive: Primitive,
}

impl GpuMesh {
    pub fn from_geometry(device: &wgpu::Device, name: &str, geometry: &Geometry) -> Self {
        let vertices = mesh_vertices(geometry);
        Self::upload(device, name, &vertices, &geometry.indices, Primitive::Triangles)
    }

    pub fn from_lines(device: &wgpu::Device, name: &str, lines: &LineSet) -> Self {
        let vertices: Vec<LineVertex> = lines
            .positions
            .iter()
            .map(|&position| LineVertex { position })
            .collect();
        Self::upload(device, name, &vertices, &lines.indices, Primitive::Lines)
    }

    pub fn from_points(device: &wgpu::Device, name: &str, points: &PointCloud, size: f32) -> Self {
        let (vertices, indices) = point_quads(points, size);
        Self::upload(device, name, &vertices, &indices, Primitive::Points)
    }

    fn upload<V: bytemuck::Pod>(
        device: &wgpu::Device,
        name: &str,
        vertices: &[V],
        indices: &[u32],
        primitive: Primitive,
    ) -> Self {
        log::debug!(
            "uploading {} ({:?}, {} vertices, {} indices)",
            name,
            primitive,
            vertices.len(),
            indices.len()
        );
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", name)),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: indices.len() as u32,
            primitive,
        }
    }
}

pub fn mesh_vertices(geometry: &Geometry) -> Vec<MeshVertex> {
    geometry
        .positions
        .iter()
        .zip(&geometry.normals)
        .map(|(&position, &normal)| MeshVertex { position, normal })
        .collect()
}

const QUAD_CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

/// Expands every point into a quad of edge length `size`, two triangles each.
pub fn point_quads(points: &PointCloud, size: f32) -> (Vec<PointVertex>, Vec<u32>) {
    let half = size / 2.0;
    let mut vertices = Vec::with_capacity(points.len() * 4);
    let mut indices = Vec::with_capacity(points.len() * 6);
    for &center in &points.positions {
        let base = vertices.len() as u32;
        vertices.extend(QUAD_CORNERS.iter().map(|c| PointVertex {
            center,
            corner: [c[0] * half, c[1] * half],
        }));
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices)
}

pub trait DrawMesh {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &GpuMesh,
        instances: std::ops::Range<u32>,
        camera_bind_group: &wgpu::BindGroup,
        light_bind_group: &wgpu::BindGroup,
    );
}

impl DrawMesh for wgpu::RenderPass<'_> {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &GpuMesh,
        instances: std::ops::Range<u32>,
        camera_bind_group: &wgpu::BindGroup,
        light_bind_group: &wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(0, camera_bind_group, &[]);
        self.set_bind_group(1, light_bind_group, &[]);
        self.draw_indexed(0..mesh.num_elements, 0, instances);
    }
}
