use crate::core::{Material, ProcessedScene, SceneMesh};
use glam::Vec3;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Vertex {
    pub(crate) pos: [f32; 3],
    pub(crate) normal: [f32; 3],
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

pub(crate) fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct DrawUniforms {
    pub(crate) color: [f32; 4],
}

impl DrawUniforms {
    pub(crate) fn from_material(m: &Material) -> Self {
        let [r, g, b, _] = m.base_color;
        Self {
            color: [r, g, b, m.draw_alpha()],
        }
    }
}

/// GPU copy of one scene mesh. Geometry is uploaded once; the color uniform
/// is rewritten every frame from the mesh's material.
pub(crate) struct GpuMesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
    pub(crate) center: Vec3,
}

fn upload_mesh(
    device: &wgpu::Device,
    draw_bgl: &wgpu::BindGroupLayout,
    mesh: &SceneMesh,
) -> Option<GpuMesh> {
    let g = &mesh.geometry;
    if g.indices.is_empty() {
        return None;
    }
    let vertices: Vec<Vertex> = g
        .positions
        .iter()
        .enumerate()
        .map(|(i, p)| Vertex {
            pos: p.to_array(),
            normal: g.normals.get(i).copied().unwrap_or(Vec3::Y).to_array(),
        })
        .collect();
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("mesh_vertices"),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("mesh_indices"),
        contents: bytemuck::cast_slice(&g.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("mesh_draw_uniforms"),
        contents: bytemuck::bytes_of(&DrawUniforms::from_material(&mesh.material)),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("mesh_draw_bg"),
        layout: draw_bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });
    Some(GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: g.indices.len() as u32,
        uniform_buffer,
        bind_group,
        center: g.bounds.center(),
    })
}

/// Uploads every mesh of `scene`, keeping mesh order. Meshes without
/// triangles get `None`.
pub(crate) fn upload_scene(
    device: &wgpu::Device,
    draw_bgl: &wgpu::BindGroupLayout,
    scene: &ProcessedScene,
) -> Vec<Option<GpuMesh>> {
    scene
        .meshes
        .iter()
        .map(|m| upload_mesh(device, draw_bgl, m))
        .collect()
}
