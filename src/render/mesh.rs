use super::helpers;
use crate::constants::{DRAW_UNIFORM_STRIDE, INITIAL_DRAW_SLOTS};
use crate::core::MeshDescriptor;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Vertex {
    pub(crate) position: [f32; 3],
    pub(crate) normal: [f32; 3],
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

impl Vertex {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct GlobalUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) eye: [f32; 4],
    pub(crate) ambient: [f32; 4],
    pub(crate) sun: [f32; 4],
    pub(crate) area_pos: [f32; 4],
    pub(crate) area_dir: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct DrawUniforms {
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) color: [f32; 4],
}

pub(crate) struct MeshResources {
    pub(crate) opaque_pipeline: wgpu::RenderPipeline,
    pub(crate) foam_pipeline: wgpu::RenderPipeline,
    pub(crate) globals_buffer: wgpu::Buffer,
    pub(crate) globals_bg: wgpu::BindGroup,
    pub(crate) draw_bgl: wgpu::BindGroupLayout,
    pub(crate) draw_buffer: wgpu::Buffer,
    pub(crate) draw_bg: wgpu::BindGroup,
    pub(crate) draw_slots: usize,
}

impl MeshResources {
    /// Reallocate the per-draw buffer with room for `slots` draws.
    pub(crate) fn resize_draw_slots(&mut self, device: &wgpu::Device, slots: usize) {
        let (buffer, bg) = create_draw_binding(device, &self.draw_bgl, slots);
        self.draw_buffer = buffer;
        self.draw_bg = bg;
        self.draw_slots = slots;
    }
}

fn create_draw_binding(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    slots: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let draw_size = std::mem::size_of::<DrawUniforms>() as u64;
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("mesh_draws"),
        size: DRAW_UNIFORM_STRIDE * slots.max(1) as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("mesh_draw_bg"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(draw_size),
            }),
        }],
    });
    (buffer, bg)
}

pub(crate) fn create_mesh_resources(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
) -> MeshResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("mesh_shader"),
        source: wgpu::ShaderSource::Wgsl(crate::core::MESH_WGSL.into()),
    });
    let globals_size = std::mem::size_of::<GlobalUniforms>() as u64;
    let draw_size = std::mem::size_of::<DrawUniforms>() as u64;
    let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("mesh_globals_bgl"),
        entries: &[helpers::uniform_layout_entry(0, false, globals_size)],
    });
    let draw_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("mesh_draw_bgl"),
        entries: &[helpers::uniform_layout_entry(0, true, draw_size)],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("mesh_pl"),
        bind_group_layouts: &[&globals_bgl, &draw_bgl],
        push_constant_ranges: &[],
    });
    let opaque_pipeline = helpers::make_mesh_pipeline(
        device,
        &pl,
        &shader,
        Vertex::layout(),
        "fs_opaque",
        color_format,
        Some(wgpu::BlendState::REPLACE),
        true,
    );
    // foam is sorted after the body and never occludes other foam
    let foam_pipeline = helpers::make_mesh_pipeline(
        device,
        &pl,
        &shader,
        Vertex::layout(),
        "fs_foam",
        color_format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        false,
    );
    let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("mesh_globals"),
        size: globals_size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("mesh_globals_bg"),
        layout: &globals_bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: globals_buffer.as_entire_binding(),
        }],
    });
    let (draw_buffer, draw_bg) = create_draw_binding(device, &draw_bgl, INITIAL_DRAW_SLOTS);
    MeshResources {
        opaque_pipeline,
        foam_pipeline,
        globals_buffer,
        globals_bg,
        draw_bgl,
        draw_buffer,
        draw_bg,
        draw_slots: INITIAL_DRAW_SLOTS,
    }
}

/// Geometry uploaded once per mesh and shared by the body and every foam
/// layer.
pub(crate) struct GpuMesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

pub(crate) fn upload_mesh(device: &wgpu::Device, mesh: &MeshDescriptor) -> GpuMesh {
    let vertices: Vec<Vertex> = mesh
        .positions
        .iter()
        .zip(mesh.normals.iter())
        .map(|(p, n)| Vertex {
            position: p.to_array(),
            normal: n.to_array(),
        })
        .collect();
    let indices: Vec<u32> = if mesh.indices.is_empty() {
        (0..(mesh.vertex_count() / 3 * 3) as u32).collect()
    } else {
        mesh.indices.to_vec()
    };
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&mesh.name),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&mesh.name),
        contents: bytemuck::cast_slice(&indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: indices.len() as u32,
    }
}
