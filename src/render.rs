use crate::constants::{CLEAR_COLOR, DRAW_UNIFORM_STRIDE};
use crate::core::{grow_draw_capacity, DrawPass, MeshId, ModelAsset, SceneFrame, SceneRenderer};
use fnv::FnvHashMap;
use web_sys as web;

mod helpers;
mod mesh;

use mesh::{create_mesh_resources, upload_mesh, DrawUniforms, GlobalUniforms, GpuMesh, MeshResources};

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    mesh: MeshResources,
    depth_view: wgpu::TextureView,
    // uploaded lazily the first frame each mesh is drawn
    gpu_meshes: FnvHashMap<MeshId, GpuMesh>,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
    // draw slots the device allows in one buffer
    max_draw_slots: usize,
    truncation_warned: bool,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let (_, depth_view) = helpers::create_depth_texture(&device, width, height);
        let mesh = create_mesh_resources(&device, format);
        let max_draw_slots = (device.limits().max_buffer_size / DRAW_UNIFORM_STRIDE) as usize;
        log::info!("[viewer] WebGPU ready {}x{} format={:?}", width, height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            mesh,
            depth_view,
            gpu_meshes: FnvHashMap::default(),
            width,
            height,
            clear_color: wgpu::Color {
                r: CLEAR_COLOR[0],
                g: CLEAR_COLOR[1],
                b: CLEAR_COLOR[2],
                a: 1.0,
            },
            max_draw_slots,
            truncation_warned: false,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            let (_, depth_view) = helpers::create_depth_texture(&self.device, width, height);
            self.depth_view = depth_view;
        }
    }

    fn ensure_uploaded(&mut self, model: &ModelAsset) {
        for m in model.meshes() {
            if !self.gpu_meshes.contains_key(&m.id) {
                let gpu = upload_mesh(&self.device, m);
                self.gpu_meshes.insert(m.id, gpu);
            }
        }
    }

    fn write_globals(&self, frame: &SceneFrame) {
        let lights = &frame.lights;
        let area_dir = (lights.area.target - lights.area.position).normalize_or_zero();
        let half_extent = 0.5 * lights.area.size[0].max(lights.area.size[1]);
        let g = GlobalUniforms {
            view_proj: frame.view_proj.to_cols_array_2d(),
            eye: frame.eye.extend(1.0).to_array(),
            ambient: [lights.ambient, lights.ambient, lights.ambient, 1.0],
            sun: lights
                .directional
                .direction()
                .extend(lights.directional.intensity)
                .to_array(),
            area_pos: lights.area.position.extend(lights.area.intensity).to_array(),
            area_dir: area_dir.extend(half_extent).to_array(),
        };
        self.queue
            .write_buffer(&self.mesh.globals_buffer, 0, bytemuck::bytes_of(&g));
    }
}

impl SceneRenderer for GpuState {
    type Error = wgpu::SurfaceError;

    fn render(&mut self, frame: &SceneFrame, model: &ModelAsset) -> Result<(), Self::Error> {
        self.resize_if_needed(frame.viewport.width, frame.viewport.height);
        self.ensure_uploaded(model);
        self.write_globals(frame);

        let slots = grow_draw_capacity(self.mesh.draw_slots, frame.draws.len(), self.max_draw_slots);
        if slots != self.mesh.draw_slots {
            log::info!("[viewer] draw slots {} -> {}", self.mesh.draw_slots, slots);
            self.mesh.resize_draw_slots(&self.device, slots);
        }
        let draws = &frame.draws[..frame.draws.len().min(slots)];
        if draws.len() < frame.draws.len() {
            if !self.truncation_warned {
                log::warn!(
                    "[viewer] {} draws exceed the device buffer limit, {} dropped",
                    frame.draws.len(),
                    frame.draws.len() - draws.len()
                );
                self.truncation_warned = true;
            }
        } else {
            self.truncation_warned = false;
        }
        // one aligned slot per draw, written in a single upload
        let stride = DRAW_UNIFORM_STRIDE as usize;
        let mut staging = vec![0u8; draws.len() * stride];
        for (i, d) in draws.iter().enumerate() {
            let u = DrawUniforms {
                model: d.world.to_cols_array_2d(),
                color: d.color,
            };
            let bytes = bytemuck::bytes_of(&u);
            staging[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        if !staging.is_empty() {
            self.queue.write_buffer(&self.mesh.draw_buffer, 0, &staging);
        }

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                self.surface.configure(&self.device, &self.config);
                return Err(e);
            }
            Err(e) => return Err(e),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.mesh.globals_bg, &[]);
            let mut bound: Option<DrawPass> = None;
            for (i, d) in draws.iter().enumerate() {
                let Some(gpu) = self.gpu_meshes.get(&d.mesh) else {
                    continue;
                };
                if bound != Some(d.pass) {
                    let pipeline = match d.pass {
                        DrawPass::Opaque => &self.mesh.opaque_pipeline,
                        DrawPass::Foam => &self.mesh.foam_pipeline,
                    };
                    rpass.set_pipeline(pipeline);
                    bound = Some(d.pass);
                }
                let offset = (i * stride) as u32;
                rpass.set_bind_group(1, &self.mesh.draw_bg, &[offset]);
                rpass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                rpass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..gpu.index_count, 0, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}
