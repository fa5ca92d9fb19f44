use crate::constants::{
    AMBIENT_INTENSITY, CLEAR_COLOR, FILL_LIGHT_INTENSITY, FILL_LIGHT_POS, KEY_LIGHT_INTENSITY,
    KEY_LIGHT_POS, OVERLAY_MIN_VISIBLE_OPACITY,
};
use crate::core::{Camera, ProcessedScene};
use glam::Vec3;
use web_sys as web;

mod helpers;
mod meshes;
use helpers::MeshPipelineKind;
use meshes::{DrawUniforms, GpuMesh};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Globals {
    view_proj: [[f32; 4]; 4],
    light0: [f32; 4],
    light1: [f32; 4],
    ambient: [f32; 4],
}

/// Scene slots in draw order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneSlot {
    Ground = 0,
    Building = 1,
}

const SLOT_COUNT: usize = 2;

#[derive(Clone, Copy, PartialEq, Eq)]
enum PipelineId {
    Opaque,
    OpaqueDoubleSided,
    Transparent,
}

struct DrawItem {
    slot: usize,
    mesh: usize,
    pipeline: PipelineId,
    depth: f32,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    _depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,

    globals_buffer: wgpu::Buffer,
    globals_bg: wgpu::BindGroup,
    draw_bgl: wgpu::BindGroupLayout,

    opaque_pipeline: wgpu::RenderPipeline,
    double_sided_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,

    slots: [Vec<Option<GpuMesh>>; SLOT_COUNT],

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
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
                    // WebGL2 fallback needs the downlevel limits
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
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
        // Transparent canvas: let the page background show through.
        let alpha_mode = caps
            .alpha_modes
            .iter()
            .copied()
            .find(|m| *m == wgpu::CompositeAlphaMode::PreMultiplied)
            .or_else(|| caps.alpha_modes.first().copied())
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

        let (depth_tex, depth_view) = helpers::create_depth_texture(&device, width, height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::SCENE_WGSL.into()),
        });
        let uniform_entry = |visibility| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[uniform_entry(
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let draw_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bgl"),
            entries: &[uniform_entry(wgpu::ShaderStages::FRAGMENT)],
        });
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&globals_bgl, &draw_bgl],
            push_constant_ranges: &[],
        });

        let pipeline = |kind| {
            helpers::make_mesh_pipeline(
                &device,
                &layout,
                &shader,
                meshes::vertex_layout(),
                format,
                kind,
            )
        };
        let opaque_pipeline = pipeline(MeshPipelineKind {
            label: "opaque_pipeline",
            blend: None,
            depth_write: true,
            cull_mode: Some(wgpu::Face::Back),
        });
        let double_sided_pipeline = pipeline(MeshPipelineKind {
            label: "double_sided_pipeline",
            blend: None,
            depth_write: true,
            cull_mode: None,
        });
        let transparent_pipeline = pipeline(MeshPipelineKind {
            label: "transparent_pipeline",
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            depth_write: false,
            cull_mode: None,
        });

        log::info!("[gpu] surface {:?} {}x{}", format, width, height);
        let [r, g, b, a] = CLEAR_COLOR;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            _depth_tex: depth_tex,
            depth_view,
            globals_buffer,
            globals_bg,
            draw_bgl,
            opaque_pipeline,
            double_sided_pipeline,
            transparent_pipeline,
            slots: Default::default(),
            width,
            height,
            clear_color: wgpu::Color { r, g, b, a },
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
            let (tex, view) = helpers::create_depth_texture(&self.device, width, height);
            self._depth_tex = tex;
            self.depth_view = view;
        }
    }

    /// Replaces the GPU copy of one scene slot.
    pub fn upload(&mut self, slot: SceneSlot, scene: Option<&ProcessedScene>) {
        self.slots[slot as usize] = match scene {
            Some(s) => meshes::upload_scene(&self.device, &self.draw_bgl, s),
            None => Vec::new(),
        };
    }

    fn pipeline(&self, id: PipelineId) -> &wgpu::RenderPipeline {
        match id {
            PipelineId::Opaque => &self.opaque_pipeline,
            PipelineId::OpaqueDoubleSided => &self.double_sided_pipeline,
            PipelineId::Transparent => &self.transparent_pipeline,
        }
    }

    /// Writes per-mesh colors and returns the draw list: opaque meshes first,
    /// then visible transparent meshes back to front.
    fn prepare_draws(
        &self,
        eye: Vec3,
        scenes: [Option<&ProcessedScene>; SLOT_COUNT],
    ) -> Vec<DrawItem> {
        let mut opaque = Vec::new();
        let mut transparent = Vec::new();
        for (slot, scene) in scenes.iter().enumerate() {
            let Some(scene) = scene else {
                continue;
            };
            for (i, gpu) in self.slots[slot].iter().enumerate() {
                let (Some(gpu), Some(mesh)) = (gpu, scene.meshes.get(i)) else {
                    continue;
                };
                let m = &mesh.material;
                if m.transparent && m.opacity < OVERLAY_MIN_VISIBLE_OPACITY {
                    continue;
                }
                self.queue.write_buffer(
                    &gpu.uniform_buffer,
                    0,
                    bytemuck::bytes_of(&DrawUniforms::from_material(m)),
                );
                let item = DrawItem {
                    slot,
                    mesh: i,
                    pipeline: match (m.transparent, m.double_sided) {
                        (true, _) => PipelineId::Transparent,
                        (false, true) => PipelineId::OpaqueDoubleSided,
                        (false, false) => PipelineId::Opaque,
                    },
                    depth: gpu.center.distance_squared(eye),
                };
                if m.transparent {
                    transparent.push(item);
                } else {
                    opaque.push(item);
                }
            }
        }
        transparent.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        opaque.extend(transparent);
        opaque
    }

    pub fn render(
        &mut self,
        camera: &Camera,
        scenes: [Option<&ProcessedScene>; SLOT_COUNT],
    ) -> Result<(), wgpu::SurfaceError> {
        let key = Vec3::from(KEY_LIGHT_POS).normalize_or_zero();
        let fill = Vec3::from(FILL_LIGHT_POS).normalize_or_zero();
        let globals = Globals {
            view_proj: camera.view_proj().to_cols_array_2d(),
            light0: key.extend(KEY_LIGHT_INTENSITY).to_array(),
            light1: fill.extend(FILL_LIGHT_INTENSITY).to_array(),
            ambient: [AMBIENT_INTENSITY, 0.0, 0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        let draws = self.prepare_draws(camera.eye, scenes);

        let frame = self.surface.get_current_texture()?;
        let view = frame
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
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.globals_bg, &[]);
            let mut bound: Option<PipelineId> = None;
            for d in &draws {
                let Some(gpu) = self.slots[d.slot].get(d.mesh).and_then(Option::as_ref) else {
                    continue;
                };
                if bound != Some(d.pipeline) {
                    rpass.set_pipeline(self.pipeline(d.pipeline));
                    bound = Some(d.pipeline);
                }
                rpass.set_bind_group(1, &gpu.bind_group, &[]);
                rpass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                rpass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..gpu.index_count, 0, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
