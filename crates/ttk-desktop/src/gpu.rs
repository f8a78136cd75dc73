//! `wgpu`-backed draw surface: Phase 3/4 of the shared paint pipeline
//! (`ttk_render::paint`) become two batched draw calls here instead of the
//! terminal backend's escape sequences — one solid-colour quad pipeline for
//! background rectangles, one textured quad pipeline sampling a glyph atlas
//! rasterized by [`crate::font::FontContext`].
//!
//! Grounded on the wgpu vertex/pipeline layout shape of the pack's
//! GPU-backed terminal renderer (a `bytemuck::Pod` vertex struct per draw
//! kind, one pipeline per kind, a screen-size uniform converting pixel
//! coordinates to clip space), simplified from that renderer's colour-glyph
//! / image / cursor-shader pipelines down to the two kinds this toolkit's
//! paint pipeline actually emits.

use std::collections::HashMap;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use winit::window::Window;

use ttk_grid::Rgb;

use crate::font::FontContext;

const ATLAS_SIZE: u32 = 1024;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ScreenUniform {
    size: [f32; 2],
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct BgVertex {
    position: [f32; 2],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct GlyphVertex {
    position: [f32; 2],
    uv: [f32; 2],
    color: [f32; 4],
}

fn rgb_to_f32(rgb: Rgb, alpha: f32) -> [f32; 4] {
    [f32::from(rgb.0) / 255.0, f32::from(rgb.1) / 255.0, f32::from(rgb.2) / 255.0, alpha]
}

struct AtlasSlot {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    width: u32,
    height: u32,
    left: i32,
    top: i32,
}

/// Row ("shelf") packer for cached glyph bitmaps. Never evicts: a 1024x1024
/// R8 atlas comfortably holds every glyph a 24x80-and-up terminal-shaped
/// window will request in one session.
struct GlyphAtlas {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    slots: HashMap<char, Option<AtlasSlot>>,
}

impl GlyphAtlas {
    fn new(device: &wgpu::Device) -> GlyphAtlas {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ttk-desktop glyph atlas"),
            size: wgpu::Extent3d { width: ATLAS_SIZE, height: ATLAS_SIZE, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        GlyphAtlas { texture, view, cursor_x: 0, cursor_y: 0, row_height: 0, slots: HashMap::new() }
    }

    /// Returns the cached slot for `ch`, rasterizing and uploading it on
    /// first use. `None` means the font has no glyph for `ch` (blank cells
    /// never reach here — `ttk_render::paint` skips them before calling
    /// `draw_glyph`).
    fn slot_for(&mut self, queue: &wgpu::Queue, font: &mut FontContext, ch: char) -> Option<&AtlasSlot> {
        if !self.slots.contains_key(&ch) {
            let slot = self.rasterize_and_upload(queue, font, ch);
            self.slots.insert(ch, slot);
        }
        self.slots.get(&ch).and_then(|s| s.as_ref())
    }

    fn rasterize_and_upload(&mut self, queue: &wgpu::Queue, font: &mut FontContext, ch: char) -> Option<AtlasSlot> {
        let bitmap = font.glyph_bitmap(ch)?;
        if self.cursor_x + bitmap.width > ATLAS_SIZE {
            self.cursor_x = 0;
            self.cursor_y += self.row_height;
            self.row_height = 0;
        }
        if self.cursor_y + bitmap.height > ATLAS_SIZE {
            tracing::warn!(target: "ttk::desktop", %ch, "glyph atlas exhausted, dropping glyph");
            return None;
        }
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x: self.cursor_x, y: self.cursor_y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            &bitmap.data,
            wgpu::TexelCopyBufferLayout { offset: 0, bytes_per_row: Some(bitmap.width), rows_per_image: Some(bitmap.height) },
            wgpu::Extent3d { width: bitmap.width, height: bitmap.height, depth_or_array_layers: 1 },
        );
        let uv_min = [self.cursor_x as f32 / ATLAS_SIZE as f32, self.cursor_y as f32 / ATLAS_SIZE as f32];
        let uv_max = [
            (self.cursor_x + bitmap.width) as f32 / ATLAS_SIZE as f32,
            (self.cursor_y + bitmap.height) as f32 / ATLAS_SIZE as f32,
        ];
        let slot = AtlasSlot { uv_min, uv_max, width: bitmap.width, height: bitmap.height, left: bitmap.left, top: bitmap.top };
        self.cursor_x += bitmap.width;
        self.row_height = self.row_height.max(bitmap.height);
        Some(slot)
    }
}

/// Owns the `wgpu` device/surface and the two draw pipelines. Created once
/// per window; `resize`/`set_screen_size` re-derive the screen uniform,
/// never the pipelines.
pub(crate) struct GpuSurface {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    screen_buffer: wgpu::Buffer,
    screen_bind_group: wgpu::BindGroup,
    bg_pipeline: wgpu::RenderPipeline,
    glyph_pipeline: wgpu::RenderPipeline,
    atlas: GlyphAtlas,
    atlas_bind_group: wgpu::BindGroup,
    bg_batch: Vec<BgVertex>,
    glyph_batch: Vec<GlyphVertex>,
    clear_color: wgpu::Color,
}

impl GpuSurface {
    pub(crate) fn new(window: Arc<Window>) -> anyhow::Result<GpuSurface> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))?;
        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps.formats.iter().copied().find(|f| f.is_srgb()).unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: caps.present_modes.first().copied().unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: Vec::new(),
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let screen_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ttk-desktop screen uniform"),
            size: std::mem::size_of::<ScreenUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let screen_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ttk-desktop screen bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer { ty: wgpu::BufferBindingType::Uniform, has_dynamic_offset: false, min_binding_size: None },
                count: None,
            }],
        });
        let screen_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ttk-desktop screen bind group"),
            layout: &screen_bgl,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: screen_buffer.as_entire_binding() }],
        });

        let atlas = GlyphAtlas::new(&device);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ttk-desktop glyph atlas sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let atlas_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ttk-desktop atlas bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let atlas_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ttk-desktop atlas bind group"),
            layout: &atlas_bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&atlas.view) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(&sampler) },
            ],
        });

        let bg_pipeline = build_bg_pipeline(&device, format, &screen_bgl);
        let glyph_pipeline = build_glyph_pipeline(&device, format, &screen_bgl, &atlas_bgl);

        Ok(GpuSurface {
            surface,
            device,
            queue,
            config,
            screen_buffer,
            screen_bind_group,
            bg_pipeline,
            glyph_pipeline,
            atlas,
            atlas_bind_group,
            bg_batch: Vec::new(),
            glyph_batch: Vec::new(),
            clear_color: wgpu::Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 },
        })
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    pub(crate) fn screen_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Phase 3: appends one batched background rectangle, in pixel space.
    pub(crate) fn push_bg_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        let c = rgb_to_f32(color, 1.0);
        let (x0, y0, x1, y1) = (x, y, x + w, y + h);
        self.bg_batch.extend_from_slice(&[
            BgVertex { position: [x0, y0], color: c },
            BgVertex { position: [x1, y0], color: c },
            BgVertex { position: [x0, y1], color: c },
            BgVertex { position: [x1, y0], color: c },
            BgVertex { position: [x1, y1], color: c },
            BgVertex { position: [x0, y1], color: c },
        ]);
    }

    /// Phase 4: rasterizes (if needed) and appends one glyph quad at its
    /// cell's top-left pixel position.
    pub(crate) fn push_glyph(&mut self, font: &mut FontContext, cell_x: f32, cell_y: f32, ch: char, fg: Rgb) {
        let Some(slot) = self.atlas.slot_for(&self.queue, font, ch) else { return };
        let c = rgb_to_f32(fg, 1.0);
        let x0 = cell_x + slot.left as f32;
        let y0 = cell_y - slot.top as f32;
        let x1 = x0 + slot.width as f32;
        let y1 = y0 + slot.height as f32;
        let (u0, v0) = (slot.uv_min[0], slot.uv_min[1]);
        let (u1, v1) = (slot.uv_max[0], slot.uv_max[1]);
        self.glyph_batch.extend_from_slice(&[
            GlyphVertex { position: [x0, y0], uv: [u0, v0], color: c },
            GlyphVertex { position: [x1, y0], uv: [u1, v0], color: c },
            GlyphVertex { position: [x0, y1], uv: [u0, v1], color: c },
            GlyphVertex { position: [x1, y0], uv: [u1, v0], color: c },
            GlyphVertex { position: [x1, y1], uv: [u1, v1], color: c },
            GlyphVertex { position: [x0, y1], uv: [u0, v1], color: c },
        ]);
    }

    /// Issues the accumulated Phase 3/4 draw calls against one frame, then
    /// clears the batches. A no-op (no frame acquired, nothing presented)
    /// when both batches are empty, mirroring `paint`'s own early return on
    /// a clean grid.
    pub(crate) fn present(&mut self) {
        if self.bg_batch.is_empty() && self.glyph_batch.is_empty() {
            return;
        }
        let Ok(frame) = self.surface.get_current_texture() else {
            self.bg_batch.clear();
            self.glyph_batch.clear();
            return;
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let screen = ScreenUniform { size: [self.config.width as f32, self.config.height as f32], _pad: [0.0, 0.0] };
        self.queue.write_buffer(&self.screen_buffer, 0, bytemuck::bytes_of(&screen));

        let bg_buffer = self.upload(&self.bg_batch, wgpu::BufferUsages::VERTEX);
        let glyph_buffer = self.upload(&self.glyph_batch, wgpu::BufferUsages::VERTEX);

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("ttk-desktop frame encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ttk-desktop frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations { load: wgpu::LoadOp::Clear(self.clear_color), store: wgpu::StoreOp::Store },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(buffer) = &bg_buffer {
                pass.set_pipeline(&self.bg_pipeline);
                pass.set_bind_group(0, &self.screen_bind_group, &[]);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..self.bg_batch.len() as u32, 0..1);
            }
            if let Some(buffer) = &glyph_buffer {
                pass.set_pipeline(&self.glyph_pipeline);
                pass.set_bind_group(0, &self.screen_bind_group, &[]);
                pass.set_bind_group(1, &self.atlas_bind_group, &[]);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..self.glyph_batch.len() as u32, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();

        self.bg_batch.clear();
        self.glyph_batch.clear();
    }

    fn upload<T: Pod>(&self, data: &[T], usage: wgpu::BufferUsages) -> Option<wgpu::Buffer> {
        if data.is_empty() {
            return None;
        }
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ttk-desktop vertex upload"),
            size: (std::mem::size_of::<T>() * data.len()) as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.queue.write_buffer(&buffer, 0, bytemuck::cast_slice(data));
        Some(buffer)
    }
}

fn build_bg_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat, screen_bgl: &wgpu::BindGroupLayout) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("ttk-desktop bg shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/bg.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("ttk-desktop bg pipeline layout"),
        bind_group_layouts: &[screen_bgl],
        push_constant_ranges: &[],
    });
    let vertex_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<BgVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x2, offset: 0, shader_location: 0 },
            wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 8, shader_location: 1 },
        ],
    };
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("ttk-desktop bg pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState { module: &shader, entry_point: Some("vs_main"), buffers: &[vertex_layout], compilation_options: Default::default() },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState { format, blend: Some(wgpu::BlendState::ALPHA_BLENDING), write_mask: wgpu::ColorWrites::ALL })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn build_glyph_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    screen_bgl: &wgpu::BindGroupLayout,
    atlas_bgl: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("ttk-desktop glyph shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/glyph.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("ttk-desktop glyph pipeline layout"),
        bind_group_layouts: &[screen_bgl, atlas_bgl],
        push_constant_ranges: &[],
    });
    let vertex_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<GlyphVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x2, offset: 0, shader_location: 0 },
            wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x2, offset: 8, shader_location: 1 },
            wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 16, shader_location: 2 },
        ],
    };
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("ttk-desktop glyph pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState { module: &shader, entry_point: Some("vs_main"), buffers: &[vertex_layout], compilation_options: Default::default() },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState { format, blend: Some(wgpu::BlendState::ALPHA_BLENDING), write_mask: wgpu::ColorWrites::ALL })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
