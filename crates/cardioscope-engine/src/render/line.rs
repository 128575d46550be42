use crate::plot::{GeometryBuffer, LineVertex};
use crate::render::{RenderCtx, RenderTarget};

/// GPU residency for one CPU geometry buffer.
///
/// The vertex buffer grows in power-of-two steps and is rewritten in place via
/// `queue.write_buffer` when the contents fit; the draw range always comes
/// from the last uploaded vertex count, so a shrinking geometry never draws
/// stale tail vertices.
pub struct GpuGeometry {
    label: &'static str,
    vbo: Option<wgpu::Buffer>,
    capacity: usize,
    len: u32,
}

impl GpuGeometry {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            vbo: None,
            capacity: 0,
            len: 0,
        }
    }

    /// Uploads `geometry` to the GPU, reallocating only when it outgrows the
    /// current buffer.
    pub fn upload(&mut self, ctx: &RenderCtx<'_>, geometry: &GeometryBuffer) {
        let required = geometry.len();
        if required > self.capacity || self.vbo.is_none() {
            let new_cap = required.next_power_of_two().max(64);
            let new_size = (new_cap * std::mem::size_of::<LineVertex>()) as u64;
            self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: new_size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = new_cap;
        }

        if let Some(vbo) = self.vbo.as_ref() {
            if !geometry.is_empty() {
                ctx.queue.write_buffer(vbo, 0, geometry.as_bytes());
            }
        }
        self.len = required as u32;
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Line-list renderer shared by the grids and the waveform trace.
///
/// One pipeline, one render pass, one draw per geometry buffer, issued in the
/// order given (grids first, trace last, so the trace paints on top).
#[derive(Default)]
pub struct LineRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
}

impl LineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one pass drawing each non-empty buffer over the already
    /// cleared target.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        buffers: &[&GpuGeometry],
    ) {
        self.ensure_pipeline(ctx);
        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("cardioscope line pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        for geometry in buffers {
            let Some(vbo) = geometry.vbo.as_ref() else { continue };
            if geometry.is_empty() {
                continue;
            }
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.draw(0..geometry.len(), 0..1);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader_src = include_str!("shaders/line.wgsl");
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cardioscope line shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("cardioscope line pipeline layout"),
                    bind_group_layouts: &[],
                    // Newer wgpu uses immediate constants; keep disabled.
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cardioscope line pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[LineVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }
}
