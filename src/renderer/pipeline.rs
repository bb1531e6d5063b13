//! WebGPU render pipeline setup

use wgpu::util::DeviceExt;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::Population;

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Canvas size in CSS pixels (simulation space)
    pub canvas_size: (f32, f32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        canvas_size: (f32, f32),
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("falling-shapes-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let caps = surface.get_capabilities(adapter);
        let format = pick_surface_format(&caps.formats);
        log::debug!("Surface format {:?} of {:?}", format, caps.formats);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let pipeline = shape_pipeline(&device, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            size: (width, height),
            canvas_size,
        })
    }

    /// Reconfigure after the canvas changed size
    pub fn resize(&mut self, new_width: u32, new_height: u32, canvas_size: (f32, f32)) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
        self.canvas_size = canvas_size;
    }

    /// Convert canvas coordinates to normalized device coordinates.
    /// Canvas origin is top-left with y down; NDC is -1 to 1 with y up.
    pub fn canvas_to_ndc(&self, x: f32, y: f32) -> (f32, f32) {
        canvas_to_ndc(self.canvas_size, x, y)
    }

    /// Tessellate, upload and draw every shape. The viewport clips to canvas bounds.
    pub fn render(&mut self, population: &Population) -> Result<(), wgpu::SurfaceError> {
        let ndc_vertices: Vec<Vertex> = shapes::population(population)
            .iter()
            .map(|v| {
                let (x, y) = self.canvas_to_ndc(v.position[0], v.position[1]);
                Vertex::new(x, y, v.color)
            })
            .collect();

        let vertex_buffer = (!ndc_vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("shape_vertices"),
                    contents: bytemuck::cast_slice(&ndc_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shape_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(buffer) = &vertex_buffer {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..ndc_vertices.len() as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Shape colors are authored as sRGB bytes, so prefer a linear target that shows them unconverted
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> wgpu::TextureFormat {
    formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first().copied())
        .unwrap_or(wgpu::TextureFormat::Bgra8Unorm)
}

/// Flat-colored triangle list, alpha blended, no culling
fn shape_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("shape_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("shape_pipeline_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("shape_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Map a canvas point into NDC for a canvas of `(width, height)` pixels
pub fn canvas_to_ndc(canvas_size: (f32, f32), x: f32, y: f32) -> (f32, f32) {
    let (w, h) = canvas_size;
    (x / w * 2.0 - 1.0, 1.0 - y / h * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_to_ndc_corners() {
        let size = (800.0, 600.0);
        assert_eq!(canvas_to_ndc(size, 0.0, 0.0), (-1.0, 1.0));
        assert_eq!(canvas_to_ndc(size, 800.0, 600.0), (1.0, -1.0));
        assert_eq!(canvas_to_ndc(size, 400.0, 300.0), (0.0, 0.0));
    }

    #[test]
    fn test_pick_surface_format_prefers_linear() {
        use wgpu::TextureFormat::*;
        assert_eq!(pick_surface_format(&[Bgra8UnormSrgb, Rgba8Unorm]), Rgba8Unorm);
        assert_eq!(pick_surface_format(&[Rgba8UnormSrgb]), Rgba8UnormSrgb);
        assert_eq!(pick_surface_format(&[]), Bgra8Unorm);
    }
}
