use std::sync::Arc;

use winit::window::Window;

use crate::{
    foundation::error::{FlashbangError, FlashbangResult},
    render::surface::Surface,
};

/// Texture format the composited frame is uploaded in: the [`Surface`] byte order, unconverted.
pub(crate) const FRAME_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

const BLIT_SHADER: &str = r#"
struct VsOut {
  @builtin(position) pos: vec4<f32>,
};

@vertex
fn vs(@builtin(vertex_index) vi: u32) -> VsOut {
  var p = array<vec2<f32>, 3>(
    vec2<f32>(-1.0, -1.0),
    vec2<f32>( 3.0, -1.0),
    vec2<f32>(-1.0,  3.0),
  );
  var o: VsOut;
  o.pos = vec4<f32>(p[vi], 0.0, 1.0);
  return o;
}

@group(0) @binding(0) var t_frame: texture_2d<f32>;
@group(0) @binding(1) var<uniform> params: vec4<f32>;

@fragment
fn fs(in: VsOut) -> @location(0) vec4<f32> {
  let c = textureLoad(t_frame, vec2<i32>(in.pos.xy), 0);
  if (params.x > 0.5 && c.a > 0.0) {
    return vec4<f32>(c.rgb / c.a, c.a);
  }
  return c;
}
"#;

/// Pick how the window system composites our alpha.
///
/// Frames are premultiplied, so `PreMultiplied` passes them through as-is. `PostMultiplied`
/// needs the blit to divide alpha back out. `Inherit` leaves it to the platform (X11 ARGB
/// visuals treat it as premultiplied). `Opaque` loses transparency entirely.
pub(crate) fn select_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
) -> wgpu::CompositeAlphaMode {
    use wgpu::CompositeAlphaMode as M;
    [M::PreMultiplied, M::PostMultiplied, M::Inherit]
        .into_iter()
        .find(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(M::Auto)
}

/// `true` when the blit has to convert premultiplied texels to straight alpha.
pub(crate) fn blit_unpremultiplies(mode: wgpu::CompositeAlphaMode) -> bool {
    mode == wgpu::CompositeAlphaMode::PostMultiplied
}

/// Pick a swapchain format; 8-bit unorm first so frame bytes reach the screen unchanged.
pub(crate) fn select_surface_format(
    formats: &[wgpu::TextureFormat],
) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| {
            matches!(
                f,
                wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Rgba8Unorm
            )
        })
        .or_else(|| formats.first().copied())
}

/// Copy layout for uploading `frame` into a [`FRAME_TEXTURE_FORMAT`] texture of the same size.
///
/// Rows are tightly packed; `queue.write_texture` has no row alignment requirement.
pub(crate) fn frame_upload_layout(
    frame: &Surface,
) -> (wgpu::TexelCopyBufferLayout, wgpu::Extent3d) {
    (
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(frame.width() * 4),
            rows_per_image: Some(frame.height()),
        },
        wgpu::Extent3d {
            width: frame.width(),
            height: frame.height(),
            depth_or_array_layers: 1,
        },
    )
}

struct FrameTexture {
    width: u32,
    height: u32,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Presents composited frames through a `wgpu` swapchain with alpha compositing enabled.
pub(crate) struct Presenter {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    view_format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    params: wgpu::Buffer,
    frame: Option<FrameTexture>,
    window: Arc<Window>,
}

impl Presenter {
    pub(crate) fn new(window: Arc<Window>) -> FlashbangResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| FlashbangError::window(format!("failed to create wgpu surface: {e}")))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|e| match e {
            wgpu::RequestAdapterError::NotFound { .. } => {
                FlashbangError::window("no gpu adapter can present to this window")
            }
            other => FlashbangError::window(format!("wgpu request_adapter failed: {other:?}")),
        })?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("flashbang_device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                .using_resolution(adapter.limits()),
            experimental_features: wgpu::ExperimentalFeatures::default(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| FlashbangError::window(format!("wgpu request_device failed: {e:?}")))?;

        let caps = surface.get_capabilities(&adapter);
        let format = select_surface_format(&caps.formats)
            .ok_or_else(|| FlashbangError::window("window surface reports no formats"))?;
        let view_format = format.remove_srgb_suffix();
        let alpha_mode = select_alpha_mode(&caps.alpha_modes);
        if matches!(
            alpha_mode,
            wgpu::CompositeAlphaMode::Opaque | wgpu::CompositeAlphaMode::Auto
        ) {
            tracing::warn!(
                ?alpha_mode,
                "window surface cannot composite alpha; transparent areas will show black"
            );
        }
        tracing::debug!(
            adapter = %adapter.get_info().name,
            ?format,
            ?alpha_mode,
            "presenter ready"
        );

        let size = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: if view_format == format {
                vec![]
            } else {
                vec![view_format]
            },
        };
        surface.configure(&device, &config);

        let params = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("flashbang_blit_params"),
            size: 16,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let flag = if blit_unpremultiplies(alpha_mode) {
            1.0f32
        } else {
            0.0
        };
        let mut bytes = [0u8; 16];
        bytes[0..4].copy_from_slice(&flag.to_le_bytes());
        queue.write_buffer(&params, 0, &bytes);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("flashbang_blit_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(16),
                    },
                    count: None,
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("flashbang_blit_shader"),
            source: wgpu::ShaderSource::Wgsl(BLIT_SHADER.into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("flashbang_blit_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("flashbang_blit_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: view_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            view_format,
            pipeline,
            bind_group_layout,
            params,
            frame: None,
            window,
        })
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }

    /// Upload `frame` and present it. The frame must match the window's inner size.
    pub(crate) fn present(&mut self, frame: &Surface) -> FlashbangResult<()> {
        if frame.is_empty() {
            return Ok(());
        }
        if (self.config.width, self.config.height) != (frame.width(), frame.height()) {
            self.config.width = frame.width();
            self.config.height = frame.height();
            self.surface.configure(&self.device, &self.config);
        }

        self.ensure_frame_texture(frame.width(), frame.height());
        let Some(target) = self.frame.as_ref() else {
            return Ok(());
        };
        let (layout, extent) = frame_upload_layout(frame);
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            frame.data(),
            layout,
            extent,
        );

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::debug!("surface acquire timed out, dropping frame");
                return Ok(());
            }
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => {
                return Err(FlashbangError::window(format!(
                    "failed to acquire surface texture: {e}"
                )));
            }
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.view_format),
            ..Default::default()
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("flashbang_blit_encoder"),
            });
        {
            let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("flashbang_blit_rp"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rp.set_pipeline(&self.pipeline);
            rp.set_bind_group(0, &target.bind_group, &[]);
            rp.draw(0..3, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));

        self.window.pre_present_notify();
        output.present();
        Ok(())
    }

    fn ensure_frame_texture(&mut self, width: u32, height: u32) {
        if self
            .frame
            .as_ref()
            .is_some_and(|f| (f.width, f.height) == (width, height))
        {
            return;
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("flashbang_frame"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FRAME_TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("flashbang_blit_bg"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: self.params.as_entire_binding(),
                },
            ],
        });
        self.frame = Some(FrameTexture {
            width,
            height,
            texture,
            bind_group,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/present.rs"]
mod tests;
