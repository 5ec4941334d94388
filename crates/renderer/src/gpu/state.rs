use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use transition::UniformSink;
use winit::dpi::PhysicalSize;

use crate::compile::BUILTIN_FRAGMENT;
use crate::types::RendererConfig;
use crate::window::FrameTarget;

use super::context::GpuContext;
use super::pipeline::{texture_entries, GalleryPipeline};
use super::textures::{load_gallery, GalleryTexture};
use super::uniforms::GalleryUniforms;

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Every GPU resource needed to present a gallery frame.
///
/// Slides are addressed by their index into `textures`; the transition
/// engine hands those indices back through [`UniformSink`].
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: GalleryPipeline,
    textures: Vec<GalleryTexture>,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: GalleryUniforms,
    pair_bind_groups: HashMap<(usize, usize), wgpu::BindGroup>,
    active_pair: (usize, usize),
    multisample_target: Option<MultisampleTarget>,
    start_time: Instant,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        config: &RendererConfig,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        if config.images.is_empty() {
            anyhow::bail!("gallery has no images to display");
        }

        let context = GpuContext::new(
            target,
            initial_size,
            config.antialiasing,
            config.color_space,
        )?;

        let pipeline = build_pipeline(&context, config.shader.as_ref())?;
        let textures = load_gallery(
            &context.device,
            &context.queue,
            &config.images,
            context.color_space,
        );

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform buffer"),
            size: std::mem::size_of::<GalleryUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("uniform bind group"),
                layout: &pipeline.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let uniforms = GalleryUniforms::new(context.size, config.acceleration);
        context
            .queue
            .write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let multisample_target = (context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                &context.device,
                context.surface_format,
                context.size,
                context.sample_count,
            )
        });

        tracing::info!(
            slides = textures.len(),
            width = context.size.width,
            height = context.size.height,
            samples = context.sample_count,
            "gallery renderer initialised"
        );

        let mut state = Self {
            context,
            pipeline,
            textures,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
            pair_bind_groups: HashMap::new(),
            active_pair: (0, 0),
            multisample_target,
            start_time: Instant::now(),
        };
        let second = 1 % state.textures.len();
        state.select_pair(0, second);
        Ok(state)
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn is_device_lost(&self) -> bool {
        self.context.is_device_lost()
    }

    /// Reconfigures the swapchain and viewport uniforms.
    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.context.resize(new_size);
        self.uniforms.set_viewport(new_size);
        self.multisample_target = (self.context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                &self.context.device,
                self.context.surface_format,
                self.context.size,
                self.context.sample_count,
            )
        });
    }

    fn select_pair(&mut self, first: usize, second: usize) {
        let count = self.textures.len();
        let key = (first % count, second % count);
        self.active_pair = key;
        if self.pair_bind_groups.contains_key(&key) {
            return;
        }

        let (a, b) = (&self.textures[key.0], &self.textures[key.1]);
        let bind_group = self
            .context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("gallery pair bind group"),
                layout: &self.pipeline.texture_layout,
                entries: &texture_entries([(&a.view, &a.sampler), (&b.view, &b.sampler)]),
            });
        tracing::trace!(first = key.0, second = key.1, "created texture pair bind group");
        self.pair_bind_groups.insert(key, bind_group);
    }
}

impl FrameTarget for GpuState {
    type Frame = wgpu::SurfaceTexture;

    fn acquire(&mut self) -> Result<Self::Frame, wgpu::SurfaceError> {
        self.context.surface.get_current_texture()
    }

    fn present(&mut self, frame: Self::Frame) {
        self.uniforms
            .set_time(self.start_time.elapsed().as_secs_f32());
        self.context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniforms),
        );

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });

        let (attachment_view, resolve_target) = match self.multisample_target.as_ref() {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            if let Some(textures) = self.pair_bind_groups.get(&self.active_pair) {
                render_pass.set_bind_group(1, textures, &[]);
                render_pass.draw(0..3, 0..1);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

impl UniformSink<usize> for GpuState {
    fn set_progress(&mut self, progress: f32) {
        self.uniforms.set_progress(progress);
    }

    fn set_textures(&mut self, first: &usize, second: &usize) {
        self.select_pair(*first, *second);
    }
}

/// Compiles the configured shader, falling back to the built-in cross-fade
/// when the user shader cannot be read or compiled.
fn build_pipeline(context: &GpuContext, shader: Option<&PathBuf>) -> Result<GalleryPipeline> {
    if let Some(path) = shader {
        let attempt = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read shader at {}", path.display()))
            .and_then(|source| {
                GalleryPipeline::new(
                    &context.device,
                    context.surface_format,
                    context.sample_count,
                    &source,
                )
            });
        match attempt {
            Ok(pipeline) => {
                tracing::info!(shader = %path.display(), "using custom gallery shader");
                return Ok(pipeline);
            }
            Err(err) => {
                tracing::warn!(
                    shader = %path.display(),
                    error = %format!("{err:#}"),
                    "custom shader unusable; falling back to built-in cross-fade"
                );
            }
        }
    }

    GalleryPipeline::new(
        &context.device,
        context.surface_format,
        context.sample_count,
        BUILTIN_FRAGMENT,
    )
    .context("failed to build built-in gallery pipeline")
}
