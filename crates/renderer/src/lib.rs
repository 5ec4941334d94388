//! Renderer crate for the scrollfade gallery.
//!
//! The crate glues the `winit` window, the `wgpu` pipeline and the GLSL
//! wrapping together around a `transition::GallerySession`. The flow is:
//!
//! ```text
//!   scrollfade CLI
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop
//!                         │   MouseWheel ──▶ session.on_scroll()
//!                         │   RedrawRequested ──▶ session.tick(&mut GpuState) ──▶ draw
//!                         └─▶ Resized ──▶ surface + uScale only
//! ```
//!
//! `GpuState` owns surface, device, pipeline, uniforms and the slide
//! textures, and implements `UniformSink<usize>` so the session writes the
//! blend progress and texture pair straight into it.

mod compile;
mod gpu;
mod input;
mod types;
mod window;

use anyhow::Result;

pub use types::{Antialiasing, ColorSpaceMode, RendererConfig, DEFAULT_ACCELERATION};

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Opens the gallery window and blocks until it is closed.
    ///
    /// Fails when the gallery is empty, when no window or GPU adapter is
    /// available, or when the built-in pipeline cannot be created.
    pub fn run(&mut self) -> Result<()> {
        if self.config.images.is_empty() {
            anyhow::bail!("no gallery images to display");
        }
        tracing::info!(
            slides = self.config.images.len(),
            wrap = %self.config.transition.wrap,
            "opening gallery window"
        );
        window::run(self.config.clone())
    }
}
