use std::path::PathBuf;

use transition::TransitionParams;

/// Output color handling for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpaceMode {
    /// Photos are gamma-encoded; present them untouched on a non-sRGB surface.
    #[default]
    Auto,
    /// Treat shader outputs/textures as gamma-encoded; use non-sRGB surfaces.
    Gamma,
    /// Treat shader outputs as linear and use sRGB swapchains/textures for conversion.
    Linear,
}

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    #[default]
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

/// Immutable configuration passed to the renderer at start-up.
#[derive(Clone, Debug)]
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Start in borderless fullscreen.
    pub fullscreen: bool,
    /// Gallery images in display order. Must not be empty.
    pub images: Vec<PathBuf>,
    /// Optional user fragment shader replacing the built-in cross-fade.
    pub shader: Option<PathBuf>,
    pub antialiasing: Antialiasing,
    pub color_space: ColorSpaceMode,
    /// Momentum and wrap tuning for the transition engine.
    pub transition: TransitionParams,
    /// Displacement strength and frequency fed to `uAcceleration`.
    pub acceleration: [f32; 2],
    pub title: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            fullscreen: false,
            images: Vec::new(),
            shader: None,
            antialiasing: Antialiasing::default(),
            color_space: ColorSpaceMode::default(),
            transition: TransitionParams::default(),
            acceleration: DEFAULT_ACCELERATION,
            title: "scrollfade".to_string(),
        }
    }
}

pub const DEFAULT_ACCELERATION: [f32; 2] = [0.5, 2.0];
