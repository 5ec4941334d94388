//! GPU side of the gallery.
//!
//! - `context` owns wgpu instance/device/surface wiring, picks the surface
//!   format and MSAA level, and rebuilds swapchain state on resize.
//! - `textures` decodes gallery images and uploads them, substituting a
//!   placeholder for anything unreadable.
//! - `pipeline` compiles the wrapped fragment shader into the single
//!   full-screen pipeline and describes its two bind group layouts.
//! - `uniforms` mirrors the std140 block declared in the GLSL prelude.
//! - `state` glues everything together and implements the transition
//!   engine's `UniformSink` so a session can drive it directly.

mod context;
mod pipeline;
mod state;
mod textures;
mod uniforms;

pub(crate) use state::GpuState;
