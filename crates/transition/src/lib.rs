//! Transition engine for the scroll-driven gallery.
//!
//! The crate owns every piece of numeric state that decides what the
//! fragment shader blends on a given frame:
//! - `gallery` holds the immutable, wrap-around list of texture handles.
//! - `state` advances `position`/`speed` once per frame (friction, pull toward
//!   the nearest slide, snap, wrap) and derives the blended slide pair.
//! - `input` turns wheel deltas into speed impulses.
//! - `bridge` writes the derived values into whatever owns the shader uniforms.
//! - `session` ties the pieces together behind an explicit constructor so the
//!   renderer (or a headless simulation) can drive it frame by frame.
//!
//! Nothing here touches the GPU or a window; the renderer crate implements
//! [`UniformSink`] and acts as the [`FrameDriver`].

mod bridge;
mod gallery;
mod input;
mod session;
mod state;

pub use bridge::{push_uniforms, UniformSink};
pub use gallery::{GalleryError, GalleryStore};
pub use input::{ScrollDelta, ScrollInput, LINE_HEIGHT_PIXELS};
pub use session::{FrameDriver, GallerySession};
pub use state::{BlendFrame, TransitionParams, TransitionState, WrapMode};
