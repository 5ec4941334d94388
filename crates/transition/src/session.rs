use crate::bridge::{push_uniforms, UniformSink};
use crate::gallery::GalleryStore;
use crate::input::{ScrollDelta, ScrollInput};
use crate::state::{BlendFrame, TransitionParams, TransitionState};

/// Source of per-frame callbacks, e.g. a window's redraw loop.
///
/// An implementation must call [`GallerySession::tick`] at most once per
/// frame and before the frame's draw is encoded.
pub trait FrameDriver {
    /// Asks for another frame callback.
    fn request_frame(&mut self);
}

/// Gallery, transition state and input adapter for one running gallery.
#[derive(Debug, Clone)]
pub struct GallerySession<T> {
    gallery: GalleryStore<T>,
    state: TransitionState,
    input: ScrollInput,
    frames: u64,
}

impl<T> GallerySession<T> {
    pub fn new(gallery: GalleryStore<T>, params: TransitionParams) -> Self {
        let state = TransitionState::new(gallery.len(), params);
        tracing::debug!(
            slides = gallery.len(),
            friction = params.friction,
            pull = params.pull,
            wrap = %params.wrap,
            "gallery session ready"
        );
        Self {
            gallery,
            state,
            input: ScrollInput::new(params.sensitivity),
            frames: 0,
        }
    }

    /// Advances the transition exactly once and pushes the result to `sink`.
    pub fn tick<S>(&mut self, sink: &mut S) -> BlendFrame
    where
        S: UniformSink<T> + ?Sized,
    {
        let frame = self.state.advance();
        push_uniforms(&frame, &self.gallery, sink);
        self.frames += 1;
        frame
    }

    pub fn on_scroll(&mut self, delta: ScrollDelta) {
        self.input.on_wheel(&mut self.state, delta);
    }

    /// Scroll with an already normalised `deltaY`.
    pub fn on_scroll_y(&mut self, delta_y: f64) {
        self.input.on_scroll(&mut self.state, delta_y);
    }

    /// Viewport changes are the renderer's business; motion is untouched.
    pub fn on_resize(&mut self) {
        tracing::trace!(
            position = self.state.position(),
            "resize observed by gallery session"
        );
    }

    /// Discards motion after the rendering context was rebuilt.
    pub fn reset(&mut self) {
        self.state.reset();
        self.frames = 0;
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn gallery(&self) -> &GalleryStore<T> {
        &self.gallery
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_gallery(self) -> GalleryStore<T> {
        self.gallery
    }
}
