use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use transition::{BlendFrame, FrameDriver, GallerySession, GalleryStore, ScrollDelta, UniformSink};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowBuilder};

use crate::gpu::GpuState;
use crate::input::{CursorTracker, DoubleClickDetector};
use crate::types::RendererConfig;

/// Redraw requests on the window are the frame clock for the session.
struct RedrawDriver {
    window: Arc<Window>,
}

impl FrameDriver for RedrawDriver {
    fn request_frame(&mut self) {
        self.window.request_redraw();
    }
}

/// A surface the session draws into, one acquired frame at a time.
pub(crate) trait FrameTarget: UniformSink<usize> {
    type Frame;

    fn acquire(&mut self) -> Result<Self::Frame, wgpu::SurfaceError>;

    /// Uploads the uniforms the session just wrote, draws and presents.
    fn present(&mut self, frame: Self::Frame);
}

/// Advances the session only once a frame is available to draw it into.
fn draw_frame<G: FrameTarget>(
    session: &mut GallerySession<usize>,
    target: &mut G,
) -> Result<BlendFrame, wgpu::SurfaceError> {
    let frame = target.acquire()?;
    let blend = session.tick(target);
    target.present(frame);
    Ok(blend)
}

/// Window, GPU resources and the transition session for one gallery.
///
/// `gpu` is declared before `window` so the surface is dropped first.
struct WindowState {
    gpu: Option<GpuState>,
    session: GallerySession<usize>,
    window: Arc<Window>,
    cursor: CursorTracker,
    clicks: DoubleClickDetector,
}

impl WindowState {
    fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let gpu = GpuState::new(window.as_ref(), window.inner_size(), config)?;
        Ok(Self {
            gpu: Some(gpu),
            session: new_session(config)?,
            window,
            cursor: CursorTracker::default(),
            clicks: DoubleClickDetector::default(),
        })
    }

    fn size(&self) -> PhysicalSize<u32> {
        self.gpu
            .as_ref()
            .map(GpuState::size)
            .unwrap_or_else(|| self.window.inner_size())
    }

    fn needs_reload(&self) -> bool {
        self.gpu.as_ref().map_or(true, GpuState::is_device_lost)
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(new_size);
        }
        self.session.on_resize();
    }

    fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(());
        };
        let frame = draw_frame(&mut self.session, gpu)?;
        tracing::trace!(
            progress = frame.progress,
            current = frame.current_slide,
            next = frame.next_slide,
            "frame"
        );
        Ok(())
    }

    /// Rebuilds every GPU resource after the device went away and starts
    /// the gallery over from the first slide.
    fn reload(&mut self, config: &RendererConfig) -> Result<()> {
        tracing::warn!("rebuilding GPU state after device loss");
        self.gpu = None;
        self.gpu = Some(GpuState::new(
            self.window.as_ref(),
            self.window.inner_size(),
            config,
        )?);
        self.session.reset();
        Ok(())
    }

    fn toggle_fullscreen(&self) {
        let next = match self.window.fullscreen() {
            Some(_) => None,
            None => Some(Fullscreen::Borderless(None)),
        };
        tracing::debug!(fullscreen = next.is_some(), "toggling fullscreen");
        self.window.set_fullscreen(next);
    }
}

fn new_session(config: &RendererConfig) -> Result<GallerySession<usize>> {
    let slides: Vec<usize> = (0..config.images.len()).collect();
    let gallery = GalleryStore::new(slides).context("gallery has no slides")?;
    Ok(GallerySession::new(gallery, config.transition))
}

fn scroll_delta(delta: MouseScrollDelta) -> ScrollDelta {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => ScrollDelta::Lines(f64::from(y)),
        MouseScrollDelta::PixelDelta(position) => ScrollDelta::Pixels(position.y),
    }
}

/// Opens the gallery window and drives the `winit` event loop until the
/// window closes.
pub(crate) fn run(config: RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let mut builder = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(window_size);
    if config.fullscreen {
        builder = builder.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    let window = Arc::new(
        builder
            .build(&event_loop)
            .context("failed to create gallery window")?,
    );

    let mut state = WindowState::new(window.clone(), &config)?;
    let mut driver = RedrawDriver { window };
    driver.request_frame();

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);

            match event {
                Event::WindowEvent { window_id, event } if window_id == state.window.id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            elwt.exit();
                        }
                        WindowEvent::MouseWheel { delta, .. } => {
                            state.session.on_scroll(scroll_delta(delta));
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            state.cursor.moved(position);
                        }
                        WindowEvent::MouseInput {
                            state: ElementState::Pressed,
                            button: MouseButton::Left,
                            ..
                        } => {
                            if state.clicks.press(Instant::now(), state.cursor.position()) {
                                state.toggle_fullscreen();
                            }
                        }
                        WindowEvent::Resized(new_size) => {
                            state.resize(new_size);
                        }
                        WindowEvent::RedrawRequested => {
                            if state.needs_reload() {
                                if let Err(err) = state.reload(&config) {
                                    tracing::error!(error = %format!("{err:#}"), "failed to recover from device loss");
                                    elwt.exit();
                                }
                                return;
                            }
                            match state.render_frame() {
                                Ok(()) => {}
                                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                    let size = state.size();
                                    state.resize(size);
                                }
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    tracing::error!("surface out of memory; exiting");
                                    elwt.exit();
                                }
                                Err(wgpu::SurfaceError::Timeout) => {
                                    tracing::warn!("surface timeout; retrying next frame");
                                }
                                Err(other) => {
                                    tracing::warn!(error = ?other, "surface error; retrying next frame");
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    driver.request_frame();
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("event loop error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[derive(Default)]
    struct FakeSurface {
        fail_with: Option<wgpu::SurfaceError>,
        presented: Vec<f32>,
        progress: f32,
    }

    impl UniformSink<usize> for FakeSurface {
        fn set_progress(&mut self, progress: f32) {
            self.progress = progress;
        }

        fn set_textures(&mut self, _first: &usize, _second: &usize) {}
    }

    impl FrameTarget for FakeSurface {
        type Frame = ();

        fn acquire(&mut self) -> Result<(), wgpu::SurfaceError> {
            match self.fail_with.take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        fn present(&mut self, _frame: ()) {
            self.presented.push(self.progress);
        }
    }

    fn session() -> GallerySession<usize> {
        let gallery = GalleryStore::new(vec![0, 1, 2]).unwrap();
        let mut session = GallerySession::new(gallery, transition::TransitionParams::default());
        session.on_scroll_y(1000.0);
        session
    }

    #[test]
    fn unavailable_surface_does_not_advance_the_session() {
        let mut session = session();
        for err in [
            wgpu::SurfaceError::Timeout,
            wgpu::SurfaceError::Outdated,
            wgpu::SurfaceError::Lost,
        ] {
            let mut surface = FakeSurface {
                fail_with: Some(err),
                ..FakeSurface::default()
            };
            assert!(draw_frame(&mut session, &mut surface).is_err());
            assert!(surface.presented.is_empty());
        }
        assert_eq!(session.frames(), 0);
        assert_eq!(session.state().position(), 0.0);
        assert!((session.state().speed() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn acquired_frame_presents_the_advanced_progress() {
        let mut session = session();
        let mut surface = FakeSurface::default();
        let blend = draw_frame(&mut session, &mut surface).unwrap();

        assert_eq!(session.frames(), 1);
        assert_eq!(surface.presented, vec![blend.progress]);
        assert!((f64::from(blend.progress) - 0.20265).abs() < 1e-6);
    }

    #[test]
    fn wheel_lines_map_to_line_deltas() {
        assert_eq!(
            scroll_delta(MouseScrollDelta::LineDelta(0.0, -2.0)),
            ScrollDelta::Lines(-2.0)
        );
    }

    #[test]
    fn touchpad_pixels_map_to_pixel_deltas() {
        assert_eq!(
            scroll_delta(MouseScrollDelta::PixelDelta(PhysicalPosition::new(3.0, 12.5))),
            ScrollDelta::Pixels(12.5)
        );
    }
}
