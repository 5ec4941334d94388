use bytemuck::{Pod, Zeroable};
use winit::dpi::PhysicalSize;

/// CPU mirror of the `GalleryParams` std140 block.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug)]
pub(crate) struct GalleryUniforms {
    pub u_resolution: [f32; 4],
    pub u_scale: [f32; 4],
    pub u_acceleration: [f32; 4],
    pub u_progress: f32,
    pub u_time: f32,
    pub _padding: [f32; 2],
}

unsafe impl Zeroable for GalleryUniforms {}
unsafe impl Pod for GalleryUniforms {}

impl GalleryUniforms {
    pub fn new(size: PhysicalSize<u32>, acceleration: [f32; 2]) -> Self {
        let mut uniforms = Self {
            u_resolution: [0.0; 4],
            u_scale: [1.0, 1.0, 0.0, 0.0],
            u_acceleration: [acceleration[0], acceleration[1], 0.0, 0.0],
            u_progress: 0.0,
            u_time: 0.0,
            _padding: [0.0; 2],
        };
        uniforms.set_viewport(size);
        uniforms
    }

    /// `uScale.y` tracks the height/width ratio of the viewport.
    pub fn set_viewport(&mut self, size: PhysicalSize<u32>) {
        let width = size.width.max(1) as f32;
        let height = size.height.max(1) as f32;
        self.u_resolution[0] = width;
        self.u_resolution[1] = height;
        self.u_scale[0] = 1.0;
        self.u_scale[1] = height / width;
    }

    pub fn set_progress(&mut self, progress: f32) {
        self.u_progress = progress;
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.u_time = seconds;
    }
}
