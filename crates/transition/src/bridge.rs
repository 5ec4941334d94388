use crate::gallery::GalleryStore;
use crate::state::BlendFrame;

/// Receiver for the per-frame shader inputs.
///
/// The renderer implements this over its uniform buffer and texture bind
/// groups; tests implement it with a recorder.
pub trait UniformSink<T> {
    fn set_progress(&mut self, progress: f32);
    fn set_textures(&mut self, first: &T, second: &T);
}

/// Writes one frame's progress and texture pair into `sink`.
pub fn push_uniforms<T, S>(frame: &BlendFrame, gallery: &GalleryStore<T>, sink: &mut S)
where
    S: UniformSink<T> + ?Sized,
{
    sink.set_progress(frame.progress);
    sink.set_textures(
        gallery.get(frame.current_slide as isize),
        gallery.get(frame.next_slide as isize),
    );
}
