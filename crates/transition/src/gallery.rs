#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GalleryError {
    #[error("gallery must contain at least one slide")]
    Empty,
}

/// Ordered, fixed-size sequence of texture handles.
///
/// Indices wrap in both directions, so `get(len)` is the first slide and
/// `get(-1)` the last. The store is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryStore<T> {
    slides: Vec<T>,
}

impl<T> GalleryStore<T> {
    pub fn new(slides: Vec<T>) -> Result<Self, GalleryError> {
        if slides.is_empty() {
            return Err(GalleryError::Empty);
        }
        if slides.len() == 1 {
            tracing::warn!("gallery has a single slide; transitions will be visually inert");
        }
        Ok(Self { slides })
    }

    pub fn get(&self, index: isize) -> &T {
        &self.slides[self.wrap(index)]
    }

    /// Maps any signed index onto `0..len`.
    pub fn wrap(&self, index: isize) -> usize {
        index.rem_euclid(self.slides.len() as isize) as usize
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always `false`; construction rejects empty galleries.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.slides.iter()
    }

    pub fn into_inner(self) -> Vec<T> {
        self.slides
    }
}

impl<'a, T> IntoIterator for &'a GalleryStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.iter()
    }
}
