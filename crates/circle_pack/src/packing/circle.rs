//! Accepted circles.
use glam::Vec2;

/// A placed circle in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    /// Position in acceptance order, `0..k` without gaps.
    pub index: usize,
    /// Center in pixel space.
    pub center: Vec2,
    /// Radius in pixels.
    pub radius: f32,
}

impl Circle {
    pub fn new(index: usize, center: Vec2, radius: f32) -> Self {
        Self {
            index,
            center,
            radius,
        }
    }

    /// Whether a circle of `radius` at `center` keeps at least `offset` of gap to this one.
    #[inline]
    pub fn clears(&self, center: Vec2, radius: f32, offset: f32) -> bool {
        (center - self.center).length() >= self.radius + radius + offset
    }

    /// Same circle with center and radius multiplied by `factor`, e.g. pixels to millimetres.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            index: self.index,
            center: self.center * factor,
            radius: self.radius * factor,
        }
    }
}
