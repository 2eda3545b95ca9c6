//! Provides [`ScreenRect`] and conversion of screen positions into normalized device coordinates.

use bevy_math::{prelude::*, Rect};
use bevy_reflect::prelude::*;

/// The rectangle of the interactive surface, in logical pixels, with the origin in the top left
/// corner of the window.
#[derive(Debug, Default, Clone, Copy, PartialEq, Reflect)]
pub struct ScreenRect {
    /// Distance from the left edge of the window.
    pub left: f32,
    /// Distance from the top edge of the window.
    pub top: f32,
    /// Width of the surface.
    pub width: f32,
    /// Height of the surface.
    pub height: f32,
}

impl ScreenRect {
    /// Create a new screen rectangle. Negative dimensions are clamped to zero.
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// A rectangle covering a whole window of the given logical size.
    pub fn from_size(size: Vec2) -> Self {
        Self::new(0.0, 0.0, size.x, size.y)
    }

    /// Returns `true` if the rectangle has no area, and cannot be used to compute NDC.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Convert a screen position in logical pixels into normalized device coordinates.
    ///
    /// See [`to_ndc`].
    pub fn to_ndc(&self, screen_position: Vec2) -> Vec2 {
        to_ndc(screen_position, self)
    }
}

impl From<Rect> for ScreenRect {
    fn from(rect: Rect) -> Self {
        let size = rect.size();
        Self::new(rect.min.x, rect.min.y, size.x, size.y)
    }
}

/// Convert a screen position in logical pixels into normalized device coordinates, roughly in
/// `[-1, 1]` on both axes, with `+y` pointing up.
///
/// A rectangle with zero width or height yields non-finite output; check
/// [`ScreenRect::is_empty`] first.
pub fn to_ndc(screen_position: Vec2, rect: &ScreenRect) -> Vec2 {
    Vec2::new(
        (screen_position.x - rect.width * 0.5 - rect.left) / (rect.width * 0.5),
        (rect.height + 2.0 * (rect.top - screen_position.y)) / rect.height,
    )
}
