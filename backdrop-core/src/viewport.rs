/// Viewport geometry shared by the scene and the page chrome
use serde::{Deserialize, Serialize};

/// Size of the visible page area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height, falling back to 1 for a collapsed viewport
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// Backing-store size of the render surface in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    /// Scale a viewport by the device pixel ratio, capped at `max_pixel_ratio`
    pub fn for_viewport(viewport: Viewport, device_pixel_ratio: f32, max_pixel_ratio: f32) -> Self {
        let ratio = device_pixel_ratio.clamp(0.0, max_pixel_ratio);
        Self {
            width: (viewport.width * ratio).round().max(0.0) as u32,
            height: (viewport.height * ratio).round().max(0.0) as u32,
        }
    }
}

/// Element bounding box relative to the viewport, as reported by layout
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Rect {
    pub fn new(top: f32, bottom: f32, left: f32, right: f32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// A full-width band spanning `top..bottom`
    pub fn band(top: f32, bottom: f32, viewport: Viewport) -> Self {
        Self::new(top, bottom, 0.0, viewport.width)
    }

    /// Whether any part of the element is on screen vertically.
    ///
    /// The top edge is exclusive and the bottom edge inclusive.
    pub fn intersects_vertically(&self, viewport_height: f32) -> bool {
        self.top < viewport_height && self.bottom >= 0.0
    }

    /// Fraction of the element's area inside the viewport
    pub fn visible_ratio(&self, viewport: Viewport) -> f32 {
        let area = (self.bottom - self.top) * (self.right - self.left);
        if area <= 0.0 {
            return 0.0;
        }

        let visible_w = (self.right.min(viewport.width) - self.left.max(0.0)).max(0.0);
        let visible_h = (self.bottom.min(viewport.height) - self.top.max(0.0)).max(0.0);
        (visible_w * visible_h / area).clamp(0.0, 1.0)
    }
}
