/// Normalized pointer position used for parallax
use crate::viewport::Viewport;

/// Pointer offset from the viewport center, in viewport units.
///
/// Both axes are roughly `-0.5..=0.5` while the pointer is inside the
/// viewport. Only the latest position is kept.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl PointerState {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Normalize client coordinates against the viewport
    pub fn from_client(client_x: f32, client_y: f32, viewport: Viewport) -> Self {
        let normalize = |value: f32, extent: f32| {
            if extent > 0.0 {
                value / extent - 0.5
            } else {
                0.0
            }
        };
        Self {
            x: normalize(client_x, viewport.width),
            y: normalize(client_y, viewport.height),
        }
    }
}
