use glam::Vec2;

use super::Resolution;

/// Where the viewport panel sat in the window the last time the UI laid it out.
///
/// `offset` is the panel's top-left corner in window coordinates (logical px);
/// `size` is the resolution the displayed image had.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportPlacement {
    pub offset: Vec2,
    pub size: Resolution,
}

impl ViewportPlacement {
    #[inline]
    pub const fn new(offset: Vec2, size: Resolution) -> Self {
        Self { offset, size }
    }

    /// Re-expresses a window-space pointer position in viewport-local space.
    ///
    /// `x` is measured from the panel's left edge. `y` is flipped against the panel
    /// height: `size.height - (offset.y - raw.y)`.
    pub fn to_local(&self, raw: Vec2) -> Vec2 {
        Vec2::new(
            raw.x - self.offset.x,
            self.size.height() as f32 - (self.offset.y - raw.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaps_window_pointer_into_panel_space() {
        let placement = ViewportPlacement::new(Vec2::new(100.0, 50.0), Resolution::clamped(640, 480));
        let local = placement.to_local(Vec2::new(500.0, 300.0));
        assert_eq!(local, Vec2::new(400.0, 480.0 - (50.0 - 300.0)));
        assert_eq!(local, Vec2::new(400.0, 730.0));
    }

    #[test]
    fn origin_offset_leaves_x_untouched() {
        let placement = ViewportPlacement::new(Vec2::ZERO, Resolution::clamped(10, 10));
        assert_eq!(placement.to_local(Vec2::new(3.0, 4.0)), Vec2::new(3.0, 14.0));
    }
}
