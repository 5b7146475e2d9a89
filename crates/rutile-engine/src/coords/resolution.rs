use std::fmt;

/// Integer pixel size with both axes strictly positive.
///
/// Construction never yields a zero axis, which is what lets the projection divide
/// by `height` without a guard.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// Returns `None` if either axis is zero.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    /// Builds a resolution, raising zero axes to one pixel.
    #[inline]
    pub const fn clamped(width: u32, height: u32) -> Self {
        Self {
            width: if width == 0 { 1 } else { width },
            height: if height == 0 { 1 } else { height },
        }
    }

    /// Converts a floating-point extent (e.g. a UI content region) to pixels.
    ///
    /// Non-finite and negative values become one pixel.
    pub fn from_extent(width: f32, height: f32) -> Self {
        fn axis(v: f32) -> u32 {
            if v.is_finite() && v >= 1.0 {
                v.round().min(u32::MAX as f32) as u32
            } else {
                1
            }
        }
        Self::clamped(axis(width), axis(height))
    }

    #[inline]
    pub const fn width(self) -> u32 {
        self.width
    }

    #[inline]
    pub const fn height(self) -> u32 {
        self.height
    }

    /// `width / height`.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_axes() {
        assert!(Resolution::new(0, 10).is_none());
        assert!(Resolution::new(10, 0).is_none());
        assert_eq!(Resolution::new(800, 600).map(|r| r.width()), Some(800));
    }

    #[test]
    fn clamped_raises_zero_to_one() {
        let r = Resolution::clamped(0, 0);
        assert_eq!((r.width(), r.height()), (1, 1));
    }

    #[test]
    fn from_extent_rounds_and_guards() {
        assert_eq!(Resolution::from_extent(639.6, 480.2), Resolution::clamped(640, 480));
        assert_eq!(Resolution::from_extent(-3.0, f32::NAN), Resolution::clamped(1, 1));
    }

    #[test]
    fn aspect_ratio_is_width_over_height() {
        assert_eq!(Resolution::clamped(800, 600).aspect_ratio(), 800.0 / 600.0);
    }

    #[test]
    fn displays_as_w_by_h() {
        assert_eq!(Resolution::clamped(640, 480).to_string(), "640x480");
    }
}
