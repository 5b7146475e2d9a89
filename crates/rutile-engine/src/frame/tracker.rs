use glam::Vec2;

use crate::coords::{Resolution, ViewportPlacement};

/// What the UI reported about the viewport panel after laying it out.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PanelReport {
    /// Size the panel's content region wants the target to have.
    pub desired: Resolution,
    /// Top-left corner of the displayed image, in window coordinates.
    pub offset: Vec2,
    /// Whether the pointer is over the displayed image.
    pub hovered: bool,
}

/// Pointer position re-expressed for the camera controller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerSample {
    /// Viewport-local position (see [`ViewportPlacement::to_local`]). Zero if
    /// there is no pointer.
    pub local: Vec2,
    /// Viewport size the local position is relative to.
    pub viewport: Resolution,
    /// Last frame's hover flag, forced off when the pointer is outside the window.
    pub hovered: bool,
}

/// Remembers where the UI put the viewport last frame.
#[derive(Debug, Clone)]
pub struct ViewportTracker {
    placement: ViewportPlacement,
    hovered: bool,
}

impl ViewportTracker {
    /// Starts with the target's initial size, no offset and no hover.
    pub fn new(initial: Resolution) -> Self {
        Self {
            placement: ViewportPlacement::new(Vec2::ZERO, initial),
            hovered: false,
        }
    }

    pub fn placement(&self) -> ViewportPlacement {
        self.placement
    }

    /// Size recorded at the end of the last frame; the image is displayed at it.
    pub fn last_size(&self) -> Resolution {
        self.placement.size
    }

    /// Remaps a raw window-space pointer using last frame's placement.
    pub fn sample(&self, raw: Option<Vec2>) -> PointerSample {
        PointerSample {
            local: raw.map(|p| self.placement.to_local(p)).unwrap_or(Vec2::ZERO),
            viewport: self.placement.size,
            hovered: self.hovered && raw.is_some(),
        }
    }

    /// Records this frame's layout for the next one.
    ///
    /// Returns the new size if it differs from the recorded one, i.e. if the
    /// target must be resized.
    pub fn commit(&mut self, report: PanelReport) -> Option<Resolution> {
        let changed = report.desired != self.placement.size;
        self.placement = ViewportPlacement::new(report.offset, report.desired);
        self.hovered = report.hovered;
        changed.then_some(report.desired)
    }
}
