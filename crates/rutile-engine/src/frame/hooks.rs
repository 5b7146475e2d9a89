use std::time::Duration;

use anyhow::Result;
use glam::Mat4;

use crate::coords::Resolution;
use crate::device::PendingPresent;
use crate::input::{InputFrame, InputState};
use crate::render::{Attachments, RenderTarget};
use crate::scene::Camera;

use super::{PanelReport, PointerSample};

/// Draws the scene into the offscreen target.
pub trait SceneRenderer<A: Attachments> {
    /// Binds `target`, clears it, draws with `mvp` and unbinds.
    fn render(&mut self, target: &RenderTarget<A>, mvp: Mat4) -> Result<()>;
}

/// A finished frame waiting to be shown.
pub trait Swap {
    fn swap(self);
}

impl Swap for PendingPresent {
    fn swap(self) {
        self.present();
    }
}

/// Result of composing the UI for one frame.
pub struct Composed<P> {
    pub report: PanelReport,
    /// `None` when there was no surface to draw into this frame.
    pub present: Option<P>,
}

/// Read-only diagnostics handed to the overlay.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameStats {
    pub index: u64,
    pub last_frame: Duration,
    pub last_render: Duration,
    pub target: Resolution,
}

/// Immediate-mode UI that displays the target's color attachment.
pub trait Overlay<A: Attachments> {
    type Present: Swap;

    /// Lays out the UI, shows the target at `display` size and submits the draw
    /// data. Must query the available panel size before placing the image.
    fn compose(
        &mut self,
        target: &RenderTarget<A>,
        display: Resolution,
        stats: &FrameStats,
    ) -> Result<Composed<Self::Present>>;

    /// Pushes UI state to secondary platform windows, if the overlay has any.
    fn render_platform_windows(&mut self) {}
}

/// Input-to-motion policy for the camera.
///
/// `update` is only called while the viewport is hovered; must not keep the
/// pose changing on its own between calls.
pub trait CameraController {
    fn update(
        &mut self,
        camera: &mut Camera,
        dt: f32,
        pointer: &PointerSample,
        input: &InputState,
        frame: &InputFrame,
    );

    /// Called instead of `update` on frames where the viewport was not
    /// hovered. Drop any state tied to the pointer's last position here.
    fn on_unhovered(&mut self) {}
}
