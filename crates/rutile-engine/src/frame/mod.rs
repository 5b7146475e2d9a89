//! Per-frame orchestration of the offscreen viewport.
//!
//! One iteration, strictly in this order:
//! 1. sample the pointer against last frame's viewport placement
//! 2. advance the camera (only if the viewport was hovered last frame)
//! 3. render the scene into the target at its current size (timed)
//! 4. compose the UI, which reports the size it wants next
//! 5. propagate to secondary platform windows
//! 6. resize the target if the reported size changed
//! 7. swap
//!
//! Rendering therefore always uses the size recorded at the end of the previous
//! iteration, and the UI's pointer placement lags one frame behind.

mod hooks;
mod frame_loop;
mod tracker;

pub use frame_loop::{FrameLoop, FrameReport};
pub use hooks::{CameraController, Composed, FrameStats, Overlay, SceneRenderer, Swap};
pub use tracker::{PanelReport, PointerSample, ViewportTracker};
