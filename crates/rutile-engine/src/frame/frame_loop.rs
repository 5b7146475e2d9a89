use anyhow::Result;

use crate::coords::Resolution;
use crate::input::{InputFrame, InputState};
use crate::render::{Attachments, RenderTarget};
use crate::scene::{Camera, Transform};
use crate::time::{timed, FrameTiming, TimeScope};

use super::{CameraController, FrameStats, Overlay, SceneRenderer, Swap, ViewportTracker};

/// Outcome of one [`FrameLoop::run_frame`] call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FrameReport {
    pub index: u64,
    /// Target size the scene was rendered at.
    pub rendered_at: Resolution,
    /// New target size, if the target was reallocated at the end of the frame.
    pub resized_to: Option<Resolution>,
}

/// Owns the viewport state that persists across frames.
pub struct FrameLoop<A: Attachments> {
    target: RenderTarget<A>,
    camera: Camera,
    transform: Transform,
    timing: FrameTiming,
    viewport: ViewportTracker,
}

impl<A: Attachments> FrameLoop<A> {
    pub fn new(target: RenderTarget<A>) -> Self {
        let viewport = ViewportTracker::new(target.size());
        Self {
            target,
            camera: Camera::default(),
            transform: Transform::default(),
            timing: FrameTiming::new(),
            viewport,
        }
    }

    pub fn target(&self) -> &RenderTarget<A> {
        &self.target
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn timing(&self) -> &FrameTiming {
        &self.timing
    }

    pub fn viewport(&self) -> &ViewportTracker {
        &self.viewport
    }

    /// Runs one iteration. See the module docs for the step order.
    ///
    /// Input must already be polled into `input` / `input_frame`. The frame
    /// timer starts after polling, at the motion step.
    pub fn run_frame<S, O, C>(
        &mut self,
        device: &A::Device,
        input: &InputState,
        input_frame: &InputFrame,
        scene: &mut S,
        overlay: &mut O,
        controller: &mut C,
    ) -> Result<FrameReport>
    where
        S: SceneRenderer<A> + ?Sized,
        O: Overlay<A> + ?Sized,
        C: CameraController + ?Sized,
    {
        let index = self.timing.begin_frame();
        let stats = FrameStats {
            index,
            last_frame: self.timing.last_frame(),
            last_render: self.timing.last_render(),
            target: self.target.size(),
        };
        let dt = self.timing.motion_dt();

        let Self {
            target,
            camera,
            transform,
            timing,
            viewport,
        } = self;

        let _frame_scope = TimeScope::new(&mut timing.frame);

        // Motion.
        let pointer = viewport.sample(input.pointer_pos);
        if pointer.hovered {
            controller.update(camera, dt, &pointer, input, input_frame);
        } else {
            controller.on_unhovered();
        }

        // Render at the size recorded last frame.
        let rendered_at = target.size();
        debug_assert_eq!(rendered_at, viewport.last_size());
        timed(&mut timing.render, || {
            let model = transform.calculate_matrix();
            let mvp = camera.view_projection(target.size()) * model;
            scene.render(target, mvp)
        })?;

        // UI.
        let composed = overlay.compose(target, viewport.last_size(), &stats)?;
        overlay.render_platform_windows();

        // Deferred resize, strictly after the UI has been drawn.
        let resized_to = viewport.commit(composed.report);
        if let Some(size) = resized_to {
            target.resize(device, size)?;
        }

        if let Some(present) = composed.present {
            present.swap();
        }

        Ok(FrameReport {
            index,
            rendered_at,
            resized_to,
        })
    }
}
