use glam::{Vec2, Vec3};
use rutile_engine::frame::{CameraController, PointerSample};
use rutile_engine::input::{InputFrame, InputState, Key, MouseButton};
use rutile_engine::scene::Camera;

/// Fly camera: WASD moves in the view plane, E/Q move up/down, holding the right
/// button and dragging looks around, the wheel scales movement speed.
#[derive(Debug, Clone)]
pub struct FlyController {
    /// World units per second.
    pub speed: f32,
    /// Radians per viewport pixel of drag.
    pub look_sensitivity: f32,
    /// Speed multiplier while Shift is held.
    pub boost: f32,
    drag_anchor: Option<Vec2>,
}

impl FlyController {
    const MIN_SPEED: f32 = 0.05;
    const MAX_SPEED: f32 = 100.0;
    const WHEEL_STEP: f32 = 1.1;

    fn translation(&self, camera: &Camera, input: &InputState) -> Vec3 {
        let mut dir = Vec3::ZERO;
        let bindings = [
            (Key::W, camera.forward()),
            (Key::S, -camera.forward()),
            (Key::D, camera.right()),
            (Key::A, -camera.right()),
            (Key::E, camera.up()),
            (Key::Q, -camera.up()),
        ];
        for (key, axis) in bindings {
            if input.key_down(key) {
                dir += axis;
            }
        }
        dir.normalize_or_zero()
    }
}

impl Default for FlyController {
    fn default() -> Self {
        Self {
            speed: 1.5,
            look_sensitivity: 0.004,
            boost: 4.0,
            drag_anchor: None,
        }
    }
}

impl CameraController for FlyController {
    fn update(
        &mut self,
        camera: &mut Camera,
        dt: f32,
        pointer: &PointerSample,
        input: &InputState,
        frame: &InputFrame,
    ) {
        if frame.wheel_lines != 0.0 {
            self.speed = (self.speed * Self::WHEEL_STEP.powf(frame.wheel_lines))
                .clamp(Self::MIN_SPEED, Self::MAX_SPEED);
        }

        let dir = self.translation(camera, input);
        if dir != Vec3::ZERO {
            let boost = if input.modifiers.shift { self.boost } else { 1.0 };
            camera.position += dir * self.speed * boost * dt;
        }

        if !input.button_down(MouseButton::Right) {
            self.drag_anchor = None;
            return;
        }

        // A fresh press or a re-entry into the viewport re-anchors.
        let anchor = match self.drag_anchor {
            Some(a) if !frame.buttons_pressed.contains(&MouseButton::Right) => a,
            _ => pointer.local,
        };
        // Viewport-local y grows downward, like window y.
        let delta = pointer.local - anchor;
        camera.rotate(
            delta.x * self.look_sensitivity,
            -delta.y * self.look_sensitivity,
        );
        self.drag_anchor = Some(pointer.local);
    }

    fn on_unhovered(&mut self) {
        self.drag_anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rutile_engine::coords::Resolution;
    use rutile_engine::input::{InputEvent, KeyState, MouseButtonState, PointerButtonEvent};

    fn sample(x: f32, y: f32) -> PointerSample {
        PointerSample {
            local: Vec2::new(x, y),
            viewport: Resolution::new(640, 480).unwrap(),
            hovered: true,
        }
    }

    fn press(state: &mut InputState, frame: &mut InputFrame, key: Key) {
        state.apply_event(frame, InputEvent::Key { key, state: KeyState::Pressed });
    }

    fn right_button(state: &mut InputState, frame: &mut InputFrame, st: MouseButtonState) {
        state.apply_event(
            frame,
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Right,
                state: st,
                x: 0.0,
                y: 0.0,
            }),
        );
    }

    // ── translation ──────────────────────────────────────────────────────

    #[test]
    fn w_moves_along_forward() {
        let mut ctl = FlyController::default();
        let mut cam = Camera::default();
        let mut input = InputState::default();
        let mut frame = InputFrame::default();
        press(&mut input, &mut frame, Key::W);

        ctl.update(&mut cam, 0.5, &sample(0.0, 0.0), &input, &frame);

        let expected = Camera::default().position + Camera::default().forward() * 0.75;
        assert!((cam.position - expected).length() < 1e-5);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut ctl = FlyController::default();
        let mut cam = Camera::default();
        let mut input = InputState::default();
        let mut frame = InputFrame::default();
        press(&mut input, &mut frame, Key::A);
        press(&mut input, &mut frame, Key::D);

        ctl.update(&mut cam, 1.0, &sample(0.0, 0.0), &input, &frame);
        assert_eq!(cam, Camera::default());
    }

    #[test]
    fn wheel_scales_speed_within_bounds() {
        let mut ctl = FlyController::default();
        let mut cam = Camera::default();
        let input = InputState::default();
        let mut frame = InputFrame::default();
        frame.wheel_lines = 1000.0;

        ctl.update(&mut cam, 0.016, &sample(0.0, 0.0), &input, &frame);
        assert_eq!(ctl.speed, FlyController::MAX_SPEED);
    }

    // ── look ─────────────────────────────────────────────────────────────

    #[test]
    fn right_drag_rotates_after_anchor() {
        let mut ctl = FlyController::default();
        let mut cam = Camera::default();
        let mut input = InputState::default();
        let mut frame = InputFrame::default();
        right_button(&mut input, &mut frame, MouseButtonState::Pressed);

        // Press frame only anchors.
        ctl.update(&mut cam, 0.016, &sample(100.0, 100.0), &input, &frame);
        assert_eq!(cam, Camera::default());

        frame.clear();
        ctl.update(&mut cam, 0.016, &sample(150.0, 100.0), &input, &frame);
        assert!((cam.yaw - (Camera::default().yaw + 50.0 * ctl.look_sensitivity)).abs() < 1e-6);
        assert_eq!(cam.pitch, 0.0);

        // Dragging down looks down.
        ctl.update(&mut cam, 0.016, &sample(150.0, 120.0), &input, &frame);
        assert!(cam.pitch < 0.0);
    }

    #[test]
    fn pointer_motion_without_button_does_not_rotate() {
        let mut ctl = FlyController::default();
        let mut cam = Camera::default();
        let input = InputState::default();
        let frame = InputFrame::default();

        ctl.update(&mut cam, 0.016, &sample(0.0, 0.0), &input, &frame);
        ctl.update(&mut cam, 0.016, &sample(300.0, 200.0), &input, &frame);
        assert_eq!(cam, Camera::default());
    }

    #[test]
    fn release_drops_anchor() {
        let mut ctl = FlyController::default();
        let mut cam = Camera::default();
        let mut input = InputState::default();
        let mut frame = InputFrame::default();

        right_button(&mut input, &mut frame, MouseButtonState::Pressed);
        ctl.update(&mut cam, 0.016, &sample(10.0, 10.0), &input, &frame);
        right_button(&mut input, &mut frame, MouseButtonState::Released);
        ctl.update(&mut cam, 0.016, &sample(10.0, 10.0), &input, &frame);

        assert!(ctl.drag_anchor.is_none());
    }

    #[test]
    fn reentry_with_button_held_does_not_jump() {
        let mut ctl = FlyController::default();
        let mut cam = Camera::default();
        let mut input = InputState::default();
        let mut frame = InputFrame::default();

        right_button(&mut input, &mut frame, MouseButtonState::Pressed);
        ctl.update(&mut cam, 0.016, &sample(10.0, 10.0), &input, &frame);
        let yaw_before = cam.yaw;

        // Pointer leaves the viewport and comes back elsewhere, button still held.
        ctl.on_unhovered();
        frame.clear();
        ctl.update(&mut cam, 0.016, &sample(400.0, 10.0), &input, &frame);
        assert!((cam.yaw - yaw_before).abs() < 1e-3);

        // Dragging resumes from the re-entry point.
        ctl.update(&mut cam, 0.016, &sample(410.0, 10.0), &input, &frame);
        assert!((cam.yaw - (yaw_before + 10.0 * ctl.look_sensitivity)).abs() < 1e-6);
    }
}
