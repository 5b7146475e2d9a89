use anyhow::Result;
use winit::event::WindowEvent;

use crate::device::Gpu;

use super::ctx::{FrameCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called once after the window and GPU exist, before the first frame.
    ///
    /// An error aborts startup.
    fn on_init(&mut self, window: &WindowCtx<'_>, gpu: &Gpu<'_>) -> Result<()> {
        let _ = (window, gpu);
        Ok(())
    }

    /// Called for every window event, before the runtime handles it.
    fn on_window_event(&mut self, window: &WindowCtx<'_>, event: &WindowEvent) -> AppControl {
        let _ = (window, event);
        AppControl::Continue
    }

    /// Called once per redraw. An error stops the event loop and is returned
    /// from [`Runtime::run`](crate::window::Runtime::run).
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl>;
}
