//! Rutile engine crate.
//!
//! Platform + GPU runtime, the offscreen viewport render target, and the frame
//! loop that ties camera motion, rendering, UI composition and deferred resize
//! together.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod scene;
pub mod frame;
