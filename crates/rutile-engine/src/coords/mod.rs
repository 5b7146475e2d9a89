//! Size and placement types shared by the render target, the frame loop and
//! the UI overlay.

mod resolution;
mod viewport;

pub use resolution::Resolution;
pub use viewport::ViewportPlacement;
