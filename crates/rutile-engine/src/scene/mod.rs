//! Camera and drawable placement.

mod camera;
mod transform;

pub use camera::Camera;
pub use transform::Transform;
