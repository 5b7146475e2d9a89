//! GPU rendering subsystem.
//!
//! - `RenderTarget` owns the offscreen color + depth attachments the scene is
//!   drawn into and composited from.
//! - `SolidShader` and `Mesh` are the one pipeline and one drawable the viewport
//!   needs.
//!
//! Convention: the target uses wgpu's top-left texture origin, so compositing it
//! needs no UV flip.

mod ctx;
mod mesh;
mod shader;
mod target;

pub use ctx::RenderCtx;
pub use mesh::{Mesh, Vertex};
pub use shader::{ShaderError, ShaderSources, ShaderStage, SolidShader, SolidUniforms};
pub use target::{
    Attachments, GpuAttachments, RenderTarget, TargetError, TextureHandle, DEPTH_FORMAT,
    TARGET_COLOR_FORMAT,
};
