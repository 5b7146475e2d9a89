//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - routing validation and uncaptured device errors into the log
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and handing back a presentable texture after submission

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::{GpuFrame, PendingPresent};
pub use gpu::Gpu;
pub use init::GpuInit;
