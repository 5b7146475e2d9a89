//! Time subsystem.
//!
//! - `TimeScope` / `timed` accumulate the wall time of a region into a slot.
//! - `FrameTiming` owns the per-frame accumulators and the frame counter.
//!
//! Nothing here reads a global clock other than `Instant::now`.

mod frame_timing;
mod scope;

pub use frame_timing::FrameTiming;
pub use scope::{timed, TimeScope};
