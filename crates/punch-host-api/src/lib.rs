//! Host adapter trait interfaces for punchclock
//!
//! This crate defines the interface between the session core and
//! platform-specific process control. It contains no platform code itself.

mod handle;
mod mock;
mod traits;

pub use handle::*;
pub use mock::*;
pub use traits::*;
