//! Command dispatch engine and session state machine for punchclock
//!
//! This crate is the heart of punchclock, containing:
//! - Duration tracking with two pausable stopwatches (segment, cumulative)
//! - Session state machine (Inactive -> Active <-> OnRest -> Inactive)
//! - Alias resolution and multi-target launching
//! - Quoted-argument tokenizer, command registry and fire-all-matches dispatcher

mod alias;
mod context;
mod dispatch;
mod duration;
mod handlers;
mod input;
mod registry;
mod session;
mod tracked;

pub use alias::*;
pub use context::*;
pub use dispatch::*;
pub use duration::*;
pub use input::*;
pub use registry::*;
pub use session::*;
pub use tracked::*;
