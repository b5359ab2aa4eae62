//! Background Tasks Module
//!
//! Optional tasks layered on top of the cache store while serving.
//!
//! # Tasks
//! - Expiry sweep: removes expired entries at a configured interval, so
//!   entries nobody checks again do not accumulate on disk
//! - Blocking access: runs store calls on the blocking pool

mod blocking;
mod sweep;

pub use blocking::with_cache;
pub use sweep::spawn_sweep_task;
