//! Watchpoint bookkeeping
//!
//! - [`pool`]: fixed-capacity arena of [`pool::Watchpoint`] slots split into a
//!   free queue and an active list
//! - [`errors`]: [`WatchpointError`]
//!
//! Watchpoints are created with the value their expression has at creation
//! time. The stepping loop re-checks them after each executed instruction
//! with [`pool::WatchpointPool::refresh`], or records its own results through
//! [`pool::WatchpointPool::set_new_value`].

pub mod errors;
pub mod pool;

pub use errors::WatchpointError;
pub use pool::{Watchpoint, WatchpointHandle, WatchpointId, WatchpointPool};

/// Number of watchpoint slots unless configured otherwise
pub const DEFAULT_WATCHPOINTS: usize = 32;

/// Longest expression text a watchpoint accepts, in bytes
pub const WP_EXPR_MAX: usize = 127;
