//! moduli mutation tracking
//!
//! Primitives the `moduli` option engine records into:
//! - Change: one named before/after transition
//! - Tracker: anything that can record a transition
//! - Memory: thread-safe in-memory log with change hooks
//!
//! End users depend on this crate directly only when they want to inspect or
//! stream history without the option engine.

pub mod change;
pub mod error;
pub mod memory;
pub mod metrics;

pub use change::Change;
pub use error::{Result, TrackError};
pub use memory::{Hook, Memory, Tracker};
pub use metrics::METRICS;

/// moduli-track version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
