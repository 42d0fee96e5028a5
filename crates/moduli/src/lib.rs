//! moduli: functional options with composition, conditional logic and
//! mutation tracking.
//!
//! - Opt: an in-place mutator of a target value
//! - combinators: noop, compose, if_else, when, unless, with_defaults
//! - apply / new: run options against a target
//! - Trackable: embed it in a type and every applied option is recorded as
//!   a before/after [`Change`] in an in-memory log with change hooks
//! - named: give an option a readable name for its recorded changes
//!
//! ```ignore
//! use moduli::{apply, compose, named, Opt, Trackable};
//!
//! #[derive(Debug, Clone, Default)]
//! struct Rocket {
//!     tracking: Trackable<Rocket>,
//!     name: String,
//! }
//! moduli::trackable!(Rocket, tracking);
//!
//! let mut rocket = Rocket::default();
//! apply(&mut rocket, [named("rename", Opt::new(|r: &mut Rocket| r.name = "falcon".into()))]);
//! assert_eq!(rocket.tracking.tracker().history()[0].name(), "rename");
//! ```

pub mod apply;
pub mod combinators;
pub mod hooks;
pub mod named;
pub mod option;
pub mod trackable;

pub use apply::{apply, apply_maybe, new};
pub use combinators::{compose, if_else, noop, unless, when, with_defaults};
pub use hooks::{
    console_hook, tracing_hook, with_console_writer, with_shared_console_writer,
    with_tracing_dispatch, with_tracing_level, with_tracing_message, ConsoleHookConfig,
    SharedWriter, TracingHookConfig, DEFAULT_TRACING_MESSAGE,
};
pub use named::{named, option_name, DEFAULT_OPTION_NAME};
pub use option::{IntoOpt, Opt, OptId};
#[doc(hidden)]
pub use trackable::TrackerHandle;
pub use trackable::{Target, Trackable};

pub use moduli_track::{Change, Hook, Memory, Result, TrackError, Tracker, METRICS};

/// moduli version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
