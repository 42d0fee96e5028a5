//! Opt-in mutation tracking for option targets.
//!
//! A type takes part in [`apply`](crate::apply) by implementing [`Target`].
//! The trait has a single hidden method with a default body that reports "no
//! tracker", so a plain type only needs `impl Target for X {}`. A type that
//! embeds a [`Trackable`] capsule wires the hidden method to it with the
//! [`trackable!`](macro@crate::trackable) macro and from then on every applied
//! option is recorded.
//!
//! ```ignore
//! #[derive(Clone, Default)]
//! struct Rocket {
//!     tracking: Trackable<Rocket>,
//!     name: String,
//! }
//! moduli::trackable!(Rocket, tracking);
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use moduli_track::{Memory, Tracker};
use tracing::debug;

/// What the engine needs to record changes on a target: where to record
/// them and how to take a full copy of the target.
#[doc(hidden)]
pub struct TrackerHandle<T> {
    tracker: Arc<dyn Tracker<T>>,
    snapshot: fn(&T) -> T,
}

impl<T: Clone> TrackerHandle<T> {
    /// Wrap any tracker. Snapshots are taken with `Clone`.
    pub fn new(tracker: Arc<dyn Tracker<T>>) -> Self {
        Self {
            tracker,
            snapshot: T::clone,
        }
    }
}

impl<T> TrackerHandle<T> {
    pub(crate) fn snapshot(&self, target: &T) -> T {
        (self.snapshot)(target)
    }

    pub(crate) fn track(&self, name: &str, before: T, after: T) {
        self.tracker.track(name, before, after)
    }
}

/// A value options can be applied to.
pub trait Target: Sized {
    /// Used internally by [`apply`](crate::apply) to detect tracking support.
    #[doc(hidden)]
    fn provide_tracker(&self) -> Option<TrackerHandle<Self>> {
        None
    }
}

/// Embeddable capsule that lazily owns one [`Memory`] log.
///
/// Cloning a capsule yields a fresh, detached capsule: a cloned owner never
/// shares its original's history, and the snapshots stored in a log do not
/// point back at it. Capsules always compare equal so owners can derive
/// `PartialEq` over their real fields.
///
/// Snapshots are taken with `Clone`. Owned data (`String`, `Vec`, nested
/// structs) is copied deeply; state shared through `Rc`/`Arc` with interior
/// mutability is not, and later writes through it show up in old records.
pub struct Trackable<T> {
    tracker: OnceLock<Arc<Memory<T>>>,
}

impl<T> Trackable<T> {
    pub fn new() -> Self {
        Self {
            tracker: OnceLock::new(),
        }
    }

    /// Returns the internal log, creating it on first use. Use it to inspect
    /// history, register change hooks, or encode the history as JSON.
    pub fn tracker(&self) -> &Memory<T> {
        self.ensure()
    }

    /// Shared handle to the same log, e.g. to hand to another thread.
    pub fn handle(&self) -> Arc<Memory<T>> {
        Arc::clone(self.ensure())
    }

    /// Whether the log has been created yet.
    pub fn is_initialized(&self) -> bool {
        self.tracker.get().is_some()
    }

    fn ensure(&self) -> &Arc<Memory<T>> {
        self.tracker.get_or_init(|| {
            debug!("creating change log");
            Arc::new(Memory::new())
        })
    }
}

impl<T: Clone + Send + 'static> Trackable<T> {
    #[doc(hidden)]
    pub fn provide(&self) -> Option<TrackerHandle<T>> {
        let tracker: Arc<dyn Tracker<T>> = self.handle();
        Some(TrackerHandle::new(tracker))
    }
}

impl<T> Default for Trackable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Trackable<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> PartialEq for Trackable<T> {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl<T> Eq for Trackable<T> {}

impl<T> fmt::Debug for Trackable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trackable")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Implements [`Target`] for a type that embeds a [`Trackable`] field.
///
/// ```ignore
/// moduli::trackable!(Rocket, tracking);
/// ```
#[macro_export]
macro_rules! trackable {
    ($ty:ty, $field:ident) => {
        impl $crate::Target for $ty {
            fn provide_tracker(
                &self,
            ) -> ::core::option::Option<$crate::TrackerHandle<Self>> {
                self.$field.provide()
            }
        }
    };
}

macro_rules! untracked_targets {
    ($($ty:ty),* $(,)?) => {
        $(impl Target for $ty {})*
    };
}

untracked_targets!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String,
);

impl<T> Target for Vec<T> {}
