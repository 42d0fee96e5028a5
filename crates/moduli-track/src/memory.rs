//! In-memory change log with synchronous change hooks.
//!
//! [`Memory`] is the concrete [`Tracker`]: an append-only history guarded by
//! one mutex, plus a list of observer callbacks. The mutex covers only the
//! list operations. Hooks are cloned out of the lock and run after it is
//! released, so a hook may block, read the history, or register more hooks
//! without deadlocking the log.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::debug;

use crate::change::Change;
use crate::metrics::METRICS;
use crate::Result;

/// Observer callback invoked once per recorded change.
pub type Hook<T> = Arc<dyn Fn(&Change<T>) + Send + Sync + 'static>;

/// Implemented by types that can record before/after mutations.
pub trait Tracker<T>: Send + Sync {
    fn track(&self, name: &str, before: T, after: T);
}

struct MemoryInner<T> {
    history: Vec<Change<T>>,
    hooks: Vec<Hook<T>>,
}

/// Tracks all changes in memory and supports change hooks.
///
/// `Memory::default()` is an empty, ready-to-use log.
pub struct Memory<T> {
    inner: Mutex<MemoryInner<T>>,
}

impl<T> Default for Memory<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                history: Vec::new(),
                hooks: Vec::new(),
            }),
        }
    }
}

impl<T> fmt::Debug for Memory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("Memory")
            .field("changes", &inner.history.len())
            .field("hooks", &inner.hooks.len())
            .finish()
    }
}

impl<T> Memory<T> {
    pub fn new() -> Self {
        Self::default()
    }

    // Every critical section leaves both lists consistent, so a poisoned
    // lock still guards valid data.
    fn lock(&self) -> MutexGuard<'_, MemoryInner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an observer callback that runs after every change.
    pub fn register_hook<F>(&self, hook: F)
    where
        F: Fn(&Change<T>) + Send + Sync + 'static,
    {
        self.lock().hooks.push(Arc::new(hook));
    }

    /// Add an already shared hook. `None` is dropped: nothing is stored and
    /// nothing will be invoked for it.
    pub fn register_optional_hook(&self, hook: Option<Hook<T>>) {
        match hook {
            Some(hook) => self.lock().hooks.push(hook),
            None => debug!("ignoring absent change hook"),
        }
    }

    /// Number of registered hooks.
    pub fn hook_count(&self) -> usize {
        self.lock().hooks.len()
    }

    /// Number of recorded changes.
    pub fn len(&self) -> usize {
        self.lock().history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().history.is_empty()
    }
}

impl<T: Clone> Memory<T> {
    /// Records a change and notifies all registered hooks, in registration
    /// order, after the lock is released. Safe for concurrent callers.
    pub fn record(&self, name: &str, before: T, after: T) {
        let change = Change::new(name, before, after);
        let (change, hooks) = {
            let mut inner = self.lock();
            if inner.hooks.is_empty() {
                inner.history.push(change);
                (None, Vec::new())
            } else {
                inner.history.push(change.clone());
                (Some(change), inner.hooks.clone())
            }
        };
        METRICS.inc_changes_tracked();

        if let Some(change) = change {
            for hook in &hooks {
                hook(&change);
            }
            METRICS.add_hooks_invoked(hooks.len() as u64);
        }
    }

    /// Returns a copy of all recorded changes, oldest first.
    pub fn history(&self) -> Vec<Change<T>> {
        self.lock().history.clone()
    }

    /// Returns a copy of the most recent change, if any.
    pub fn last(&self) -> Option<Change<T>> {
        self.lock().history.last().cloned()
    }
}

impl<T: Clone + Serialize> Memory<T> {
    /// Returns the tracked history encoded as JSON.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.history())?)
    }

    /// Returns the tracked history as indented JSON text.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.history())?)
    }
}

impl<T: Clone + Send> Tracker<T> for Memory<T> {
    fn track(&self, name: &str, before: T, after: T) {
        self.record(name, before, after);
    }
}
