//! A single recorded mutation.

use serde::{Deserialize, Serialize};

/// One mutation event: the option name, the state before it ran and the
/// state after it ran.
///
/// `before` and `after` are owned copies of the target, so later mutations
/// of the live value never reach a stored change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change<T> {
    name: String,
    before: T,
    after: T,
}

impl<T> Change<T> {
    pub fn new(name: impl Into<String>, before: T, after: T) -> Self {
        Self {
            name: name.into(),
            before,
            after,
        }
    }

    /// Label of the option that produced this change.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn before(&self) -> &T {
        &self.before
    }

    pub fn after(&self) -> &T {
        &self.after
    }

    /// Consume the record, returning `(name, before, after)`.
    pub fn into_parts(self) -> (String, T, T) {
        (self.name, self.before, self.after)
    }
}
