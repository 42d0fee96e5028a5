//! Process-wide option labels used to name recorded changes.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::option::{Opt, OptId};

/// Label recorded for options that were never passed through [`named`].
pub const DEFAULT_OPTION_NAME: &str = "option";

fn registry() -> &'static RwLock<HashMap<OptId, Arc<str>>> {
    static OPTION_NAMES: OnceLock<RwLock<HashMap<OptId, Arc<str>>>> = OnceLock::new();
    OPTION_NAMES.get_or_init(Default::default)
}

/// Associates a human-readable name with an option, used for mutation
/// tracking. Returns the option unchanged; naming has no effect on what the
/// option does. The last label registered for an identity wins.
pub fn named<T>(label: impl Into<Arc<str>>, opt: Opt<T>) -> Opt<T> {
    registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(opt.id(), label.into());
    opt
}

/// Returns the registered name for an option, falling back to
/// [`DEFAULT_OPTION_NAME`].
pub fn option_name<T>(opt: &Opt<T>) -> Arc<str> {
    registered_name(opt).unwrap_or_else(|| Arc::from(DEFAULT_OPTION_NAME))
}

pub(crate) fn registered_name<T>(opt: &Opt<T>) -> Option<Arc<str>> {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&opt.id())
        .cloned()
}
