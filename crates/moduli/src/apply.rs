//! Applying options to targets, recording changes when the target tracks.

use std::sync::Arc;

use moduli_track::METRICS;
use tracing::trace;

use crate::named::{registered_name, DEFAULT_OPTION_NAME};
use crate::option::{IntoOpt, Kind, Opt};
use crate::trackable::{Target, TrackerHandle};

/// Applies each option to `target` in order. Absent options are skipped.
///
/// If the target supports mutation tracking (it embeds a
/// [`Trackable`](crate::Trackable)), every step that runs is recorded as one
/// change: a copy of the target before the step, a copy after it, and the
/// step's name. Options built with [`compose`](crate::compose) contribute one
/// step per part and conditional options the steps of the branch taken, so
/// composing never changes the recorded history. A step without a name of its
/// own takes the name of the nearest named option around it.
///
/// A panic inside an option propagates to the caller; changes recorded
/// before it are kept.
pub fn apply<T, I>(target: &mut T, opts: I)
where
    T: Target,
    I: IntoIterator,
    I::Item: IntoOpt<T>,
{
    let opts = opts.into_iter().filter_map(IntoOpt::into_opt);

    let Some(tracker) = target.provide_tracker() else {
        for opt in opts {
            opt.apply(target);
            METRICS.inc_options_applied();
        }
        return;
    };

    let mut seq = 0;
    for opt in opts {
        apply_tracked(&tracker, target, &opt, None, &mut seq);
        METRICS.inc_options_applied();
    }
}

fn apply_tracked<T>(
    tracker: &TrackerHandle<T>,
    target: &mut T,
    opt: &Opt<T>,
    outer: Option<&Arc<str>>,
    seq: &mut usize,
) {
    let own = registered_name(opt);
    let label = own.as_ref().or(outer);

    match opt.kind() {
        Kind::Step(f) => {
            let before = tracker.snapshot(target);
            (**f)(target);
            let after = tracker.snapshot(target);

            let name = label.map_or(DEFAULT_OPTION_NAME, |l| &**l);
            trace!(option = name, seq = *seq, "option applied");
            *seq += 1;
            tracker.track(name, before, after);
        }
        Kind::Seq(parts) => {
            for part in parts.iter() {
                apply_tracked(tracker, target, part, label, seq);
            }
        }
        Kind::Branch(branch) => apply_tracked(tracker, target, branch.select(), label, seq),
    }
}

/// Like [`apply`], but an absent target is a no-op.
pub fn apply_maybe<T, I>(target: Option<&mut T>, opts: I)
where
    T: Target,
    I: IntoIterator,
    I::Item: IntoOpt<T>,
{
    if let Some(target) = target {
        apply(target, opts);
    }
}

/// Starts from `T::default()`, applies each option via [`apply`], and
/// returns the value.
pub fn new<T, I>(opts: I) -> T
where
    T: Target + Default,
    I: IntoIterator,
    I::Item: IntoOpt<T>,
{
    let mut value = T::default();
    apply(&mut value, opts);
    value
}
