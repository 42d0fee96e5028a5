//! The option type: a shareable in-place mutator with a stable identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_OPT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an [`Opt`]. Clones share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptId(u64);

impl OptId {
    fn next() -> Self {
        Self(NEXT_OPT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for OptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "opt#{}", self.0)
    }
}

/// A functional option that mutates a `T` in place.
///
/// Typically passed to [`apply`](crate::apply) or [`new`](crate::new).
/// Cloning is cheap and keeps the identity, so a label registered with
/// [`named`](crate::named) follows every clone.
///
/// An option built by a combinator keeps its parts: [`compose`](crate::compose)
/// yields a sequence and [`if_else`](crate::if_else) a branch. A tracked
/// [`apply`](crate::apply) walks those parts and records one change per step
/// that actually runs.
pub struct Opt<T> {
    id: OptId,
    kind: Kind<T>,
}

pub(crate) enum Kind<T> {
    Step(Arc<dyn Fn(&mut T) + Send + Sync>),
    Seq(Arc<[Opt<T>]>),
    Branch(Arc<Branch<T>>),
}

pub(crate) struct Branch<T> {
    cond: Box<dyn Fn() -> bool + Send + Sync>,
    yes: Opt<T>,
    no: Opt<T>,
}

impl<T> Branch<T> {
    /// Evaluates the condition and returns the side to run.
    pub(crate) fn select(&self) -> &Opt<T> {
        if (self.cond)() {
            &self.yes
        } else {
            &self.no
        }
    }
}

impl<T> Opt<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        Self::from_kind(Kind::Step(Arc::new(f)))
    }

    /// Runs `parts` left to right. An empty sequence has no steps.
    pub(crate) fn sequence(parts: Vec<Opt<T>>) -> Self {
        Self::from_kind(Kind::Seq(parts.into()))
    }

    pub(crate) fn branch<C>(cond: C, yes: Opt<T>, no: Opt<T>) -> Self
    where
        C: Fn() -> bool + Send + Sync + 'static,
    {
        Self::from_kind(Kind::Branch(Arc::new(Branch {
            cond: Box::new(cond),
            yes,
            no,
        })))
    }

    fn from_kind(kind: Kind<T>) -> Self {
        Self {
            id: OptId::next(),
            kind,
        }
    }

    pub fn id(&self) -> OptId {
        self.id
    }

    pub(crate) fn kind(&self) -> &Kind<T> {
        &self.kind
    }

    /// Run the mutator against `target`. Bypasses tracking.
    pub fn apply(&self, target: &mut T) {
        match &self.kind {
            Kind::Step(f) => (**f)(target),
            Kind::Seq(parts) => {
                for part in parts.iter() {
                    part.apply(target);
                }
            }
            Kind::Branch(branch) => branch.select().apply(target),
        }
    }

    /// Register `label` for this option; see [`named`](crate::named).
    pub fn named(self, label: impl Into<Arc<str>>) -> Self {
        crate::named::named(label, self)
    }
}

impl<T> Clone for Kind<T> {
    fn clone(&self) -> Self {
        match self {
            Kind::Step(f) => Kind::Step(Arc::clone(f)),
            Kind::Seq(parts) => Kind::Seq(Arc::clone(parts)),
            Kind::Branch(branch) => Kind::Branch(Arc::clone(branch)),
        }
    }
}

impl<T> Clone for Opt<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            kind: self.kind.clone(),
        }
    }
}

impl<T> fmt::Debug for Opt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Opt");
        out.field("id", &self.id)
            .field("name", &crate::named::option_name(self));
        match &self.kind {
            Kind::Step(_) => {}
            Kind::Seq(parts) => {
                out.field("parts", &parts.len());
            }
            Kind::Branch(_) => {
                out.field("branch", &true);
            }
        }
        out.finish()
    }
}

/// Anything usable where an option is expected. `None` stands for an absent
/// option and is skipped.
pub trait IntoOpt<T> {
    fn into_opt(self) -> Option<Opt<T>>;
}

impl<T> IntoOpt<T> for Opt<T> {
    fn into_opt(self) -> Option<Opt<T>> {
        Some(self)
    }
}

impl<T> IntoOpt<T> for Option<Opt<T>> {
    fn into_opt(self) -> Option<Opt<T>> {
        self
    }
}

impl<T> IntoOpt<T> for &Opt<T> {
    fn into_opt(self) -> Option<Opt<T>> {
        Some(self.clone())
    }
}
