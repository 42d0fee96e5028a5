//! Building larger options out of smaller ones.
//!
//! Every combinator is deferred: it only captures its inputs, and nothing
//! runs until the returned option is applied to a target.

use crate::option::{IntoOpt, Opt};

/// An option that leaves the target unchanged. On a tracked target it is
/// still one step, recorded with equal `before` and `after`.
pub fn noop<T: 'static>() -> Opt<T> {
    Opt::new(|_: &mut T| {})
}

/// Combines options into one, applied left to right. Absent options are
/// skipped; an empty list does nothing and records nothing.
///
/// Applying the result is the same as applying its parts one after another,
/// including on a tracked target: each part records its own change.
pub fn compose<T, I>(opts: I) -> Opt<T>
where
    T: 'static,
    I: IntoIterator,
    I::Item: IntoOpt<T>,
{
    Opt::sequence(opts.into_iter().filter_map(IntoOpt::into_opt).collect())
}

/// Applies `yes` when `cond()` holds, `no` otherwise. `cond` is evaluated
/// once per application, not when the option is built.
pub fn if_else<T, C>(cond: C, yes: Opt<T>, no: Opt<T>) -> Opt<T>
where
    T: 'static,
    C: Fn() -> bool + Send + Sync + 'static,
{
    Opt::branch(cond, yes, no)
}

/// Applies `opt` only when `cond()` holds. Shorthand for [`if_else`] with a
/// [`noop`] fallback.
pub fn when<T, C>(cond: C, opt: Opt<T>) -> Opt<T>
where
    T: 'static,
    C: Fn() -> bool + Send + Sync + 'static,
{
    if_else(cond, opt, noop())
}

/// Applies `opt` only when `cond()` does not hold.
pub fn unless<T, C>(cond: C, opt: Opt<T>) -> Opt<T>
where
    T: 'static,
    C: Fn() -> bool + Send + Sync + 'static,
{
    if_else(cond, noop(), opt)
}

/// Runs `defaults` first and then the caller's `opts`, so user options win on
/// any field both touch.
///
/// ```ignore
/// let cfg: Config = moduli::new([with_defaults(user_opts, [with_port(8080)])]);
/// ```
pub fn with_defaults<T, U, D>(opts: U, defaults: D) -> Opt<T>
where
    T: 'static,
    U: IntoIterator,
    U::Item: IntoOpt<T>,
    D: IntoIterator,
    D::Item: IntoOpt<T>,
{
    compose(
        defaults
            .into_iter()
            .map(IntoOpt::into_opt)
            .chain(opts.into_iter().map(IntoOpt::into_opt)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::Kind;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    fn push(n: u32) -> Opt<Vec<u32>> {
        Opt::new(move |v: &mut Vec<u32>| v.push(n))
    }

    #[test]
    fn test_noop_changes_nothing() {
        let mut v = vec![1];
        noop().apply(&mut v);
        assert_eq!(v, vec![1]);
    }

    #[test]
    fn test_compose_is_left_to_right_and_skips_absent() {
        let opt = compose([Some(push(1)), None, Some(push(2)), Some(push(3))]);
        let mut v = Vec::new();
        opt.apply(&mut v);
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn test_compose_empty_is_noop() {
        let opt = compose(Vec::<Opt<Vec<u32>>>::new());
        let mut v = vec![9];
        opt.apply(&mut v);
        assert_eq!(v, vec![9]);
    }

    #[test]
    fn test_compose_keeps_each_part() {
        let opt = compose([push(1), compose([push(2), push(3)])]);
        match opt.kind() {
            Kind::Seq(parts) => {
                assert_eq!(parts.len(), 2);
                assert!(matches!(parts[1].kind(), Kind::Seq(inner) if inner.len() == 2));
            }
            _ => panic!("compose should build a sequence"),
        }

        let empty = compose(Vec::<Opt<Vec<u32>>>::new());
        assert!(matches!(empty.kind(), Kind::Seq(parts) if parts.is_empty()));
    }

    #[test]
    fn test_combinators_are_deferred() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let opt = when(
            move || {
                seen.fetch_add(1, Ordering::SeqCst);
                true
            },
            push(1),
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let mut v = Vec::new();
        opt.apply(&mut v);
        opt.apply(&mut v);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(v, vec![1, 1]);
    }

    #[test]
    fn test_if_else_reads_condition_at_application() {
        let flag = Arc::new(AtomicBool::new(true));
        let cond = Arc::clone(&flag);
        let opt = if_else(move || cond.load(Ordering::SeqCst), push(10), push(20));

        let mut v = Vec::new();
        opt.apply(&mut v);
        flag.store(false, Ordering::SeqCst);
        opt.apply(&mut v);
        assert_eq!(v, vec![10, 20]);
    }

    #[test]
    fn test_when_and_unless() {
        let mut v = Vec::new();
        when(|| false, push(100)).apply(&mut v);
        unless(|| false, push(1)).apply(&mut v);
        when(|| true, push(2)).apply(&mut v);
        unless(|| true, push(200)).apply(&mut v);
        assert_eq!(v, vec![1, 2]);
    }

    #[test]
    fn test_with_defaults_runs_defaults_first() {
        let set = |n: u32| Opt::new(move |v: &mut Vec<u32>| *v = vec![n]);
        let mut layered = Vec::new();
        with_defaults([set(5)], [set(1), push(2)]).apply(&mut layered);

        let mut composed = Vec::new();
        compose([set(1), push(2), set(5)]).apply(&mut composed);

        assert_eq!(layered, vec![5]);
        assert_eq!(layered, composed);
    }
}
