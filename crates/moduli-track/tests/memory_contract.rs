//! Contract tests for the in-memory change log under concurrent use.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use moduli_track::{Change, Memory, Tracker};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Counter {
    worker: usize,
    step: usize,
}

const WORKERS: usize = 8;
const STEPS: usize = 250;

#[test]
fn concurrent_track_loses_nothing() {
    let log = Memory::<Counter>::new();
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    log.register_hook(move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    thread::scope(|s| {
        for worker in 0..WORKERS {
            let log = &log;
            s.spawn(move || {
                for step in 0..STEPS {
                    log.track(
                        "step",
                        Counter { worker, step },
                        Counter {
                            worker,
                            step: step + 1,
                        },
                    );
                }
            });
        }
    });

    let history = log.history();
    assert_eq!(history.len(), WORKERS * STEPS);
    assert_eq!(fired.load(Ordering::Relaxed), WORKERS * STEPS);

    let unique: HashSet<(usize, usize)> = history
        .iter()
        .map(|c| (c.before().worker, c.before().step))
        .collect();
    assert_eq!(unique.len(), WORKERS * STEPS, "no duplicated records");
}

#[test]
fn per_thread_order_is_preserved() {
    let log = Memory::<Counter>::new();

    thread::scope(|s| {
        for worker in 0..4 {
            let log = &log;
            s.spawn(move || {
                for step in 0..100 {
                    log.track("step", Counter { worker, step }, Counter { worker, step });
                }
            });
        }
    });

    for worker in 0..4 {
        let steps: Vec<usize> = log
            .history()
            .iter()
            .filter(|c| c.before().worker == worker)
            .map(|c| c.before().step)
            .collect();
        let mut sorted = steps.clone();
        sorted.sort_unstable();
        assert_eq!(steps, sorted);
    }
}

#[test]
fn hooks_registered_concurrently_are_all_kept() {
    let log = Memory::<Counter>::new();

    thread::scope(|s| {
        for _ in 0..WORKERS {
            let log = &log;
            s.spawn(move || {
                log.register_hook(|_| {});
                log.track("x", Counter { worker: 0, step: 0 }, Counter { worker: 0, step: 1 });
            });
        }
    });

    assert_eq!(log.hook_count(), WORKERS);
    assert_eq!(log.len(), WORKERS);
}

#[test]
fn json_round_trip_matches_history() {
    let log = Memory::<Counter>::new();
    for step in 0..3 {
        log.track(
            &format!("step-{step}"),
            Counter { worker: 1, step },
            Counter {
                worker: 1,
                step: step + 1,
            },
        );
    }

    let blob = log.to_json().expect("encode");
    let decoded: Vec<Change<Counter>> = serde_json::from_slice(&blob).expect("decode");
    assert_eq!(decoded, log.history());
    assert_eq!(decoded[2].name(), "step-2");

    let pretty = log.to_json_pretty().expect("pretty");
    assert!(pretty.contains("\"before\""));
    assert!(pretty.contains("\"after\""));
}

#[test]
fn json_reports_unserializable_values() {
    use std::collections::HashMap;

    // serde_json rejects maps with non-string keys.
    let log = Memory::<HashMap<(u8, u8), u8>>::new();
    let mut after = HashMap::new();
    after.insert((1, 2), 3);
    log.track("insert", HashMap::new(), after);

    let err = log.to_json().expect_err("tuple keys are not valid JSON keys");
    assert!(err.to_string().contains("serialization error"));
}
