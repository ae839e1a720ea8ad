use std::time::Duration;

use distributed::{
    strategy::{
        compare, execute, IsolatedProcess, Sequential, SharedMemory, Strategy, StrategyKind,
        WorkerCommand,
    },
    Corpus, Error, Tally, WorkerCount,
};

fn worker() -> WorkerCommand {
    WorkerCommand::new(env!("CARGO_BIN_EXE_worker"))
}

fn all_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(Sequential) as Box<dyn Strategy>,
        Box::new(SharedMemory),
        Box::new(IsolatedProcess::new(worker())),
    ]
}

fn workers(n: i64) -> WorkerCount {
    WorkerCount::new(n).unwrap()
}

fn fruit_corpus() -> Corpus {
    let fruit = ["apple", "banana", "kiwi", "mango", "grape"];
    let lines: Vec<String> = (0..53)
        .map(|i| {
            (0..(i % 9))
                .map(|j| fruit[(i * 7 + j * 3) % fruit.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    Corpus::from_lines(&lines)
}

#[test]
fn concurrent_strategies_match_sequential() {
    let corpus = fruit_corpus();
    let expected = Sequential.count(&corpus, workers(1)).unwrap();
    assert!(!expected.is_empty());

    for n in [1, 2, 3, 4, 10] {
        let outcomes = compare(&all_strategies(), &corpus, workers(n));
        for outcome in outcomes {
            let result = outcome.result.unwrap();
            assert_eq!(result.tally, expected, "{} with {n} workers", outcome.kind);
        }
    }
}

#[test]
fn two_line_scenario() {
    let corpus = Corpus::from_lines(["a b a", "b c"]);
    let expected: Tally = [("a", 2), ("b", 2), ("c", 1)].into_iter().collect();
    for strategy in all_strategies() {
        let result = execute(strategy.as_ref(), &corpus, workers(2)).unwrap();
        assert_eq!(result.tally, expected, "{}", strategy.kind());
    }
}

#[test]
fn empty_corpus_gives_empty_tally() {
    let corpus = Corpus::from_text("");
    for strategy in all_strategies() {
        assert!(strategy.count(&corpus, workers(4)).unwrap().is_empty());
    }
}

#[test]
fn more_workers_than_lines() {
    let corpus = Corpus::from_lines(["kiwi kiwi", "mango"]);
    for strategy in all_strategies() {
        let tally = strategy.count(&corpus, workers(10)).unwrap();
        assert_eq!(tally.get("kiwi"), 2);
        assert_eq!(tally.get("mango"), 1);
        assert_eq!(tally.total(), 3);
    }
}

#[test]
fn malformed_token_fails_every_strategy() {
    let corpus = Corpus::from_lines(["apple", "kiwi", "bad\u{0}token", "mango"]);
    for strategy in all_strategies() {
        let err = strategy.count(&corpus, workers(2)).unwrap_err();
        assert!(
            matches!(err, Error::WorkerFailure { .. }),
            "{}: {err:?}",
            strategy.kind()
        );
    }
}

#[test]
fn isolated_worker_reports_reason() {
    let corpus = Corpus::from_lines(["ok", "not\u{7}ok"]);
    let strategy = IsolatedProcess::new(worker());
    match strategy.count(&corpus, workers(2)) {
        Err(Error::WorkerFailure { worker, reason }) => {
            assert_eq!(worker, 1);
            assert!(reason.contains("malformed token"), "{reason}");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn missing_worker_binary_fails() {
    let strategy = IsolatedProcess::new(WorkerCommand::new("/nonexistent/worker"));
    let err = strategy
        .count(&Corpus::from_lines(["a"]), workers(1))
        .unwrap_err();
    assert!(matches!(err, Error::WorkerFailure { worker: 0, .. }));
}

#[cfg(unix)]
#[test]
fn silent_worker_fails() {
    let command = WorkerCommand::new("sh").arg("-c").arg("cat > /dev/null");
    let err = IsolatedProcess::new(command)
        .count(&Corpus::from_lines(["a b"]), workers(1))
        .unwrap_err();
    match err {
        Error::WorkerFailure { reason, .. } => assert!(reason.contains("undecodable"), "{reason}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn slow_worker_times_out() {
    let command = WorkerCommand::new("sh")
        .arg("-c")
        .arg("exec sleep 10")
        .timeout(Some(Duration::from_millis(200)));
    let started = std::time::Instant::now();
    let err = IsolatedProcess::new(command)
        .count(&Corpus::from_lines(["a b"]), workers(1))
        .unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(5));
    match err {
        Error::WorkerFailure { reason, .. } => assert!(reason.contains("timed out"), "{reason}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn first_failure_does_not_wait_for_slower_workers() {
    let script = "if grep -qa slow; then exec sleep 10; else echo boom >&2; exit 1; fi";
    let command = WorkerCommand::new("sh").arg("-c").arg(script);
    let started = std::time::Instant::now();
    let err = IsolatedProcess::new(command)
        .count(&Corpus::from_lines(["slow", "fast"]), workers(2))
        .unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(5));
    match err {
        Error::WorkerFailure { worker, reason } => {
            assert_eq!(worker, 1);
            assert!(reason.contains("boom"), "{reason}");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn malformed_line_number_points_into_the_corpus() {
    let corpus = Corpus::from_lines(["a", "b", "c", "d", "e", "b\u{1b}c"]);
    for strategy in all_strategies() {
        let err = strategy.count(&corpus, workers(3)).unwrap_err();
        assert!(
            err.to_string().ends_with("on line 6"),
            "{}: {err}",
            strategy.kind()
        );
    }
}

#[test]
fn kinds_are_reported_in_order() {
    let outcomes = compare(&all_strategies(), &Corpus::from_lines(["x"]), workers(1));
    let kinds: Vec<_> = outcomes.iter().map(|o| o.kind).collect();
    assert_eq!(
        kinds,
        vec![
            StrategyKind::Sequential,
            StrategyKind::SharedMemory,
            StrategyKind::IsolatedProcess
        ]
    );
}
