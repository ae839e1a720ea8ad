use std::{fmt, time::Duration};

use clap::ValueEnum;
use common::{measure, Corpus, Result, Tally, WorkerCount};
use tracing::{error, info, info_span};
use uuid::Uuid;

mod isolated;
mod sequential;
mod shared;

pub use isolated::{IsolatedProcess, WorkerCommand};
pub use sequential::Sequential;
pub use shared::SharedMemory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum StrategyKind {
    Sequential,
    SharedMemory,
    IsolatedProcess,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Sequential => "sequential",
            StrategyKind::SharedMemory => "shared-memory",
            StrategyKind::IsolatedProcess => "isolated-process",
        };
        f.write_str(name)
    }
}

/// One way of turning a corpus into a tally.
pub trait Strategy {
    fn kind(&self) -> StrategyKind;

    /// Counts every token of `corpus` using up to `workers` workers.
    ///
    /// A failing worker fails the whole call; no partial tally is returned.
    fn count(&self, corpus: &Corpus, workers: WorkerCount) -> Result<Tally>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyResult {
    pub tally: Tally,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct Outcome {
    pub kind: StrategyKind,
    pub result: Result<StrategyResult>,
}

/// Runs `strategy` once and times it.
pub fn execute(
    strategy: &dyn Strategy,
    corpus: &Corpus,
    workers: WorkerCount,
) -> Result<StrategyResult> {
    let run_id = Uuid::new_v4();
    let span = info_span!("run", strategy = %strategy.kind(), %run_id);
    let _enter = span.enter();

    info!(%workers, corpus = %corpus.name(), "start");
    let (tally, elapsed) = measure(|| strategy.count(corpus, workers));
    match tally {
        Ok(tally) => {
            info!(
                ?elapsed,
                distinct = tally.distinct(),
                total = tally.total(),
                "done"
            );
            Ok(StrategyResult { tally, elapsed })
        }
        Err(e) => {
            error!(?elapsed, "failed: {e}");
            Err(e)
        }
    }
}

/// Runs each strategy in turn. A failure is recorded in its outcome and does not stop the others.
pub fn compare(
    strategies: &[Box<dyn Strategy>],
    corpus: &Corpus,
    workers: WorkerCount,
) -> Vec<Outcome> {
    strategies
        .iter()
        .map(|strategy| Outcome {
            kind: strategy.kind(),
            result: execute(strategy.as_ref(), corpus, workers),
        })
        .collect()
}
