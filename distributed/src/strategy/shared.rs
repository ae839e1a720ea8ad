use std::{sync::Mutex, thread};

use common::{count_tokens_from, partition, Corpus, Error, Result, Tally, WorkerCount};
use tracing::trace;

use super::{Strategy, StrategyKind};

/// Worker threads that count locally and merge into one mutex guarded tally.
#[derive(Debug, Default, Clone, Copy)]
pub struct SharedMemory;

impl Strategy for SharedMemory {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SharedMemory
    }

    fn count(&self, corpus: &Corpus, workers: WorkerCount) -> Result<Tally> {
        let lines = corpus.read_lines()?;
        let shared = Mutex::new(Tally::new());

        thread::scope(|s| {
            let mut next_line = 1;
            let handles: Vec<_> = partition(&lines, workers)
                .into_iter()
                .enumerate()
                .map(|(index, part)| {
                    let shared = &shared;
                    let first_line = next_line;
                    next_line += part.len();
                    s.spawn(move || -> Result<()> {
                        let local = count_tokens_from(part, first_line)
                            .map_err(|e| Error::worker(index, e))?;
                        trace!(worker = index, lines = part.len(), "merge");
                        shared
                            .lock()
                            .map_err(|_| Error::worker(index, "shared tally poisoned"))?
                            .merge(local);
                        Ok(())
                    })
                })
                .collect();

            // join every thread before reporting, keeping the first failure
            let mut outcome = Ok(());
            for (index, handle) in handles.into_iter().enumerate() {
                let joined = handle
                    .join()
                    .unwrap_or_else(|_| Err(Error::worker(index, "worker thread panicked")));
                if outcome.is_ok() {
                    outcome = joined;
                }
            }
            outcome
        })?;

        shared
            .into_inner()
            .map_err(|_| Error::worker(0, "shared tally poisoned"))
    }
}
