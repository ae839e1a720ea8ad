use common::{count_corpus, Corpus, Result, Tally, WorkerCount};

use super::{Strategy, StrategyKind};

/// One pass over the whole corpus on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sequential;

impl Strategy for Sequential {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Sequential
    }

    fn count(&self, corpus: &Corpus, _workers: WorkerCount) -> Result<Tally> {
        count_corpus(corpus)
    }
}
