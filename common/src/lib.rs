use std::time::{Duration, Instant};

mod corpus;
mod count;
mod error;
mod partition;
mod tally;

pub use corpus::{Corpus, Lines};
pub use count::{count_corpus, count_line, count_tokens, count_tokens_from, MalformedToken};
pub use error::{Error, Result};
pub use partition::{partition, WorkerCount, DEFAULT_WORKERS};
pub use tally::{aggregate, Tally};

/// Runs `operation` once and returns its result with the wall-clock time it took.
pub fn measure<T>(operation: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = operation();
    (result, start.elapsed())
}
