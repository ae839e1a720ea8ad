use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("corpus {} is unreadable", .path.display())]
    CorpusUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("worker {worker} failed: {reason}")]
    WorkerFailure { worker: usize, reason: String },
}

impl Error {
    pub fn worker(worker: usize, reason: impl ToString) -> Self {
        Error::WorkerFailure {
            worker,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn unreadable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::CorpusUnreadable {
            path: path.into(),
            source,
        }
    }
}
