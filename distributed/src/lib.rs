use std::{
    env, io,
    path::{Path, PathBuf},
};

use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, fmt::time::LocalTime, prelude::*, EnvFilter};

pub mod generate;
pub mod report;
pub mod service;
pub mod strategy;

pub use common::{Corpus, Error, Result, Tally, WorkerCount};

/// Environment variable holding the log filter, e.g. `WORDCOUNT_LOG=distributed=debug`.
pub const LOG_ENV: &str = "WORDCOUNT_LOG";

const WORKER_BIN: &str = "worker";

/// Installs the global subscriber: stderr always, plus a daily rolling file when `log_dir` is set.
///
/// The returned guard flushes the file writer on drop and must live as long as `main`.
pub fn init_logger(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let timer = LocalTime::new(format_description!(
        "[hour]:[minute]:[second].[subsecond digits:3]"
    ));
    let filter = || EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr = fmt::layer()
        .with_timer(timer.clone())
        .with_writer(io::stderr)
        .with_filter(filter());

    let (file, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "wordcount.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_timer(timer)
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry().with(stderr).with(file).init();
    guard
}

/// Path of the `worker` binary installed next to the running executable.
pub fn worker_bin() -> io::Result<PathBuf> {
    let exe = env::current_exe()?;
    let dir = exe
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "executable has no parent"))?;
    Ok(dir.join(format!("{WORKER_BIN}{}", env::consts::EXE_SUFFIX)))
}
