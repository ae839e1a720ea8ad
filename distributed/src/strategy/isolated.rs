use std::{
    ffi::OsString,
    path::PathBuf,
    process::Stdio,
    sync::Arc,
    time::Duration,
};

use common::{aggregate, partition, Corpus, Error, Result, Tally, WorkerCount};
use crossbeam_queue::ArrayQueue;
use futures::stream::{FuturesUnordered, StreamExt};
use prost::Message;
use tokio::{io::AsyncWriteExt, process::Command, runtime, time};
use tracing::{debug, warn};

use super::{Strategy, StrategyKind};
use crate::service::{PartitionRequest, TallyReply};

/// How to start one worker process.
#[derive(Debug, Clone)]
pub struct WorkerCommand {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// A worker still running after `timeout` is killed and fails the run.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Counts one partition in a fresh child process.
    pub async fn execute(&self, request: PartitionRequest) -> Result<Tally> {
        let index = request.index as usize;
        let fail = |reason: String| Error::worker(index, reason);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| fail(format!("spawn {}: {e}", self.program.display())))?;

        let payload = request.encode_length_delimited_to_vec();
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| fail("stdin not captured".to_string()))?;
        let exchange = async move {
            stdin.write_all(&payload).await?;
            drop(stdin);
            child.wait_with_output().await
        };

        // dropping `exchange` on timeout kills the child
        let output = match self.timeout {
            Some(limit) => time::timeout(limit, exchange)
                .await
                .map_err(|_| fail(format!("timed out after {limit:?}")))?,
            None => exchange.await,
        }
        .map_err(|e| fail(e.to_string()))?;

        let reply = TallyReply::decode_length_delimited(output.stdout.as_slice());
        if !output.status.success() {
            let reason = match reply {
                Ok(TallyReply {
                    error: Some(reason),
                    ..
                }) => reason,
                _ => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    let last = stderr.lines().last().unwrap_or_default();
                    format!("{}: {}", output.status, last.trim())
                }
            };
            return Err(fail(reason));
        }

        let reply = reply.map_err(|e| fail(format!("undecodable reply: {e}")))?;
        debug!("{}", reply);
        if reply.index != index as u64 {
            return Err(fail(format!("reply for partition {}", reply.index)));
        }
        reply.into_result().map_err(fail)
    }
}

/// Worker processes that share nothing and send their tallies back as messages.
#[derive(Debug, Clone)]
pub struct IsolatedProcess {
    command: WorkerCommand,
}

impl IsolatedProcess {
    pub fn new(command: WorkerCommand) -> Self {
        Self { command }
    }

    async fn run(&self, parts: Vec<&[String]>) -> Result<Tally> {
        let results = Arc::new(ArrayQueue::new(parts.len()));

        let mut handles = Vec::with_capacity(parts.len());
        let mut next_line = 1;
        for (index, part) in parts.into_iter().enumerate() {
            let request = PartitionRequest {
                index: index as u64,
                lines: part.to_vec(),
                first_line: next_line,
            };
            next_line += part.len() as u64;
            let command = self.command.clone();
            let results = Arc::clone(&results);
            handles.push(tokio::spawn(async move {
                let tally = command.execute(request).await?;
                results
                    .push((index, tally))
                    .map_err(|_| Error::worker(index, "result queue full"))
            }));
        }

        // joined in completion order so the first failure stops the run
        let aborts: Vec<_> = handles.iter().map(|h| h.abort_handle()).collect();
        let mut pending: FuturesUnordered<_> = handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| async move { (index, handle.await) })
            .collect();
        while let Some((index, joined)) = pending.next().await {
            if let Err(e) = joined.unwrap_or_else(|e| Err(Error::worker(index, e))) {
                warn!(worker = index, "aborting remaining workers");
                for abort in &aborts {
                    abort.abort();
                }
                return Err(e);
            }
        }

        // every worker has been joined, merge once
        let mut partials = Vec::with_capacity(results.len());
        while let Some((index, tally)) = results.pop() {
            debug!(worker = index, distinct = tally.distinct(), "collected");
            partials.push(tally);
        }
        Ok(aggregate(partials))
    }
}

impl Strategy for IsolatedProcess {
    fn kind(&self) -> StrategyKind {
        StrategyKind::IsolatedProcess
    }

    fn count(&self, corpus: &Corpus, workers: WorkerCount) -> Result<Tally> {
        let lines = corpus.read_lines()?;
        let runtime = runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::worker(0, format!("runtime: {e}")))?;
        runtime.block_on(self.run(partition(&lines, workers)))
    }
}
