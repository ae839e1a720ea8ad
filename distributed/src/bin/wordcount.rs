use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use common::DEFAULT_WORKERS;
use distributed::{
    generate::generate_file,
    init_logger,
    report::Report,
    strategy::{compare, IsolatedProcess, Sequential, SharedMemory, Strategy, WorkerCommand},
    worker_bin, Corpus, WorkerCount,
};
use std::{path::PathBuf, time::Duration};

#[derive(Parser, Debug)]
#[command(about = "Count words sequentially, with threads and with processes, and compare")]
pub struct Cli {
    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count a corpus with the selected strategies and print a report
    Run(RunArgs),
    /// Write a random corpus
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    corpus: PathBuf,
    #[arg(short, long, default_value_t = DEFAULT_WORKERS as i64, allow_negative_numbers = true)]
    workers: i64,
    #[arg(short, long, value_enum, default_value_t = Selection::All)]
    strategy: Selection,
    /// Most frequent tokens shown per strategy
    #[arg(long, default_value_t = 10)]
    top: usize,
    /// Show the whole tally
    #[arg(long)]
    full: bool,
    /// Worker executable, defaults to `worker` next to this binary
    #[arg(long)]
    worker_bin: Option<PathBuf>,
    /// Seconds before a worker process is killed
    #[arg(long)]
    worker_timeout: Option<u64>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    output: PathBuf,
    #[arg(long, default_value_t = 10)]
    size_mb: usize,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Selection {
    All,
    Sequential,
    SharedMemory,
    IsolatedProcess,
}

impl RunArgs {
    fn strategies(&self) -> Result<Vec<Box<dyn Strategy>>> {
        let mut strategies: Vec<Box<dyn Strategy>> = Vec::new();
        if matches!(self.strategy, Selection::All | Selection::Sequential) {
            strategies.push(Box::new(Sequential));
        }
        if matches!(self.strategy, Selection::All | Selection::SharedMemory) {
            strategies.push(Box::new(SharedMemory));
        }
        if matches!(self.strategy, Selection::All | Selection::IsolatedProcess) {
            let program = match &self.worker_bin {
                Some(path) => path.clone(),
                None => worker_bin().context("locate worker binary")?,
            };
            let command = WorkerCommand::new(program)
                .timeout(self.worker_timeout.map(Duration::from_secs));
            strategies.push(Box::new(IsolatedProcess::new(command)));
        }
        Ok(strategies)
    }
}

fn run(args: RunArgs) -> Result<()> {
    // both checks happen before any strategy starts
    let workers = WorkerCount::new(args.workers)?;
    let corpus = Corpus::open(&args.corpus)?;
    let strategies = args.strategies()?;

    let outcomes = compare(&strategies, &corpus, workers);
    let report = Report {
        corpus: corpus.name(),
        workers,
        outcomes,
        top: args.top,
        full: args.full,
    };
    print!("{report}");

    let failures = report.failures();
    if failures > 0 {
        bail!("{failures} of {} strategies failed", report.outcomes.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logger(cli.log_dir.as_deref());

    match cli.command {
        Command::Run(args) => run(args),
        Command::Generate(args) => {
            generate_file(&args.output, args.size_mb, args.seed)
                .with_context(|| format!("write {}", args.output.display()))?;
            Ok(())
        }
    }
}
