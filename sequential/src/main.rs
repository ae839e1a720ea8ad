use anyhow::Context;
use clap::Parser;
use common::{aggregate, count_corpus, measure, Corpus};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};
use tracing::info;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(short, long, default_value = "mr-wc-seq")]
    output: PathBuf,
    #[arg(required = true)]
    input_files: Vec<PathBuf>,
}

fn run(cli: &Cli) -> anyhow::Result<u64> {
    let corpora: Vec<Corpus> = cli
        .input_files
        .iter()
        .map(Corpus::open)
        .collect::<Result<_, _>>()?;

    let (tally, elapsed) = measure(|| -> anyhow::Result<_> {
        let parts = corpora
            .iter()
            .map(count_corpus)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(aggregate(parts))
    });
    let tally = tally?;
    info!(
        files = corpora.len(),
        distinct = tally.distinct(),
        "counted in {:?}",
        elapsed
    );

    let file = File::create(&cli.output)
        .with_context(|| format!("create {}", cli.output.display()))?;
    let mut output_file = BufWriter::new(file);
    for (token, count) in tally.sorted() {
        writeln!(output_file, "{} {}", token, count)?;
    }
    output_file.flush()?;

    Ok(tally.total())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    run(&cli)?;
    Ok(())
}
