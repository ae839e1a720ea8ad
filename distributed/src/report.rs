use std::{fmt, time::Duration};

use common::WorkerCount;

use crate::strategy::{Outcome, StrategyKind};

/// Sequential time divided by `concurrent` time. `None` when `concurrent` took no measurable time.
pub fn speedup(sequential: Duration, concurrent: Duration) -> Option<f64> {
    let concurrent = concurrent.as_secs_f64();
    (concurrent > 0.0).then(|| sequential.as_secs_f64() / concurrent)
}

/// Side by side summary of one comparison run.
pub struct Report {
    pub corpus: String,
    pub workers: WorkerCount,
    pub outcomes: Vec<Outcome>,
    /// Number of most frequent tokens listed per strategy.
    pub top: usize,
    /// List every token instead of the top ones.
    pub full: bool,
}

impl Report {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    /// Speedup of every successful concurrent strategy over the sequential one.
    pub fn speedups(&self) -> Vec<(StrategyKind, Option<f64>)> {
        let Some(baseline) = self.elapsed(StrategyKind::Sequential) else {
            return Vec::new();
        };
        self.outcomes
            .iter()
            .filter(|o| o.kind != StrategyKind::Sequential)
            .filter_map(|o| {
                let result = o.result.as_ref().ok()?;
                Some((o.kind, speedup(baseline, result.elapsed)))
            })
            .collect()
    }

    /// Whether all successful strategies produced the same tally. `None` with fewer than two successes.
    pub fn consistent(&self) -> Option<bool> {
        let mut tallies = self
            .outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|r| &r.tally);
        let first = tallies.next()?;
        let mut rest = tallies.peekable();
        rest.peek()?;
        Some(rest.all(|t| t == first))
    }

    fn elapsed(&self, kind: StrategyKind) -> Option<Duration> {
        self.outcomes
            .iter()
            .find(|o| o.kind == kind)
            .and_then(|o| o.result.as_ref().ok())
            .map(|r| r.elapsed)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "corpus: {} (workers: {})", self.corpus, self.workers)?;
        for outcome in &self.outcomes {
            writeln!(f)?;
            match &outcome.result {
                Ok(result) => {
                    let tally = &result.tally;
                    writeln!(
                        f,
                        "{} time: {:.6} seconds, words: {}, distinct: {}",
                        outcome.kind,
                        result.elapsed.as_secs_f64(),
                        tally.total(),
                        tally.distinct()
                    )?;
                    let shown = if self.full { tally.distinct() } else { self.top };
                    for (token, count) in tally.most_common(shown) {
                        writeln!(f, "  {token} {count}")?;
                    }
                }
                Err(e) => writeln!(f, "{} failed: {e}", outcome.kind)?,
            }
        }

        let speedups = self.speedups();
        if !speedups.is_empty() {
            writeln!(f)?;
        }
        for (kind, ratio) in speedups {
            match ratio {
                Some(ratio) => writeln!(f, "speedup ({kind}): {ratio:.2}x")?,
                None => writeln!(f, "speedup ({kind}): n/a")?,
            }
        }
        match self.consistent() {
            Some(true) => writeln!(f, "tallies agree: yes"),
            Some(false) => writeln!(f, "tallies agree: NO"),
            None => Ok(()),
        }
    }
}
