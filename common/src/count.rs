use thiserror::Error;
use tracing::debug;

use crate::{Corpus, Error, Result, Tally};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed token {token:?} on line {line}")]
pub struct MalformedToken {
    /// 1-based line number in the corpus.
    pub line: usize,
    pub token: String,
}

/// Adds the whitespace separated tokens of `line` to `tally`.
///
/// Tokens holding a control character are rejected. On error `tally` may
/// already contain tokens from earlier in the line and must be discarded.
pub fn count_line(tally: &mut Tally, line: &str, line_no: usize) -> Result<(), MalformedToken> {
    for token in line.split_whitespace() {
        if token.chars().any(char::is_control) {
            return Err(MalformedToken {
                line: line_no,
                token: token.to_owned(),
            });
        }
        tally.add(token);
    }
    Ok(())
}

pub fn count_tokens<I, S>(lines: I) -> Result<Tally, MalformedToken>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    count_tokens_from(lines, 1)
}

/// Like [`count_tokens`] for a slice of the corpus whose first line is line `first_line`.
pub fn count_tokens_from<I, S>(lines: I, first_line: usize) -> Result<Tally, MalformedToken>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tally = Tally::new();
    for (i, line) in lines.into_iter().enumerate() {
        count_line(&mut tally, line.as_ref(), first_line + i)?;
    }
    Ok(tally)
}

/// Counts a whole corpus in one streaming pass.
pub fn count_corpus(corpus: &Corpus) -> Result<Tally> {
    let mut tally = Tally::new();
    let mut n = 0;
    for line in corpus.lines()? {
        n += 1;
        count_line(&mut tally, &line?, n).map_err(|e| Error::worker(0, e))?;
    }
    debug!(lines = n, distinct = tally.distinct(), "counted {}", corpus.name());
    Ok(tally)
}
