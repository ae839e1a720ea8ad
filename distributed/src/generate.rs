//! Synthetic corpus for benchmarking the strategies.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use itertools::Itertools;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::info;

pub const VOCABULARY: [&str; 9] = [
    "apple",
    "banana",
    "orange",
    "grape",
    "pineapple",
    "kiwi",
    "strawberry",
    "blueberry",
    "mango",
];

pub const LINES_PER_MB: usize = 10_000;

const MIN_WORDS: usize = 5;
const MAX_WORDS: usize = 15;

/// Writes `lines` lines of random vocabulary words and returns the number of words written.
pub fn generate<W: Write, R: Rng>(out: &mut W, lines: usize, rng: &mut R) -> io::Result<u64> {
    let mut words = 0;
    for _ in 0..lines {
        let n = rng.gen_range(MIN_WORDS..=MAX_WORDS);
        let line = (0..n)
            .map(|_| VOCABULARY[rng.gen_range(0..VOCABULARY.len())])
            .join(" ");
        writeln!(out, "{line}")?;
        words += n as u64;
    }
    Ok(words)
}

/// Creates `path` holding `size_mb * LINES_PER_MB` lines. A seed makes the output reproducible.
pub fn generate_file(path: &Path, size_mb: usize, seed: Option<u64>) -> io::Result<u64> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut out = BufWriter::new(File::create(path)?);
    let lines = size_mb * LINES_PER_MB;
    let words = generate(&mut out, lines, &mut rng)?;
    out.flush()?;
    info!(lines, words, "wrote {}", path.display());
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{count_tokens, Corpus};

    #[test]
    fn test_lines_use_vocabulary() {
        let mut buf = Vec::new();
        let words = generate(&mut buf, 200, &mut StdRng::seed_from_u64(7)).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text.lines().count(), 200);
        for line in text.lines() {
            let n = line.split_whitespace().count();
            assert!((MIN_WORDS..=MAX_WORDS).contains(&n), "{line}");
        }
        let tally = count_tokens(text.lines()).unwrap();
        assert_eq!(tally.total(), words);
        assert!(tally.iter().all(|(token, _)| VOCABULARY.contains(&token)));
    }

    #[test]
    fn test_seed_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        generate_file(&a, 1, Some(42)).unwrap();
        generate_file(&b, 1, Some(42)).unwrap();
        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());

        let lines = Corpus::open(&a).unwrap().read_lines().unwrap();
        assert_eq!(lines.len(), LINES_PER_MB);
    }
}
