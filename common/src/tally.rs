use std::collections::{hash_map, HashMap};

use itertools::Itertools;

/// Token frequencies. A token present in the tally always has a count above zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    counts: HashMap<String, u64>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, token: &str) {
        match self.counts.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(token.to_owned(), 1);
            }
        }
    }

    pub fn add_count(&mut self, token: impl Into<String>, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(token.into()).or_insert(0) += count;
    }

    pub fn get(&self, token: &str) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct tokens.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Number of token occurrences.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Pointwise addition of `other` into `self`.
    pub fn merge(&mut self, mut other: Tally) {
        if other.counts.len() > self.counts.len() {
            std::mem::swap(&mut self.counts, &mut other.counts);
        }
        for (token, count) in other.counts {
            self.add_count(token, count);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries ordered by token.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        self.iter().sorted_by(|a, b| a.0.cmp(b.0)).collect()
    }

    /// The `n` most frequent tokens, ties broken by token.
    pub fn most_common(&self, n: usize) -> Vec<(&str, u64)> {
        self.iter()
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
            .take(n)
            .collect()
    }

    pub fn into_inner(self) -> HashMap<String, u64> {
        self.counts
    }
}

impl From<HashMap<String, u64>> for Tally {
    fn from(mut counts: HashMap<String, u64>) -> Self {
        counts.retain(|_, count| *count > 0);
        Self { counts }
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for Tally {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for (token, count) in iter {
            tally.add_count(token, count);
        }
        tally
    }
}

impl IntoIterator for Tally {
    type Item = (String, u64);
    type IntoIter = hash_map::IntoIter<String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

/// Merges partial tallies into one. The result does not depend on the order of `parts`.
pub fn aggregate<I: IntoIterator<Item = Tally>>(parts: I) -> Tally {
    parts.into_iter().fold(Tally::new(), |mut acc, part| {
        acc.merge(part);
        acc
    })
}
