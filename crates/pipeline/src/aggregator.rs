use crate::digest::{Digest, Pair, Word, WordHasher};
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Deduplicated digest -> word table.
///
/// Only the aggregator task mutates it; everyone else gets it by value once
/// the aggregator has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    entries: HashMap<Digest, Word>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins. Returns the word previously stored under the digest.
    pub(crate) fn insert(&mut self, pair: Pair) -> Option<Word> {
        self.entries.insert(pair.digest, pair.word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, digest: &Digest) -> Option<&Word> {
        self.entries.get(digest)
    }

    pub fn contains(&self, digest: &Digest) -> bool {
        self.entries.contains_key(digest)
    }

    /// Iteration order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&Digest, &Word)> {
        self.entries.iter()
    }

    pub fn sorted_entries(&self) -> Vec<(&Digest, &Word)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn into_sorted_entries(self) -> Vec<(Digest, Word)> {
        let mut entries: Vec<_> = self.entries.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Every stored word hashes back to its key.
    pub fn verify(&self, hasher: &dyn WordHasher) -> bool {
        self.entries
            .iter()
            .all(|(digest, word)| hasher.digest(word.as_bytes()) == *digest)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct AggregateCounts {
    pub inserted: u64,
    pub overwritten: u64,
}

/// Single consumer of the pair queue. Returns the final table once the queue
/// is closed and drained.
pub(crate) async fn run_aggregator(
    mut pairs: mpsc::Receiver<Pair>,
) -> (ResultTable, AggregateCounts) {
    let mut table = ResultTable::new();
    let mut counts = AggregateCounts::default();

    while let Some(pair) = pairs.recv().await {
        let digest = pair.digest;
        counts.inserted += 1;
        if let Some(previous) = table.insert(pair) {
            counts.overwritten += 1;
            if let Some(current) = table.get(&digest).filter(|w| **w != previous) {
                log::warn!("Digest collision on {digest}: {previous:?} replaced by {current:?}");
            }
        }
    }

    log::debug!(
        "Aggregator drained: {} inserts, {} overwrites, {} entries",
        counts.inserted,
        counts.overwritten,
        table.len()
    );
    (table, counts)
}
