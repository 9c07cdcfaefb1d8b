use crate::error::{SourceError, SourceErrorKind};
use serde::Serialize;

/// Counters collected over one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Number of sources handed to the pipeline
    pub sources: usize,

    /// Sources that failed to open or read
    pub sources_failed: usize,

    /// Words pushed onto the word queue
    pub words_read: u64,

    /// Pairs produced by the hasher pool
    pub pairs_hashed: u64,

    /// Insert attempts made by the aggregator
    pub inserted: u64,

    /// Inserts that replaced an existing entry
    pub overwritten: u64,

    /// Distinct digests in the final table
    pub entries: usize,

    /// Hasher pool size used for the run
    pub hashers: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl PipelineStats {
    pub fn new(sources: usize, hashers: usize) -> Self {
        Self {
            sources,
            hashers,
            ..Self::default()
        }
    }

    pub fn add_source(&mut self, words: u64, failed: bool) {
        self.words_read += words;
        if failed {
            self.sources_failed += 1;
        }
    }
}

/// A source that was skipped (fully or partly) during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub source: String,
    pub kind: SourceErrorKind,
    pub message: String,
    /// Words from this source that made it into the pipeline before the failure
    pub words_before_failure: u64,
}

impl SourceFailure {
    pub fn from_error(error: &SourceError, words_before_failure: u64) -> Self {
        Self {
            source: error.source_name().to_string(),
            kind: error.kind(),
            message: error.to_string(),
            words_before_failure,
        }
    }
}
