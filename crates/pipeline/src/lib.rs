//! # Wordhash Pipeline
//!
//! Concurrent word hashing with a deduplicated digest -> word table.
//!
//! ## Pipeline
//!
//! ```text
//! Sources (one reader task each)
//!     │
//!     ├──> word queue (bounded)
//!     │      └─> Hasher pool (N workers, SHA-256 by default)
//!     │
//!     ├──> pair queue (bounded)
//!     │      └─> Aggregator (single owner of the table)
//!     │
//!     └──> ResultTable (handed back once the aggregator is done)
//! ```
//!
//! Shutdown is ordered: the word queue closes only after every reader has
//! finished, the pair queue only after every hasher has finished. A source
//! that fails to open or read is reported and skipped; the run still
//! completes with the words from every other source.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wordhash_pipeline::{hash_words, MemorySource, PipelineConfig, WordSource};
//!
//! #[tokio::main]
//! async fn main() -> wordhash_pipeline::Result<()> {
//!     let sources: Vec<Arc<dyn WordSource>> =
//!         vec![Arc::new(MemorySource::new("inline", "apple\nbanana\napple\n"))];
//!     let report = hash_words(sources, PipelineConfig::default()).await?;
//!
//!     for (digest, word) in report.table.iter() {
//!         println!("{digest} : {word}");
//!     }
//!     Ok(())
//! }
//! ```

mod aggregator;
mod config;
mod coordinator;
mod digest;
mod error;
mod hasher;
mod reader;
mod source;
mod stats;

pub use aggregator::ResultTable;
pub use config::{
    PipelineConfig, DEFAULT_HASHERS, DEFAULT_MAX_WORD_BYTES, DEFAULT_QUEUE_CAPACITY,
    HASHERS_ENV, MAX_HASHERS, QUEUE_CAPACITY_ENV,
};
pub use coordinator::{hash_words, Pipeline, PipelinePhase, PipelineReport};
pub use digest::{Digest, Pair, Sha256Hasher, Word, WordHasher, DIGEST_LEN};
pub use error::{PipelineError, Result, SourceError, SourceErrorKind};
pub use source::{MemorySource, SourceStream, WordSource};
pub use stats::{PipelineStats, SourceFailure};
