use crate::aggregator::{run_aggregator, ResultTable};
use crate::config::PipelineConfig;
use crate::digest::{Sha256Hasher, WordHasher};
use crate::error::{PipelineError, Result};
use crate::hasher::{run_hasher, SharedWordQueue};
use crate::reader::run_reader;
use crate::source::WordSource;
use crate::stats::{PipelineStats, SourceFailure};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinError;

/// Shutdown progress of a single run. Moves forward within a run; the next
/// run starts again at `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    Running,
    ReadersDraining,
    HashersDraining,
    AggregatorDraining,
    Done,
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Running => "running",
            Self::ReadersDraining => "readers_draining",
            Self::HashersDraining => "hashers_draining",
            Self::AggregatorDraining => "aggregator_draining",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Outcome of a finished run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub table: ResultTable,
    pub stats: PipelineStats,
    pub failures: Vec<SourceFailure>,
}

impl PipelineReport {
    /// True when sources were given and none of them could be read.
    pub fn all_sources_failed(&self) -> bool {
        self.stats.sources > 0 && self.stats.sources_failed == self.stats.sources
    }
}

/// Wires readers, the hasher pool and the aggregator together and drives the
/// ordered shutdown: readers -> word queue closed -> hashers -> pair queue
/// closed -> aggregator -> done.
pub struct Pipeline {
    config: PipelineConfig,
    hasher: Arc<dyn WordHasher>,
    phase_tx: watch::Sender<PipelinePhase>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, hasher: Arc<dyn WordHasher>) -> Self {
        let (phase_tx, _) = watch::channel(PipelinePhase::Running);
        Self {
            config,
            hasher,
            phase_tx,
        }
    }

    pub fn with_default_hasher(config: PipelineConfig) -> Self {
        Self::new(config, Arc::new(Sha256Hasher::new()))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn phase(&self) -> PipelinePhase {
        *self.phase_tx.borrow()
    }

    /// Observe phase transitions of the current (or next) run.
    ///
    /// The watch channel coalesces updates, so a slow receiver may skip
    /// intermediate phases but always ends on `Done`.
    pub fn subscribe_phase(&self) -> watch::Receiver<PipelinePhase> {
        self.phase_tx.subscribe()
    }

    fn set_phase(&self, phase: PipelinePhase) {
        log::debug!("Pipeline phase -> {phase}");
        self.phase_tx.send_replace(phase);
    }

    /// Run the pipeline to completion over `sources`.
    ///
    /// Source failures are collected into the report. A panicking task is
    /// reported as an error, but only after every stage has been drained.
    /// Takes `&mut self` so two runs never share one phase channel.
    pub async fn run(&mut self, sources: Vec<Arc<dyn WordSource>>) -> Result<PipelineReport> {
        self.config.validate()?;
        let started = Instant::now();
        let config = self.config;
        let mut stats = PipelineStats::new(sources.len(), config.hashers);
        let mut failures = Vec::new();
        let mut panicked: Option<PipelineError> = None;

        log::info!(
            "Hashing words from {} sources with {} hashers",
            sources.len(),
            config.hashers
        );
        self.set_phase(PipelinePhase::Running);

        let (word_tx, word_rx) = mpsc::channel(config.word_queue_capacity);
        let (pair_tx, pair_rx) = mpsc::channel(config.pair_queue_capacity);

        let aggregator = tokio::spawn(run_aggregator(pair_rx));

        let word_queue: SharedWordQueue = Arc::new(Mutex::new(word_rx));
        let hashers: Vec<_> = (0..config.hashers)
            .map(|worker| {
                tokio::spawn(run_hasher(
                    worker,
                    word_queue.clone(),
                    pair_tx.clone(),
                    self.hasher.clone(),
                ))
            })
            .collect();
        // The pool must own the receiver alone, otherwise readers could block
        // forever if every hasher exits early.
        drop(word_queue);

        let readers: Vec<_> = sources
            .into_iter()
            .map(|source| {
                let name = source.name();
                let handle = tokio::spawn(run_reader(
                    source,
                    word_tx.clone(),
                    config.max_word_bytes,
                ));
                (name, handle)
            })
            .collect();

        self.set_phase(PipelinePhase::ReadersDraining);
        for (name, reader) in readers {
            match reader.await {
                Ok(outcome) => {
                    log::debug!("Source {} done: {} words", outcome.source, outcome.words);
                    stats.add_source(outcome.words, outcome.error.is_some());
                    if let Some(error) = outcome.error {
                        log::warn!("Skipping rest of source: {error}");
                        failures.push(SourceFailure::from_error(&error, outcome.words));
                    }
                }
                Err(err) => {
                    log::error!("Reader for {name} did not finish");
                    stats.add_source(0, true);
                    record_panic(&mut panicked, "reader", err);
                }
            }
        }

        // Every reader has finished, so nothing can still send words.
        drop(word_tx);
        self.set_phase(PipelinePhase::HashersDraining);
        for hasher in hashers {
            match hasher.await {
                Ok(produced) => stats.pairs_hashed += produced,
                Err(err) => record_panic(&mut panicked, "hasher", err),
            }
        }

        // Every hasher has finished, so nothing can still send pairs.
        drop(pair_tx);
        self.set_phase(PipelinePhase::AggregatorDraining);
        let aggregated = aggregator.await;
        self.set_phase(PipelinePhase::Done);

        let (table, counts) = match aggregated {
            Ok(result) => result,
            Err(err) => {
                record_panic(&mut panicked, "aggregator", err);
                (ResultTable::new(), Default::default())
            }
        };
        if let Some(err) = panicked {
            return Err(err);
        }

        stats.inserted = counts.inserted;
        stats.overwritten = counts.overwritten;
        stats.entries = table.len();
        stats.time_ms = started.elapsed().as_millis() as u64;

        log::info!(
            "Hashed {} words into {} distinct digests in {} ms ({} sources failed)",
            stats.words_read,
            stats.entries,
            stats.time_ms,
            stats.sources_failed
        );

        Ok(PipelineReport {
            table,
            stats,
            failures,
        })
    }
}

fn record_panic(slot: &mut Option<PipelineError>, stage: &'static str, err: JoinError) {
    log::error!("{stage} task failed: {err}");
    if slot.is_none() {
        *slot = Some(PipelineError::TaskPanicked {
            stage,
            message: err.to_string(),
        });
    }
}

/// One-shot helper: run a SHA-256 pipeline over `sources`.
pub async fn hash_words(
    sources: Vec<Arc<dyn WordSource>>,
    config: PipelineConfig,
) -> Result<PipelineReport> {
    Pipeline::with_default_hasher(config).run(sources).await
}
