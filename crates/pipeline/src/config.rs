use crate::error::{PipelineError, Result};

pub const DEFAULT_HASHERS: usize = 8;
pub const MAX_HASHERS: usize = 256;
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;
pub const MAX_QUEUE_CAPACITY: usize = 1 << 20;
/// Longest accepted line, matching the classic line-scanner token limit.
pub const DEFAULT_MAX_WORD_BYTES: usize = 64 * 1024;

pub const HASHERS_ENV: &str = "WORDHASH_HASHERS";
pub const QUEUE_CAPACITY_ENV: &str = "WORDHASH_QUEUE_CAPACITY";

/// Tunables for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of hasher workers in the pool.
    pub hashers: usize,
    /// Capacity of the reader -> hasher queue.
    pub word_queue_capacity: usize,
    /// Capacity of the hasher -> aggregator queue.
    pub pair_queue_capacity: usize,
    /// Lines longer than this fail their source with a read error.
    pub max_word_bytes: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            hashers: DEFAULT_HASHERS,
            word_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            pair_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_word_bytes: DEFAULT_MAX_WORD_BYTES,
        }
    }
}

impl PipelineConfig {
    /// Defaults, overridden by `WORDHASH_HASHERS` and `WORDHASH_QUEUE_CAPACITY`.
    ///
    /// Unset, blank or non-numeric values fall back to the default. Numeric
    /// values are taken as-is, so out-of-range ones fail [`Self::validate`]
    /// exactly like the equivalent CLI flags.
    pub fn from_env() -> Self {
        let hashers = std::env::var(HASHERS_ENV).ok();
        let capacity = std::env::var(QUEUE_CAPACITY_ENV).ok();
        Self::from_raw(hashers.as_deref(), capacity.as_deref())
    }

    fn from_raw(hashers: Option<&str>, capacity: Option<&str>) -> Self {
        let capacity = parse_or(capacity, DEFAULT_QUEUE_CAPACITY);
        Self {
            hashers: parse_or(hashers, DEFAULT_HASHERS),
            word_queue_capacity: capacity,
            pair_queue_capacity: capacity,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_hashers(mut self, hashers: usize) -> Self {
        self.hashers = hashers;
        self
    }

    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.word_queue_capacity = capacity;
        self.pair_queue_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_max_word_bytes(mut self, limit: usize) -> Self {
        self.max_word_bytes = limit;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.hashers == 0 || self.hashers > MAX_HASHERS {
            return Err(PipelineError::InvalidConfig(format!(
                "hashers must be in 1..={MAX_HASHERS}, got {}",
                self.hashers
            )));
        }
        for capacity in [self.word_queue_capacity, self.pair_queue_capacity] {
            if capacity == 0 || capacity > MAX_QUEUE_CAPACITY {
                return Err(PipelineError::InvalidConfig(format!(
                    "queue capacity must be in 1..={MAX_QUEUE_CAPACITY}, got {capacity}"
                )));
            }
        }
        if self.max_word_bytes == 0 {
            return Err(PipelineError::InvalidConfig(
                "max word length must be at least 1 byte".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_or(raw: Option<&str>, default_value: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
}
