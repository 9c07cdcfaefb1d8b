use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{stage} task panicked: {message}")]
    TaskPanicked { stage: &'static str, message: String },
}

/// Failure of a single input source. Never fatal for the run.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to open {source_name}: {error}")]
    Open {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("failed to read {source_name}: {error}")]
    Read {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("{source_name}: word exceeds {limit} bytes")]
    WordTooLong { source_name: String, limit: usize },
}

impl SourceError {
    pub fn source_name(&self) -> &str {
        match self {
            Self::Open { source_name, .. }
            | Self::Read { source_name, .. }
            | Self::WordTooLong { source_name, .. } => source_name,
        }
    }

    pub fn kind(&self) -> SourceErrorKind {
        match self {
            Self::Open { .. } => SourceErrorKind::Open,
            Self::Read { .. } | Self::WordTooLong { .. } => SourceErrorKind::Read,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceErrorKind {
    Open,
    Read,
}
