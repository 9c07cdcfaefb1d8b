use async_trait::async_trait;
use std::io;
use tokio::io::AsyncRead;

pub type SourceStream = Box<dyn AsyncRead + Send + Unpin>;

/// An openable byte stream of newline-delimited words.
///
/// Opening is deferred to the reader task so a source that cannot be opened
/// only fails its own reader.
#[async_trait]
pub trait WordSource: Send + Sync {
    /// Human readable name used in logs and failure reports.
    fn name(&self) -> String;

    async fn open(&self) -> io::Result<SourceStream>;
}

/// Source backed by an in-memory buffer.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

#[async_trait]
impl WordSource for MemorySource {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn open(&self) -> io::Result<SourceStream> {
        Ok(Box::new(io::Cursor::new(self.bytes.clone())))
    }
}
