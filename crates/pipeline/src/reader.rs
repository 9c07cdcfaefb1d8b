use crate::digest::Word;
use crate::error::SourceError;
use crate::source::WordSource;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// What a single reader task hands back to the coordinator.
#[derive(Debug)]
pub(crate) struct ReaderOutcome {
    pub source: String,
    pub words: u64,
    pub error: Option<SourceError>,
}

#[derive(Debug)]
enum LineError {
    Io(io::Error),
    TooLong,
}

impl From<io::Error> for LineError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Reads every word of `source` into the word queue.
///
/// Always returns (never panics on source failures) so the coordinator can
/// count this reader as complete.
pub(crate) async fn run_reader(
    source: Arc<dyn WordSource>,
    words: mpsc::Sender<Word>,
    max_word_bytes: usize,
) -> ReaderOutcome {
    let name = source.name();
    let mut outcome = ReaderOutcome {
        source: name.clone(),
        words: 0,
        error: None,
    };

    let stream = match source.open().await {
        Ok(stream) => stream,
        Err(error) => {
            outcome.error = Some(SourceError::Open {
                source_name: name,
                error,
            });
            return outcome;
        }
    };

    log::debug!("Reading words from {name}");
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        match next_word(&mut reader, &mut buf, max_word_bytes).await {
            Ok(Some(word)) => {
                if words.send(word).await.is_err() {
                    log::debug!("Word queue dropped while reading {name}; stopping");
                    break;
                }
                outcome.words += 1;
            }
            Ok(None) => break,
            Err(LineError::Io(error)) => {
                outcome.error = Some(SourceError::Read {
                    source_name: name.clone(),
                    error,
                });
                break;
            }
            Err(LineError::TooLong) => {
                outcome.error = Some(SourceError::WordTooLong {
                    source_name: name.clone(),
                    limit: max_word_bytes,
                });
                break;
            }
        }
    }

    outcome
}

/// Next newline-delimited word, or `None` at end of stream.
///
/// A trailing `\r` is dropped and a final unterminated line still counts.
async fn next_word<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    limit: usize,
) -> Result<Option<Word>, LineError>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let mut read_any = false;

    loop {
        let (used, terminated) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                break;
            }
            read_any = true;
            match available.iter().position(|&b| b == b'\n') {
                Some(idx) => {
                    buf.extend_from_slice(&available[..idx]);
                    (idx + 1, true)
                }
                None => {
                    buf.extend_from_slice(available);
                    (available.len(), false)
                }
            }
        };
        reader.consume(used);

        // One extra byte of slack for a trailing '\r'.
        if buf.len() > limit.saturating_add(1) {
            return Err(LineError::TooLong);
        }
        if terminated {
            break;
        }
    }

    if !read_any {
        return Ok(None);
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    if buf.len() > limit {
        return Err(LineError::TooLong);
    }
    Ok(Some(Word::new(buf.as_slice())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MemorySource, SourceStream};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    async fn words_of(input: &[u8], limit: usize) -> Result<Vec<String>, String> {
        let mut reader = BufReader::new(input);
        let mut buf = Vec::new();
        let mut out = Vec::new();
        loop {
            match next_word(&mut reader, &mut buf, limit).await {
                Ok(Some(word)) => out.push(word.to_string()),
                Ok(None) => return Ok(out),
                Err(LineError::TooLong) => return Err("too long".to_string()),
                Err(LineError::Io(e)) => return Err(e.to_string()),
            }
        }
    }

    #[tokio::test]
    async fn splits_on_newlines_and_strips_carriage_returns() {
        let words = words_of(b"apple\r\nbanana\ncherry", 64).await.unwrap();
        assert_eq!(words, vec!["apple", "banana", "cherry"]);
    }

    #[tokio::test]
    async fn keeps_empty_lines_as_empty_words() {
        let words = words_of(b"a\n\nb\n", 64).await.unwrap();
        assert_eq!(words, vec!["a", "", "b"]);
    }

    #[tokio::test]
    async fn empty_stream_yields_nothing() {
        assert_eq!(words_of(b"", 64).await.unwrap(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn rejects_words_over_the_limit() {
        assert!(words_of(b"short\nwaytoolong\n", 5).await.is_err());
        assert_eq!(words_of(b"exact\r\n", 5).await.unwrap(), vec!["exact"]);
    }

    #[tokio::test]
    async fn reader_reports_partial_progress_on_too_long_word() {
        let (tx, mut rx) = mpsc::channel(8);
        let source = Arc::new(MemorySource::new("mem", "ok\nthis-is-too-long\nlater\n"));
        let outcome = run_reader(source, tx, 4).await;

        assert_eq!(outcome.words, 1);
        assert!(matches!(
            outcome.error,
            Some(SourceError::WordTooLong { limit: 4, .. })
        ));
        assert_eq!(rx.recv().await, Some(Word::from("ok")));
        assert_eq!(rx.recv().await, None);
    }

    struct Unopenable;

    #[async_trait]
    impl WordSource for Unopenable {
        fn name(&self) -> String {
            "missing".to_string()
        }

        async fn open(&self) -> io::Result<SourceStream> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such source"))
        }
    }

    #[tokio::test]
    async fn open_failure_is_reported_not_raised() {
        let (tx, _rx) = mpsc::channel(1);
        let outcome = run_reader(Arc::new(Unopenable), tx, 64).await;
        assert_eq!(outcome.words, 0);
        assert_eq!(outcome.source, "missing");
        assert!(matches!(outcome.error, Some(SourceError::Open { .. })));
    }

    #[tokio::test]
    async fn stops_quietly_when_queue_is_gone() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let source = Arc::new(MemorySource::new("mem", "a\nb\n"));
        let outcome = run_reader(source, tx, 64).await;
        assert_eq!(outcome.words, 0);
        assert!(outcome.error.is_none());
    }
}
