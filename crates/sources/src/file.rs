use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use wordhash_pipeline::{SourceStream, WordSource};

/// A word list on disk. Opened lazily by the reader that consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl WordSource for FileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn open(&self) -> io::Result<SourceStream> {
        let file = tokio::fs::File::open(&self.path).await?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn opens_existing_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("words.txt");
        tokio::fs::write(&path, "one\ntwo\n").await.unwrap();

        let source = FileSource::new(&path);
        let mut stream = source.open().await.unwrap();
        let mut body = String::new();
        stream.read_to_string(&mut body).await.unwrap();
        assert_eq!(body, "one\ntwo\n");
        assert!(source.name().ends_with("words.txt"));
    }

    #[tokio::test]
    async fn missing_file_fails_on_open() {
        let source = FileSource::new("/definitely/not/here.txt");
        let err = source.open().await.err().expect("open must fail");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
