use crate::file::FileSource;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wordhash_pipeline::WordSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Include hidden files and directories when walking
    pub hidden: bool,
    /// Honor .gitignore / .ignore files when walking
    pub respect_ignore_files: bool,
    /// Skip files larger than this (directory walks only)
    pub max_file_bytes: Option<u64>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            hidden: false,
            respect_ignore_files: true,
            max_file_bytes: None,
        }
    }
}

/// Expands input paths into file sources
pub struct SourceScanner {
    roots: Vec<PathBuf>,
    options: ScanOptions,
}

impl SourceScanner {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            roots: roots
                .into_iter()
                .map(|root| root.as_ref().to_path_buf())
                .collect(),
            options: ScanOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve every root to a list of file paths.
    ///
    /// Plain files and missing paths are kept in argument order (a missing
    /// path fails later as an open error). Directory contents are sorted.
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for root in &self.roots {
            if root.is_dir() {
                let mut found = self.walk(root);
                found.sort();
                files.extend(found);
            } else {
                if !root.exists() {
                    log::debug!("{} does not exist; keeping it to report", root.display());
                }
                files.push(root.clone());
            }
        }

        log::info!("Found {} input files", files.len());
        files
    }

    pub fn sources(&self) -> Vec<Arc<dyn WordSource>> {
        self.scan()
            .into_iter()
            .map(|path| Arc::new(FileSource::new(path)) as Arc<dyn WordSource>)
            .collect()
    }

    fn walk(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(!self.options.hidden)
            .git_ignore(self.options.respect_ignore_files)
            .git_global(self.options.respect_ignore_files)
            .git_exclude(self.options.respect_ignore_files)
            .ignore(self.options.respect_ignore_files)
            .require_git(false);

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if let (Some(limit), Ok(meta)) = (self.options.max_file_bytes, entry.metadata())
                    {
                        if meta.len() > limit {
                            log::debug!(
                                "Skipping large file {} ({} bytes > {})",
                                path.display(),
                                meta.len(),
                                limit
                            );
                            continue;
                        }
                    }

                    files.push(path.to_path_buf());
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files
    }
}
