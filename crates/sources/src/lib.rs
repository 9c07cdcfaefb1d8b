//! # Wordhash Sources
//!
//! Turns command-line paths into [`WordSource`](wordhash_pipeline::WordSource)s.
//! Files are used as given; directories are walked (.gitignore aware).

mod file;
mod scanner;

pub use file::FileSource;
pub use scanner::{ScanOptions, SourceScanner};
