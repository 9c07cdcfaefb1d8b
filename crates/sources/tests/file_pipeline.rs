use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use wordhash_pipeline::{hash_words, PipelineConfig, Sha256Hasher, SourceErrorKind, WordHasher};
use wordhash_sources::SourceScanner;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn hashes_every_file_under_a_directory() {
    let temp = TempDir::new().expect("tempdir");
    fs::write(temp.path().join("a.txt"), "apple\nbanana\n").expect("write a");
    fs::create_dir_all(temp.path().join("more")).expect("mkdir");
    fs::write(temp.path().join("more").join("b.txt"), "banana\ncherry\r\n").expect("write b");

    let sources = SourceScanner::new([temp.path()]).sources();
    assert_eq!(sources.len(), 2);

    let report = hash_words(sources, PipelineConfig::default())
        .await
        .expect("run");
    let hasher = Sha256Hasher::new();
    assert_eq!(report.table.len(), 3);
    for word in ["apple", "banana", "cherry"] {
        assert!(
            report.table.contains(&hasher.digest(word.as_bytes())),
            "missing {word}"
        );
    }
    assert!(report.table.verify(&hasher));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_file_is_reported_while_others_complete() {
    let temp = TempDir::new().expect("tempdir");
    let good = temp.path().join("good.txt");
    fs::write(&good, "one\ntwo\n").expect("write");
    let missing = temp.path().join("missing.txt");

    let sources = SourceScanner::new([good, missing.clone()]).sources();
    let report = hash_words(sources, PipelineConfig::default())
        .await
        .expect("run");

    assert_eq!(report.table.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind, SourceErrorKind::Open);
    assert_eq!(report.failures[0].source, missing.display().to_string());
}
