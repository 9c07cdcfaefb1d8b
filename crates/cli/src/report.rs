use anyhow::Result;
use serde::Serialize;
use wordhash_pipeline::{Digest, PipelineReport, PipelineStats, SourceFailure, Word};

#[derive(Serialize)]
struct JsonEntry<'a> {
    digest: &'a Digest,
    word: &'a Word,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    entries: Vec<JsonEntry<'a>>,
    stats: &'a PipelineStats,
    failures: &'a [SourceFailure],
}

fn entries(report: &PipelineReport, sorted: bool) -> Vec<(&Digest, &Word)> {
    if sorted {
        report.table.sorted_entries()
    } else {
        report.table.iter().collect()
    }
}

/// One `<digest-hex> : <word>` line per entry, with the word's raw bytes.
pub fn render_text(report: &PipelineReport, sorted: bool) -> Vec<u8> {
    let mut out = Vec::new();
    for (digest, word) in entries(report, sorted) {
        out.extend_from_slice(digest.to_hex().as_bytes());
        out.extend_from_slice(b" : ");
        out.extend_from_slice(word.as_bytes());
        out.push(b'\n');
    }
    out
}

/// JSON view. Words are rendered as lossy UTF-8 strings.
pub fn render_json(report: &PipelineReport, sorted: bool) -> Result<String> {
    let body = JsonReport {
        entries: entries(report, sorted)
            .into_iter()
            .map(|(digest, word)| JsonEntry { digest, word })
            .collect(),
        stats: &report.stats,
        failures: &report.failures,
    };
    let mut json = serde_json::to_string_pretty(&body)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use wordhash_pipeline::{
        hash_words, MemorySource, PipelineConfig, Sha256Hasher, WordHasher, WordSource,
    };

    async fn report_for(body: impl Into<Vec<u8>>) -> PipelineReport {
        let sources: Vec<Arc<dyn WordSource>> = vec![Arc::new(MemorySource::new("mem", body))];
        hash_words(sources, PipelineConfig::default())
            .await
            .expect("run")
    }

    #[tokio::test]
    async fn text_lines_pair_digest_and_word() {
        let report = report_for("abc\n").await;
        assert_eq!(
            render_text(&report, true),
            b"ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad : abc\n".to_vec()
        );
    }

    #[tokio::test]
    async fn non_utf8_words_are_printed_byte_for_byte() {
        let report = report_for(vec![0xFE, b'\n', 0xFF, b'\n']).await;
        let out = render_text(&report, true);
        let hasher = Sha256Hasher::new();

        let lines: Vec<&[u8]> = out
            .split(|&b| b == b'\n')
            .filter(|line| !line.is_empty())
            .collect();
        assert_eq!(lines.len(), 2);

        let mut words = Vec::new();
        for line in lines {
            let (hex, word) = line.split_at(64);
            let word = word.strip_prefix(b" : ").expect("separator");
            assert_eq!(hasher.digest(word).to_hex().as_bytes(), hex);
            words.push(word.to_vec());
        }
        words.sort();
        assert_eq!(words, vec![vec![0xFE], vec![0xFF]]);
    }

    #[tokio::test]
    async fn empty_table_renders_nothing() {
        let report = report_for("").await;
        assert!(render_text(&report, false).is_empty());
    }

    #[tokio::test]
    async fn json_contains_entries_stats_and_failures() {
        let report = report_for("abc\nabc\n").await;
        let value: serde_json::Value =
            serde_json::from_str(&render_json(&report, true).unwrap()).unwrap();

        assert_eq!(value["entries"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["entries"][0]["word"], "abc");
        assert_eq!(
            value["entries"][0]["digest"],
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(value["stats"]["words_read"], 2);
        assert_eq!(value["stats"]["overwritten"], 1);
        assert_eq!(value["failures"].as_array().map(Vec::len), Some(0));
    }
}
