use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use wordhash_pipeline::{Pipeline, PipelineConfig, DEFAULT_MAX_WORD_BYTES};
use wordhash_sources::{ScanOptions, SourceScanner};

mod report;

pub use report::{render_json, render_text};

const DEFAULT_WORDS_PATH: &str = "/usr/share/dict/words";

fn print_stdout(bytes: &[u8]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout.write_all(bytes).and_then(|_| stdout.flush()) {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "wordhash")]
#[command(about = "Hash every word of the given word lists into a deduplicated digest table", long_about = None)]
#[command(version)]
struct Cli {
    /// Word lists (files or directories), one word per line
    #[arg(default_value = DEFAULT_WORDS_PATH)]
    paths: Vec<PathBuf>,

    /// Hasher pool size (overrides WORDHASH_HASHERS)
    #[arg(long)]
    hashers: Option<usize>,

    /// Capacity of both handoff queues (overrides WORDHASH_QUEUE_CAPACITY)
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Longest accepted word in bytes; longer lines fail their source
    #[arg(long, default_value_t = DEFAULT_MAX_WORD_BYTES)]
    max_word_bytes: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Sort entries by digest instead of table order
    #[arg(long)]
    sorted: bool,

    /// Print run statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Include hidden files when walking directories
    #[arg(long)]
    hidden: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::from_env().with_max_word_bytes(self.max_word_bytes);
        if let Some(hashers) = self.hashers {
            config = config.with_hashers(hashers);
        }
        if let Some(capacity) = self.queue_capacity {
            config = config.with_queue_capacity(capacity);
        }
        config
    }

    fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            hidden: self.hidden,
            ..ScanOptions::default()
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // stdout carries the table; logs never go there
    builder.target(env_logger::Target::Stderr).init();
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = cli.pipeline_config();
    let sources = SourceScanner::new(&cli.paths)
        .with_options(cli.scan_options())
        .sources();

    let mut pipeline = Pipeline::with_default_hasher(config);
    let report = pipeline
        .run(sources)
        .await
        .context("Word hashing pipeline failed")?;

    let output = match cli.format {
        OutputFormat::Text => render_text(&report, cli.sorted),
        OutputFormat::Json => render_json(&report, cli.sorted)?.into_bytes(),
    };
    print_stdout(&output)?;

    if cli.stats {
        let stats = serde_json::to_string(&report.stats).context("Failed to encode stats")?;
        eprintln!("{stats}");
    }

    if report.all_sources_failed() {
        anyhow::bail!(
            "None of the {} input sources could be read",
            report.stats.sources
        );
    }
    Ok(())
}
