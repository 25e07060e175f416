// src/cli.rs
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};

use crate::{
    config::{
        consts::{BODY_COL, DEFAULT_TOP_WORDS, HEADERS, SETTINGS_FILE, STORE_DIR},
        options::{Alignment, AppOptions, ExportFormat, ExportOptions, ExportType},
        settings,
    },
    file::format_for_path,
    progress::Progress,
    runner::{AnalyzeOptions, run_analyze, run_extract},
};

#[derive(Parser)]
#[command(name = "review_scrape", version)]
#[command(about = "Extract customer reviews from saved product pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract reviews from HTML files (or directories of them) and export a table
    Extract(ExtractArgs),

    /// Label a saved table's review column and summarize it
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct ExtractArgs {
    /// HTML files or directories
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (or directory with --per-document)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// csv, tsv or json (default: from -o extension, else settings)
    #[arg(long)]
    format: Option<ExportFormat>,

    /// One output file per input document
    #[arg(long, conflicts_with = "single")]
    per_document: bool,

    /// One merged output file (undoes a saved per_document)
    #[arg(long)]
    single: bool,

    /// Omit the header row
    #[arg(long, conflicts_with = "include_headers")]
    no_headers: bool,

    /// Write the header row (undoes a saved include_headers=0)
    #[arg(long)]
    include_headers: bool,

    /// positional (default), container or auto
    #[arg(long)]
    alignment: Option<Alignment>,

    /// Append a Sentiments column
    #[arg(long, conflicts_with = "no_sentiment")]
    sentiment: bool,

    /// No Sentiments column, even if the settings file asks for one
    #[arg(long)]
    no_sentiment: bool,

    /// Settings file (default .store/settings.cfg)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_config: bool,

    /// Stop at the first document that can't be read or parsed
    #[arg(long, conflicts_with = "no_fail_fast")]
    fail_fast: bool,

    /// Skip unreadable documents, even if the settings file says fail_fast
    #[arg(long)]
    no_fail_fast: bool,

    /// Worker threads
    #[arg(short = 'j', long)]
    workers: Option<usize>,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// CSV/TSV table with a header row
    table: PathBuf,

    /// Column to score
    #[arg(long, default_value = HEADERS[BODY_COL])]
    column: String,

    /// Write the scored table here
    #[arg(short, long)]
    out: Option<PathBuf>,

    #[arg(long)]
    format: Option<ExportFormat>,

    /// How many frequent words to list
    #[arg(long, default_value_t = DEFAULT_TOP_WORDS)]
    top: usize,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => extract(args),
        Commands::Analyze(args) => analyze(args),
    }
}

fn extract(args: ExtractArgs) -> Result<()> {
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| Path::new(STORE_DIR).join(SETTINGS_FILE));
    let mut opts = settings::load(&config_path)
        .wrap_err_with(|| format!("loading settings from {}", config_path.display()))?;
    apply_extract_args(&mut opts, &args);

    if args.save_config {
        settings::save(&config_path, &opts)?;
        eprintln!("Saved settings to {}", config_path.display());
    }

    let mut progress = ConsoleProgress::default();
    let summary = run_extract(&opts, Some(&mut progress))?;

    for path in &summary.files_written {
        println!("{}", path.display());
    }
    eprintln!(
        "{} review(s) from {} document(s); {} incomplete, {} document(s) skipped",
        summary.records,
        summary.documents,
        summary.incomplete,
        summary.failures.len()
    );
    let totals = &summary.totals;
    if totals.truncated > 0 || totals.duplicates > 0 {
        eprintln!(
            "  {} unmatched field entries dropped, {} repeat reviewer(s) removed",
            totals.truncated, totals.duplicates
        );
    }
    for f in &summary.failures {
        eprintln!("  skipped {}: {}", f.source.display(), f.reason);
    }
    if let Some(counts) = summary.sentiment {
        for (label, n) in counts.iter() {
            eprintln!("  {label}: {n}");
        }
    }
    Ok(())
}

/// Command-line flags override whatever the settings file said.
fn apply_extract_args(opts: &mut AppOptions, args: &ExtractArgs) {
    let scrape = &mut opts.scrape;
    scrape.inputs = args.inputs.clone();
    if let Some(a) = args.alignment {
        scrape.alignment = a;
    }
    if let Some(n) = args.workers.filter(|n| *n > 0) {
        scrape.workers = n;
    }
    if let Some(on) = toggle(args.fail_fast, args.no_fail_fast) {
        scrape.fail_fast = on;
    }
    if let Some(on) = toggle(args.sentiment, args.no_sentiment) {
        scrape.sentiment = on;
    }

    let export = &mut opts.export;
    match toggle(args.per_document, args.single) {
        Some(true) => export.export_type = ExportType::PerDocument,
        Some(false) => export.export_type = ExportType::SingleFile,
        None => {}
    }
    if let Some(on) = toggle(args.include_headers, args.no_headers) {
        export.include_headers = on;
    }
    if let Some(f) = args.format {
        export.format = f;
    } else if let Some(f) = args.out.as_deref().and_then(format_for_path) {
        export.format = f;
    }
    if let Some(out) = &args.out {
        export.set_path(&out.to_string_lossy());
    }
}

/// `--x` / `--no-x` pair: `Some` only when one of them was given.
fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

fn analyze(args: AnalyzeArgs) -> Result<()> {
    let mut opts = AnalyzeOptions::new(&args.table);
    opts.column = args.column;
    opts.top = args.top;
    if let Some(out) = &args.out {
        let mut export = ExportOptions::default();
        export.format = args
            .format
            .or_else(|| format_for_path(out))
            .unwrap_or(ExportFormat::Csv);
        export.set_path(&out.to_string_lossy());
        opts.export = Some(export);
    }

    let summary = run_analyze(&opts)
        .wrap_err_with(|| format!("analyzing {}", args.table.display()))?;

    for path in &summary.files_written {
        println!("{}", path.display());
    }
    println!("{} row(s)", summary.rows);
    for (label, n) in summary.counts.iter() {
        println!("{label}\t{n}");
    }
    if !summary.top_words.is_empty() {
        println!();
        for (word, n) in &summary.top_words {
            println!("{word}\t{n}");
        }
    }
    Ok(())
}

/// Per-document lines on stderr so stdout stays the list of written files.
#[derive(Default)]
struct ConsoleProgress {
    total: usize,
    seen: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.seen = 0;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn item_done(&mut self, _index: usize, source: &Path, records: usize) {
        self.seen += 1;
        eprintln!("[{}/{}] {}: {records} review(s)", self.seen, self.total, source.display());
    }

    fn item_failed(&mut self, _index: usize, source: &Path, reason: &str) {
        self.seen += 1;
        eprintln!("[{}/{}] {}: FAILED ({reason})", self.seen, self.total, source.display());
    }
}
