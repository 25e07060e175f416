// src/runner.rs
use std::path::PathBuf;

use crate::{
    config::{
        consts::{BODY_COL, DEFAULT_TOP_WORDS, HEADERS},
        options::{AppOptions, ExportOptions, ExportType},
    },
    error::Error,
    file::{export_dataset, write_export_single},
    progress::Progress,
    scrape::{self, DocumentFailure},
    sentiment::{SentimentAnalyzer, SentimentCounts, word_frequencies},
    specs::reviews::ScanStats,
    store::{DataSet, load_table},
};

/// Summary of what `run_extract` produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files_written: Vec<PathBuf>,
    pub documents: usize,
    pub records: usize,
    /// Records with at least one field that couldn't be located.
    pub incomplete: usize,
    pub failures: Vec<DocumentFailure>,
    /// Marker counts, truncation and duplicates summed over all documents.
    pub totals: ScanStats,
    pub sentiment: Option<SentimentCounts>,
}

/// Collect, optionally score, export.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run_extract(
    opts: &AppOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, Error> {
    let batch = scrape::collect(&opts.scrape, progress)?;

    let mut merged = batch.merged();
    let mut per_doc: Vec<(PathBuf, DataSet)> = match opts.export.export_type {
        ExportType::PerDocument => batch
            .documents
            .iter()
            .map(|d| (d.source.clone(), d.dataset()))
            .collect(),
        ExportType::SingleFile => Vec::new(),
    };

    let sentiment = if opts.scrape.sentiment {
        let analyzer = SentimentAnalyzer::new();
        let counts = analyzer.score_dataset(&mut merged, BODY_COL);
        for (_, ds) in per_doc.iter_mut() {
            analyzer.score_dataset(ds, BODY_COL);
        }
        Some(counts)
    } else {
        None
    };

    let files_written = export_dataset(&opts.export, &merged, &per_doc)?;

    Ok(RunSummary {
        files_written,
        documents: batch.documents.len(),
        records: merged.len(),
        incomplete: batch.incomplete_count(),
        totals: batch.totals(),
        failures: batch.failures,
        sentiment,
    })
}

#[derive(Clone, Debug)]
pub struct AnalyzeOptions {
    pub table: PathBuf,
    pub column: String,
    /// Write the scored table when set.
    pub export: Option<ExportOptions>,
    pub top: usize,
}

impl AnalyzeOptions {
    pub fn new(table: impl Into<PathBuf>) -> Self {
        Self {
            table: table.into(),
            column: s!(HEADERS[BODY_COL]),
            export: None,
            top: DEFAULT_TOP_WORDS,
        }
    }
}

#[derive(Debug, Default)]
pub struct AnalyzeSummary {
    pub rows: usize,
    pub counts: SentimentCounts,
    pub top_words: Vec<(String, usize)>,
    pub files_written: Vec<PathBuf>,
}

/// Score one column of a saved table and tally labels and words.
pub fn run_analyze(opts: &AnalyzeOptions) -> Result<AnalyzeSummary, Error> {
    let mut ds = load_table(&opts.table)?;
    let col = ds.column_index(&opts.column).ok_or_else(|| Error::MissingColumn {
        column: opts.column.clone(),
        path: opts.table.clone(),
    })?;

    let top_words = word_frequencies((0..ds.len()).map(|i| ds.cell(i, col)), opts.top);
    let counts = SentimentAnalyzer::new().score_dataset(&mut ds, col);
    logf!(
        "{}: {} positive, {} negative, {} neutral",
        opts.table.display(),
        counts.positive,
        counts.negative,
        counts.neutral
    );

    let files_written = match &opts.export {
        Some(export) => vec![write_export_single(export, &ds)?],
        None => Vec::new(),
    };

    Ok(AnalyzeSummary { rows: ds.len(), counts, top_words, files_written })
}
