// src/scrape.rs
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc, mpsc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    thread,
};

use thiserror::Error;

use crate::{
    config::{ConfigError, consts::HTML_EXTENSIONS, options::{Alignment, ScrapeOptions}},
    progress::Progress,
    specs::reviews::{self, DocumentError, Extraction, Markers, ScanStats},
    store::DataSet,
};

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("no input documents")]
    NoInputs,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    #[error("all {0} documents failed")]
    AllFailed(usize),
}

/// One document's extraction result.
#[derive(Clone, Debug)]
pub struct DocumentTable {
    /// Position in the resolved input list.
    pub index: usize,
    pub source: PathBuf,
    pub extraction: Extraction,
}

impl DocumentTable {
    pub fn dataset(&self) -> DataSet {
        DataSet::from_records(self.extraction.records.iter().cloned())
    }
}

#[derive(Clone, Debug)]
pub struct DocumentFailure {
    pub index: usize,
    pub source: PathBuf,
    pub reason: String,
}

/// Everything collected in one run, in input order.
#[derive(Clone, Debug, Default)]
pub struct Batch {
    pub documents: Vec<DocumentTable>,
    pub failures: Vec<DocumentFailure>,
}

impl Batch {
    /// All documents' rows concatenated in input order. No cross-document dedup.
    pub fn merged(&self) -> DataSet {
        DataSet::concat(self.documents.iter().map(DocumentTable::dataset))
    }

    pub fn record_count(&self) -> usize {
        self.documents.iter().map(|d| d.extraction.records.len()).sum()
    }

    /// Field-wise sum of every document's stats (alignment left at default).
    pub fn totals(&self) -> ScanStats {
        self.documents.iter().fold(ScanStats::default(), |mut acc, d| {
            let s = &d.extraction.stats;
            acc.containers += s.containers;
            acc.names += s.names;
            acc.ratings += s.ratings;
            acc.titles += s.titles;
            acc.bodies += s.bodies;
            acc.assembled += s.assembled;
            acc.truncated += s.truncated;
            acc.duplicates += s.duplicates;
            acc
        })
    }

    /// Records with at least one absent field.
    pub fn incomplete_count(&self) -> usize {
        self.documents
            .iter()
            .flat_map(|d| d.extraction.diagnostics.iter())
            .filter(|diag| !diag.is_clean())
            .count()
    }
}

/// Expand directories to their HTML files (sorted by name); other paths pass
/// through untouched so a missing file fails as its own document.
pub fn resolve_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>, ScrapeError> {
    let mut out = Vec::new();
    for p in paths {
        if !p.is_dir() {
            out.push(p.clone());
            continue;
        }
        let entries = fs::read_dir(p).map_err(|source| ScrapeError::Read { path: p.clone(), source })?;
        let mut found: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| ScrapeError::Read { path: p.clone(), source })?
                .path();
            if path.is_file() && is_html(&path) {
                found.push(path);
            }
        }
        found.sort();
        logd!("{}: {} html file(s)", p.display(), found.len());
        out.extend(found);
    }
    Ok(out)
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| HTML_EXTENSIONS.iter().any(|h| e.eq_ignore_ascii_case(h)))
}

/// Read and extract a single file.
pub fn extract_file(path: &Path, markers: &Markers, alignment: Alignment) -> Result<Extraction, ScrapeError> {
    let bytes = fs::read(path).map_err(|source| ScrapeError::Read { path: path.to_path_buf(), source })?;
    reviews::extract_bytes(&bytes, markers, alignment)
        .map_err(|source| ScrapeError::Document { path: path.to_path_buf(), source })
}

/// Extract every input document on a small worker pool.
/// Failed documents are skipped and reported unless `fail_fast` is set;
/// the batch only fails outright when nothing could be extracted.
pub fn collect(
    scrape: &ScrapeOptions,
    mut progress: Option<&mut dyn Progress>,
) -> Result<Batch, ScrapeError> {
    let inputs = resolve_inputs(&scrape.inputs)?;
    if inputs.is_empty() {
        return Err(ScrapeError::NoInputs);
    }

    // Surface selector errors here, not once per worker.
    Markers::compile(&scrape.markers)?;

    if let Some(p) = progress.as_deref_mut() {
        p.begin(inputs.len());
    }
    logf!("extracting {} document(s), alignment {:?}", inputs.len(), scrape.alignment);

    // Concurrency
    type Outcome = (usize, Result<Extraction, ScrapeError>);

    let inputs = Arc::new(inputs);
    let marker_set = Arc::new(scrape.markers.clone());
    let counter = Arc::new(AtomicUsize::new(0));
    let stop = Arc::new(AtomicBool::new(false));
    let (res_tx, res_rx) = mpsc::channel::<Outcome>();

    let workers = scrape.workers.min(inputs.len()).max(1);

    for _ in 0..workers {
        let inputs = Arc::clone(&inputs);
        let set = Arc::clone(&marker_set);
        let idx = Arc::clone(&counter);
        let stop = Arc::clone(&stop);
        let tx = res_tx.clone();
        let alignment = scrape.alignment;

        thread::spawn(move || {
            // compiled selectors stay on the thread that built them
            let Ok(markers) = Markers::compile(&set) else { return };
            loop {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                let i = idx.fetch_add(1, Ordering::Relaxed);
                if i >= inputs.len() {
                    break;
                }
                let result = extract_file(&inputs[i], &markers, alignment);
                if tx.send((i, result)).is_err() {
                    break;
                }
            }
        });
    }
    drop(res_tx); // main thread is sole receiver now

    // Aggregate results
    let mut batch = Batch::default();

    for (i, result) in res_rx {
        let source = &inputs[i];
        match result {
            Ok(extraction) => {
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(i, source, extraction.records.len());
                    let stats = &extraction.stats;
                    if stats.truncated > 0 {
                        p.log(&format!(
                            "{}: {} unmatched field entries dropped (names={} ratings={} titles={} bodies={})",
                            source.display(),
                            stats.truncated,
                            stats.names,
                            stats.ratings,
                            stats.titles,
                            stats.bodies
                        ));
                    }
                }
                batch.documents.push(DocumentTable { index: i, source: source.clone(), extraction });
            }
            Err(e) => {
                loge!("{}: {}", source.display(), error_chain(&e));
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(i, source, &error_chain(&e));
                }
                if scrape.fail_fast {
                    stop.store(true, Ordering::Relaxed);
                    if let Some(p) = progress.as_deref_mut() {
                        p.finish();
                    }
                    return Err(e);
                }
                batch.failures.push(DocumentFailure {
                    index: i,
                    source: source.clone(),
                    reason: error_chain(&e),
                });
            }
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }

    // Back to input order
    batch.documents.sort_by_key(|d| d.index);
    batch.failures.sort_by_key(|f| f.index);

    if batch.documents.is_empty() {
        return Err(ScrapeError::AllFailed(batch.failures.len()));
    }
    logf!(
        "extracted {} record(s) from {} document(s), {} failed",
        batch.record_count(),
        batch.documents.len(),
        batch.failures.len()
    );
    Ok(batch)
}

/// "outer: inner: innermost" from an error's source chain.
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut cur = e.source();
    while let Some(src) = cur {
        let s = src.to_string();
        if !msg.contains(&s) {
            msg.push_str(": ");
            msg.push_str(&s);
        }
        cur = src.source();
    }
    msg
}
