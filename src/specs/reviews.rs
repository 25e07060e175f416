//! Page layout for customer review pages.
//!
//! Purpose:
//! - Read one saved review page and produce `ReviewRecord`s
//!   (`Customer Name, Ratings, Reviews, Review Body`).
//! - Markers default to the Amazon review layout:
//!   `span.a-profile-name`, `span.a-icon-alt`,
//!   `a.review-title-content > span.a-letter-space + span`,
//!   `span[data-hook="review-body"]`, container `div[data-hook="review"]`.
//!
//! Alignment:
//! - **Container**: one record per review container; every field is looked up
//!   inside that container only. Missing fields stay empty, the record is kept.
//! - **Positional**: four independent whole-page scans, zipped by position and
//!   truncated to the shortest scan. Anything past the shortest is dropped
//!   (counted in `ScanStats::truncated`). Only correct when every marker kind
//!   appears exactly once per review, in the same order.
//! - **Auto**: container when the page has containers, positional otherwise.
//!
//! Positional is the default. Container and auto are opt-in.
//!
//! Field lookups never fail the call. A missing or malformed field becomes an
//! empty string and the reason lands in that record's `RecordDiagnostics`.
//! The only hard failure is a document that isn't HTML at all (`DocumentError`).
//!
//! Records are deduplicated by exact `customer_name` within one call; first
//! occurrence wins. Nothing is shared between calls.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::config::options::Alignment;
use crate::core::html::{compile, looks_like_markup, next_sibling_named, text_of};
use crate::core::sanitize::preview;

static RATING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+)").expect("rating pattern is valid"));

/* ---------------- Markers ---------------- */

/// CSS selectors for each marker kind, as text (configurable).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerSet {
    pub profile_name: String,
    pub rating: String,
    pub title: String,
    /// Looked up inside each title marker; the title text is its next sibling.
    pub title_spacer: String,
    /// Tag name of the sibling that carries the title text.
    pub title_text: String,
    pub body: String,
    pub container: String,
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self {
            profile_name: s!("span.a-profile-name"),
            rating: s!("span.a-icon-alt"),
            title: s!("a.review-title-content"),
            title_spacer: s!("span.a-letter-space"),
            title_text: s!("span"),
            body: s!(r#"span[data-hook="review-body"]"#),
            container: s!(r#"div[data-hook="review"]"#),
        }
    }
}

/// Compiled `MarkerSet`. Build once per thread; `scraper` selectors are cheap
/// to match but not free to parse.
#[derive(Debug, Clone)]
pub struct Markers {
    profile_name: Selector,
    rating: Selector,
    title: Selector,
    title_spacer: Selector,
    title_text: String,
    body: Selector,
    container: Selector,
}

impl Markers {
    pub fn compile(set: &MarkerSet) -> Result<Self, ConfigError> {
        let title_text = set.title_text.trim();
        if title_text.is_empty() || !title_text.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::BadValue {
                key: s!("marker.title_text"),
                value: s!(&set.title_text),
            });
        }
        Ok(Self {
            profile_name: compile("profile name", &set.profile_name)?,
            rating: compile("rating", &set.rating)?,
            title: compile("title", &set.title)?,
            title_spacer: compile("title spacer", &set.title_spacer)?,
            title_text: title_text.to_ascii_lowercase(),
            body: compile("body", &set.body)?,
            container: compile("container", &set.container)?,
        })
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::compile(&MarkerSet::default()).expect("built-in marker selectors are valid")
    }
}

/* ---------------- Output types ---------------- */

/// One row of output.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ReviewRecord {
    pub customer_name: String,
    pub rating: String,
    pub review_title: String,
    pub review_body: String,
}

impl ReviewRecord {
    /// Row in `HEADERS` column order.
    pub fn into_row(self) -> Vec<String> {
        vec![self.customer_name, self.rating, self.review_title, self.review_body]
    }
}

/// Why a field came out empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Absence {
    /// The marker element itself wasn't there.
    MarkerMissing,
    /// Title marker present but no spacer inside it.
    NestedMarkerMissing,
    /// Spacer present but no following sibling carrying the text.
    SiblingMissing,
    /// Rating text had no `d.d` number in it.
    NoNumber,
}

impl fmt::Display for Absence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Absence::MarkerMissing => "marker missing",
            Absence::NestedMarkerMissing => "nested marker missing",
            Absence::SiblingMissing => "sibling missing",
            Absence::NoNumber => "no number",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Present(String),
    Absent(Absence),
}

impl FieldValue {
    pub fn absence(&self) -> Option<Absence> {
        match self {
            FieldValue::Present(_) => None,
            FieldValue::Absent(a) => Some(*a),
        }
    }

    pub fn into_string(self) -> String {
        match self {
            FieldValue::Present(s) => s,
            FieldValue::Absent(_) => s!(),
        }
    }
}

/// Which fields of one record were absent, and why.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RecordDiagnostics {
    pub customer_name: Option<Absence>,
    pub rating: Option<Absence>,
    pub review_title: Option<Absence>,
    pub review_body: Option<Absence>,
}

impl RecordDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.customer_name.is_none()
            && self.rating.is_none()
            && self.review_title.is_none()
            && self.review_body.is_none()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Alignment actually used (never `Auto`).
    pub alignment: Alignment,
    pub containers: usize,
    pub names: usize,
    pub ratings: usize,
    pub titles: usize,
    pub bodies: usize,
    /// Rows before deduplication.
    pub assembled: usize,
    /// Field entries dropped by positional truncation.
    pub truncated: usize,
    /// Rows removed as repeat customer names.
    pub duplicates: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extraction {
    pub records: Vec<ReviewRecord>,
    /// Aligned 1:1 with `records`.
    pub diagnostics: Vec<RecordDiagnostics>,
    pub stats: ScanStats,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("document is empty")]
    Empty,
    #[error("document contains no HTML markup")]
    NoMarkup,
    #[error("document is not valid UTF-8 (first bad byte at offset {0})")]
    NotUtf8(usize),
}

/* ---------------- Entry points ---------------- */

/// Default markers, positional alignment, records only.
/// Output length never exceeds the smallest per-marker count.
pub fn extract(document_text: &str) -> Result<Vec<ReviewRecord>, DocumentError> {
    extract_with(document_text, &Markers::default(), Alignment::Positional).map(|x| x.records)
}

/// Same as `extract_with`, for raw bytes that should be UTF-8.
pub fn extract_bytes(
    bytes: &[u8],
    markers: &Markers,
    alignment: Alignment,
) -> Result<Extraction, DocumentError> {
    let text = std::str::from_utf8(bytes).map_err(|e| DocumentError::NotUtf8(e.valid_up_to()))?;
    extract_with(text, markers, alignment)
}

pub fn extract_with(
    document_text: &str,
    markers: &Markers,
    alignment: Alignment,
) -> Result<Extraction, DocumentError> {
    if document_text.trim().is_empty() {
        return Err(DocumentError::Empty);
    }
    if !looks_like_markup(document_text) {
        return Err(DocumentError::NoMarkup);
    }

    let doc = Html::parse_document(document_text);
    if !doc.errors.is_empty() {
        logd!("reviews: parser recovered from {} markup error(s)", doc.errors.len());
    }
    let root = doc.root_element();

    let containers: Vec<ElementRef<'_>> = root.select(&markers.container).collect();
    let resolved = match alignment {
        Alignment::Auto if containers.is_empty() => Alignment::Positional,
        Alignment::Auto => Alignment::Container,
        other => other,
    };

    let (rows, mut stats) = match resolved {
        Alignment::Container => scan_containers(&containers, markers),
        _ => scan_positional(root, markers),
    };
    stats.alignment = resolved;
    stats.containers = containers.len();
    stats.assembled = rows.len();

    if stats.truncated > 0 {
        logf!(
            "reviews: positional scan found names={} ratings={} titles={} bodies={}; \
             dropped {} entries past the shortest",
            stats.names, stats.ratings, stats.titles, stats.bodies, stats.truncated
        );
    }

    let (records, diagnostics) = dedup_by_name(rows, &mut stats);

    for (rec, diag) in records.iter().zip(&diagnostics) {
        if !diag.is_clean() {
            logd!("reviews: '{}' incomplete: {:?}", preview(&rec.customer_name, 40), diag);
        }
    }

    Ok(Extraction { records, diagnostics, stats })
}

/* ---------------- Scans ---------------- */

type Row = (ReviewRecord, RecordDiagnostics);

fn scan_positional(root: ElementRef<'_>, m: &Markers) -> (Vec<Row>, ScanStats) {
    let names: Vec<FieldValue> = root.select(&m.profile_name).map(name_of).collect();
    let ratings: Vec<FieldValue> = root.select(&m.rating).map(rating_of).collect();
    let titles: Vec<FieldValue> = root.select(&m.title).map(|el| title_of(el, m)).collect();
    let bodies: Vec<FieldValue> = root.select(&m.body).map(body_of).collect();

    let lens = [names.len(), ratings.len(), titles.len(), bodies.len()];
    let n = lens.iter().copied().min().unwrap_or(0);

    let stats = ScanStats {
        names: lens[0],
        ratings: lens[1],
        titles: lens[2],
        bodies: lens[3],
        truncated: lens.iter().map(|len| len - n).sum(),
        ..ScanStats::default()
    };

    // zip stops at the shortest: that's the truncation
    let rows = names
        .into_iter()
        .zip(ratings)
        .zip(titles)
        .zip(bodies)
        .map(|(((name, rating), title), body)| assemble(name, rating, title, body))
        .collect();

    (rows, stats)
}

fn scan_containers(containers: &[ElementRef<'_>], m: &Markers) -> (Vec<Row>, ScanStats) {
    let mut stats = ScanStats::default();
    let mut rows = Vec::with_capacity(containers.len());

    for &block in containers {
        let name = first(block, &m.profile_name, name_of);
        let rating = first(block, &m.rating, rating_of);
        let title = first(block, &m.title, |el| title_of(el, m));
        let body = first(block, &m.body, body_of);

        stats.names += usize::from(name.absence() != Some(Absence::MarkerMissing));
        stats.ratings += usize::from(rating.absence() != Some(Absence::MarkerMissing));
        stats.titles += usize::from(title.absence() != Some(Absence::MarkerMissing));
        stats.bodies += usize::from(body.absence() != Some(Absence::MarkerMissing));

        rows.push(assemble(name, rating, title, body));
    }
    (rows, stats)
}

fn first<'a, F>(scope: ElementRef<'a>, sel: &Selector, read: F) -> FieldValue
where
    F: FnOnce(ElementRef<'a>) -> FieldValue,
{
    match scope.select(sel).next() {
        Some(el) => read(el),
        None => FieldValue::Absent(Absence::MarkerMissing),
    }
}

fn assemble(name: FieldValue, rating: FieldValue, title: FieldValue, body: FieldValue) -> Row {
    let diag = RecordDiagnostics {
        customer_name: name.absence(),
        rating: rating.absence(),
        review_title: title.absence(),
        review_body: body.absence(),
    };
    let rec = ReviewRecord {
        customer_name: name.into_string(),
        rating: rating.into_string(),
        review_title: title.into_string(),
        review_body: body.into_string(),
    };
    (rec, diag)
}

fn dedup_by_name(rows: Vec<Row>, stats: &mut ScanStats) -> (Vec<ReviewRecord>, Vec<RecordDiagnostics>) {
    let mut seen: HashSet<String> = HashSet::with_capacity(rows.len());
    let mut records = Vec::with_capacity(rows.len());
    let mut diagnostics = Vec::with_capacity(rows.len());

    for (rec, diag) in rows {
        if seen.insert(rec.customer_name.clone()) {
            records.push(rec);
            diagnostics.push(diag);
        } else {
            stats.duplicates += 1;
        }
    }
    (records, diagnostics)
}

/* ---------------- Fields ---------------- */

fn name_of(el: ElementRef<'_>) -> FieldValue {
    FieldValue::Present(text_of(el))
}

fn rating_of(el: ElementRef<'_>) -> FieldValue {
    let text = text_of(el);
    match RATING_RE.find(&text) {
        Some(m) => FieldValue::Present(s!(m.as_str())),
        None => FieldValue::Absent(Absence::NoNumber),
    }
}

fn title_of(el: ElementRef<'_>, m: &Markers) -> FieldValue {
    let Some(spacer) = el.select(&m.title_spacer).next() else {
        return FieldValue::Absent(Absence::NestedMarkerMissing);
    };
    match next_sibling_named(spacer, &m.title_text) {
        Some(sib) => FieldValue::Present(text_of(sib)),
        None => FieldValue::Absent(Absence::SiblingMissing),
    }
}

fn body_of(el: ElementRef<'_>) -> FieldValue {
    FieldValue::Present(text_of(el).trim().to_string())
}
