// src/store.rs
//
// In-memory table shape shared by extraction, sentiment scoring and export,
// plus loading a previously exported table back from disk.
use std::{fs, path::Path};

use crate::config::consts::HEADERS;
use crate::csv::{parse_rows, sep_for_ext};
use crate::file::FileError;
use crate::specs::reviews::ReviewRecord;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    /// Canonical review table: `HEADERS` + one row per record.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ReviewRecord>,
    {
        Self {
            headers: Some(HEADERS.iter().map(|h| s!(*h)).collect()),
            rows: records.into_iter().map(ReviewRecord::into_row).collect(),
        }
    }

    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Column index by header name (case-insensitive, surrounding whitespace ignored).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let want = name.trim();
        self.headers
            .as_ref()?
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(want))
    }

    /// Cell text or "" for short rows.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Append a column. `values` must have one entry per row; short rows are
    /// padded with empty cells first so the new value lands in its column.
    pub fn append_column(&mut self, header: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());
        let width = self.width();
        if let Some(h) = self.headers.as_mut() {
            h.resize(width, s!());
            h.push(s!(header));
        }
        for (row, v) in self.rows.iter_mut().zip(values) {
            row.resize(width, s!());
            row.push(v);
        }
    }

    /// Widest row or header.
    pub fn width(&self) -> usize {
        let h = self.headers.as_ref().map_or(0, Vec::len);
        self.rows.iter().map(Vec::len).fold(h, usize::max)
    }

    /// Concatenate tables in order. Headers come from the first table that has them.
    pub fn concat<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = DataSet>,
    {
        let mut out = DataSet::default();
        for mut part in parts {
            if out.headers.is_none() {
                out.headers = part.headers.take();
            }
            out.rows.append(&mut part.rows);
        }
        out
    }
}

/// Load a CSV/TSV table whose first row is a header row.
/// The separator follows the file extension (`.tsv` → tab).
pub fn load_table(path: &Path) -> Result<DataSet, FileError> {
    let text = fs::read_to_string(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let sep = sep_for_ext(path.extension().and_then(|e| e.to_str()));
    let mut rows = parse_rows(&text, sep);
    if rows.is_empty() {
        return Err(FileError::EmptyTable(path.to_path_buf()));
    }
    let headers = rows.remove(0);
    logd!("loaded {} rows x {} columns from {}", rows.len(), headers.len(), path.display());
    Ok(DataSet { headers: Some(headers), rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str) -> ReviewRecord {
        ReviewRecord {
            customer_name: s!(name),
            rating: s!("4.0"),
            review_title: s!("t"),
            review_body: s!("b"),
        }
    }

    #[test]
    fn records_become_canonical_rows() {
        let ds = DataSet::from_records(vec![rec("Ann"), rec("Bob")]);
        assert_eq!(ds.headers.as_ref().unwrap()[0], "Customer Name");
        assert_eq!(ds.rows[1], row!["Bob", "4.0", "t", "b"]);
        assert_eq!(ds.column_index("review body"), Some(3));
        assert_eq!(ds.column_index("Sentiments"), None);
    }

    #[test]
    fn append_column_pads_short_rows() {
        let mut ds = DataSet {
            headers: Some(row!["A", "B"]),
            rows: vec![row!["1", "2"], row!["3"]],
        };
        ds.append_column("C", row!["x", "y"]);
        assert_eq!(ds.headers.unwrap(), row!["A", "B", "C"]);
        assert_eq!(ds.rows[1], row!["3", "", "y"]);
    }

    #[test]
    fn concat_keeps_order_and_duplicates() {
        let a = DataSet::from_records(vec![rec("Ann")]);
        let b = DataSet::from_records(vec![rec("Ann"), rec("Cy")]);
        let all = DataSet::concat(vec![a, b]);
        let names: Vec<&str> = (0..all.len()).map(|i| all.cell(i, 0)).collect();
        assert_eq!(names, vec!["Ann", "Ann", "Cy"]);
        assert!(all.headers.is_some());
    }

    #[test]
    fn load_table_uses_extension_separator() {
        let dir = std::env::temp_dir().join("review_scrape_store_load");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("t.tsv");
        fs::write(&path, "Customer Name\tReview Body\nAnn\tnice, very\n").unwrap();

        let ds = load_table(&path).unwrap();
        assert_eq!(ds.column_index("Review Body"), Some(1));
        assert_eq!(ds.cell(0, 1), "nice, very");

        let empty = dir.join("e.csv");
        fs::write(&empty, "").unwrap();
        assert!(matches!(load_table(&empty), Err(FileError::EmptyTable(_))));
    }
}
