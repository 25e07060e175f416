// src/file.rs

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::config::options::{ExportFormat, ExportOptions, ExportType};
use crate::core::sanitize::sanitize_stem;
use crate::csv::to_delimited_string;
use crate::json::to_json_string;
use crate::store::DataSet;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("could not read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("table {0} has no header row")]
    EmptyTable(PathBuf),

    #[error("could not encode JSON")]
    Json(#[from] serde_json::Error),
}

/// Render a table in the export format.
pub fn render(export: &ExportOptions, ds: &DataSet) -> Result<String, FileError> {
    match export.format.delim() {
        Some(sep) => Ok(to_delimited_string(&ds.headers, &ds.rows, export.include_headers, sep)),
        None => Ok(to_json_string(&ds.headers, &ds.rows)?),
    }
}

/// Write one merged file at `export.out_path()`. Returns the path written to.
pub fn write_export_single(export: &ExportOptions, ds: &DataSet) -> Result<PathBuf, FileError> {
    let path = export.out_path();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let contents = render(export, ds)?;
    fs::write(&path, contents).map_err(|source| FileError::Write { path: path.clone(), source })?;
    logf!("wrote {} rows to {}", ds.len(), path.display());
    Ok(path)
}

/// Write one file per source document into the directory `export.out_path()`.
/// Files are named after the source's stem; repeats get ` (N)`.
pub fn write_export_per_document(
    export: &ExportOptions,
    docs: &[(PathBuf, DataSet)],
) -> Result<Vec<PathBuf>, FileError> {
    let outdir = export.out_path();
    ensure_directory(&outdir)?;

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut written = Vec::with_capacity(docs.len());
    let ext = export.format.ext();

    for (i, (source, ds)) in docs.iter().enumerate() {
        let raw_stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = sanitize_stem(&raw_stem, i);
        let path = resolve_doc_filename(&outdir, &stem, &mut seen, ext);

        let contents = render(export, ds)?;
        fs::write(&path, contents).map_err(|source| FileError::Write { path: path.clone(), source })?;
        logd!("wrote {} rows from {} to {}", ds.len(), source.display(), path.display());
        written.push(path);
    }

    Ok(written)
}

/// Dispatch on export type.
pub fn export_dataset(
    export: &ExportOptions,
    merged: &DataSet,
    per_doc: &[(PathBuf, DataSet)],
) -> Result<Vec<PathBuf>, FileError> {
    match export.export_type {
        ExportType::SingleFile => Ok(vec![write_export_single(export, merged)?]),
        ExportType::PerDocument => write_export_per_document(export, per_doc),
    }
}

pub fn ensure_directory(dir: &Path) -> Result<(), FileError> {
    if dir.exists() && !dir.is_dir() {
        return Err(FileError::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| FileError::Write { path: dir.to_path_buf(), source })?;
    }
    Ok(())
}

/// Duplicate handling **only within this run**
pub fn resolve_doc_filename(
    dir: &Path,
    stem: &str,                        // already sanitized, no extension
    seen_names: &mut HashMap<String, usize>,
    ext: &str,
) -> PathBuf {
    let count = seen_names.entry(stem.to_string()).or_insert(0);

    // First occurrence: "<stem>.ext"
    // Subsequent:       "<stem> (N).ext" with N starting at 2
    let filename = if *count == 0 {
        format!("{stem}.{ext}")
    } else {
        format!("{stem} ({}).{ext}", *count + 1)
    };

    *count += 1;
    dir.join(filename)
}

/// Extension-appropriate default for `ExportFormat` when the user gave none.
pub fn format_for_path(path: &Path) -> Option<ExportFormat> {
    path.extension()?.to_str()?.parse().ok()
}
