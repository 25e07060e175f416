// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::file::FileError;
use crate::scrape::ScrapeError;

/// Everything a run can fail with.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    File(#[from] FileError),

    #[error("column {column:?} not found in {path}")]
    MissingColumn { column: String, path: PathBuf },
}
