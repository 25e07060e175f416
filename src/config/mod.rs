// src/config/mod.rs
pub mod consts;
pub mod options;
pub mod settings;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for `{key}`: {value:?}")]
    BadValue { key: String, value: String },

    #[error("invalid {marker} selector {selector:?}: {reason}")]
    BadSelector {
        marker: &'static str,
        selector: String,
        reason: String,
    },

    #[error("could not read settings file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write settings file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
