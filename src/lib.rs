// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod specs;

pub mod csv;
pub mod error;
pub mod file;
pub mod json;
pub mod progress;
pub mod runner;
pub mod scrape;
pub mod sentiment;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::Error;
pub use specs::reviews::{
    DocumentError, Extraction, MarkerSet, Markers, ReviewRecord, extract, extract_bytes, extract_with,
};
