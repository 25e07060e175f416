// src/config/options.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use super::consts::*;
use super::ConfigError;
use crate::specs::reviews::MarkerSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub export: ExportOptions,
}

/// How per-field values are grouped into records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Container scan when the page has review containers, positional otherwise.
    Auto,
    /// Four independent scans zipped by position, truncated to the shortest.
    #[default]
    Positional,
    /// One record per review container, fields looked up inside it.
    Container,
}

impl FromStr for Alignment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Alignment::Auto),
            "positional" | "zip" => Ok(Alignment::Positional),
            "container" | "block" => Ok(Alignment::Container),
            other => Err(ConfigError::BadValue { key: s!("alignment"), value: s!(other) }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub inputs: Vec<PathBuf>,
    pub alignment: Alignment,
    pub markers: MarkerSet,
    pub workers: usize,
    /// Abort the batch on the first document that fails instead of skipping it.
    pub fail_fast: bool,
    /// Append a sentiment label column to the collected table.
    pub sentiment: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            alignment: Alignment::Positional,
            markers: MarkerSet::default(),
            workers: WORKERS,
            fail_fast: false,
            sentiment: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportType {
    SingleFile,
    PerDocument,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }

    /// Field separator for delimited formats; `None` for JSON.
    pub fn delim(&self) -> Option<char> {
        match self {
            ExportFormat::Csv => Some(','),
            ExportFormat::Tsv => Some('\t'),
            ExportFormat::Json => None,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ConfigError::BadValue { key: s!("format"), value: s!(other) }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub export_type: ExportType,
    out_path: OutputPath,
    pub include_headers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            export_type: ExportType::SingleFile,
            out_path: OutputPath::default(),
            include_headers: true,
        }
    }
}

impl ExportOptions {
    /// Resolved output target. Single file: `<dir>/<stem>.<ext>`, where a
    /// user-typed extension wins over the format's. Per document: the directory.
    pub fn out_path(&self) -> PathBuf {
        let mut path = self.out_path.dir.clone();
        match self.export_type {
            ExportType::SingleFile => {
                let mut name = self.out_path.file_stem.clone();
                name.push(".");
                match &self.out_path.ext {
                    Some(ext) => name.push(ext),
                    None => name.push(self.format.ext()),
                }
                path.push(name);
            }
            ExportType::PerDocument => {}
        }
        path
    }

    /// Parse user text into dir + stem (+ extension, if one was typed).
    pub fn set_path(&mut self, text: &str) {
        let s = text.trim();
        match self.export_type {
            ExportType::SingleFile => {
                let p = Path::new(s);
                self.out_path.dir = p.parent().map(Path::to_path_buf).unwrap_or_default();
                if let Some(stem) = p.file_stem() {
                    self.out_path.file_stem = stem.to_os_string();
                }
                self.out_path.ext = p.extension().map(|e| e.to_os_string());
            }
            ExportType::PerDocument => {
                self.out_path.dir = PathBuf::from(s);
                self.out_path.ext = None;
            }
        }
    }

    /// The target as the user gave it: the extension appears only if one was
    /// typed, so a reloaded path keeps following the format.
    pub fn typed_path(&self) -> PathBuf {
        let mut path = self.out_path.dir.clone();
        if self.export_type == ExportType::SingleFile {
            let mut name = self.out_path.file_stem.clone();
            if let Some(ext) = &self.out_path.ext {
                name.push(".");
                name.push(ext);
            }
            path.push(name);
        }
        path
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct OutputPath {
    dir: PathBuf,
    file_stem: OsString, // without extension
    ext: Option<OsString>,
}

impl Default for OutputPath {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_stem: OsString::from(DEFAULT_FILE),
            ext: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_single_file_follows_format() {
        let mut export = ExportOptions::default();
        assert_eq!(export.out_path(), PathBuf::from("out").join("reviews.csv"));

        export.format = ExportFormat::Json;
        assert_eq!(export.out_path(), PathBuf::from("out").join("reviews.json"));
    }

    #[test]
    fn typed_extension_survives_format_change() {
        let mut export = ExportOptions::default();
        export.set_path("somewhere/hello.txt");
        export.format = ExportFormat::Tsv;
        assert_eq!(export.out_path(), PathBuf::from("somewhere").join("hello.txt"));
    }

    #[test]
    fn typed_path_omits_the_format_extension() {
        let mut export = ExportOptions::default();
        assert_eq!(export.typed_path(), PathBuf::from("out").join("reviews"));

        export.set_path("somewhere/hello.txt");
        assert_eq!(export.typed_path(), PathBuf::from("somewhere").join("hello.txt"));

        export.export_type = ExportType::PerDocument;
        export.set_path("out/pages");
        assert_eq!(export.typed_path(), PathBuf::from("out/pages"));
    }

    #[test]
    fn per_document_path_is_a_directory() {
        let mut export = ExportOptions::default();
        export.export_type = ExportType::PerDocument;
        export.set_path("out/pages");
        assert_eq!(export.out_path(), PathBuf::from("out/pages"));
    }

    #[test]
    fn parses_alignment_and_format() {
        assert_eq!("Container".parse::<Alignment>().unwrap(), Alignment::Container);
        assert_eq!("zip".parse::<Alignment>().unwrap(), Alignment::Positional);
        assert!("sideways".parse::<Alignment>().is_err());
        assert_eq!("TSV".parse::<ExportFormat>().unwrap(), ExportFormat::Tsv);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}
