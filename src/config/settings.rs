// src/config/settings.rs
//
// Plain `key=value` settings file, one per line, `#` comments.
// Anything not mentioned keeps its default; unknown keys are logged and skipped.
use std::{fs, path::Path};

use super::ConfigError;
use super::options::{AppOptions, ExportType};

pub fn load(path: &Path) -> Result<AppOptions, ConfigError> {
    let mut opts = AppOptions::default();
    if !path.exists() {
        return Ok(opts);
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    apply(&mut opts, &text)?;
    logd!("settings loaded from {}", path.display());
    Ok(opts)
}

/// Apply settings text on top of `opts`.
pub fn apply(opts: &mut AppOptions, text: &str) -> Result<(), ConfigError> {
    // out_path depends on export type, so it's applied last
    let mut out_path: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        let Some(eq) = line.find('=') else {
            logw!("settings: ignoring line without '=': {line}");
            continue;
        };
        let key = line[..eq].trim();
        let val = line[eq + 1..].trim();

        match key {
            "alignment" => opts.scrape.alignment = val.parse()?,
            "workers" => {
                opts.scrape.workers = val
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| bad(key, val))?;
            }
            "fail_fast" => opts.scrape.fail_fast = parse_bool(key, val)?,
            "sentiment" => opts.scrape.sentiment = parse_bool(key, val)?,
            "format" => opts.export.format = val.parse()?,
            "include_headers" => opts.export.include_headers = parse_bool(key, val)?,
            "per_document" => {
                opts.export.export_type = if parse_bool(key, val)? {
                    ExportType::PerDocument
                } else {
                    ExportType::SingleFile
                };
            }
            "out_path" => out_path = Some(s!(val)),
            "marker.profile_name" => opts.scrape.markers.profile_name = s!(val),
            "marker.rating" => opts.scrape.markers.rating = s!(val),
            "marker.title" => opts.scrape.markers.title = s!(val),
            "marker.title_spacer" => opts.scrape.markers.title_spacer = s!(val),
            "marker.title_text" => opts.scrape.markers.title_text = s!(val),
            "marker.body" => opts.scrape.markers.body = s!(val),
            "marker.container" => opts.scrape.markers.container = s!(val),
            other => logw!("settings: unknown key `{other}`"),
        }
    }

    if let Some(p) = out_path {
        opts.export.set_path(&p);
    }
    Ok(())
}

pub fn save(path: &Path, opts: &AppOptions) -> Result<(), ConfigError> {
    let m = &opts.scrape.markers;
    let mut s = String::new();
    s.push_str(&format!("alignment={}\n", alignment_name(opts)));
    s.push_str(&format!("workers={}\n", opts.scrape.workers));
    s.push_str(&format!("fail_fast={}\n", flag(opts.scrape.fail_fast)));
    s.push_str(&format!("sentiment={}\n", flag(opts.scrape.sentiment)));
    s.push_str(&format!("format={}\n", opts.export.format.ext()));
    s.push_str(&format!("include_headers={}\n", flag(opts.export.include_headers)));
    s.push_str(&format!(
        "per_document={}\n",
        flag(opts.export.export_type == ExportType::PerDocument)
    ));
    s.push_str(&format!("out_path={}\n", opts.export.typed_path().display()));
    s.push_str(&format!("marker.profile_name={}\n", m.profile_name));
    s.push_str(&format!("marker.rating={}\n", m.rating));
    s.push_str(&format!("marker.title={}\n", m.title));
    s.push_str(&format!("marker.title_spacer={}\n", m.title_spacer));
    s.push_str(&format!("marker.title_text={}\n", m.title_text));
    s.push_str(&format!("marker.body={}\n", m.body));
    s.push_str(&format!("marker.container={}\n", m.container));

    let write_err = |source| ConfigError::Write { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }
    fs::write(path, s).map_err(write_err)
}

fn alignment_name(opts: &AppOptions) -> &'static str {
    use super::options::Alignment::*;
    match opts.scrape.alignment {
        Auto => "auto",
        Positional => "positional",
        Container => "container",
    }
}

fn flag(b: bool) -> u8 { if b { 1 } else { 0 } }

fn parse_bool(key: &str, val: &str) -> Result<bool, ConfigError> {
    match val.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(bad(key, val)),
    }
}

fn bad(key: &str, val: &str) -> ConfigError {
    ConfigError::BadValue { key: s!(key), value: s!(val) }
}
