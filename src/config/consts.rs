// src/config/consts.rs

// Local store (logs, saved settings)
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";
pub const SETTINGS_FILE: &str = "settings.cfg";

// Input
pub const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "reviews";

// Table shape
pub const HEADERS: [&str; 4] = ["Customer Name", "Ratings", "Reviews", "Review Body"];
pub const SENTIMENT_HEADER: &str = "Sentiments";
pub const BODY_COL: usize = 3;

// Concurrency
pub const WORKERS: usize = 4;

// Summary
pub const DEFAULT_TOP_WORDS: usize = 20;
