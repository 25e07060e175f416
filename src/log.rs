// src/log.rs
//
// Logging goes through `tracing`. `init()` installs a fmt subscriber that
// appends to `.store/debug.log` (stderr if the file can't be opened).
// The short macros below are what the rest of the crate uses.
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::consts::{LOG_FILE, STORE_DIR};

static INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber. Safe to call more than once; only the first
/// call has any effect. `RUST_LOG` overrides the default `info` filter.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,html5ever=warn,selectors=warn"));

        let _ = fs::create_dir_all(STORE_DIR);
        let path = Path::new(STORE_DIR).join(LOG_FILE);
        let file = OpenOptions::new().create(true).append(true).open(&path);

        match file {
            Ok(file) => {
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(
                        fmt::layer()
                            .with_ansi(false)
                            .with_target(false)
                            .with_writer(Mutex::new(file)),
                    )
                    .try_init();
            }
            Err(_) => {
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                    .try_init();
            }
        }
    });
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::tracing::error!($($arg)*)
    };
}
