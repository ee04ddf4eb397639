// src/log.rs
use std::fs::{ self, OpenOptions };
use std::path::Path;
use std::sync::{ Mutex, OnceLock };
use std::time::Instant;

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::EnvFilter;

use crate::error::{ PortalError, Result };

static START: OnceLock<Instant> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// `[hh:mm:ss.mmm]` since the subscriber was installed.
struct Elapsed;

impl FormatTime for Elapsed {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "[{}]", fmt_elapsed(start().elapsed().as_millis()))
    }
}

/// Install the global subscriber.
///
/// `level` is an `EnvFilter` directive (`info`, `jpnic_scrape=debug`, ...);
/// `RUST_LOG` wins when set. With `file`, events are appended there
/// (parent directories created) instead of going to stderr.
pub fn init(level: &str, file: Option<&Path>) -> Result<()> {
    start();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| PortalError::Config(format!("log filter {level:?}: {e}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(Elapsed)
        .with_target(false);

    let installed = match file {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
            let sink = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(sink)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|e| PortalError::Config(format!("logger already installed: {e}")))
}
