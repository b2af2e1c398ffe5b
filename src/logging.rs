//! Switchable console and file output for the crate's log records.
//!
//! Everything in this crate reports through the [`log`] facade. Applications
//! with their own logger receive those records as usual; the functions here
//! install a small logger of our own for applications without one.
//!
//! ```rust, no_run
//! # fn main() -> gazar::errors::Result<()> {
//! use log::LevelFilter;
//!
//! gazar::log_to_console(true, LevelFilter::Debug)?;
//! gazar::log_to_file(true, Some("gazar.log".as_ref()), LevelFilter::Info)?;
//! // ...
//! gazar::log_to_file(false, None, LevelFilter::Off)?;
//! # Ok(())
//! # }
//! ```

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use log::{LevelFilter, Log, Metadata, Record};

use crate::errors::*;

/// File written by [`log_to_file`] when no filename is given.
pub const DEFAULT_LOG_FILE: &str = "gazar.log";

const LOGGER_NAME: &str = "gazar";

struct Sinks {
    console: Option<LevelFilter>,
    file: Option<(LevelFilter, File)>,
}

impl Sinks {
    fn max_level(&self) -> LevelFilter {
        let console = self.console.unwrap_or(LevelFilter::Off);
        let file = self
            .file
            .as_ref()
            .map_or(LevelFilter::Off, |(level, _)| *level);
        console.max(file)
    }
}

struct GazarLogger {
    sinks: Mutex<Sinks>,
}

static LOGGER: GazarLogger = GazarLogger {
    sinks: Mutex::new(Sinks {
        console: None,
        file: None,
    }),
};

fn format_record(record: &Record) -> String {
    format!(
        "{} - {} - {} - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
        LOGGER_NAME,
        record.level(),
        record.args()
    )
}

impl Log for GazarLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if !metadata.target().starts_with(LOGGER_NAME) {
            return false;
        }
        match self.sinks.lock() {
            Ok(sinks) => metadata.level() <= sinks.max_level(),
            Err(_) => false,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record);
        if let Ok(mut sinks) = self.sinks.lock() {
            if sinks.console.is_some_and(|level| record.level() <= level) {
                eprintln!("{line}");
            }
            if let Some((level, file)) = sinks.file.as_mut() {
                if record.level() <= *level {
                    // a failing log write has nowhere to be reported
                    let _ = writeln!(file, "{line}");
                }
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut sinks) = self.sinks.lock() {
            if let Some((_, file)) = sinks.file.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

/// Installs [`LOGGER`] as the global logger on first use.
fn install() -> Result<()> {
    static INSTALLED: OnceLock<bool> = OnceLock::new();
    if *INSTALLED.get_or_init(|| log::set_logger(&LOGGER).is_ok()) {
        Ok(())
    } else {
        Err(GazarError::Logger(
            "another logger is already installed".to_string(),
        ))
    }
}

fn update<F: FnOnce(&mut Sinks)>(change: F) -> Result<()> {
    install()?;
    let mut sinks = LOGGER
        .sinks
        .lock()
        .map_err(|_| GazarError::Logger("logger state is poisoned".to_string()))?;
    change(&mut sinks);
    log::set_max_level(sinks.max_level());
    Ok(())
}

/// Turns logging to standard error on (`status = true`) or off.
pub fn log_to_console(status: bool, level: LevelFilter) -> Result<()> {
    update(|sinks| sinks.console = status.then_some(level))
}

/// Turns logging to `filename` (default [`DEFAULT_LOG_FILE`]) on or off.
///
/// Records are appended to the file; turning file logging off closes it.
pub fn log_to_file(status: bool, filename: Option<&Path>, level: LevelFilter) -> Result<()> {
    let file = if status {
        let path = filename.unwrap_or(Path::new(DEFAULT_LOG_FILE));
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Some((level, file))
    } else {
        None
    };
    update(|sinks| sinks.file = file)
}
