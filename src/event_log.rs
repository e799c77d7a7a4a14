use anyhow::{Context, Result};
use log::{error, info, warn};
use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
    sync::{Mutex, PoisonError},
};

/// Sink for the status lines a run produces.
///
/// Every component receives one of these instead of writing to a global.
pub trait EventLog: Send + Sync {
    fn record(&self, success: bool, message: &str);
}

pub fn format_line(success: bool, message: &str) -> String {
    format!("{} {}", if success { "[OK]" } else { "[ERROR]" }, message)
}

/// Plain-text log file, one line per event.
pub struct FileLog {
    file: Mutex<File>,
}

impl FileLog {
    pub fn open(path: &Path, truncate: bool) -> Result<Self> {
        let mut options = OpenOptions::new();
        options.create(true);
        if truncate {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }

        let file = options
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl EventLog for FileLog {
    fn record(&self, success: bool, message: &str) {
        let line = format_line(success, message);

        // Writes are serialized so lines from concurrent zone tasks never interleave
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(file, "{}", line) {
            warn!("Failed to write log line: {}", e);
        }
        drop(file);

        if success {
            info!("{}", line);
        } else {
            error!("{}", line);
        }
    }
}
