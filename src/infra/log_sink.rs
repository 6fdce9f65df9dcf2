use crate::app::ports::LogSinkPort;
use crate::constants::LOG_TIMESTAMP_FORMAT;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Appends timestamped lines to a text file.
///
/// Each record is written with a single `write_all` on a file opened in
/// append mode, so lines from concurrent postbacks never interleave. The
/// directory is created on first use. Every failure is swallowed.
pub struct FileLogSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileLogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_append(&self, record: &str) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(record.as_bytes())
    }
}

impl LogSinkPort for FileLogSink {
    fn append(&self, line: &str) {
        let record = format_record(line, chrono::Local::now());
        // A poisoned lock only means another writer panicked mid-append.
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        if let Err(e) = self.try_append(&record) {
            tracing::debug!(path = %self.path.display(), "Postback log write failed: {}", e);
        }
    }
}

/// Used when the postback log is disabled.
pub struct NoopLogSink;

impl LogSinkPort for NoopLogSink {
    fn append(&self, _line: &str) {}
}

pub fn format_record<Tz: chrono::TimeZone>(line: &str, at: chrono::DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("[{}] {}\n", at.format(LOG_TIMESTAMP_FORMAT), line)
}
