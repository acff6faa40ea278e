//! Rolling File Logger
//!
//! Formats `tracing` events (and `log` records, bridged by tracing-subscriber)
//! into a daily rotated `<log_dir>/<app_name>.<YYYY-MM-DD>.log`, keeping only
//! the newest files. Every complete line is also held in a circular buffer so
//! a running process can display recent output without reading the disk.

use std::collections::VecDeque;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use chrono::Local;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;

/// Lines kept in memory by the global logger
pub const DEFAULT_BUFFER_LINES: usize = 500;

/// Log files kept on disk by the global logger
pub const DEFAULT_MAX_FILES: usize = 7;

static LOGGER: OnceLock<RollingLog> = OnceLock::new();

/// Daily rotated log file teed into a recent-lines buffer
#[derive(Clone)]
pub struct RollingLog {
    file: Arc<Mutex<RollingFileAppender>>,
    recent: Arc<Mutex<RecentLines>>,
}

struct RecentLines {
    capacity: usize,
    lines: VecDeque<String>,
    partial: String,
}

impl RollingLog {
    pub fn new(
        dir: impl AsRef<Path>,
        app_name: &str,
        max_files: usize,
        capacity: usize,
    ) -> io::Result<Self> {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(app_name)
            .filename_suffix("log")
            .max_log_files(max_files.max(1))
            .build(dir.as_ref())
            .map_err(io::Error::other)?;

        Ok(Self {
            file: Arc::new(Mutex::new(appender)),
            recent: Arc::new(Mutex::new(RecentLines {
                capacity: capacity.max(1),
                lines: VecDeque::with_capacity(capacity.max(1)),
                partial: String::new(),
            })),
        })
    }

    fn file(&self) -> io::Result<MutexGuard<'_, RollingFileAppender>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file mutex poisoned"))
    }

    /// Append raw bytes to the current file and the buffer
    pub fn write_bytes(&self, buf: &[u8]) -> io::Result<()> {
        self.file()?.write_all(buf)?;
        if let Ok(mut recent) = self.recent.lock() {
            recent.remember(buf);
        }
        Ok(())
    }

    /// Write one already formatted line stamped with the current time
    pub fn write_line(&self, level: &str, message: &str) -> io::Result<()> {
        let line = format!(
            "{} {:>5} {}\n",
            Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
            level,
            message
        );
        self.write_bytes(line.as_bytes())
    }

    /// Most recent complete lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        match self.recent.lock() {
            Ok(recent) => recent.lines.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl RecentLines {
    fn remember(&mut self, buf: &[u8]) {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(end) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=end).collect();
            if self.lines.len() == self.capacity {
                self.lines.pop_front();
            }
            self.lines.push_back(line.trim_end().to_string());
        }
    }
}

/// Writer handed out to tracing-subscriber for every event
pub struct RollingWriter {
    log: RollingLog,
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.log.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.log.file()?.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingLog {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RollingWriter { log: self.clone() }
    }
}

/// Install the global subscriber writing into `log_dir`.
///
/// Calling it again after a successful initialisation is a no-op.
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> io::Result<()> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    fs::create_dir_all(log_dir.as_ref())?;

    let log = RollingLog::new(
        log_dir.as_ref(),
        app_name,
        DEFAULT_MAX_FILES,
        DEFAULT_BUFFER_LINES,
    )?;
    if LOGGER.set(log.clone()).is_err() {
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_writer(log)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))
}

fn global() -> io::Result<&'static RollingLog> {
    LOGGER
        .get()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "logger not initialized"))
}

pub fn info(message: &str) -> io::Result<()> {
    global()?.write_line("INFO", message)
}

pub fn error(message: &str) -> io::Result<()> {
    global()?.write_line("ERROR", message)
}

/// Recent lines of the global logger, empty before initialisation
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(RollingLog::recent_lines).unwrap_or_default()
}
