//! Shared logging utilities for Catobase binaries.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "catobase=info,catobase_store=info";
const MAX_LOG_FILES: usize = 5;
const MAX_LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Logging configuration shared by Catobase binaries.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    pub verbose: bool,
}

/// Initialize tracing with a rolling file writer and stderr output.
///
/// Stderr only shows warnings unless `verbose` is set; the file always gets
/// the full `RUST_LOG` (or default) filter.
pub fn init_logging(config: LogConfig<'_>) -> Result<()> {
    let log_dir = ensure_logs_dir().context("Failed to ensure log directory")?;
    let file_writer = LogWriter::new(log_dir, config.app_name)
        .context("Failed to initialize rolling log writer")?;

    let file_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let console_filter = if config.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Get the Catobase home directory.
///
/// Priority:
/// 1) CATOBASE_HOME
/// 2) ~/.catobase
/// 3) ./.catobase
pub fn catobase_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("CATOBASE_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .map(|home| home.join(".catobase"))
        .unwrap_or_else(|| PathBuf::from(".").join(".catobase"))
}

/// Get the logs directory: ~/.catobase/logs
pub fn logs_dir() -> PathBuf {
    catobase_home().join("logs")
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}

/// Size-capped log file kept as `<stem>.log`, `<stem>.log.1` (newest archive),
/// up to `<stem>.log.<keep - 1>`.
struct RollingLog {
    dir: PathBuf,
    stem: String,
    keep: usize,
    limit: u64,
    state: Mutex<LiveFile>,
}

struct LiveFile {
    file: File,
    written: u64,
}

impl RollingLog {
    fn open(dir: PathBuf, app_name: &str, keep: usize, limit: u64) -> io::Result<Self> {
        fs::create_dir_all(&dir)?;
        let stem = sanitize_name(app_name);
        let live = open_append(&dir.join(format!("{}.log", stem)))?;
        let log = Self {
            dir,
            stem,
            keep: keep.max(1),
            limit,
            state: Mutex::new(live),
        };
        {
            let mut live = log.lock()?;
            if live.written > log.limit {
                log.roll(&mut live)?;
            }
        }
        Ok(log)
    }

    fn live_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.stem))
    }

    fn archive_path(&self, n: usize) -> PathBuf {
        self.dir.join(format!("{}.log.{}", self.stem, n))
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, LiveFile>> {
        self.state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))
    }

    /// Write one buffer, rolling first if it would push a non-empty file over
    /// the limit.
    fn write_buf(&self, buf: &[u8]) -> io::Result<usize> {
        let mut live = self.lock()?;
        if live.written > 0 && live.written + buf.len() as u64 > self.limit {
            self.roll(&mut live)?;
        }
        let n = live.file.write(buf)?;
        live.written += n as u64;
        Ok(n)
    }

    fn flush(&self) -> io::Result<()> {
        self.lock()?.file.flush()
    }

    fn roll(&self, live: &mut LiveFile) -> io::Result<()> {
        live.file.flush()?;
        self.shift_archives()?;
        *live = open_append(&self.live_path())?;
        Ok(())
    }

    fn shift_archives(&self) -> io::Result<()> {
        let live = self.live_path();
        let oldest = self.keep - 1;
        if oldest == 0 {
            return remove_if_exists(&live);
        }

        remove_if_exists(&self.archive_path(oldest))?;
        for n in (1..oldest).rev() {
            let from = self.archive_path(n);
            if from.exists() {
                fs::rename(&from, self.archive_path(n + 1))?;
            }
        }
        if live.exists() {
            fs::rename(&live, self.archive_path(1))?;
        }
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<LiveFile> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let written = file.metadata()?.len();
    Ok(LiveFile { file, written })
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// `MakeWriter` handing out handles to one shared [`RollingLog`].
#[derive(Clone)]
struct LogWriter(Arc<RollingLog>);

impl LogWriter {
    fn new(dir: PathBuf, app_name: &str) -> Result<Self> {
        let log = RollingLog::open(dir, app_name, MAX_LOG_FILES, MAX_LOG_FILE_SIZE)
            .with_context(|| format!("Failed to open log file for {}", app_name))?;
        Ok(Self(Arc::new(log)))
    }
}

struct LogHandle(Arc<RollingLog>);

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogWriter {
    type Writer = LogHandle;

    fn make_writer(&'a self) -> Self::Writer {
        LogHandle(Arc::clone(&self.0))
    }
}

impl Write for LogHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write_buf(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read(temp: &TempDir, name: &str) -> String {
        fs::read_to_string(temp.path().join(name)).unwrap()
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("catobase"), "catobase");
        assert_eq!(sanitize_name("cato base/cli"), "cato_base_cli");
    }

    #[test]
    fn test_rolls_when_full() {
        let temp = TempDir::new().unwrap();
        let log = RollingLog::open(temp.path().to_path_buf(), "app", 3, 16).unwrap();

        log.write_buf(b"0123456789\n").unwrap();
        log.write_buf(b"abcdefghij\n").unwrap();
        log.write_buf(b"ABCDEFGHIJ\n").unwrap();
        log.flush().unwrap();

        assert_eq!(read(&temp, "app.log"), "ABCDEFGHIJ\n");
        assert_eq!(read(&temp, "app.log.1"), "abcdefghij\n");
        assert_eq!(read(&temp, "app.log.2"), "0123456789\n");
        assert!(!temp.path().join("app.log.3").exists());
    }

    #[test]
    fn test_drops_oldest_archive() {
        let temp = TempDir::new().unwrap();
        let log = RollingLog::open(temp.path().to_path_buf(), "app", 2, 8).unwrap();

        log.write_buf(b"first--\n").unwrap();
        log.write_buf(b"second-\n").unwrap();
        log.write_buf(b"third--\n").unwrap();
        log.flush().unwrap();

        assert_eq!(read(&temp, "app.log"), "third--\n");
        assert_eq!(read(&temp, "app.log.1"), "second-\n");
        assert!(!temp.path().join("app.log.2").exists());
    }

    #[test]
    fn test_single_file_truncates_on_roll() {
        let temp = TempDir::new().unwrap();
        let log = RollingLog::open(temp.path().to_path_buf(), "app", 1, 8).unwrap();

        log.write_buf(b"first--\n").unwrap();
        log.write_buf(b"second-\n").unwrap();
        log.flush().unwrap();

        assert_eq!(read(&temp, "app.log"), "second-\n");
        assert!(!temp.path().join("app.log.1").exists());
    }

    #[test]
    fn test_oversized_existing_file_rolls_on_open() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("app.log"), "0123456789abcdef-old\n").unwrap();

        let log = RollingLog::open(temp.path().to_path_buf(), "app", 3, 16).unwrap();
        log.write_buf(b"new\n").unwrap();
        log.flush().unwrap();

        assert_eq!(read(&temp, "app.log"), "new\n");
        assert_eq!(read(&temp, "app.log.1"), "0123456789abcdef-old\n");
    }
}
