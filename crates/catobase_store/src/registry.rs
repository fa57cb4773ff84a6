//! Append-only registry
//!
//! The registry is a single text file of newline-terminated records. Lines are
//! only ever appended; nothing here rewrites or reorders earlier content.
//! The file is created by an explicit setup step ([`Registry::init`]); appends
//! and scans against a missing file fail with
//! [`CatobaseError::RegistryNotFound`] instead of creating it.

use crate::error::{CatobaseError, Result};
use crate::record::Record;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Handle to a registry file at a fixed location.
#[derive(Debug, Clone)]
pub struct Registry {
    path: PathBuf,
}

impl Registry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the registry file if it does not exist yet.
    ///
    /// An existing registry is left untouched.
    pub fn init(path: impl Into<PathBuf>) -> Result<Self> {
        let registry = Self::new(path);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&registry.path)
            .map_err(|e| {
                CatobaseError::io(
                    format!("failed to create registry {}", registry.path.display()),
                    e,
                )
            })?;
        debug!(path = %registry.path.display(), "Registry ready");
        Ok(registry)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Open the registry for appending without writing anything yet.
    ///
    /// Lets a caller confirm the registry is writable before doing other work.
    pub fn appender(&self) -> Result<RegistryAppender> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| self.open_error(e, "failed to open registry for writing"))?;
        Ok(RegistryAppender {
            file,
            path: self.path.clone(),
        })
    }

    /// Append `line` plus a newline to the registry.
    pub fn append_record(&self, line: &str) -> Result<()> {
        self.appender()?.append(line)
    }

    /// Every line of the registry, in file order.
    ///
    /// Lines that are not valid UTF-8 are dropped; they can never hold a
    /// record this crate wrote.
    pub fn scan_records(&self) -> Result<Vec<String>> {
        let file = File::open(&self.path)
            .map_err(|e| self.open_error(e, "failed to open registry for reading"))?;
        let (lines, undecodable) = read_registry_lines(file).map_err(|e| {
            CatobaseError::io(format!("failed to read registry {}", self.path.display()), e)
        })?;
        if undecodable > 0 {
            debug!(path = %self.path.display(), undecodable, "Skipped undecodable registry lines");
        }
        Ok(lines)
    }

    /// Every well-formed record of the registry, in file order.
    ///
    /// Malformed lines are skipped.
    pub fn records(&self) -> Result<Vec<Record>> {
        let lines = self.scan_records()?;
        let records: Vec<Record> = lines.iter().filter_map(|line| Record::parse(line)).collect();
        debug!(
            path = %self.path.display(),
            scanned = lines.len(),
            skipped = lines.len() - records.len(),
            "Read registry records"
        );
        Ok(records)
    }

    fn open_error(&self, e: io::Error, context: &str) -> CatobaseError {
        match e.kind() {
            io::ErrorKind::NotFound => CatobaseError::RegistryNotFound(self.path.clone()),
            _ => CatobaseError::io(format!("{} {}", context, self.path.display()), e),
        }
    }
}

/// Split on `\n` as raw bytes, dropping a trailing `\r`.
///
/// Returns the decodable lines and the number of lines that were not UTF-8.
fn read_registry_lines<R: io::Read>(reader: R) -> io::Result<(Vec<String>, usize)> {
    let mut reader = BufReader::new(reader);
    let mut lines = Vec::new();
    let mut undecodable = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        match std::str::from_utf8(&buf) {
            Ok(line) => lines.push(line.to_string()),
            Err(_) => undecodable += 1,
        }
    }

    Ok((lines, undecodable))
}

/// An open append handle on a registry file.
pub struct RegistryAppender {
    file: File,
    path: PathBuf,
}

impl RegistryAppender {
    pub fn append(&mut self, line: &str) -> Result<()> {
        // Single write so the line and its newline land together.
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        self.file.write_all(buf.as_bytes()).map_err(|e| {
            CatobaseError::io(format!("failed to write to registry {}", self.path.display()), e)
        })?;
        debug!(path = %self.path.display(), line, "Appended record");
        Ok(())
    }
}
