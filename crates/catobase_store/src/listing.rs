//! Category listings
//!
//! A listing is a plain text file with one category label per line. Listings
//! are created once (never overwritten) and mutated only by removing an entry,
//! which rewrites the whole file.

use crate::error::{CatobaseError, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Characters that would corrupt a registry record if they appeared in a label.
const RESERVED_LABEL_CHARS: [char; 4] = ['|', ',', '\n', '\r'];

/// Reject labels that cannot be stored in a registry record.
pub fn validate_label(label: &str) -> Result<()> {
    if label.is_empty() {
        return Err(CatobaseError::InvalidLabel {
            label: label.to_string(),
            reason: "label is empty",
        });
    }
    if label.contains(&RESERVED_LABEL_CHARS[..]) {
        return Err(CatobaseError::InvalidLabel {
            label: label.to_string(),
            reason: "label contains one of '|', ',' or a line break",
        });
    }
    Ok(())
}

/// Create a new listing at `path` holding `categories`, one per line.
///
/// Fails with [`CatobaseError::AlreadyExists`] if anything is already at
/// `path`; the existing content is never touched.
pub fn create_category_listing<S: AsRef<str>>(categories: &[S], path: &Path) -> Result<()> {
    for category in categories {
        validate_label(category.as_ref())?;
    }

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => CatobaseError::AlreadyExists(path.to_path_buf()),
            _ => CatobaseError::io(
                format!("failed to create category listing {}", path.display()),
                e,
            ),
        })?;

    write_lines(file, categories)
        .map_err(|e| CatobaseError::io("failed to write category listing", e))?;

    debug!(path = %path.display(), count = categories.len(), "Created category listing");
    Ok(())
}

/// Remove every line equal to `label` from the listing at `path`.
///
/// Removing a label that is not present succeeds and leaves the file as it was.
pub fn delete_category_entry(label: &str, path: &Path) -> Result<()> {
    let lines = read_listing(path)?;
    let before = lines.len();
    let remaining: Vec<String> = lines.into_iter().filter(|line| line != label).collect();

    let file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| {
            CatobaseError::io(
                format!("failed to open category listing {} for rewrite", path.display()),
                e,
            )
        })?;

    write_lines(file, &remaining)
        .map_err(|e| CatobaseError::io("failed to rewrite category listing", e))?;

    debug!(
        path = %path.display(),
        label,
        removed = before - remaining.len(),
        "Deleted category entry"
    );
    Ok(())
}

/// Read a listing, one entry per line, in file order.
pub fn read_listing(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CatobaseError::ListingNotFound(path.to_path_buf()),
        _ => CatobaseError::io(format!("failed to open {}", path.display()), e),
    })?;

    read_lines(file).map_err(|e| CatobaseError::io(format!("failed to read {}", path.display()), e))
}

/// Read newline-terminated lines, dropping a trailing carriage return.
fn read_lines<R: io::Read>(reader: R) -> io::Result<Vec<String>> {
    BufReader::new(reader)
        .lines()
        .map(|line| {
            line.map(|mut l| {
                if l.ends_with('\r') {
                    l.pop();
                }
                l
            })
        })
        .collect()
}

fn write_lines<S: AsRef<str>>(file: File, lines: &[S]) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line.as_ref())?;
    }
    writer.flush()
}
