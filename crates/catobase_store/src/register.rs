//! Registration workflow
//!
//! Validates a subject file and its categories against the reference category
//! set, optionally snapshots the file, and appends a record to the registry.
//! Every check runs before the registry is written, so a failed registration
//! never leaves a partial record behind.

use crate::error::{CatobaseError, Result};
use crate::listing::{read_listing, validate_label};
use crate::record::{self, DEFAULT_SEPARATOR};
use crate::registry::Registry;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Suffix appended to a subject path to name its snapshot copy.
pub const SNAPSHOT_SUFFIX: &str = ".copy";

/// Registers files into a registry, checking categories against a fixed
/// reference set.
#[derive(Debug, Clone)]
pub struct Registrar {
    registry: Registry,
    known_categories: HashSet<String>,
}

/// Outcome of a bulk registration that keeps going past per-file failures.
#[derive(Debug, Default)]
pub struct BulkReport {
    pub registered: Vec<PathBuf>,
    pub failures: Vec<BulkFailure>,
}

#[derive(Debug)]
pub struct BulkFailure {
    pub path: PathBuf,
    pub error: CatobaseError,
}

impl Registrar {
    pub fn new<S: AsRef<str>>(registry: Registry, known_categories: &[S]) -> Self {
        Self {
            registry,
            known_categories: known_categories
                .iter()
                .map(|c| c.as_ref().to_string())
                .collect(),
        }
    }

    /// Build a registrar whose reference set is the listing at `listing_path`.
    pub fn from_listing(registry: Registry, listing_path: &Path) -> Result<Self> {
        let known = read_listing(listing_path)?;
        Ok(Self::new(registry, &known))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Fail with [`CatobaseError::InvalidCategories`] if any category is not
    /// in the reference set.
    pub fn validate_categories<S: AsRef<str>>(&self, categories: &[S]) -> Result<()> {
        let mut missing: Vec<String> = Vec::new();
        for category in categories {
            let category = category.as_ref();
            if !self.known_categories.contains(category) && !missing.iter().any(|m| m == category)
            {
                missing.push(category.to_string());
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CatobaseError::InvalidCategories { missing })
        }
    }

    /// Register a single file.
    ///
    /// With `make_snapshot`, the file's bytes are first copied to
    /// `<subject>.copy`, replacing any earlier copy.
    pub fn register_file<S: AsRef<str>>(
        &self,
        subject: &Path,
        categories: &[S],
        make_snapshot: bool,
    ) -> Result<()> {
        match fs::metadata(subject) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CatobaseError::SubjectNotFound(subject.to_path_buf()));
            }
            Err(e) => {
                return Err(CatobaseError::io(
                    format!("failed to stat {}", subject.display()),
                    e,
                ));
            }
        }

        self.validate_categories(categories)?;
        for category in categories {
            validate_label(category.as_ref())?;
        }
        let subject_str = subject_path_text(subject)?;

        // Open before snapshotting so a missing registry fails without side effects.
        let mut appender = self.registry.appender()?;

        if make_snapshot {
            let copy_path = snapshot_path(subject);
            fs::copy(subject, &copy_path).map_err(|e| {
                CatobaseError::io(format!("failed to copy file to {}", copy_path.display()), e)
            })?;
            debug!(from = %subject.display(), to = %copy_path.display(), "Snapshot written");
        }

        let line = record::format(subject_str, categories, DEFAULT_SEPARATOR);
        appender.append(&line)?;

        info!(
            path = subject_str,
            categories = categories.len(),
            snapshot = make_snapshot,
            "Registered file"
        );
        Ok(())
    }

    /// Register every file under `root` whose base name matches `pattern`.
    ///
    /// Each matched file's own lines are used as its categories, and a snapshot
    /// is always taken. The first failure of any kind aborts the walk.
    /// Returns the registered paths in traversal order.
    pub fn register_files(&self, root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        let name_re = Regex::new(pattern)?;
        let mut registered = Vec::new();

        for entry in matching_files(root, &name_re) {
            let entry = entry?;
            self.register_listed(entry.path())?;
            registered.push(entry.into_path());
        }

        info!(root = %root.display(), pattern, count = registered.len(), "Bulk registration finished");
        Ok(registered)
    }

    /// Like [`Registrar::register_files`], but a file that fails to register
    /// is recorded in the report and the walk continues.
    ///
    /// Pattern and traversal errors still abort.
    pub fn register_files_lenient(&self, root: &Path, pattern: &str) -> Result<BulkReport> {
        let name_re = Regex::new(pattern)?;
        let mut report = BulkReport::default();

        for entry in matching_files(root, &name_re) {
            let entry = entry?;
            match self.register_listed(entry.path()) {
                Ok(()) => report.registered.push(entry.into_path()),
                Err(error) => {
                    debug!(path = %entry.path().display(), %error, "Skipping file");
                    report.failures.push(BulkFailure {
                        path: entry.into_path(),
                        error,
                    });
                }
            }
        }

        info!(
            root = %root.display(),
            pattern,
            registered = report.registered.len(),
            failed = report.failures.len(),
            "Bulk registration finished"
        );
        Ok(report)
    }

    /// Register `path` under its own lines. Blank lines are not categories.
    fn register_listed(&self, path: &Path) -> Result<()> {
        let categories: Vec<String> = read_listing(path)?
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect();
        self.register_file(path, &categories, true)
    }
}

/// `<subject>.copy`
pub fn snapshot_path(subject: &Path) -> PathBuf {
    let mut name = subject.as_os_str().to_owned();
    name.push(SNAPSHOT_SUFFIX);
    PathBuf::from(name)
}

fn subject_path_text(subject: &Path) -> Result<&str> {
    let text = subject.to_str().ok_or_else(|| CatobaseError::InvalidLabel {
        label: subject.to_string_lossy().into_owned(),
        reason: "path is not valid UTF-8",
    })?;
    if text.contains(DEFAULT_SEPARATOR) || text.contains(&['\n', '\r'][..]) {
        return Err(CatobaseError::InvalidLabel {
            label: text.to_string(),
            reason: "path contains '|' or a line break",
        });
    }
    Ok(text)
}

/// Non-directory entries under `root` whose base name matches `name_re`.
///
/// Entries are visited in file-name order, and each directory is listed in
/// full before any of its entries is yielded.
fn matching_files<'a>(
    root: &Path,
    name_re: &'a Regex,
) -> impl Iterator<Item = walkdir::Result<DirEntry>> + 'a {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter(move |entry| match entry {
            Ok(entry) => {
                !entry.file_type().is_dir()
                    && name_re.is_match(&entry.file_name().to_string_lossy())
            }
            Err(_) => true,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        temp: TempDir,
        registrar: Registrar,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let registry = Registry::init(temp.path().join(".catodb")).unwrap();
            let registrar = Registrar::new(registry, &["Books", "Movies", "Music", "Games"]);
            Self { temp, registrar }
        }

        fn write(&self, name: &str, content: &str) -> PathBuf {
            let path = self.temp.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, content).unwrap();
            path
        }

        fn lines(&self) -> Vec<String> {
            self.registrar.registry().scan_records().unwrap()
        }
    }

    #[test]
    fn test_register_appends_one_line() {
        let fx = Fixture::new();
        let subject = fx.write("notes.txt", "hello");

        fx.registrar
            .register_file(&subject, &["Books", "Movies"], false)
            .unwrap();

        let lines = fx.lines();
        assert_eq!(lines.len(), 1);
        let expected_prefix = format!("{}|Books,Movies|", subject.display());
        assert!(lines[0].starts_with(&expected_prefix), "got: {}", lines[0]);
        assert!(!snapshot_path(&subject).exists());
    }

    #[test]
    fn test_unknown_category_appends_nothing() {
        let fx = Fixture::new();
        let subject = fx.write("notes.txt", "hello");

        let err = fx
            .registrar
            .register_file(&subject, &["Books", "NonExistent"], true)
            .unwrap_err();

        assert!(matches!(
            &err,
            CatobaseError::InvalidCategories { missing } if missing == &vec!["NonExistent".to_string()]
        ));
        assert!(err.to_string().starts_with("some categories do not exist"));
        assert!(fx.lines().is_empty());
        assert!(!snapshot_path(&subject).exists());
    }

    #[test]
    fn test_missing_subject() {
        let fx = Fixture::new();
        let err = fx
            .registrar
            .register_file(&fx.temp.path().join("nope.txt"), &["Books"], false)
            .unwrap_err();

        assert!(matches!(err, CatobaseError::SubjectNotFound(_)));
        assert!(fx.lines().is_empty());
    }

    #[test]
    fn test_missing_registry_skips_snapshot() {
        let temp = TempDir::new().unwrap();
        let subject = temp.path().join("notes.txt");
        fs::write(&subject, "hello").unwrap();
        let registrar = Registrar::new(Registry::new(temp.path().join(".catodb")), &["Books"]);

        let err = registrar.register_file(&subject, &["Books"], true).unwrap_err();

        assert!(matches!(err, CatobaseError::RegistryNotFound(_)));
        assert!(!snapshot_path(&subject).exists());
    }

    #[test]
    fn test_snapshot_overwrites_previous_copy() {
        let fx = Fixture::new();
        let subject = fx.write("notes.txt", "first");
        fx.registrar.register_file(&subject, &["Books"], true).unwrap();
        assert_eq!(fs::read_to_string(snapshot_path(&subject)).unwrap(), "first");

        fs::write(&subject, "second").unwrap();
        fx.registrar.register_file(&subject, &["Books"], true).unwrap();

        assert_eq!(fs::read_to_string(snapshot_path(&subject)).unwrap(), "second");
        assert_eq!(fx.lines().len(), 2);
    }

    #[test]
    fn test_path_with_separator_rejected() {
        let fx = Fixture::new();
        let subject = fx.write("a|b.txt", "x");

        let err = fx.registrar.register_file(&subject, &["Books"], false).unwrap_err();

        assert!(matches!(err, CatobaseError::InvalidLabel { .. }));
        assert!(fx.lines().is_empty());
    }

    #[test]
    fn test_register_files_matches_base_name() {
        let fx = Fixture::new();
        let file1 = fx.write("folder/file1.txt", "Books\nMovies\n");
        let file2 = fx.write("folder/file2.txt", "Music\nGames\n");
        fx.write("folder/other.md", "Books\n");

        let registered = fx
            .registrar
            .register_files(&fx.temp.path().join("folder"), r"file.*\.txt")
            .unwrap();

        assert_eq!(registered, vec![file1.clone(), file2.clone()]);
        assert_eq!(fx.lines().len(), 2);
        assert!(snapshot_path(&file1).exists());
        assert!(snapshot_path(&file2).exists());
    }

    #[test]
    fn test_register_files_ignores_blank_lines() {
        let fx = Fixture::new();
        fx.write("folder/file1.txt", "Books\n\n   \nMovies\n\n");

        fx.registrar
            .register_files(&fx.temp.path().join("folder"), r"\.txt$")
            .unwrap();

        let records = fx.registrar.registry().records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].categories, vec!["Books", "Movies"]);
    }

    #[test]
    fn test_register_files_fails_fast() {
        let fx = Fixture::new();
        fx.write("folder/a.txt", "Books\n");
        fx.write("folder/b.txt", "Unknown\n");
        fx.write("folder/c.txt", "Music\n");

        let err = fx
            .registrar
            .register_files(&fx.temp.path().join("folder"), r"\.txt$")
            .unwrap_err();

        assert!(matches!(err, CatobaseError::InvalidCategories { .. }));
        // a.txt was registered before the walk stopped at b.txt
        assert_eq!(fx.lines().len(), 1);
    }

    #[test]
    fn test_register_files_lenient_collects_failures() {
        let fx = Fixture::new();
        let a = fx.write("folder/a.txt", "Books\n");
        let b = fx.write("folder/b.txt", "Unknown\n");
        let c = fx.write("folder/c.txt", "Music\n");

        let report = fx
            .registrar
            .register_files_lenient(&fx.temp.path().join("folder"), r"\.txt$")
            .unwrap();

        assert_eq!(report.registered, vec![a, c]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, b);
        assert_eq!(fx.lines().len(), 2);
    }

    #[test]
    fn test_register_files_bad_pattern() {
        let fx = Fixture::new();
        let err = fx.registrar.register_files(fx.temp.path(), "(unclosed").unwrap_err();
        assert!(matches!(err, CatobaseError::Pattern(_)));
    }

    #[test]
    fn test_register_files_missing_root() {
        let fx = Fixture::new();
        let err = fx
            .registrar
            .register_files(&fx.temp.path().join("missing"), ".*")
            .unwrap_err();
        assert!(matches!(err, CatobaseError::Walk(_)));
    }

    #[test]
    fn test_from_listing() {
        let fx = Fixture::new();
        let listing = fx.write("categories", "Books\nArt\n");
        let subject = fx.write("notes.txt", "x");

        let registrar = Registrar::from_listing(fx.registrar.registry().clone(), &listing).unwrap();

        assert!(registrar.register_file(&subject, &["Art"], false).is_ok());
        assert!(registrar.register_file(&subject, &["Movies"], false).is_err());
    }
}
