//! Registry queries
//!
//! Every query re-reads the whole registry; there is no index or cache.

use crate::error::Result;
use crate::record::Record;
use crate::registry::Registry;
use regex::Regex;
use tracing::debug;

/// Runs path-pattern and category queries against one registry.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    registry: Registry,
}

impl QueryEngine {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Paths of all records whose full subject path matches `pattern` and
    /// which carry every category in `required`.
    ///
    /// Results are in registry order; a subject registered several times
    /// appears once per matching record.
    pub fn get<S: AsRef<str>>(&self, pattern: &str, required: &[S]) -> Result<Vec<String>> {
        Ok(self
            .find(pattern, required)?
            .into_iter()
            .map(|record| record.subject_path)
            .collect())
    }

    /// Same selection as [`QueryEngine::get`], returning whole records.
    pub fn find<S: AsRef<str>>(&self, pattern: &str, required: &[S]) -> Result<Vec<Record>> {
        let records = self.registry.records()?;
        let path_re = Regex::new(pattern)?;

        let scanned = records.len();
        let matches: Vec<Record> = records
            .into_iter()
            .filter(|record| path_re.is_match(&record.subject_path) && record.contains_all(required))
            .collect();

        debug!(
            pattern,
            required = required.len(),
            scanned,
            matched = matches.len(),
            "Registry query"
        );
        Ok(matches)
    }
}
