//! CLI context
//!
//! Resolves the registry and reference listing for a command: flags and
//! environment first, then `catobase.toml` in the working directory, then
//! defaults (`.catodb`, `.catocategories`).

use crate::cli::error::HelpfulError;
use catobase_store::{CatobaseConfig, QueryEngine, Registrar, Registry};
use std::path::{Path, PathBuf};

/// Paths every command works against
#[derive(Debug, Clone)]
pub struct CliContext {
    pub config: CatobaseConfig,
}

impl CliContext {
    pub fn resolve(
        registry: Option<PathBuf>,
        categories: Option<PathBuf>,
    ) -> Result<Self, HelpfulError> {
        let cwd = std::env::current_dir().map_err(|e| {
            HelpfulError::new(format!("Cannot determine working directory: {}", e))
        })?;
        Self::resolve_in(&cwd, registry, categories)
    }

    pub fn resolve_in(
        dir: &Path,
        registry: Option<PathBuf>,
        categories: Option<PathBuf>,
    ) -> Result<Self, HelpfulError> {
        let mut config = CatobaseConfig::discover(dir).map_err(|e| {
            HelpfulError::from(e).with_suggestion(format!(
                "TRY: Check {}",
                dir.join(catobase_store::config::CONFIG_FILE_NAME).display()
            ))
        })?;

        if let Some(path) = registry {
            config.registry_path = dir.join(path);
        }
        if let Some(path) = categories {
            config.categories_path = dir.join(path);
        }

        Ok(Self { config })
    }

    pub fn registry(&self) -> Registry {
        Registry::new(&self.config.registry_path)
    }

    /// Registrar validating against the configured reference listing.
    pub fn registrar(&self) -> Result<Registrar, HelpfulError> {
        Registrar::from_listing(self.registry(), &self.config.categories_path)
            .map_err(HelpfulError::from)
    }

    pub fn query(&self) -> QueryEngine {
        QueryEngine::new(self.registry())
    }

    /// `--file` override or the configured reference listing.
    pub fn listing_path(&self, file: Option<PathBuf>) -> PathBuf {
        file.unwrap_or_else(|| self.config.categories_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_resolve_against_dir() {
        let temp = TempDir::new().unwrap();
        let ctx = CliContext::resolve_in(temp.path(), None, None).unwrap();
        assert_eq!(ctx.config.registry_path, temp.path().join(".catodb"));
        assert_eq!(ctx.config.categories_path, temp.path().join(".catocategories"));
    }

    #[test]
    fn test_flags_override_config() {
        let temp = TempDir::new().unwrap();
        let ctx = CliContext::resolve_in(
            temp.path(),
            Some(PathBuf::from("other.db")),
            Some(PathBuf::from("cats.txt")),
        )
        .unwrap();
        assert_eq!(ctx.config.registry_path, temp.path().join("other.db"));
        assert_eq!(ctx.config.categories_path, temp.path().join("cats.txt"));
    }

    #[test]
    fn test_listing_path_override() {
        let temp = TempDir::new().unwrap();
        let ctx = CliContext::resolve_in(temp.path(), None, None).unwrap();
        assert_eq!(
            ctx.listing_path(Some(PathBuf::from("/tmp/x"))),
            PathBuf::from("/tmp/x")
        );
        assert_eq!(ctx.listing_path(None), ctx.config.categories_path);
    }
}
