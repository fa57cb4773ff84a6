//! Configuration for Catobase

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional configuration file looked up by [`CatobaseConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "catobase.toml";

/// Main configuration for Catobase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatobaseConfig {
    /// Path to the registry file
    #[serde(default = "default_registry_path")]
    pub registry_path: PathBuf,

    /// Reference category listing used to validate registrations
    #[serde(default = "default_categories_path")]
    pub categories_path: PathBuf,
}

fn default_registry_path() -> PathBuf {
    PathBuf::from(".catodb")
}

fn default_categories_path() -> PathBuf {
    PathBuf::from(".catocategories")
}

impl Default for CatobaseConfig {
    fn default() -> Self {
        Self {
            registry_path: default_registry_path(),
            categories_path: default_categories_path(),
        }
    }
}

impl CatobaseConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::CatobaseError::io(format!("failed to read config {}", path.display()), e)
        })?;
        let config: CatobaseConfig = toml::from_str(&content)
            .map_err(|e| crate::CatobaseError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::CatobaseError::Config(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| {
            crate::CatobaseError::io(format!("failed to write config {}", path.display()), e)
        })?;
        Ok(())
    }

    /// Configuration for a working directory.
    ///
    /// Reads `<dir>/catobase.toml` when present, otherwise uses defaults.
    /// Relative paths are resolved against `dir`.
    pub fn discover(dir: &Path) -> crate::Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        let config = if config_path.is_file() {
            Self::load(&config_path)?
        } else {
            Self::default()
        };
        Ok(config.resolved_against(dir))
    }

    fn resolved_against(self, dir: &Path) -> Self {
        Self {
            registry_path: dir.join(self.registry_path),
            categories_path: dir.join(self.categories_path),
        }
    }
}
