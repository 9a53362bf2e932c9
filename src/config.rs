//! Configuration file loading.
//!
//! Configuration is loaded from TOML with the following resolution order:
//! 1. `--config <path>` (explicit; must exist)
//! 2. `~/.mimir/config.toml` (user)
//! 3. `/etc/mimir/config.toml` (system)
//! 4. built-in defaults
//!
//! The `MIMIR_CACHE_DIR` environment variable, when set, overrides the file
//! backend directory from any of the above.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cache::{CacheConfig, DEFAULT_NAMESPACE, StoreBackend};
use crate::{MimirError, Result};

/// Environment variable overriding the file store directory.
pub const CACHE_DIR_ENV: &str = "MIMIR_CACHE_DIR";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheSection,
}

/// Which bundled store to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    File,
    Memory,
}

/// `[cache]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSection {
    /// Key prefix (default: `mimir.response.`).
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Store kind (default: file).
    #[serde(default)]
    pub backend: BackendKind,
    /// Directory for the file store (default: `~/.cache/mimir/responses`).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            backend: BackendKind::default(),
            path: None,
        }
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// Implicit config locations, highest priority first.
fn default_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".mimir").join("config.toml"));
    }
    locations.push(PathBuf::from("/etc/mimir/config.toml"));
    locations
}

fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.exists()).cloned()
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path that does not exist is an error; otherwise missing
    /// files fall through to defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Config::default()),
        }
    }

    /// Parse a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MimirError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MimirError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MimirError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }
        Ok(first_existing(&default_locations()))
    }

    /// Turn the file configuration into a [`CacheConfig`], applying the
    /// `MIMIR_CACHE_DIR` override.
    pub fn cache_config(&self) -> CacheConfig {
        self.cache_config_with_dir_override(std::env::var_os(CACHE_DIR_ENV).map(PathBuf::from))
    }

    fn cache_config_with_dir_override(&self, dir_override: Option<PathBuf>) -> CacheConfig {
        let backend = match self.cache.backend {
            BackendKind::Memory => StoreBackend::Memory,
            BackendKind::File => match dir_override.or_else(|| self.cache.path.clone()) {
                Some(dir) => StoreBackend::File(dir),
                None => StoreBackend::default(),
            },
        };
        CacheConfig::new()
            .namespace(self.cache.namespace.clone())
            .backend(backend)
    }
}
