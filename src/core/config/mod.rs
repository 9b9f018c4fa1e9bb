//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. The first config file found (see below)
//! 3. CLI flags (applied with [`Config::apply_overrides`])
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. Explicit `--config <path>` (must exist)
//! 2. `$GRADEBOOK_CONFIG` if set
//! 3. `gradebook.toml` in the working directory
//! 4. `$XDG_CONFIG_HOME/gradebook/config.toml`
//! 5. `~/.gradebook/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use gradebook::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(None, Path::new(".")).unwrap();
//! let config = result.config;
//! println!("Storage: {}", config.storage_kind());
//! ```

pub mod schema;

pub use schema::{GradebookConfig, HistoryConfig, SessionConfig, StorageConfig, StorageKind};

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GRADEBOOK_CONFIG";

/// Config file name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "gradebook.toml";

/// Sample size used when neither config nor flags give one.
pub const DEFAULT_SAMPLE_SIZE: usize = 20;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file '{0}' does not exist")]
    Missing(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub storage: Option<StorageKind>,
    pub data_dir: Option<PathBuf>,
    pub history_limit: Option<usize>,
}

/// Effective configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents (or defaults)
    pub file: GradebookConfig,
    /// Path the file was loaded from, if any
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration from an explicit path or the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path is missing, or if a config file
    /// exists but cannot be parsed or fails validation. Missing default
    /// locations are not an error (defaults are used).
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let found = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::Missing(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => Self::locate(cwd, &mut warnings),
        };

        let file = match &found {
            Some(path) => Self::read_config(path)?,
            None => GradebookConfig::default(),
        };
        file.validate()?;

        if let Some(path) = &found {
            tracing::debug!(path = %path.display(), "loaded config");
        }

        Ok(ConfigLoadResult {
            config: Config {
                file,
                loaded_from: found,
            },
            warnings,
        })
    }

    /// Find the first existing config file in the default locations.
    fn locate(cwd: &Path, warnings: &mut Vec<ConfigWarning>) -> Option<PathBuf> {
        // 1. Check $GRADEBOOK_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            warnings.push(ConfigWarning {
                message: format!("{} points to a missing file, ignoring it", CONFIG_ENV),
                path,
            });
        }

        // 2. Check ./gradebook.toml
        let local = cwd.join(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        // 3. Check $XDG_CONFIG_HOME/gradebook/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("gradebook/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 4. Check ~/.gradebook/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".gradebook/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<GradebookConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply command-line overrides on top of the loaded file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the result fails validation.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<(), ConfigError> {
        if let Some(kind) = overrides.storage {
            self.file.storage.kind = kind;
        }
        if let Some(dir) = &overrides.data_dir {
            self.file.storage.directory = Some(dir.clone());
        }
        if let Some(limit) = overrides.history_limit {
            self.file.history.limit = Some(limit);
        }
        self.file.validate()
    }

    /// Render the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(&self.file).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the storage settings.
    pub fn storage(&self) -> &StorageConfig {
        &self.file.storage
    }

    /// Get the storage backend kind.
    ///
    /// Defaults to memory if not configured.
    pub fn storage_kind(&self) -> StorageKind {
        self.file.storage.kind
    }

    /// Get the undo depth cap.
    ///
    /// `None` means unlimited.
    pub fn history_limit(&self) -> Option<NonZeroUsize> {
        self.file.history.limit.and_then(NonZeroUsize::new)
    }

    /// Get the number of records generated by `--sample`.
    ///
    /// Defaults to 20 if not configured.
    pub fn sample_size(&self) -> usize {
        self.file.session.sample_size.unwrap_or(DEFAULT_SAMPLE_SIZE)
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_loaded() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("custom.toml");
        fs::write(
            &config_path,
            r#"
            [storage]
            kind = "text"
            directory = "records"

            [history]
            limit = 5
            "#,
        )
        .unwrap();

        let result = Config::load(Some(&config_path), temp.path()).unwrap();
        let config = result.config;

        assert_eq!(config.storage_kind(), StorageKind::Text);
        assert_eq!(
            config.storage().students_path(),
            PathBuf::from("records/students.txt")
        );
        assert_eq!(config.history_limit(), NonZeroUsize::new(5));
        assert_eq!(config.loaded_from(), Some(config_path.as_path()));
    }

    #[test]
    fn explicit_missing_path_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");
        let result = Config::load(Some(&missing), temp.path());
        assert!(matches!(result, Err(ConfigError::Missing(_))));
    }

    #[test]
    fn local_file_found_in_cwd() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(LOCAL_CONFIG_FILE),
            "[storage]\nkind = \"json\"\n",
        )
        .unwrap();

        let mut warnings = Vec::new();
        let found = Config::locate(temp.path(), &mut warnings);
        // $GRADEBOOK_CONFIG may be set in the environment running the tests;
        // only assert when it is not.
        if std::env::var(CONFIG_ENV).is_err() {
            assert_eq!(found, Some(temp.path().join(LOCAL_CONFIG_FILE)));
        }
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
            [storage]
            kind = "memory"
            unknown_field = true
            "#,
        )
        .unwrap();

        let result = Config::load(Some(&config_path), temp.path());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn invalid_kind_rejected() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "[storage]\nkind = \"binary\"\n").unwrap();

        assert!(Config::load(Some(&config_path), temp.path()).is_err());
    }

    #[test]
    fn overrides_win_over_file() {
        let mut config = Config::default();
        config
            .apply_overrides(&ConfigOverrides {
                storage: Some(StorageKind::Json),
                data_dir: Some(PathBuf::from("/tmp/gb")),
                history_limit: Some(3),
            })
            .unwrap();

        assert_eq!(config.storage_kind(), StorageKind::Json);
        assert_eq!(
            config.storage().grades_path(),
            PathBuf::from("/tmp/gb/grades.json")
        );
        assert_eq!(config.history_limit(), NonZeroUsize::new(3));
    }

    #[test]
    fn zero_limit_override_rejected() {
        let mut config = Config::default();
        let result = config.apply_overrides(&ConfigOverrides {
            history_limit: Some(0),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.storage_kind(), StorageKind::Memory);
        assert_eq!(config.history_limit(), None);
        assert_eq!(config.sample_size(), DEFAULT_SAMPLE_SIZE);
        assert!(config.loaded_from().is_none());
    }

    #[test]
    fn renders_as_toml() {
        let config = Config::default();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("kind = \"memory\""));
    }
}
