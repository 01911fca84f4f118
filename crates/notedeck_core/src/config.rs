//! Notebook configuration loaded from an optional TOML file.
//!
//! ```toml
//! [storage]
//! db_path = "/home/me/.local/share/notedeck/notebook.sqlite3"
//!
//! [logging]
//! level = "info"
//! dir = "/home/me/.local/state/notedeck/logs"
//!
//! [view]
//! default_sort = "updated-newest"
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use crate::logging::{default_log_level, normalize_level};
use crate::model::sort::SortOption;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// File name of the notebook database inside the data directory.
pub const DEFAULT_DB_FILE_NAME: &str = "notebook.sqlite3";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
    InvalidValue { field: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "failed to parse config `{}`: {message}", path.display())
            }
            Self::InvalidValue { field, message } => {
                write!(f, "invalid config value for `{field}`: {message}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file. `None` means "use the platform default".
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level_string")]
    pub level: String,
    /// Absolute log directory. `None` disables file logging.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub default_sort: SortOption,
}

fn default_level_string() -> String {
    default_log_level().to_string()
}

impl NotebookConfig {
    /// Reads and validates a config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|err| match err {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Reads a config file when `path` is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(raw: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|err| ConfigError::Parse {
            path: PathBuf::new(),
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        normalize_level(&self.logging.level).map_err(|err| ConfigError::InvalidValue {
            field: "logging.level",
            message: err.to_string(),
        })?;

        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    field: "logging.dir",
                    message: format!("must be an absolute path, got `{}`", dir.display()),
                });
            }
        }

        if let Some(db_path) = &self.storage.db_path {
            if db_path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "storage.db_path",
                    message: "cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Database path, falling back to `data_dir/notebook.sqlite3`.
    pub fn resolve_db_path(&self, data_dir: &Path) -> PathBuf {
        self.storage
            .db_path
            .clone()
            .unwrap_or_else(|| data_dir.join(DEFAULT_DB_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, NotebookConfig};
    use crate::model::sort::SortOption;
    use std::path::{Path, PathBuf};

    #[test]
    fn empty_file_yields_defaults() {
        let config = NotebookConfig::from_toml_str("").unwrap();
        assert_eq!(config, NotebookConfig::default());
        assert_eq!(config.view.default_sort, SortOption::UpdatedNewest);
        assert!(config.logging.dir.is_none());
    }

    #[test]
    fn parses_all_sections() {
        let config = NotebookConfig::from_toml_str(
            r#"
            [storage]
            db_path = "/tmp/notes.sqlite3"

            [logging]
            level = "warn"
            dir = "/tmp/notedeck-logs"

            [view]
            default_sort = "alphabetical"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.storage.db_path.as_deref(),
            Some(Path::new("/tmp/notes.sqlite3"))
        );
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.view.default_sort, SortOption::Alphabetical);
    }

    #[test]
    fn rejects_unknown_sort_and_bad_level() {
        let sort_err =
            NotebookConfig::from_toml_str("[view]\ndefault_sort = \"newest\"").unwrap_err();
        assert!(matches!(sort_err, ConfigError::Parse { .. }));

        let level_err = NotebookConfig::from_toml_str("[logging]\nlevel = \"loud\"").unwrap_err();
        assert!(matches!(
            level_err,
            ConfigError::InvalidValue {
                field: "logging.level",
                ..
            }
        ));
    }

    #[test]
    fn rejects_relative_log_dir() {
        let err = NotebookConfig::from_toml_str("[logging]\ndir = \"logs\"").unwrap_err();
        assert!(err.to_string().contains("logging.dir"));
    }

    #[test]
    fn resolve_db_path_prefers_configured_value() {
        let mut config = NotebookConfig::default();
        assert_eq!(
            config.resolve_db_path(Path::new("/data")),
            PathBuf::from("/data/notebook.sqlite3")
        );
        config.storage.db_path = Some(PathBuf::from("/elsewhere/n.sqlite3"));
        assert_eq!(
            config.resolve_db_path(Path::new("/data")),
            PathBuf::from("/elsewhere/n.sqlite3")
        );
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = NotebookConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
