use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to write config file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
    #[error("No config directory found for this platform")]
    NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file, `~/` is expanded
    database: String,
    /// Directory served under `/static`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    static_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let database = dirs::data_dir()
            .map(|dir| dir.join("gigboard").join("gigboard.db"))
            .unwrap_or_else(|| PathBuf::from("gigboard.db"));

        Self {
            database: database.to_string_lossy().into_owned(),
            static_dir: None,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("gigboard").join("config.toml"))
    }

    /// Load the default config file, falling back to built-in defaults when
    /// there is none.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write the default config to the default location unless a file is
    /// already there. Returns the path.
    pub fn create_default() -> Result<PathBuf, ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::default().write_new(&path)?;
        Ok(path)
    }

    fn write_new(&self, path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            log::info!("Config file already exists at {}", path.display());
            return Ok(());
        }

        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(write_err)
    }

    fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(rest);
        }
        PathBuf::from(path)
    }

    pub fn database_path(&self) -> PathBuf {
        Self::expand_path(&self.database)
    }

    pub fn static_dir(&self) -> PathBuf {
        self.static_dir
            .as_deref()
            .map(Self::expand_path)
            .unwrap_or_else(|| PathBuf::from("static"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "database = \"/srv/gigboard/app.db\"\nstatic_dir = \"/srv/gigboard/static\"\n")
            .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("/srv/gigboard/app.db"));
        assert_eq!(config.static_dir(), PathBuf::from("/srv/gigboard/static"));
    }

    #[test]
    fn test_static_dir_defaults_to_relative() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "database = \"gigboard.db\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.static_dir(), PathBuf::from("static"));
    }

    #[test]
    fn test_home_is_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(Config::expand_path("~/music.db"), home.join("music.db"));
        assert_eq!(Config::expand_path("/tmp/~/x.db"), PathBuf::from("/tmp/~/x.db"));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "database = ").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_write_new_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            database: "first.db".into(),
            static_dir: None,
        };
        config.write_new(&path).unwrap();
        Config {
            database: "second.db".into(),
            static_dir: None,
        }
        .write_new(&path)
        .unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), config);
    }
}
