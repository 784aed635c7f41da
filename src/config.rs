use crate::error::{DashboardError, Result};
use crate::store::RecordStore;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "umkm-map.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Where records come from. Without `csv_path` the embedded table is used.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub csv_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub filter: String,
    /// Directory for the log file written while the terminal UI runs.
    pub directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "umkm_map=info".to_string(),
            directory: PathBuf::from("logs"),
        }
    }
}

impl Config {
    /// Load from an explicit path (must exist), or from
    /// [`DEFAULT_CONFIG_FILE`] if present, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_in(path, Path::new("."))
    }

    /// Like [`Config::load`], looking for [`DEFAULT_CONFIG_FILE`] in `dir`.
    pub fn load_in(path: Option<&Path>, dir: &Path) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = dir.join(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Build the record store this configuration points at.
    pub fn record_store(&self) -> Result<RecordStore> {
        match &self.data.csv_path {
            Some(path) => RecordStore::load_csv(path),
            None => Ok(RecordStore::embedded()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.server.bind, "0.0.0.0:3000");
        assert_eq!(config.logging.filter, "umkm_map=info");
        assert!(config.data.csv_path.is_none());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::parse(
            r#"
            [server]
            bind = "127.0.0.1:8080"

            [data]
            csv_path = "data/umkm.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.data.csv_path, Some(PathBuf::from("data/umkm.csv")));
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(Config::parse("[server"), Err(DashboardError::Toml(_))));
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = Config::load(Some(Path::new("/nonexistent/umkm-map.toml")));
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_default_file_picked_up_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[server]\nbind = \"127.0.0.1:9000\"\n",
        )
        .unwrap();

        let config = Config::load_in(None, dir.path()).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9000");
    }

    #[test]
    fn test_no_default_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(Config::load_in(None, dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_explicit_path_wins_over_default_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "[server]\nbind = \"a:1\"\n").unwrap();
        let explicit = dir.path().join("other.toml");
        std::fs::write(&explicit, "[server]\nbind = \"b:2\"\n").unwrap();

        let config = Config::load_in(Some(explicit.as_path()), dir.path()).unwrap();
        assert_eq!(config.server.bind, "b:2");
    }

    #[test]
    fn test_record_store_from_csv_path() {
        let mut csv_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(csv_file, "name,category,regency,address,latitude,longitude").unwrap();
        writeln!(csv_file, "UMKM A,Snack,Majene,Jl. A,-3.5,118.9").unwrap();

        let mut config = Config::default();
        config.data.csv_path = Some(csv_file.path().to_path_buf());

        let store = config.record_store().unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(Config::default().record_store().unwrap().len(), 10);
    }
}
