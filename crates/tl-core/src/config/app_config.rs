//! Run configuration loaded from a JSON file

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use super::{ConfigError, DbConfig};

/// Default directory scanned for CSV files
pub const DEFAULT_CSV_DIR: &str = "./csv";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Configuration for one loader run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Database connection parameters
    #[serde(flatten)]
    pub database: DbConfig,

    /// Directory holding the CSV files
    #[serde(default = "default_csv_dir")]
    pub csv_dir: PathBuf,
}

fn default_csv_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CSV_DIR)
}

impl AppConfig {
    /// Read and validate a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: AppConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.database.validate()?;
        Ok(config)
    }

    /// Replace the CSV directory
    pub fn with_csv_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.csv_dir = dir.into();
        self
    }
}
