//! Database connection parameters

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Connection parameters for the target database.
///
/// Field names follow the `config.json` layout (`db_host`, `db_port`, ...).
/// The embedded engine opens `db_name` as its database file; host, port and
/// credentials only describe the target in logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbConfig {
    /// Host name
    #[serde(default = "default_host")]
    pub db_host: String,

    /// Port, 0 when unused
    #[serde(default)]
    pub db_port: u16,

    /// User name
    #[serde(default)]
    pub db_user: String,

    /// Password, never logged
    #[serde(default)]
    pub db_password: String,

    /// Database name, used as the database file path (`:memory:` allowed)
    pub db_name: String,
}

fn default_host() -> String {
    "localhost".to_string()
}

impl DbConfig {
    /// Config pointing at a database file with default connection fields
    pub fn new(db_name: impl Into<String>) -> Self {
        Self {
            db_host: default_host(),
            db_port: 0,
            db_user: String::new(),
            db_password: String::new(),
            db_name: db_name.into(),
        }
    }

    /// Check required fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_name.trim().is_empty() {
            return Err(ConfigError::Invalid("db_name must not be empty".to_string()));
        }
        Ok(())
    }

    /// Human readable target, password redacted
    pub fn connection_string(&self) -> String {
        let mut target = String::new();
        if !self.db_user.is_empty() {
            target.push_str(&self.db_user);
            if !self.db_password.is_empty() {
                target.push_str(":***");
            }
            target.push('@');
        }
        target.push_str(&self.db_host);
        if self.db_port != 0 {
            target.push_str(&format!(":{}", self.db_port));
        }
        target.push('/');
        target.push_str(&self.db_name);
        target
    }
}
