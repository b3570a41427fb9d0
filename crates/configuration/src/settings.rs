use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseSettings,
    pub report: ReportSettings,
}

/// Credentials and location of the PostgreSQL server.
///
/// These are always supplied out-of-band (file or environment), never compiled in.
#[derive(Clone, Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// The name of the database holding the `rooms` and `students` tables.
    pub database_name: String,
}

/// Where input data is read from and where reports are written to.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    /// The default path of the rooms JSON file.
    pub rooms_path: PathBuf,
    /// The default path of the students JSON file.
    pub students_path: PathBuf,
    /// The directory receiving `query_<n>_<timestamp>.<ext>` files.
    pub output_dir: PathBuf,
}

impl Config {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.database.host.trim().is_empty() {
            return Err(ConfigError::ValidationError("database.host must not be empty".to_string()));
        }
        if self.database.port == 0 {
            return Err(ConfigError::ValidationError("database.port must not be 0".to_string()));
        }
        if self.database.username.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.username must not be empty".to_string(),
            ));
        }
        if self.database.database_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.database_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// The password must never end up in logs.
impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database_name", &self.database_name)
            .finish()
    }
}
