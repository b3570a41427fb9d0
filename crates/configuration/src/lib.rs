use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

#[cfg(feature = "clap")]
pub mod cli;

// Re-export the core types to provide a clean public API.
#[cfg(feature = "clap")]
pub use cli::ConfigArgs;
pub use settings::{Config, DatabaseSettings, ReportSettings};

/// The file read when no explicit configuration path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix of environment variables that override file settings,
/// e.g. `DORM__DATABASE__PASSWORD`.
pub const ENV_PREFIX: &str = "DORM";

/// Loads the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file at `path`
/// (optional, skipped when absent), then `DORM__<SECTION>__<KEY>` environment
/// variables. Callers that rely on a `.env` file must load it beforehand.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .set_default("database.host", "localhost")?
        .set_default("database.port", 5432)?
        .set_default("database.database_name", "task1")?
        .set_default("report.rooms_path", "./data/rooms.json")?
        .set_default("report.students_path", "./data/students.json")?
        .set_default("report.output_dir", "queries")?
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(
        path = %path.display(),
        host = %config.database.host,
        port = config.database.port,
        database = %config.database.database_name,
        "Configuration loaded."
    );

    Ok(config)
}
