use crate::error::ConfigError;
use crate::settings::Config;
use std::path::PathBuf;

/// Command-line flags selecting the configuration source.
///
/// Flatten this into a binary's `clap` parser to give it a `--config` flag.
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    /// Path to the TOML configuration file. Missing files are skipped.
    #[arg(long, value_name = "FILE", default_value = crate::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

impl ConfigArgs {
    /// Loads the configuration from the file named on the command line.
    pub fn load(&self) -> Result<Config, ConfigError> {
        crate::load_config(&self.config)
    }
}
