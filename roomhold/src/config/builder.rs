//! Layered configuration assembly.

use std::env;
use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::merger::ConfigMerger;
use crate::config::schema::Config;
use crate::config::validator::ConfigValidator;
use crate::error::Result;

/// Builds a [`Config`] from files, environment and programmatic overrides.
///
/// Sources merge lowest to highest: defaults, user config, project
/// config, `ROOMHOLD_*` variables, then [`ConfigBuilder::with_config`].
/// The merged result is validated once.
///
/// # Examples
///
/// ```
/// use roomhold::config::{Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(Config { code_attempts: Some(7), ..Default::default() })
///     .build()
///     .unwrap();
/// assert_eq!(config.code_attempts, Some(7));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    working_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Vec<Config>,
}

impl ConfigBuilder {
    /// Creates a builder that reads every source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts project config discovery at `dir` instead of the current directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Reads the user config from `dir` instead of the default data directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Ignores configuration files.
    #[must_use]
    pub const fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Ignores `ROOMHOLD_*` variables.
    #[must_use]
    pub const fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Layers `config` above every other source. Later calls win.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides.push(config);
        self
    }

    /// Merges and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed, a variable is
    /// malformed, or the merged result fails validation.
    pub fn build(self) -> Result<Config> {
        let mut config = if self.skip_files {
            Config::default()
        } else {
            let working_dir = match self.working_dir {
                Some(dir) => dir,
                None => env::current_dir()?,
            };
            ConfigMerger::merge(ConfigLoader::load_all(&working_dir, self.data_dir.as_deref())?)
        };

        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }

        for overrides in &self.overrides {
            ConfigMerger::merge_into(&mut config, overrides);
        }

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}
