//! Configuration file discovery and loading.
//!
//! Two files take part: the user config in the data directory and the
//! nearest `roomhold.yaml` found walking up from the working directory.

use crate::config::schema::Config;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the user configuration file inside the data directory.
pub const USER_CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the project configuration file.
pub const PROJECT_CONFIG_FILE_NAME: &str = "roomhold.yaml";

/// Configuration source with its precedence level.
///
/// Lower precedence values are overridden by higher ones.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the configuration file.
    pub path: PathBuf,
    /// Precedence level (higher values take priority).
    pub precedence: u8,
    /// Parsed configuration.
    pub config: Config,
}

/// Loads configuration from various sources.
///
/// # Examples
///
/// ```no_run
/// use roomhold::config::ConfigLoader;
/// use std::path::Path;
///
/// let sources = ConfigLoader::load_all(Path::new("."), None).unwrap();
/// println!("Found {} configuration sources", sources.len());
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Discover and load all configuration files.
    ///
    /// Searches for:
    /// 1. User config at `<data_dir>/config.yaml` (precedence 1)
    /// 2. The nearest `roomhold.yaml` walking up from `working_dir` (precedence 2)
    ///
    /// Without `data_dir` the user config is read from the default data
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration file exists but cannot be read
    /// or parsed.
    pub fn load_all(working_dir: &Path, data_dir: Option<&Path>) -> Result<Vec<ConfigSource>> {
        let mut sources = Vec::new();

        if let Some(user_config) = Self::load_user_config(data_dir)? {
            sources.push(user_config);
        }
        if let Some(project_config) = Self::discover_project_config(working_dir)? {
            sources.push(project_config);
        }

        sources.sort_by_key(|s| s.precedence);
        Ok(sources)
    }

    fn load_user_config(data_dir: Option<&Path>) -> Result<Option<ConfigSource>> {
        let config_path = match data_dir {
            Some(dir) => dir.join(USER_CONFIG_FILE_NAME),
            None => crate::database::resolve_data_dir()?.join(USER_CONFIG_FILE_NAME),
        };

        if !config_path.exists() {
            return Ok(None);
        }

        let config = Self::load_file(&config_path)?;
        log::debug!("loaded user config {}", config_path.display());
        Ok(Some(ConfigSource {
            path: config_path,
            precedence: 1,
            config,
        }))
    }

    /// Finds the nearest project config at or above `start_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the discovered file cannot be read or parsed.
    pub fn discover_project_config(start_dir: &Path) -> Result<Option<ConfigSource>> {
        let mut current = start_dir.to_path_buf();

        loop {
            let candidate = current.join(PROJECT_CONFIG_FILE_NAME);
            if candidate.is_file() {
                let config = Self::load_file(&candidate)?;
                log::debug!("loaded project config {}", candidate.display());
                return Ok(Some(ConfigSource {
                    path: candidate,
                    precedence: 2,
                    config,
                }));
            }
            if !current.pop() {
                return Ok(None);
            }
        }
    }

    /// Load and parse a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// [`Error::InvalidConfig`] naming the file if the YAML is invalid.
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path)?;

        serde_yaml::from_str(&contents).map_err(|e| Error::InvalidConfig {
            field: path.display().to_string(),
            message: format!("invalid YAML: {e}"),
        })
    }
}
