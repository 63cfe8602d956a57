//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAMES: [&str; 2] = [".foodsearch.toml", "foodsearch.toml"];

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed and validated settings
    pub schema: ConfigSchema,
    /// File the settings came from; `None` when defaults apply
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist. Without one, the working directory and
    /// then the user config directory are searched; if nothing is found the
    /// defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        schema
            .validate()
            .context(config_path.as_ref().map_or_else(
                || "Validating default configuration".to_string(),
                |p| format!("Validating {}", p.display()),
            ))?;

        tracing::debug!(path = ?config_path, "Configuration loaded");

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(&self.schema)
            .map_err(|e| Error::config(format!("Failed to render configuration: {e}")))
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILE_NAMES.iter().map(PathBuf::from);
    let user = dirs::config_dir().map(|dir| dir.join("foodsearch").join("config.toml"));

    local.chain(user).find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Reading config file {}", path.display()))?;

    toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("Parsing config file {}", path.display()))
}
