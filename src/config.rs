//! Runtime configuration.
//!
//! Values come from, in increasing priority:
//! 1. built-in defaults
//! 2. the TOML file named by `AGROSTOCK_CONFIG` (optional)
//! 3. the environment: `AGROSTOCK_DATA_FILE`, `AGROSTOCK_REPORT_DIR`,
//!    `AGROSTOCK_MAILBOX_SIZE`, `AGROSTOCK_LOG`
//!
//! ```toml
//! data_file = "agrostock.json"
//! report_dir = "reports"
//! mailbox_size = 64
//! log_level = "agrostock=debug,keyed_actor=info"
//! ```

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "AGROSTOCK_CONFIG";
pub const DATA_FILE_VAR: &str = "AGROSTOCK_DATA_FILE";
pub const REPORT_DIR_VAR: &str = "AGROSTOCK_REPORT_DIR";
pub const MAILBOX_SIZE_VAR: &str = "AGROSTOCK_MAILBOX_SIZE";
pub const LOG_VAR: &str = "AGROSTOCK_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// JSON snapshot file. Without one, stock is kept in memory only.
    pub data_file: Option<PathBuf>,
    /// Directory that receives a text copy of each stock report.
    pub report_dir: Option<PathBuf>,
    /// Capacity of the item registry's request channel.
    pub mailbox_size: usize,
    /// Default tracing directive when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            report_dir: None,
            mailbox_size: 32,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match env::var_os(CONFIG_PATH_VAR) {
            Some(path) => {
                let path = PathBuf::from(path);
                let text = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Read { path, source })?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };
        config.with_overrides(|key| env::var(key).ok())
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = lookup(DATA_FILE_VAR) {
            self.data_file = (!path.trim().is_empty()).then(|| PathBuf::from(path));
        }
        if let Some(dir) = lookup(REPORT_DIR_VAR) {
            self.report_dir = (!dir.trim().is_empty()).then(|| PathBuf::from(dir));
        }
        if let Some(size) = lookup(MAILBOX_SIZE_VAR) {
            self.mailbox_size = size.trim().parse().map_err(|_| ConfigError::Invalid {
                key: MAILBOX_SIZE_VAR.to_string(),
                value: size.clone(),
            })?;
        }
        if let Some(level) = lookup(LOG_VAR) {
            self.log_level = level;
        }
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.mailbox_size == 0 {
            return Err(ConfigError::Invalid {
                key: "mailbox_size".to_string(),
                value: "0".to_string(),
            });
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "log_level".to_string(),
                value: self.log_level,
            });
        }
        Ok(self)
    }
}
