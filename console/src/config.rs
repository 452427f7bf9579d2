use controller::ControllerConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

const DEFAULT_REQUEST_CAPACITY: usize = 16;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("request_capacity must be greater than 0")]
    ZeroCapacity,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    pub controller: ControllerConfig,
    /// Intents that may queue up while the console is handling one.
    #[serde(default = "default_request_capacity")]
    pub request_capacity: usize,
}

fn default_request_capacity() -> usize {
    DEFAULT_REQUEST_CAPACITY
}

impl ConsoleConfig {
    pub fn new(controller: ControllerConfig) -> Self {
        Self {
            controller,
            request_capacity: DEFAULT_REQUEST_CAPACITY,
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        if config.request_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(config)
    }
}
