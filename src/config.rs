//! Service configuration loaded from TOML with environment overrides.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::DEFAULT_ARTIFACT_NAME;

/// Default filename probed for service configuration.
pub const CONFIG_FILE_NAME: &str = "sentra.toml";

const PORT_ENV: &str = "SENTRA_PORT";
const HOST_ENV: &str = "SENTRA_HOST";
const MODEL_PATH_ENV: &str = "SENTRA_MODEL_PATH";

/// Errors raised while resolving the service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file is not valid TOML for the expected schema.
    #[error("Failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// An environment override did not parse.
    #[error("Invalid {name} value '{value}'")]
    InvalidEnv { name: &'static str, value: String },
}

/// Settings for the prediction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Interface to bind; all interfaces by default.
    #[serde(default = "default_host")]
    pub host: IpAddr,
    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Location of the serialized model artifact.
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            model_path: default_model_path(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration: `sentra.toml` if present, then env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(Path::new(CONFIG_FILE_NAME))?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse the given TOML file, or return defaults if it does not exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The socket address to serve on.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = non_empty_env(HOST_ENV) {
            self.host = value.parse().map_err(|_| ConfigError::InvalidEnv {
                name: HOST_ENV,
                value,
            })?;
        }
        if let Some(value) = non_empty_env(PORT_ENV) {
            self.port = value.parse().map_err(|_| ConfigError::InvalidEnv {
                name: PORT_ENV,
                value,
            })?;
        }
        if let Some(value) = non_empty_env(MODEL_PATH_ENV) {
            self.model_path = PathBuf::from(value);
        }
        Ok(())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8000
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_ARTIFACT_NAME)
}
