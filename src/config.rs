//! Server configuration.
//!
//! Loaded from YAML, with every key optional:
//!
//! ```yaml
//! server:
//!   listen_addr: "127.0.0.1:8080"
//!   max_header_size: 8192
//!   read_chunk_size: 16384
//! handler:
//!   default_body: "Hello, World!\n"
//! ```
//!
//! The `LISTEN` environment variable overrides `server.listen_addr`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http::framer::MAX_HEADER_SIZE;
use crate::stream::adapter::DEFAULT_READ_CHUNK;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "RAWHTTP_CONFIG";

/// Config file picked up from the working directory when `RAWHTTP_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "rawhttp.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub handler: HandlerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Largest header block accepted before answering 431
    pub max_header_size: usize,
    /// Most bytes requested from the socket per read
    pub read_chunk_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    pub default_body: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            max_header_size: MAX_HEADER_SIZE,
            read_chunk_size: DEFAULT_READ_CHUNK,
        }
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            default_body: "Hello, World!\n".to_string(),
        }
    }
}

impl Config {
    /// Loads the config file (if any) and applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = listen_addr;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(content).context("failed to parse YAML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.server.max_header_size == 0 {
            anyhow::bail!("server.max_header_size must be greater than zero");
        }
        if self.server.read_chunk_size == 0 {
            anyhow::bail!("server.read_chunk_size must be greater than zero");
        }
        Ok(())
    }
}
