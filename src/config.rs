//! Configuration module for PrimePlay

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::auth::DEFAULT_AUTH_URL;

/// Where list data comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// REST backend; filtering and pagination happen server-side
    #[default]
    Remote,
    /// Bundled dataset; filtering and pagination happen client-side
    Demo,
}

impl SourceKind {
    /// Config-file spelling of the kind
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Demo => "demo",
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// List source (remote or demo)
    #[serde(default)]
    pub source: SourceKind,

    /// Root of the sports REST API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Root of the authentication backend
    #[serde(default = "default_auth_base_url")]
    pub auth_base_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Artificial latency of the demo source in milliseconds
    #[serde(default)]
    pub demo_latency_ms: u64,

    /// Storage key for persisted favorites
    #[serde(default = "default_favorites_key")]
    pub favorites_key: String,
}

fn default_api_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_auth_base_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

const fn default_request_timeout() -> u64 {
    10
}

const fn default_page_size() -> u32 {
    10
}

fn default_favorites_key() -> String {
    "primeplay.favorites".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            api_base_url: default_api_base_url(),
            auth_base_url: default_auth_base_url(),
            request_timeout_secs: default_request_timeout(),
            page_size: default_page_size(),
            demo_latency_ms: 0,
            favorites_key: default_favorites_key(),
        }
    }
}

impl Config {
    /// HTTP request timeout
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Simulated latency for the demo source
    pub const fn demo_latency(&self) -> Duration {
        Duration::from_millis(self.demo_latency_ms)
    }

    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        crate::paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        let mut config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        if config.page_size == 0 {
            tracing::warn!("page_size = 0 in config, using {}", default_page_size());
            config.page_size = default_page_size();
        }

        Ok(config)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}
