use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides `api.base_url`
pub const BASE_URL_ENV: &str = "REGISTER_HARNESS_BASE_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub stub: StubConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout; when unset or 0 the HTTP client default applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StubConfig {
    #[serde(default = "default_stub_host")]
    pub host: String,

    #[serde(default = "default_stub_port")]
    pub port: u16,

    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// Emails the stub lets register successfully
    #[serde(default)]
    pub defined_users: Vec<String>,
}

// Default value functions
fn default_base_url() -> String {
    "https://reqres.in/api".to_string()
}

fn default_stub_host() -> String {
    "127.0.0.1".to_string()
}

fn default_stub_port() -> u16 {
    8080
}

fn default_server_name() -> String {
    "register-harness-stub".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            host: default_stub_host(),
            port: default_stub_port(),
            server_name: default_server_name(),
            defined_users: Vec::new(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.register-harness/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".register-harness"))
    }

    /// Get config file path (~/.register-harness/config.toml)
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_file = Self::config_file()?;

        if !config_file.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&config_file)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        self.save_to(&Self::config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    /// Apply `REGISTER_HARNESS_BASE_URL` if it is set and non-empty
    pub fn apply_env_overrides(self) -> Self {
        self.with_base_url_override(std::env::var(BASE_URL_ENV).ok())
    }

    /// Replace the base URL unless `base_url` is absent or blank
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
            tracing::debug!("Overriding base URL with {}", base_url);
            self.api.base_url = base_url;
        }
        self
    }

    /// Configured request timeout, treating 0 as unset
    pub fn timeout(&self) -> Option<Duration> {
        self.api
            .timeout_seconds
            .filter(|seconds| *seconds > 0)
            .map(Duration::from_secs)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// Full URL of the registration endpoint
    pub fn register_url(&self) -> String {
        format!("{}/register", self.api.base_url.trim_end_matches('/'))
    }
}
