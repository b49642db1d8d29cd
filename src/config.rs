//! Application configuration
//!
//! Provides centralized configuration management with:
//! - Environment variable support
//! - Config file loading (optional)
//! - Runtime defaults
//! - Validation and type safety
//!
//! The electricity rate and the savings factor are fixed constants in
//! [`crate::models`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Remote insight summarizer
    pub summarizer: SummarizerConfig,

    /// Report output
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub json_pretty: bool,
    /// Days listed by the daily report when no limit is given.
    pub default_limit: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "WARN".to_string(),
            format: "pretty".to_string(),
            output: "console".to_string(),
            directory: PathBuf::from("logs"),
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 30,
            temperature: 0.3,
            max_tokens: 1000,
        }
    }
}

impl SummarizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_pretty: true,
            default_limit: 31,
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and defaults
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        let config_paths = [
            PathBuf::from("energy-dashboard.toml"),
            PathBuf::from(".energy-dashboard.toml"),
            dirs::config_dir()
                .map(|d| d.join("energy-dashboard").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if !path.as_os_str().is_empty() && path.exists() {
                info!(config_file = %path.display(), "Loading configuration from file");
                config = Self::load_from_file(path)?;
                break;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("LOG_OUTPUT") {
            self.logging.output = val;
        }
        if let Ok(val) = env::var("ENERGY_LOG_DIR") {
            self.logging.directory = PathBuf::from(val);
        }

        if let Ok(val) = env::var("ENERGY_SUMMARIZER_ENABLED") {
            self.summarizer.enabled = val
                .parse()
                .context("Invalid ENERGY_SUMMARIZER_ENABLED")?;
        }
        if let Ok(val) = env::var("ENERGY_SUMMARIZER_ENDPOINT") {
            self.summarizer.endpoint = val;
        }
        if let Ok(val) = env::var("ENERGY_SUMMARIZER_MODEL") {
            self.summarizer.model = val;
        }
        if let Ok(val) = env::var("ENERGY_SUMMARIZER_TIMEOUT_SECS") {
            self.summarizer.timeout_secs = val
                .parse()
                .context("Invalid ENERGY_SUMMARIZER_TIMEOUT_SECS")?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(anyhow::anyhow!(
                "Log format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            ));
        }

        if !matches!(self.logging.output.as_str(), "console" | "file" | "both") {
            return Err(anyhow::anyhow!(
                "Log output must be 'console', 'file' or 'both', got '{}'",
                self.logging.output
            ));
        }

        if self.summarizer.timeout_secs == 0 {
            return Err(anyhow::anyhow!("Summarizer timeout must be greater than 0"));
        }

        if self.summarizer.timeout_secs > 300 {
            warn!(
                timeout_secs = self.summarizer.timeout_secs,
                "Summarizer timeout is very long"
            );
        }

        if !(0.0..=2.0).contains(&self.summarizer.temperature) {
            return Err(anyhow::anyhow!(
                "Summarizer temperature must be between 0 and 2, got {}",
                self.summarizer.temperature
            ));
        }

        if self.summarizer.enabled && self.summarizer.endpoint.trim().is_empty() {
            return Err(anyhow::anyhow!("Summarizer endpoint cannot be empty"));
        }

        if self.output.default_limit == 0 {
            return Err(anyhow::anyhow!("Default report limit must be greater than 0"));
        }

        Ok(())
    }

    /// Save current configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        info!(path = %path.display(), "Configuration saved to file");

        Ok(())
    }
}
