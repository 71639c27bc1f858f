/*!
 * Configuration loading, validation and persistence.
 */

use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;

use crate::export::ExportFormat;
use crate::review::summary::SortOrder;

/// Application configuration, loaded from and saved to a JSON file
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Proofreading provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Anthropic provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API key (ANTHROPIC_API_KEY is used when empty)
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Timeout seconds per pass
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Output token budget per pass
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values make output more deterministic
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Result export configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ExportConfig {
    /// Output format
    #[serde(default)]
    pub format: ExportFormat,

    /// Base file name without extension; a dated name is used when absent
    #[serde(default)]
    pub file_name: Option<String>,

    /// Row order in exports and the console summary
    #[serde(default)]
    pub sort: SortOrder,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_endpoint() -> String {
    crate::providers::anthropic::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    // Whole documents go out in one request per pass
    180
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.0
}

impl Config {
    /// Load the configuration file, writing a default one if it does not exist
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let file = File::open(config_path)
                .with_context(|| format!("Failed to open config file: {}", config_path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
            return Ok(config);
        }

        warn!(
            "Config file not found at '{}', creating default config.",
            config_path.display()
        );
        let config = Config::default();
        config.save(config_path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, config_path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(config_path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", config_path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.provider.api_key.trim().is_empty() {
            return Err(anyhow!(
                "An Anthropic API key is required (set it in the config file or ANTHROPIC_API_KEY)"
            ));
        }

        if self.provider.model.trim().is_empty() {
            return Err(anyhow!("A model name is required"));
        }

        let endpoint = Url::parse(&self.provider.endpoint)
            .with_context(|| format!("Invalid provider endpoint: {}", self.provider.endpoint))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(anyhow!(
                "Provider endpoint must use http or https: {}",
                self.provider.endpoint
            ));
        }

        if self.provider.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than 0"));
        }

        if self.provider.max_tokens == 0 {
            return Err(anyhow!("max_tokens must be greater than 0"));
        }

        if !(0.0..=1.0).contains(&self.provider.temperature) {
            return Err(anyhow!(
                "temperature must be between 0.0 and 1.0, got {}",
                self.provider.temperature
            ));
        }

        if let Some(name) = &self.export.file_name {
            if name.trim().is_empty() || name.contains(['/', '\\']) {
                return Err(anyhow!("Invalid export file name: {:?}", name));
            }
        }

        Ok(())
    }
}
