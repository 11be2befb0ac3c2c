use crate::error::{ConfigError, CostctlError};
use crate::interpret::{FLEET_DISPLAY_LIMIT, SINGLE_DISPLAY_LIMIT};
use crate::model::{OperatingSystem, PaymentOption};
use crate::provider::Provider;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub defaults: DefaultsConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the optimization service
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub provider: Provider,
    pub os: OperatingSystem,
    pub payment: PaymentOption,
    /// Region code, comma-separated list, or "all"
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Fleet configurations shown per submission
    pub fleet_limit: usize,
    /// Single-instance results shown per search
    pub single_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
            },
            defaults: DefaultsConfig {
                provider: Provider::Aws,
                os: OperatingSystem::Linux,
                payment: PaymentOption::Spot,
                region: "all".to_string(),
            },
            display: DisplayConfig {
                fleet_limit: FLEET_DISPLAY_LIMIT,
                single_limit: SINGLE_DISPLAY_LIMIT,
            },
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try .costctl.toml in current dir, then ~/.config/costctl/config.toml
            let local = PathBuf::from(".costctl.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("costctl").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".costctl.toml"))
            }
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| CostctlError::from(ConfigError::ParseError(e.to_string())))
                .with_context(|| {
                    let mut err = format!("Failed to parse config: {}", config_path.display());
                    err.push_str("\n  Common issues:");
                    err.push_str("\n    - Invalid TOML syntax");
                    err.push_str("\n    - Missing required fields");
                    err.push_str("\n    - Unknown provider (expected AWS, Azure or Hybrid)");
                    err.push_str("\n  Tip: Run 'costctl init' to create a new config file");
                    err
                })?;
            config.validate()?;
            Ok(config)
        } else {
            if path.is_some() {
                eprintln!("WARNING: Config file not found: {}", config_path.display());
                eprintln!("   Using default configuration. Run 'costctl init' to create a config file.");
            }
            Ok(Config::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Reject values that would make every command fail later.
    pub fn validate(&self) -> std::result::Result<(), CostctlError> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::MissingField("api.base_url".to_string()).into());
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: format!("expected an http(s) URL, got '{}'", base_url),
            }
            .into());
        }
        if self.display.fleet_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "display.fleet_limit".to_string(),
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.display.single_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "display.single_limit".to_string(),
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Base URL with an explicit override (flag or environment) taking priority.
    pub fn api_url(&self, override_url: Option<&str>) -> String {
        override_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(&self.api.base_url)
            .trim()
            .trim_end_matches('/')
            .to_string()
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}
