//! Configuration management for purefa-check.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

use crate::cli::{Args, ConfigFormat};
use purefa_check::array::client::{ClientOptions, DEFAULT_API_VERSION};
use purefa_check::check::DEFAULT_TIMEOUT_SECS;
use purefa_check::range::Range;

pub const DEFAULT_LOG_LEVEL: &str = "error";

/// Default warning/critical ranges for one threshold context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub warning: Option<String>,
    pub critical: Option<String>,
}

/// Effective configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Array access
    #[serde(alias = "api-version")]
    pub api_version: Option<String>,
    #[serde(alias = "verify-tls")]
    pub verify_tls: Option<bool>,

    // Invocation
    pub timeout: Option<u64>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
    pub syslog: Option<bool>,

    /// Path to JSON test data file (uses recorded array data instead of the REST API)
    #[serde(alias = "test-data-file")]
    pub test_data_file: Option<PathBuf>,

    /// Ranges used when the command line leaves a threshold unset, keyed by
    /// context name (`critical`, `warning`, `info`, `occupancy`).
    #[serde(default)]
    pub thresholds: BTreeMap<String, ThresholdConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_version: Some(DEFAULT_API_VERSION.to_string()),
            verify_tls: Some(false),
            timeout: Some(DEFAULT_TIMEOUT_SECS),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
            syslog: Some(true),
            test_data_file: None,
            thresholds: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            api_version: self
                .api_version
                .clone()
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            verify_tls: self.verify_tls.unwrap_or(false),
        }
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        let level = self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
        LevelFilter::from_str(level).map_err(|_| anyhow::anyhow!("Invalid log_level '{}'", level))
    }

    /// Resolves the warning and critical expressions of a context:
    /// command line first, then the config file.
    pub fn thresholds_for(
        &self,
        context: &str,
        warning: Option<&str>,
        critical: Option<&str>,
    ) -> (Option<String>, Option<String>) {
        let configured = self.thresholds.get(context);
        let warning = warning
            .map(str::to_string)
            .or_else(|| configured.and_then(|t| t.warning.clone()));
        let critical = critical
            .map(str::to_string)
            .or_else(|| configured.and_then(|t| t.critical.clone()));
        (warning, critical)
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<()> {
    if cfg.timeout == Some(0) {
        bail!("timeout must be greater than 0");
    }

    cfg.level_filter()?;

    for (context, threshold) in &cfg.thresholds {
        for expr in [&threshold.warning, &threshold.critical].into_iter().flatten() {
            Range::parse(expr)
                .with_context(|| format!("Invalid threshold for context '{}'", context))?;
        }
    }

    if let Some(path) = &cfg.test_data_file {
        if !path.exists() {
            bail!("Test data file not found: {}", path.display());
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(version) = &args.api_version {
        config.api_version = Some(version.clone());
    }
    if args.verify_tls {
        config.verify_tls = Some(true);
    }
    if let Some(timeout) = args.timeout {
        config.timeout = Some(timeout);
    }
    if let Some(level) = args.log_level {
        config.log_level = Some(level.as_str().to_string());
    }
    if args.no_syslog {
        config.syslog = Some(false);
    }
    if let Some(test_file) = &args.test_data_file {
        config.test_data_file = Some(test_file.clone());
    }

    Ok(config)
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                bail!("Config file not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let defaults = [
                "/etc/purefa-check/config.yaml",
                "/etc/purefa-check/config.yml",
                "/etc/purefa-check/config.json",
                "./purefa-check.yaml",
                "./purefa-check.yml",
                "./purefa-check.json",
            ];
            match defaults.iter().map(Path::new).find(|p| p.exists()) {
                Some(p) => p.to_path_buf(),
                None => return Ok(Config::default()),
            }
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?,
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in {}", path.display()))?,
        // Default to YAML
        _ => serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?,
    };
    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Serializes configuration in the requested format
pub fn render_config(config: &Config, format: ConfigFormat) -> Result<String> {
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<()> {
    println!("{}", render_config(config, format)?);
    Ok(())
}
