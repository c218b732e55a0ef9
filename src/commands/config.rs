//! Config command implementation.
//!
//! Generates configuration files in various formats.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config, ThresholdConfig};

/// Generates configuration files.
pub fn command_config(output: Option<PathBuf>, format: ConfigFormat, commented: bool) -> Result<()> {
    let output = output.unwrap_or_else(|| PathBuf::from("purefa-check.yaml"));
    let content = generate_config(format, commented)?;

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Default configuration with an example occupancy threshold.
pub fn example_config() -> Config {
    let mut config = Config::default();
    config.thresholds.insert(
        "occupancy".to_string(),
        ThresholdConfig {
            warning: Some("0:80".to_string()),
            critical: Some("0:95".to_string()),
        },
    );
    config
}

fn generate_config(format: ConfigFormat, commented: bool) -> Result<String> {
    let content = render_config(&example_config(), format)?;
    Ok(match format {
        ConfigFormat::Yaml if commented => add_config_comments(content),
        _ => content,
    })
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# purefa-check Configuration
# ==========================
#
# Command line options always override the values below.
#
# Array Access
# ------------
# api_version: "1.16"          # FlashArray REST API version
# verify_tls: false            # Verify the array's TLS certificate
#
# Invocation
# ----------
# timeout: 30                  # Abort the check after N seconds (UNKNOWN)
#
# Logging
# -------
# log_level: "error"           # off, error, warn, info, debug, trace (stderr)
# syslog: true                 # Forward errors to the system log
#
# Testing
# -------
# test_data_file: null         # Serve array data from a JSON file instead of the REST API
#
# Thresholds
# ----------
# Used when the matching command line option is absent. Keys are context
# names: critical, warning, info (alert check) and occupancy.
# Ranges use the monitoring-plugin syntax: "10", "0:80", "~:5", "@10:20".
#
# thresholds:
#   critical:
#     critical: "0:0"          # Any open critical message is CRITICAL
#   occupancy:
#     warning: "0:80"
#     critical: "0:95"
"#;

    format!("{comments}\n{yaml}")
}
