//! CLI arguments and subcommands for purefa-check.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use purefa_check::array::blade::DEFAULT_BLADE_API_VERSION;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "purefa-check",
    about = "Nagios/Icinga health checks for Pure Storage FlashArrays",
    long_about = "Nagios/Icinga health checks for Pure Storage FlashArrays.\n\n\
                  Polls the array's REST API for open alerts, space occupancy, hardware or pod \
                  status, judges the result against warning/critical RANGE thresholds and exits \
                  with the monitoring-plugin status code (0=OK, 1=WARNING, 2=CRITICAL, 3=UNKNOWN).",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase output verbosity (use up to 3 times)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Abort execution after TIMEOUT seconds
    #[arg(short = 't', long, global = true)]
    pub timeout: Option<u64>,

    /// Log level for stderr diagnostics
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Do not forward errors to the system log
    #[arg(long, global = true)]
    pub no_syslog: bool,

    /// Config file (YAML/JSON/TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// REST API version to use
    #[arg(long, global = true)]
    pub api_version: Option<String>,

    /// Verify the array's TLS certificate
    #[arg(long, global = true)]
    pub verify_tls: bool,

    /// Path to JSON test data file (uses recorded array data instead of the REST API)
    #[arg(long, global = true)]
    pub test_data_file: Option<PathBuf>,
}

/// Array address and credential shared by all checks.
#[derive(ClapArgs, Debug, Clone)]
pub struct ArrayTarget {
    /// FA hostname or ip address
    pub endpoint: String,

    /// FA api_token
    pub apitoken: String,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the open alert messages of the array
    Alert {
        #[command(flatten)]
        target: ArrayTarget,

        /// Warning if number of critical messages is outside RANGE
        #[arg(long, value_name = "RANGE", allow_hyphen_values = true)]
        warning_crit: Option<String>,

        /// Critical if number of critical messages is outside RANGE
        #[arg(long, value_name = "RANGE", allow_hyphen_values = true)]
        critical_crit: Option<String>,

        /// Warning if number of warning messages is outside RANGE
        #[arg(long, value_name = "RANGE", allow_hyphen_values = true)]
        warning_warn: Option<String>,

        /// Critical if number of warning messages is outside RANGE
        #[arg(long, value_name = "RANGE", allow_hyphen_values = true)]
        critical_warn: Option<String>,

        /// Warning if number of info messages is outside RANGE
        #[arg(long, value_name = "RANGE", allow_hyphen_values = true)]
        warning_info: Option<String>,

        /// Critical if number of info messages is outside RANGE
        #[arg(long, value_name = "RANGE", allow_hyphen_values = true)]
        critical_info: Option<String>,
    },

    /// Check the space occupancy of the array or of a single volume
    Occupancy {
        #[command(flatten)]
        target: ArrayTarget,

        /// FA volume name. If omitted the whole FA occupancy is checked
        #[arg(long)]
        vol: Option<String>,

        /// Return warning if occupancy is outside RANGE (percent for the array, bytes for a volume)
        #[arg(short = 'w', long, value_name = "RANGE", allow_hyphen_values = true)]
        warning: Option<String>,

        /// Return critical if occupancy is outside RANGE (percent for the array, bytes for a volume)
        #[arg(short = 'c', long, value_name = "RANGE", allow_hyphen_values = true)]
        critical: Option<String>,

        /// Report volume usage in percent instead of bytes (no effect on the whole array)
        #[arg(short = 'p', long)]
        percentage: bool,
    },

    /// Check the status of the hardware components
    Hardware {
        #[command(flatten)]
        target: ArrayTarget,

        /// FA hardware component, if not specified all components are checked
        #[arg(long)]
        component: Option<String>,
    },

    /// Check pod replication status and mirrored write latency
    Pod {
        #[command(flatten)]
        target: ArrayTarget,

        /// FA pod, if not specified all pods are checked
        #[arg(long)]
        pod: Option<String>,

        /// Critical mirrored write latency for a pod in ms
        #[arg(long, default_value_t = 3.0)]
        critical_write_latency: f64,
    },

    /// Check the status of one FlashBlade hardware component
    BladeHardware {
        #[command(flatten)]
        target: ArrayTarget,

        /// FlashBlade hardware component (e.g. CH1, CH1.FB1, CH1.FM2)
        component: String,

        /// FlashBlade REST API version
        #[arg(long, default_value = DEFAULT_BLADE_API_VERSION)]
        fb_api_version: String,
    },

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// Generate a sample test data JSON file
    GenerateTestdata {
        /// Output file path
        #[arg(short = 'o', long, default_value = "testdata.json")]
        output: PathBuf,

        /// Number of open alert messages to generate
        #[arg(long, default_value_t = 5)]
        alerts: usize,

        /// Number of volumes to generate
        #[arg(long, default_value_t = 3)]
        volumes: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_alert_flags() {
        let args = Args::parse_from([
            "purefa-check",
            "alert",
            "fa01",
            "secret",
            "--critical-crit",
            "0:1",
            "-vv",
            "-t",
            "10",
        ]);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.timeout, Some(10));
        match args.command {
            Some(Commands::Alert {
                target,
                critical_crit,
                warning_crit,
                ..
            }) => {
                assert_eq!(target.endpoint, "fa01");
                assert_eq!(target.apitoken, "secret");
                assert_eq!(critical_crit.as_deref(), Some("0:1"));
                assert!(warning_crit.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_occupancy_short_flags() {
        let args = Args::parse_from([
            "purefa-check",
            "occupancy",
            "fa01",
            "secret",
            "--vol",
            "vol1",
            "-w",
            "0:80",
            "-c",
            "0:95",
            "-p",
        ]);
        match args.command {
            Some(Commands::Occupancy {
                vol,
                warning,
                critical,
                percentage,
                ..
            }) => {
                assert_eq!(vol.as_deref(), Some("vol1"));
                assert_eq!(warning.as_deref(), Some("0:80"));
                assert_eq!(critical.as_deref(), Some("0:95"));
                assert!(percentage);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_blade_hardware_component() {
        let args = Args::parse_from(["purefa-check", "blade-hardware", "fb01", "secret", "CH1.FB1"]);
        match args.command {
            Some(Commands::BladeHardware {
                target,
                component,
                fb_api_version,
            }) => {
                assert_eq!(target.endpoint, "fb01");
                assert_eq!(component, "CH1.FB1");
                assert_eq!(fb_api_version, DEFAULT_BLADE_API_VERSION);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Args::try_parse_from(["purefa-check", "blade-hardware", "fb01", "secret"]).is_err());
    }

    #[test]
    fn test_missing_positionals_is_usage_error() {
        assert!(Args::try_parse_from(["purefa-check", "alert", "fa01"]).is_err());
    }
}
