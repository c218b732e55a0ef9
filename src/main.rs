//! purefa-check - version 0.1.0
//!
//! Monitoring-plugin health checks for Pure Storage FlashArrays.
//! This is the main entry point that resolves configuration and dispatches subcommands.

mod cli;
mod commands;
mod config;

use clap::Parser;
use tracing::{debug, Dispatch};

use cli::{Args, Commands};
use commands::check::source_for;
use commands::{command_check, command_config, command_generate_testdata};
use config::{resolve_config, show_config, validate_effective_config, Config};
use purefa_check::logging::{build_dispatch, effective_level};
use purefa_check::sources::MetricSource;
use purefa_check::Verdict;

/// Syslog identity of all checks.
const SYSLOG_IDENT: &str = "purefa-check";

/// Builds the logging sink for this run from the effective config.
fn setup_logging(config: &Config, args: &Args) -> anyhow::Result<Dispatch> {
    let level = effective_level(config.level_filter()?, args.verbose);
    let syslog = config.syslog.unwrap_or(true).then_some(SYSLOG_IDENT);
    Ok(build_dispatch(level, syslog))
}

/// Prints a plugin style `UNKNOWN` line and exits with its code.
fn exit_unknown(name: &str, message: &str) -> ! {
    println!("{} {} - {}", name, Verdict::Unknown, message);
    std::process::exit(Verdict::Unknown.exit_code());
}

/// Helper function to load and validate configuration.
fn load_validated_config(args: &Args) -> anyhow::Result<Config> {
    let config = resolve_config(args)?;
    validate_effective_config(&config)?;
    Ok(config)
}

/// Main application entry point.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {:#}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    let Some(command) = &args.command else {
        exit_unknown("PURE_FA", "no check given, see --help");
    };

    match command {
        Commands::Config {
            output,
            format,
            commented,
        } => command_config(output.clone(), *format, *commented),

        Commands::GenerateTestdata {
            output,
            alerts,
            volumes,
        } => {
            let config = load_validated_config(&args)?;
            let logger = setup_logging(&config, &args)?;
            tracing::dispatcher::with_default(&logger, || {
                command_generate_testdata(output.clone(), *alerts, *volumes)
            })
        }

        _ => {
            let name = source_for(command)
                .map(|(source, _)| source.name())
                .unwrap_or_else(|| "PURE_FA".to_string());

            let config = match load_validated_config(&args) {
                Ok(config) => config,
                Err(e) => exit_unknown(&name, &format!("Configuration invalid: {:#}", e)),
            };
            let logger = match setup_logging(&config, &args) {
                Ok(logger) => logger,
                Err(e) => exit_unknown(&name, &format!("{:#}", e)),
            };

            tracing::dispatcher::with_default(&logger, || {
                debug!("Running {} with {:?}", name, config);
            });

            let code = command_check(command, &config, args.verbose, logger).await;
            std::process::exit(code);
        }
    }
}
