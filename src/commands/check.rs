//! Check command implementation.
//!
//! Turns a check subcommand into a [`Check`], picks the data backend and
//! prints the plugin output.

use std::time::Duration;

use purefa_check::array::client::ClientOptions;
use purefa_check::array::{FixtureArray, FlashArrayClient, FlashBladeClient};
use purefa_check::check::{Check, Invocation};
use purefa_check::error::CheckError;
use purefa_check::evaluator::ScalarContext;
use purefa_check::range::RangeError;
use purefa_check::sources::alert::SEVERITIES;
use purefa_check::sources::occupancy::CONTEXT as OCCUPANCY_CONTEXT;
use purefa_check::sources::{
    status_context, AlertCounter, FlashBladeInspector, HardwareInspector, OccupancySampler,
    PodInspector, Source,
};
use purefa_check::CheckResult;

use crate::cli::{ArrayTarget, Commands};
use crate::config::Config;

/// Source and array target of a check subcommand, `None` for the other subcommands.
pub fn source_for(command: &Commands) -> Option<(Source, &ArrayTarget)> {
    match command {
        Commands::Alert { target, .. } => Some((Source::Alerts(AlertCounter::new()), target)),
        Commands::Occupancy {
            target,
            vol,
            percentage,
            ..
        } => {
            let sampler = match vol {
                Some(vol) => OccupancySampler::volume(vol.clone(), *percentage),
                None => OccupancySampler::array(),
            };
            Some((Source::Occupancy(sampler), target))
        }
        Commands::Hardware { target, component } => Some((
            Source::Hardware(HardwareInspector::new(component.clone())),
            target,
        )),
        Commands::Pod {
            target,
            pod,
            critical_write_latency,
        } => Some((
            Source::Pods(PodInspector::new(pod.clone(), *critical_write_latency)),
            target,
        )),
        Commands::BladeHardware {
            target, component, ..
        } => Some((
            Source::Blade(FlashBladeInspector::new(component.clone())),
            target,
        )),
        Commands::Config { .. } | Commands::GenerateTestdata { .. } => None,
    }
}

/// Contexts of a check subcommand. Thresholds left unset on the command line
/// fall back to the config file.
pub fn contexts_for(command: &Commands, config: &Config) -> Result<Vec<ScalarContext>, RangeError> {
    match command {
        Commands::Alert {
            warning_crit,
            critical_crit,
            warning_warn,
            critical_warn,
            warning_info,
            critical_info,
            ..
        } => {
            let flags = [
                (warning_crit, critical_crit),
                (warning_warn, critical_warn),
                (warning_info, critical_info),
            ];
            SEVERITIES
                .iter()
                .zip(flags)
                .map(|(severity, (warning, critical))| {
                    let (warning, critical) =
                        config.thresholds_for(severity, warning.as_deref(), critical.as_deref());
                    AlertCounter::context(severity, warning.as_deref(), critical.as_deref())
                })
                .collect()
        }
        Commands::Occupancy {
            warning, critical, ..
        } => {
            let (warning, critical) = config.thresholds_for(
                OCCUPANCY_CONTEXT,
                warning.as_deref(),
                critical.as_deref(),
            );
            Ok(vec![OccupancySampler::context(
                warning.as_deref(),
                critical.as_deref(),
            )?])
        }
        Commands::Hardware { .. } | Commands::Pod { .. } | Commands::BladeHardware { .. } => {
            Ok(vec![status_context()])
        }
        Commands::Config { .. } | Commands::GenerateTestdata { .. } => Ok(Vec::new()),
    }
}

/// Builds and runs the check named by `command`.
///
/// Threshold and backend errors are reported as an `UNKNOWN` result before
/// the array is contacted.
pub async fn run_check(command: &Commands, config: &Config, invocation: &Invocation) -> CheckResult {
    let Some((source, target)) = source_for(command) else {
        return CheckResult::unknown("PURE_FA", "not a check command");
    };

    let mut check = Check::new(source);
    match contexts_for(command, config) {
        Ok(contexts) => {
            for context in contexts {
                check = check.with_context(context);
            }
        }
        Err(e) => return fail(&check, invocation, e.into()),
    }

    match &config.test_data_file {
        Some(path) => match FixtureArray::from_file(path) {
            Ok(array) => invocation.execute(&check, &array).await,
            Err(e) => fail(&check, invocation, e.into()),
        },
        None => match command {
            Commands::BladeHardware { fb_api_version, .. } => {
                let options = ClientOptions {
                    api_version: fb_api_version.clone(),
                    ..config.client_options()
                };
                match FlashBladeClient::new(&target.endpoint, &target.apitoken, &options) {
                    Ok(client) => invocation.execute(&check, &client).await,
                    Err(e) => fail(&check, invocation, e.into()),
                }
            }
            _ => {
                match FlashArrayClient::new(&target.endpoint, &target.apitoken, &config.client_options()) {
                    Ok(client) => invocation.execute(&check, &client).await,
                    Err(e) => fail(&check, invocation, e.into()),
                }
            }
        },
    }
}

fn fail(check: &Check, invocation: &Invocation, err: CheckError) -> CheckResult {
    tracing::dispatcher::with_default(&invocation.logger, || check.fail(err))
}

/// Runs a check subcommand, prints the plugin output and returns the exit code.
pub async fn command_check(
    command: &Commands,
    config: &Config,
    verbose: u8,
    logger: tracing::Dispatch,
) -> i32 {
    let invocation = Invocation::new(Duration::from_secs(config.timeout_secs()), logger);
    let result = run_check(command, config, &invocation).await;
    println!("{}", result.render(verbose));
    result.exit_code()
}
