//! A check: one metric source plus the contexts that judge its metrics.

use std::time::Duration;
use tracing::instrument::WithSubscriber;
use tracing::{debug, error, info, warn, Dispatch};

use crate::aggregator::CheckResult;
use crate::array::ArrayApi;
use crate::error::CheckError;
use crate::evaluator::{MetricResult, ScalarContext};
use crate::metric::Metric;
use crate::sources::{MetricSource, Source};

/// Default bound on a whole invocation, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Bound on releasing the session once the source has answered or timed out.
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Check {
    source: Source,
    contexts: Vec<ScalarContext>,
}

impl Check {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            contexts: Vec::new(),
        }
    }

    /// Registers a context. A later context with the same name replaces the earlier one.
    pub fn with_context(mut self, context: ScalarContext) -> Self {
        self.contexts.retain(|c| c.name != context.name);
        self.contexts.push(context);
        self
    }

    pub fn name(&self) -> String {
        self.source.name()
    }

    pub fn contexts(&self) -> &[ScalarContext] {
        &self.contexts
    }

    /// Judges already collected metrics and aggregates the verdicts.
    pub fn evaluate(&self, metrics: &[Metric]) -> CheckResult {
        let results: Vec<MetricResult> = metrics
            .iter()
            .map(|metric| {
                let result = match self.contexts.iter().find(|c| c.name == metric.context) {
                    Some(context) => context.evaluate(metric),
                    None => MetricResult::unmatched(metric),
                };
                debug!(
                    "{} = {} -> {}",
                    metric.name,
                    metric.value_unit(),
                    result.verdict
                );
                result
            })
            .collect();

        let result = CheckResult::from_results(self.name(), results);
        info!("{} finished with {}", result.name, result.verdict);
        result
    }

    /// Probes the array and evaluates the metrics, bounded by `timeout`.
    /// The session is released afterwards on every path, bounded by
    /// [`CLOSE_TIMEOUT`].
    ///
    /// Any failure, including the timeout, yields an `UNKNOWN` result.
    pub async fn run<A: ArrayApi>(&self, api: &A, timeout: Duration) -> CheckResult {
        let outcome = tokio::time::timeout(timeout, self.source.probe(api)).await;

        match tokio::time::timeout(CLOSE_TIMEOUT, api.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Ignoring error while closing the session: {}", e),
            Err(_) => warn!(
                "Closing the session did not finish within {}s",
                CLOSE_TIMEOUT.as_secs()
            ),
        }

        match outcome {
            Ok(Ok(metrics)) => self.evaluate(&metrics),
            Ok(Err(e)) => self.fail(e),
            Err(_) => self.fail(CheckError::Timeout(timeout.as_secs())),
        }
    }

    /// Reports a fatal error as an `UNKNOWN` result.
    pub fn fail(&self, err: CheckError) -> CheckResult {
        let name = self.name();
        error!("{}: {}", name, err);
        CheckResult::unknown(name, err.to_string())
    }
}

/// Per-invocation settings: the time bound and the logging sink the check
/// reports to.
#[derive(Clone)]
pub struct Invocation {
    pub timeout: Duration,
    pub logger: Dispatch,
}

impl Invocation {
    pub fn new(timeout: Duration, logger: Dispatch) -> Self {
        Self { timeout, logger }
    }

    /// Runs `check` against `api` with this invocation's logger attached.
    pub async fn execute<A: ArrayApi>(&self, check: &Check, api: &A) -> CheckResult {
        check
            .run(api, self.timeout)
            .with_subscriber(self.logger.clone())
            .await
    }
}

impl Default for Invocation {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Dispatch::none(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{
        AlertRecord, ArraySpace, FixtureArray, HardwareRecord, PodMirrorStats, PodRecord,
        SourceError, TestData, VolumeSpace,
    };
    use crate::sources::{AlertCounter, OccupancySampler};
    use crate::verdict::Verdict;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn alert_check(critical_crit: Option<&str>) -> Check {
        Check::new(Source::Alerts(AlertCounter::new()))
            .with_context(AlertCounter::context("critical", None, critical_crit).unwrap())
            .with_context(AlertCounter::context("warning", None, None).unwrap())
            .with_context(AlertCounter::context("info", None, None).unwrap())
    }

    fn alerts(severities: &[&str]) -> FixtureArray {
        FixtureArray::new(TestData {
            alerts: severities
                .iter()
                .map(|s| AlertRecord {
                    current_severity: s.to_string(),
                    component_name: None,
                    details: None,
                })
                .collect(),
            ..TestData::default()
        })
    }

    #[tokio::test]
    async fn test_no_alerts_is_ok() {
        let result = alert_check(None)
            .run(&alerts(&[]), Duration::from_secs(5))
            .await;
        assert_eq!(result.verdict, Verdict::Ok);
        assert_eq!(result.results.len(), 3);
    }

    #[tokio::test]
    async fn test_critical_count_breach() {
        let result = alert_check(Some("0:1"))
            .run(&alerts(&["critical", "critical", "warning"]), Duration::from_secs(5))
            .await;
        assert_eq!(result.verdict, Verdict::Critical);
        assert_eq!(result.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_occupancy_ok() {
        let check = Check::new(Source::Occupancy(OccupancySampler::array()))
            .with_context(OccupancySampler::context(Some("0:80"), Some("0:95")).unwrap());
        let array = FixtureArray::new(TestData {
            array_space: Some(ArraySpace {
                total: Some(50.0),
                capacity: Some(200.0),
            }),
            ..TestData::default()
        });
        let result = check.run(&array, Duration::from_secs(5)).await;
        assert_eq!(result.verdict, Verdict::Ok);
        assert_eq!(
            result.summary_line(),
            "PURE_FA_OCCUPANCY OK - FA occupancy is 25.0% | 'FA occupancy'=25.0%;0:80;0:95;0;100"
        );
    }

    #[tokio::test]
    async fn test_empty_occupancy_is_unknown() {
        let check = Check::new(Source::Occupancy(OccupancySampler::array()))
            .with_context(OccupancySampler::context(None, None).unwrap());
        let result = check
            .run(&FixtureArray::new(TestData::default()), Duration::from_secs(5))
            .await;
        assert_eq!(result.verdict, Verdict::Unknown);
    }

    #[test]
    fn test_missing_context_is_unknown() {
        let check = Check::new(Source::Alerts(AlertCounter::new()));
        let result = check.evaluate(&[Metric::new("critical", 0i64)]);
        assert_eq!(result.verdict, Verdict::Unknown);
    }

    #[derive(Default)]
    struct Stalled {
        closed: AtomicBool,
    }

    impl ArrayApi for Stalled {
        async fn list_open_alerts(&self) -> Result<Vec<AlertRecord>, SourceError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
        async fn array_space(&self) -> Result<Option<ArraySpace>, SourceError> {
            Ok(None)
        }
        async fn volume_space(&self, _: &str) -> Result<Option<VolumeSpace>, SourceError> {
            Ok(None)
        }
        async fn hardware(&self, _: Option<&str>) -> Result<Vec<HardwareRecord>, SourceError> {
            Ok(Vec::new())
        }
        async fn pods(&self, _: Option<&str>) -> Result<Vec<PodRecord>, SourceError> {
            Ok(Vec::new())
        }
        async fn pod_mirror_stats(&self, _: Option<&str>) -> Result<Vec<PodMirrorStats>, SourceError> {
            Ok(Vec::new())
        }
        async fn close(&self) -> Result<(), SourceError> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_unknown() {
        let invocation = Invocation::new(Duration::from_secs(30), Dispatch::none());
        let api = Stalled::default();
        let result = invocation.execute(&alert_check(None), &api).await;
        assert_eq!(result.verdict, Verdict::Unknown);
        assert!(api.closed.load(Ordering::SeqCst));
        assert_eq!(
            result.summary_line(),
            "PURE_FA_ALERT UNKNOWN - Timeout: check execution aborted after 30s"
        );
    }
}
