//! Metric sources: fetch raw array state and reduce it to metrics.
//!
//! - `alert`: open alert messages counted per severity
//! - `occupancy`: array-wide or per-volume space usage
//! - `hardware`: failed hardware components
//! - `pod`: pod replication health and mirrored write latency
//! - `blade`: FlashBlade hardware component status

pub mod alert;
pub mod blade;
pub mod hardware;
pub mod occupancy;
pub mod pod;

pub use alert::AlertCounter;
pub use blade::FlashBladeInspector;
pub use hardware::HardwareInspector;
pub use occupancy::OccupancySampler;
pub use pod::PodInspector;

use crate::array::ArrayApi;
use crate::error::CheckError;
use crate::evaluator::ScalarContext;
use crate::metric::Metric;
use crate::range::Range;

/// Name of the context judging the status metrics of hardware and pod checks.
pub const STATUS_CONTEXT: &str = "default";

/// Something that turns array state into an ordered list of metrics.
#[allow(async_fn_in_trait)]
pub trait MetricSource {
    /// Check name printed in front of the verdict.
    fn name(&self) -> String;

    /// Queries the array once and reduces the answer to metrics.
    async fn probe<A: ArrayApi>(&self, api: &A) -> Result<Vec<Metric>, CheckError>;
}

/// The metric sources a check can be built from.
#[derive(Debug, Clone)]
pub enum Source {
    Alerts(AlertCounter),
    Occupancy(OccupancySampler),
    Hardware(HardwareInspector),
    Pods(PodInspector),
    Blade(FlashBladeInspector),
}

impl MetricSource for Source {
    fn name(&self) -> String {
        match self {
            Source::Alerts(s) => s.name(),
            Source::Occupancy(s) => s.name(),
            Source::Hardware(s) => s.name(),
            Source::Pods(s) => s.name(),
            Source::Blade(s) => s.name(),
        }
    }

    async fn probe<A: ArrayApi>(&self, api: &A) -> Result<Vec<Metric>, CheckError> {
        match self {
            Source::Alerts(s) => s.probe(api).await,
            Source::Occupancy(s) => s.probe(api).await,
            Source::Hardware(s) => s.probe(api).await,
            Source::Pods(s) => s.probe(api).await,
            Source::Blade(s) => s.probe(api).await,
        }
    }
}

/// Context that turns a status metric of 1 into `CRITICAL`.
pub fn status_context() -> ScalarContext {
    let critical = Range::parse("@1:1").unwrap_or_default();
    ScalarContext::new(STATUS_CONTEXT, Range::unbounded(), critical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::Verdict;

    #[test]
    fn test_status_context() {
        let ctx = status_context();
        assert_eq!(ctx.critical.to_string(), "@1:1");
        let failed = Metric::new("x status", 1i64).with_context(STATUS_CONTEXT);
        let healthy = Metric::new("x status", 0i64).with_context(STATUS_CONTEXT);
        assert_eq!(ctx.evaluate(&failed).verdict, Verdict::Critical);
        assert_eq!(ctx.evaluate(&healthy).verdict, Verdict::Ok);
    }
}
