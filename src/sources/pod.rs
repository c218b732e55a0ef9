//! Pod replication health.

use tracing::debug;

use super::{MetricSource, STATUS_CONTEXT};
use crate::array::ArrayApi;
use crate::error::CheckError;
use crate::metric::Metric;

pub const DEFAULT_CRITICAL_WRITE_LATENCY_MS: f64 = 3.0;

/// Reports pods with arrays that are not online, or with slow mirrored writes.
#[derive(Debug, Clone)]
pub struct PodInspector {
    pod: Option<String>,
    critical_write_latency_ms: f64,
}

impl Default for PodInspector {
    fn default() -> Self {
        Self::new(None, DEFAULT_CRITICAL_WRITE_LATENCY_MS)
    }
}

impl PodInspector {
    pub fn new(pod: Option<String>, critical_write_latency_ms: f64) -> Self {
        Self {
            pod,
            critical_write_latency_ms,
        }
    }
}

impl MetricSource for PodInspector {
    fn name(&self) -> String {
        match &self.pod {
            Some(pod) => format!("PURE_FA_POD_{pod}"),
            None => "PURE_FA_POD".to_string(),
        }
    }

    async fn probe<A: ArrayApi>(&self, api: &A) -> Result<Vec<Metric>, CheckError> {
        let pods = api.pods(self.pod.as_deref()).await?;
        let stats = api.pod_mirror_stats(self.pod.as_deref()).await?;
        debug!(
            "Array reported {} pods, {} mirror statistics",
            pods.len(),
            stats.len()
        );

        let failed: Vec<String> = pods
            .iter()
            .filter_map(|pod| {
                let offline: Vec<String> = pod
                    .arrays
                    .iter()
                    .filter(|a| a.status != "online")
                    .map(|a| format!("the array {} is {}", a.name, a.status))
                    .collect();
                (!offline.is_empty())
                    .then(|| format!("For pod {} {}", pod.name, offline.join(", ")))
            })
            .collect();

        let limit_usec = self.critical_write_latency_ms * 1000.0;
        let slow: Vec<String> = stats
            .iter()
            .filter(|s| s.usec_per_mirrored_write_op > limit_usec)
            .map(|s| {
                format!(
                    "Pod {} has a write latency of {} ms.",
                    s.name,
                    s.usec_per_mirrored_write_op / 1000.0
                )
            })
            .collect();

        let metric = if !failed.is_empty() {
            Metric::new(format!("{} status", failed.join(", ")), 1i64)
        } else if !slow.is_empty() {
            Metric::new(format!("{} status", slow.join(", ")), 1i64)
        } else {
            Metric::new("All pod(s) are OK status", 0i64)
        };
        Ok(vec![metric.with_context(STATUS_CONTEXT)])
    }
}
