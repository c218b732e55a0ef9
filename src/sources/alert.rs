//! Open alert messages counted per severity.

use tracing::debug;

use super::MetricSource;
use crate::array::ArrayApi;
use crate::error::CheckError;
use crate::evaluator::ScalarContext;
use crate::metric::Metric;
use crate::range::{Range, RangeError};

pub const CHECK_NAME: &str = "PURE_FA_ALERT";

/// Severities counted, in output order. Each is also a context name.
pub const SEVERITIES: [&str; 3] = ["critical", "warning", "info"];

/// Reports the number of open critical, warning and info messages.
#[derive(Debug, Clone, Default)]
pub struct AlertCounter;

impl AlertCounter {
    pub fn new() -> Self {
        Self
    }

    /// Context for one severity, rendering `"<n> <severity> messages"`.
    pub fn context(
        severity: &str,
        warning: Option<&str>,
        critical: Option<&str>,
    ) -> Result<ScalarContext, RangeError> {
        Ok(ScalarContext::new(
            severity,
            Range::parse_opt(warning)?,
            Range::parse_opt(critical)?,
        )
        .with_fmt_metric(format!("{{value}} {severity} messages")))
    }
}

impl MetricSource for AlertCounter {
    fn name(&self) -> String {
        CHECK_NAME.to_string()
    }

    async fn probe<A: ArrayApi>(&self, api: &A) -> Result<Vec<Metric>, CheckError> {
        let alerts = api.list_open_alerts().await?;
        debug!("Array reported {} open messages", alerts.len());

        let mut counts = [0i64; 3];
        for alert in &alerts {
            match SEVERITIES
                .iter()
                .position(|s| *s == alert.current_severity)
            {
                Some(idx) => counts[idx] += 1,
                None => debug!("Ignoring message with severity '{}'", alert.current_severity),
            }
        }

        Ok(SEVERITIES
            .iter()
            .zip(counts)
            .map(|(severity, count)| Metric::new(*severity, count).with_min(0.0))
            .collect())
    }
}
