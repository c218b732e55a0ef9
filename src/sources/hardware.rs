//! Hardware component status.

use tracing::debug;

use super::{MetricSource, STATUS_CONTEXT};
use crate::array::ArrayApi;
use crate::error::CheckError;
use crate::metric::Metric;

/// Statuses that count as healthy.
const HEALTHY: [&str; 2] = ["ok", "not_installed"];

/// Reports every hardware component (or one named component) that is not healthy.
#[derive(Debug, Clone, Default)]
pub struct HardwareInspector {
    component: Option<String>,
}

impl HardwareInspector {
    pub fn new(component: Option<String>) -> Self {
        Self { component }
    }
}

impl MetricSource for HardwareInspector {
    fn name(&self) -> String {
        match &self.component {
            Some(component) => format!("PURE_FA_HW_{component}"),
            None => "PURE_FA_HW".to_string(),
        }
    }

    async fn probe<A: ArrayApi>(&self, api: &A) -> Result<Vec<Metric>, CheckError> {
        let components = api.hardware(self.component.as_deref()).await?;
        debug!("Array reported {} hardware components", components.len());

        let failed: Vec<String> = components
            .iter()
            .filter(|c| !HEALTHY.contains(&c.status.as_str()))
            .map(|c| format!("{}: {}", c.name, c.status))
            .collect();

        let metric = if failed.is_empty() {
            Metric::new("All hardware component(s) are OK status", 0i64)
        } else {
            Metric::new(format!("{} status", failed.join(", ")), 1i64)
        };
        Ok(vec![metric.with_context(STATUS_CONTEXT)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{FixtureArray, HardwareRecord, TestData};
    use crate::metric::MetricValue;

    fn array(components: &[(&str, &str)]) -> FixtureArray {
        FixtureArray::new(TestData {
            hardware: components
                .iter()
                .map(|(name, status)| HardwareRecord {
                    name: name.to_string(),
                    status: status.to_string(),
                })
                .collect(),
            ..TestData::default()
        })
    }

    #[tokio::test]
    async fn test_all_healthy() {
        let array = array(&[("CT0", "ok"), ("SH9.BAY1", "not_installed")]);
        let metrics = HardwareInspector::new(None).probe(&array).await.unwrap();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].name, "All hardware component(s) are OK status");
        assert_eq!(metrics[0].value, MetricValue::Int(0));
        assert_eq!(metrics[0].context, STATUS_CONTEXT);
    }

    #[tokio::test]
    async fn test_failed_components_listed() {
        let array = array(&[("CT0", "ok"), ("CT0.FAN1", "critical"), ("CH0.PWR0", "degraded")]);
        let metrics = HardwareInspector::new(None).probe(&array).await.unwrap();
        assert_eq!(
            metrics[0].name,
            "CT0.FAN1: critical, CH0.PWR0: degraded status"
        );
        assert_eq!(metrics[0].value, MetricValue::Int(1));
    }

    #[tokio::test]
    async fn test_named_component() {
        let array = array(&[("CT0", "ok"), ("CT1", "critical")]);
        let inspector = HardwareInspector::new(Some("CT0".to_string()));
        assert_eq!(inspector.name(), "PURE_FA_HW_CT0");
        let metrics = inspector.probe(&array).await.unwrap();
        assert_eq!(metrics[0].value, MetricValue::Int(0));
    }
}
