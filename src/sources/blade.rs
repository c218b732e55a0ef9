//! FlashBlade hardware component status.

use tracing::debug;

use super::{MetricSource, STATUS_CONTEXT};
use crate::array::ArrayApi;
use crate::error::CheckError;
use crate::metric::Metric;

const HEALTHY: &str = "healthy";
/// Empty slots report this status and are not judged.
const UNUSED: &str = "unused";

/// Reports whether one named FlashBlade component (`CH1`, `CH1.FB1`, ...) is healthy.
#[derive(Debug, Clone)]
pub struct FlashBladeInspector {
    component: String,
}

impl FlashBladeInspector {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }
}

impl MetricSource for FlashBladeInspector {
    fn name(&self) -> String {
        format!("PURE_FB_{}", self.component)
    }

    async fn probe<A: ArrayApi>(&self, api: &A) -> Result<Vec<Metric>, CheckError> {
        let components = api.hardware(Some(&self.component)).await?;
        let Some(component) = components.first() else {
            debug!("Blade returned no record for {}", self.component);
            return Ok(Vec::new());
        };
        debug!("Component {} has status {}", component.name, component.status);

        if component.status == UNUSED {
            return Ok(Vec::new());
        }
        let value = if component.status == HEALTHY { 0i64 } else { 1i64 };
        Ok(vec![Metric::new(format!("{} status", self.component), value)
            .with_context(STATUS_CONTEXT)])
    }
}
