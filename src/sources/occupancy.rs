//! Space occupancy of the whole array or of one volume.

use tracing::{debug, warn};

use super::MetricSource;
use crate::array::ArrayApi;
use crate::error::CheckError;
use crate::evaluator::ScalarContext;
use crate::metric::Metric;
use crate::range::{Range, RangeError};

pub const ARRAY_CHECK_NAME: &str = "PURE_FA_OCCUPANCY";
pub const VOLUME_CHECK_NAME: &str = "PURE_FA_VOL_OCCUPANCY";
pub const CONTEXT: &str = "occupancy";
/// Metric name of the array-wide occupancy.
pub const ARRAY_METRIC: &str = "FA occupancy";

/// Samples used space, array-wide (percent) or per volume (bytes or percent).
#[derive(Debug, Clone, Default)]
pub struct OccupancySampler {
    volume: Option<String>,
    percentage: bool,
}

impl OccupancySampler {
    /// Array-wide occupancy.
    pub fn array() -> Self {
        Self::default()
    }

    /// Occupancy of one volume. `percentage` switches from bytes to percent.
    pub fn volume(name: impl Into<String>, percentage: bool) -> Self {
        Self {
            volume: Some(name.into()),
            percentage,
        }
    }

    pub fn context(warning: Option<&str>, critical: Option<&str>) -> Result<ScalarContext, RangeError> {
        Ok(ScalarContext::new(
            CONTEXT,
            Range::parse_opt(warning)?,
            Range::parse_opt(critical)?,
        ))
    }

    async fn probe_array<A: ArrayApi>(&self, api: &A) -> Result<Vec<Metric>, CheckError> {
        let Some(space) = api.array_space().await? else {
            warn!("Array returned no space record");
            return Ok(Vec::new());
        };
        let used = required(space.total, "total")?;
        let capacity = required(space.capacity, "capacity")?;
        debug!("Array space: total={} capacity={}", used, capacity);

        Ok(vec![percent_metric(ARRAY_METRIC.to_string(), used, capacity)?])
    }

    async fn probe_volume<A: ArrayApi>(&self, api: &A, volume: &str) -> Result<Vec<Metric>, CheckError> {
        let Some(space) = api.volume_space(volume).await? else {
            warn!("Array returned no space record for volume {}", volume);
            return Ok(Vec::new());
        };
        let name = format!("{volume} occupancy");

        if self.percentage {
            let used = required(space.total, "total")?;
            let size = required(space.size, "size")?;
            debug!("Volume {} space: total={} size={}", volume, used, size);
            return Ok(vec![percent_metric(name, used, size)?]);
        }

        let bytes = required(space.volumes, "volumes")?;
        debug!("Volume {} space: volumes={}", volume, bytes);
        Ok(vec![Metric::new(name, bytes as i64)
            .with_uom("B")
            .with_min(0.0)
            .with_context(CONTEXT)])
    }
}

impl MetricSource for OccupancySampler {
    fn name(&self) -> String {
        match self.volume {
            Some(_) => VOLUME_CHECK_NAME.to_string(),
            None => ARRAY_CHECK_NAME.to_string(),
        }
    }

    async fn probe<A: ArrayApi>(&self, api: &A) -> Result<Vec<Metric>, CheckError> {
        match &self.volume {
            Some(volume) => self.probe_volume(api, volume).await,
            None => self.probe_array(api).await,
        }
    }
}

/// Occupancy in percent. The ratio is rounded to two decimals *before* being
/// scaled, so results move in whole-percent steps.
///
/// Rounding works on the exact decimal expansion of the stored ratio, so
/// `0.005` (stored slightly above) becomes `0.01` while `0.015` (stored
/// slightly below) becomes `0.01`.
pub fn occupancy_percent(used: f64, capacity: f64) -> Result<f64, CheckError> {
    let ratio = used / capacity;
    let rounded: f64 = format!("{ratio:.2}")
        .parse()
        .map_err(|e| CheckError::InvalidData(format!("occupancy ratio {ratio}: {e}")))?;
    Ok(rounded * 100.0)
}

fn percent_metric(name: String, used: f64, capacity: f64) -> Result<Metric, CheckError> {
    if capacity <= 0.0 {
        return Err(CheckError::InvalidData(format!(
            "capacity of {name} is {capacity}"
        )));
    }
    Ok(Metric::new(name, occupancy_percent(used, capacity)?)
        .with_uom("%")
        .with_min(0.0)
        .with_max(100.0)
        .with_context(CONTEXT))
}

fn required(value: Option<f64>, field: &str) -> Result<f64, CheckError> {
    value.ok_or_else(|| CheckError::InvalidData(format!("missing field '{field}'")))
}
