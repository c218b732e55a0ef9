//! Threshold evaluation of single metrics.

use serde::Serialize;

use crate::metric::Metric;
use crate::range::{Range, RangeError};
use crate::verdict::Verdict;

/// Template used when a context declares no metric format.
pub const DEFAULT_FMT_METRIC: &str = "{name} is {valueunit}";

/// Warning and critical ranges that judge every metric bound to `name`.
#[derive(Debug, Clone)]
pub struct ScalarContext {
    pub name: String,
    pub warning: Range,
    pub critical: Range,
    fmt_metric: String,
}

impl ScalarContext {
    pub fn new(name: impl Into<String>, warning: Range, critical: Range) -> Self {
        Self {
            name: name.into(),
            warning,
            critical,
            fmt_metric: DEFAULT_FMT_METRIC.to_string(),
        }
    }

    /// Builds a context straight from optional range expressions.
    pub fn from_exprs(
        name: impl Into<String>,
        warning: Option<&str>,
        critical: Option<&str>,
    ) -> Result<Self, RangeError> {
        Ok(Self::new(
            name,
            Range::parse_opt(warning)?,
            Range::parse_opt(critical)?,
        ))
    }

    /// Sets the description template. Supports `{name}`, `{value}`, `{uom}`
    /// and `{valueunit}`.
    pub fn with_fmt_metric(mut self, fmt: impl Into<String>) -> Self {
        self.fmt_metric = fmt.into();
        self
    }

    /// Scores a metric: critical is tested before warning.
    pub fn evaluate(&self, metric: &Metric) -> MetricResult {
        let value = metric.value.as_f64();
        let (verdict, hint) = if !self.critical.accepts(value, metric.min, metric.max) {
            (Verdict::Critical, Some(self.critical.violation()))
        } else if !self.warning.accepts(value, metric.min, metric.max) {
            (Verdict::Warning, Some(self.warning.violation()))
        } else {
            (Verdict::Ok, None)
        };

        MetricResult {
            description: self.describe(metric),
            perfdata: Some(metric.perfdata(&self.warning, &self.critical)),
            metric: metric.clone(),
            verdict,
            hint,
        }
    }

    /// Renders the metric through the context's template.
    pub fn describe(&self, metric: &Metric) -> String {
        self.fmt_metric
            .replace("{name}", &metric.name)
            .replace("{valueunit}", &metric.value_unit())
            .replace("{value}", &metric.value.to_string())
            .replace("{uom}", metric.uom.as_deref().unwrap_or(""))
    }
}

/// Verdict of one metric together with its rendered description.
#[derive(Debug, Clone, Serialize)]
pub struct MetricResult {
    pub metric: Metric,
    pub verdict: Verdict,
    pub description: String,
    /// Why the metric is not OK, e.g. `outside range 0:1`.
    pub hint: Option<String>,
    #[serde(skip)]
    pub perfdata: Option<String>,
}

impl MetricResult {
    /// Result for a metric that no registered context claims.
    pub fn unmatched(metric: &Metric) -> Self {
        Self {
            description: format!("{} is {}", metric.name, metric.value_unit()),
            metric: metric.clone(),
            verdict: Verdict::Unknown,
            hint: Some(format!("no context '{}' for metric", metric.context)),
            perfdata: None,
        }
    }

    /// Description with the violation hint appended when present.
    pub fn summary(&self) -> String {
        match &self.hint {
            Some(hint) => format!("{} ({})", self.description, hint),
            None => self.description.clone(),
        }
    }
}
