//! Named observations produced by a metric source.

use serde::Serialize;
use std::fmt;

use crate::range::Range;

/// Numeric value of a metric.
///
/// Counts stay integral; ratios keep a decimal point when rendered (`25.0`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
}

impl MetricValue {
    pub fn as_f64(self) -> f64 {
        match self {
            MetricValue::Int(v) => v as f64,
            MetricValue::Float(v) => v,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{v}"),
            // Debug formatting keeps the trailing ".0" on whole numbers.
            MetricValue::Float(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Int(v)
    }
}

impl From<usize> for MetricValue {
    fn from(v: usize) -> Self {
        MetricValue::Int(v as i64)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}

/// A single named observation with optional unit and bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub name: String,
    pub value: MetricValue,
    /// Unit of measure (`%`, `B`, ...).
    pub uom: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Name of the threshold context judging this metric.
    pub context: String,
}

impl Metric {
    /// Creates a metric judged by the context of the same name.
    pub fn new(name: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        let name = name.into();
        Self {
            context: name.clone(),
            name,
            value: value.into(),
            uom: None,
            min: None,
            max: None,
        }
    }

    pub fn with_uom(mut self, uom: impl Into<String>) -> Self {
        self.uom = Some(uom.into());
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Value followed by its unit, e.g. `25.0%`.
    pub fn value_unit(&self) -> String {
        format!("{}{}", self.value, self.uom.as_deref().unwrap_or(""))
    }

    /// Performance data item: `label=value[uom];warn;crit;min;max`.
    pub fn perfdata(&self, warning: &Range, critical: &Range) -> String {
        format!(
            "{}={};{};{};{};{}",
            quote_label(&self.name),
            self.value_unit(),
            warning,
            critical,
            self.min.map(format_bound).unwrap_or_default(),
            self.max.map(format_bound).unwrap_or_default(),
        )
    }
}

fn quote_label(label: &str) -> String {
    if label.contains(' ') || label.contains('=') || label.contains('\'') {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}

fn format_bound(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
