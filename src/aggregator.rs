//! Reduction of per-metric results into one check verdict and its output.

use serde::Serialize;

use crate::evaluator::MetricResult;
use crate::verdict::Verdict;

/// Message reported when a check produced no metric at all.
pub const NO_DATA_MESSAGE: &str = "no check results: the array returned no data";

/// Final outcome of one check invocation.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Check name printed in front of the verdict (e.g. `PURE_FA_ALERT`).
    pub name: String,
    pub verdict: Verdict,
    /// Per-metric results in the order the metrics were produced.
    pub results: Vec<MetricResult>,
    /// Set when the check failed before any metric could be judged.
    pub message: Option<String>,
}

impl CheckResult {
    /// Aggregates metric results with worst-case precedence. No results at
    /// all yields `UNKNOWN`.
    pub fn from_results(name: impl Into<String>, results: Vec<MetricResult>) -> Self {
        let name = name.into();
        if results.is_empty() {
            return Self::unknown(name, NO_DATA_MESSAGE);
        }
        let verdict = Verdict::worst(results.iter().map(|r| r.verdict));
        Self {
            name,
            verdict,
            results,
            message: None,
        }
    }

    /// A fatal failure: no metric results, verdict `UNKNOWN`.
    pub fn unknown(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            verdict: Verdict::Unknown,
            results: Vec::new(),
            message: Some(message.into()),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.verdict.exit_code()
    }

    /// First output line: `NAME VERDICT - descriptions | perfdata`.
    pub fn summary_line(&self) -> String {
        let text = match &self.message {
            Some(message) => message.clone(),
            None => self
                .results
                .iter()
                .map(MetricResult::summary)
                .collect::<Vec<_>>()
                .join(", "),
        };

        let mut line = format!("{} {} - {}", self.name, self.verdict, text);
        let perfdata = self.perfdata();
        if !perfdata.is_empty() {
            line.push_str(" | ");
            line.push_str(&perfdata);
        }
        line
    }

    /// Space separated performance data of all judged metrics.
    pub fn perfdata(&self) -> String {
        self.results
            .iter()
            .filter_map(|r| r.perfdata.as_deref())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Extra lines printed below the summary.
    ///
    /// `verbose == 1` lists the metrics that are not OK, `verbose >= 2`
    /// lists every metric.
    pub fn detail_lines(&self, verbose: u8) -> Vec<String> {
        if verbose == 0 {
            return Vec::new();
        }
        self.results
            .iter()
            .filter(|r| verbose >= 2 || r.verdict != Verdict::Ok)
            .map(|r| format!("{}: {}", r.verdict.as_str().to_lowercase(), r.summary()))
            .collect()
    }

    /// Full plugin output.
    pub fn render(&self, verbose: u8) -> String {
        let mut lines = vec![self.summary_line()];
        lines.extend(self.detail_lines(verbose));
        lines.join("\n")
    }
}
