//! Service states reported by a check.
//!
//! Severity is ordered `OK < WARNING < CRITICAL`. `UNKNOWN` means the check
//! itself could not produce a judgement and dominates every other state.

use serde::Serialize;
use std::fmt;

/// Outcome of evaluating one metric or a whole check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Verdict {
    /// Process exit code following the monitoring-plugin convention.
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Ok => 0,
            Verdict::Warning => 1,
            Verdict::Critical => 2,
            Verdict::Unknown => 3,
        }
    }

    /// Returns a numeric priority (higher = worse). `Unknown` outranks everything.
    fn priority(self) -> u8 {
        match self {
            Verdict::Ok => 0,
            Verdict::Warning => 1,
            Verdict::Critical => 2,
            Verdict::Unknown => 3,
        }
    }

    /// Combines two verdicts, keeping the worse one.
    pub fn max(self, other: Verdict) -> Verdict {
        if other.priority() > self.priority() {
            other
        } else {
            self
        }
    }

    /// Worst verdict of a collection. An empty collection is `Unknown`.
    pub fn worst<I>(verdicts: I) -> Verdict
    where
        I: IntoIterator<Item = Verdict>,
    {
        verdicts
            .into_iter()
            .reduce(Verdict::max)
            .unwrap_or(Verdict::Unknown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Ok => "OK",
            Verdict::Warning => "WARNING",
            Verdict::Critical => "CRITICAL",
            Verdict::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
