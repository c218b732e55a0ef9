//! Threshold range expressions.
//!
//! Ranges use the monitoring-plugin syntax operators already type into
//! `--warning`/`--critical` flags:
//!
//! | Expression | Accepts                                   |
//! |------------|-------------------------------------------|
//! | `""`       | everything (no threshold)                 |
//! | `10`       | `0 <= v <= 10`                            |
//! | `10:`      | `10 <= v <= max`                          |
//! | `~:10`     | `v <= 10`                                 |
//! | `10:20`    | `10 <= v <= 20`                           |
//! | `@10:20`   | `v < 10` or `v > 20`                      |
//!
//! An omitted side falls back to the metric's declared `min`/`max`, or to
//! infinity when the metric declares none. A range describes the *acceptable*
//! values: an alert triggers when a value is not accepted.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?$").expect("valid number pattern")
});

/// Errors raised while parsing a range expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("invalid range '{expr}': '{token}' is not a number")]
    NotANumber { expr: String, token: String },

    #[error("invalid range '{0}': missing bounds")]
    Empty(String),

    #[error("invalid range '{expr}': start {start} is greater than end {end}")]
    StartAfterEnd { expr: String, start: f64, end: f64 },
}

/// One side of a range.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Bound {
    /// Side left blank; resolved from the metric's declared bound.
    Unset,
    /// `~`: explicitly unbounded.
    Infinite,
    At(f64),
}

/// A parsed range expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    text: String,
    start: Bound,
    end: Bound,
    invert: bool,
    unbounded: bool,
}

impl Default for Range {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Range {
    /// A range that accepts every value.
    pub fn unbounded() -> Self {
        Self {
            text: String::new(),
            start: Bound::Infinite,
            end: Bound::Infinite,
            invert: false,
            unbounded: true,
        }
    }

    /// Parses a range expression. Surrounding whitespace is ignored.
    pub fn parse(expr: &str) -> Result<Self, RangeError> {
        let text = expr.trim();
        if text.is_empty() {
            return Ok(Self::unbounded());
        }

        let (invert, body) = match text.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        if body.is_empty() {
            return Err(RangeError::Empty(text.to_string()));
        }

        let (start, end) = match body.split_once(':') {
            // A lone number N is shorthand for 0:N.
            None => (Bound::At(0.0), parse_number(text, body)?),
            Some((start, end)) => (parse_bound(text, start)?, parse_bound(text, end)?),
        };

        if let (Bound::At(s), Bound::At(e)) = (start, end) {
            if s > e {
                return Err(RangeError::StartAfterEnd {
                    expr: text.to_string(),
                    start: s,
                    end: e,
                });
            }
        }

        Ok(Self {
            text: text.to_string(),
            start,
            end,
            invert,
            unbounded: false,
        })
    }

    /// Parses an optional expression; `None` means no threshold.
    pub fn parse_opt(expr: Option<&str>) -> Result<Self, RangeError> {
        expr.map_or_else(|| Ok(Self::unbounded()), Self::parse)
    }

    /// True when no threshold is configured.
    pub fn is_unbounded(&self) -> bool {
        self.unbounded
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Returns whether `value` is acceptable, resolving blank sides from the
    /// metric's declared `min`/`max`.
    pub fn accepts(&self, value: f64, min: Option<f64>, max: Option<f64>) -> bool {
        if self.unbounded {
            return true;
        }
        let start = match self.start {
            Bound::Unset => min.unwrap_or(f64::NEG_INFINITY),
            Bound::Infinite => f64::NEG_INFINITY,
            Bound::At(v) => v,
        };
        let end = match self.end {
            Bound::Unset => max.unwrap_or(f64::INFINITY),
            Bound::Infinite => f64::INFINITY,
            Bound::At(v) => v,
        };
        let inside = start <= value && value <= end;
        inside != self.invert
    }

    /// Same as [`Range::accepts`] for a value without declared bounds.
    pub fn contains(&self, value: f64) -> bool {
        self.accepts(value, None, None)
    }

    /// Hint attached to a metric that violates this range.
    pub fn violation(&self) -> String {
        format!("outside range {}", self.text)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::str::FromStr for Range {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_bound(expr: &str, token: &str) -> Result<Bound, RangeError> {
    match token {
        "" => Ok(Bound::Unset),
        "~" => Ok(Bound::Infinite),
        _ => parse_number(expr, token),
    }
}

fn parse_number(expr: &str, token: &str) -> Result<Bound, RangeError> {
    if !NUMBER.is_match(token) {
        return Err(RangeError::NotANumber {
            expr: expr.to_string(),
            token: token.to_string(),
        });
    }
    token
        .parse::<f64>()
        .map(Bound::At)
        .map_err(|_| RangeError::NotANumber {
            expr: expr.to_string(),
            token: token.to_string(),
        })
}
