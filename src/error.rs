//! Errors that abort a check invocation.
//!
//! Every variant ends the invocation with an `UNKNOWN` verdict. Threshold
//! breaches are not errors: they are reported through the metric verdicts.

use thiserror::Error;

use crate::array::SourceError;
use crate::range::RangeError;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("FA REST call returned \"{0}\"")]
    Source(#[from] SourceError),

    /// The array answered, but with counters the check cannot use.
    #[error("invalid data from array: {0}")]
    InvalidData(String),

    #[error("Timeout: check execution aborted after {0}s")]
    Timeout(u64),
}
