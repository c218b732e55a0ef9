//! Pure Storage FlashArray Health Checks
//!
//! This library implements the monitoring-plugin check engine behind the
//! `purefa-check` binary: metrics are collected from a FlashArray, judged
//! against warning/critical ranges and reduced to a single verdict with its
//! plugin output and exit code.
//!
//! # Features
//!
//! - **Range Thresholds**: the monitoring-plugin range syntax (`10`, `0:80`, `~:5`, `@10:20`)
//! - **Metric Sources**: open alerts, space occupancy, hardware status, pod replication
//! - **Worst-Case Aggregation**: OK < WARNING < CRITICAL, with UNKNOWN dominating
//! - **Pluggable Backends**: the REST API or a recorded JSON test-data file
//!
//! # Usage
//!
//! ```rust
//! use purefa_check::array::{ArraySpace, FixtureArray, TestData};
//! use purefa_check::check::{Check, Invocation};
//! use purefa_check::sources::{OccupancySampler, Source};
//! use purefa_check::Verdict;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let array = FixtureArray::new(TestData {
//!     array_space: Some(ArraySpace { total: Some(50.0), capacity: Some(200.0) }),
//!     ..TestData::default()
//! });
//!
//! let check = Check::new(Source::Occupancy(OccupancySampler::array()))
//!     .with_context(OccupancySampler::context(Some("0:80"), Some("0:95")).unwrap());
//!
//! let result = Invocation::default().execute(&check, &array).await;
//! assert_eq!(result.verdict, Verdict::Ok);
//! println!("{}", result.render(0));
//! # }
//! ```

pub mod aggregator;
pub mod array;
pub mod check;
pub mod error;
pub mod evaluator;
pub mod logging;
pub mod metric;
pub mod range;
pub mod sources;
pub mod verdict;

// Re-export main types for convenience
pub use aggregator::CheckResult;
pub use check::{Check, Invocation};
pub use error::CheckError;
pub use evaluator::{MetricResult, ScalarContext};
pub use metric::{Metric, MetricValue};
pub use range::{Range, RangeError};
pub use verdict::Verdict;
