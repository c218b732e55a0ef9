//! Access to the FlashArray state the checks are computed from.
//!
//! The [`ArrayApi`] trait is the only seam between the checks and the array:
//! [`FlashArrayClient`] talks to the REST API, [`FlashBladeClient`] to the
//! FlashBlade REST API (hardware only), and [`FixtureArray`] serves the same
//! records from a JSON test-data file.

pub mod blade;
pub mod client;
pub mod fixture;
pub mod records;

pub use blade::FlashBladeClient;
pub use client::FlashArrayClient;
pub use fixture::{FixtureArray, TestData};
pub use records::{AlertRecord, ArraySpace, HardwareRecord, PodArray, PodMirrorStats, PodRecord, VolumeSpace};

use thiserror::Error;

/// Failure to obtain records from the array.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("invalid endpoint {0}")]
    Endpoint(String),

    #[error("{0} is not available on this platform")]
    Unsupported(&'static str),

    #[error("test data: {0}")]
    Fixture(String),
}

/// Read-only queries a check may issue against an array.
#[allow(async_fn_in_trait)]
pub trait ArrayApi {
    /// All currently open alert messages.
    async fn list_open_alerts(&self) -> Result<Vec<AlertRecord>, SourceError>;

    /// Array-wide space counters; `None` when the array returned no record.
    async fn array_space(&self) -> Result<Option<ArraySpace>, SourceError>;

    /// Space counters of one volume; `None` when the array returned no record.
    async fn volume_space(&self, volume: &str) -> Result<Option<VolumeSpace>, SourceError>;

    /// Hardware components, or the single named component.
    async fn hardware(&self, component: Option<&str>) -> Result<Vec<HardwareRecord>, SourceError>;

    /// Pods, or the single named pod.
    async fn pods(&self, pod: Option<&str>) -> Result<Vec<PodRecord>, SourceError>;

    /// Mirrored write statistics of pods, or of the single named pod.
    async fn pod_mirror_stats(&self, pod: Option<&str>) -> Result<Vec<PodMirrorStats>, SourceError>;

    /// Releases the session. The default does nothing.
    async fn close(&self) -> Result<(), SourceError> {
        Ok(())
    }
}
