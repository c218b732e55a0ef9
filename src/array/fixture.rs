//! Array records served from a JSON test-data file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::records::{AlertRecord, ArraySpace, HardwareRecord, PodMirrorStats, PodRecord, VolumeSpace};
use super::{ArrayApi, SourceError};

/// Root structure of a test-data file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestData {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub alerts: Vec<AlertRecord>,
    #[serde(default)]
    pub array_space: Option<ArraySpace>,
    #[serde(default)]
    pub volumes: BTreeMap<String, VolumeSpace>,
    #[serde(default)]
    pub hardware: Vec<HardwareRecord>,
    #[serde(default)]
    pub pods: Vec<PodRecord>,
    #[serde(default)]
    pub pod_mirror_stats: Vec<PodMirrorStats>,
}

/// [`ArrayApi`] implementation backed by [`TestData`].
#[derive(Debug, Clone, Default)]
pub struct FixtureArray {
    data: TestData,
}

impl FixtureArray {
    pub fn new(data: TestData) -> Self {
        Self { data }
    }

    /// Loads test data from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        debug!("Loading test data from: {}", path.display());

        if !path.exists() {
            return Err(SourceError::Fixture(format!(
                "file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SourceError::Fixture(format!("failed to read {}: {}", path.display(), e)))?;
        let data: TestData = serde_json::from_str(&content)
            .map_err(|e| SourceError::Fixture(format!("failed to parse {}: {}", path.display(), e)))?;

        info!(
            "Loaded test data version {} generated at {}",
            data.version, data.generated_at
        );

        Ok(Self { data })
    }

    fn not_found(kind: &str, name: &str) -> SourceError {
        SourceError::Status {
            status: 400,
            body: format!("{kind} '{name}' does not exist"),
        }
    }
}

impl ArrayApi for FixtureArray {
    async fn list_open_alerts(&self) -> Result<Vec<AlertRecord>, SourceError> {
        Ok(self.data.alerts.clone())
    }

    async fn array_space(&self) -> Result<Option<ArraySpace>, SourceError> {
        Ok(self.data.array_space.clone())
    }

    async fn volume_space(&self, volume: &str) -> Result<Option<VolumeSpace>, SourceError> {
        match self.data.volumes.get(volume) {
            Some(space) => Ok(Some(space.clone())),
            None => Err(Self::not_found("volume", volume)),
        }
    }

    async fn hardware(&self, component: Option<&str>) -> Result<Vec<HardwareRecord>, SourceError> {
        match component {
            None => Ok(self.data.hardware.clone()),
            Some(name) => self
                .data
                .hardware
                .iter()
                .find(|h| h.name == name)
                .map(|h| vec![h.clone()])
                .ok_or_else(|| Self::not_found("component", name)),
        }
    }

    async fn pods(&self, pod: Option<&str>) -> Result<Vec<PodRecord>, SourceError> {
        match pod {
            None => Ok(self.data.pods.clone()),
            Some(name) => self
                .data
                .pods
                .iter()
                .find(|p| p.name == name)
                .map(|p| vec![p.clone()])
                .ok_or_else(|| Self::not_found("pod", name)),
        }
    }

    async fn pod_mirror_stats(&self, pod: Option<&str>) -> Result<Vec<PodMirrorStats>, SourceError> {
        Ok(self
            .data
            .pod_mirror_stats
            .iter()
            .filter(|s| pod.map_or(true, |name| s.name == name))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let err = FixtureArray::from_file(Path::new("/nonexistent/testdata.json")).unwrap_err();
        assert!(err.to_string().contains("file not found"));
    }

    #[tokio::test]
    async fn test_named_lookups() {
        let data: TestData = serde_json::from_str(
            r#"{
                "hardware": [{"name": "CT0", "status": "ok"}, {"name": "CT1", "status": "critical"}],
                "volumes": {"vol1": {"total": 10, "size": 100, "volumes": 8}}
            }"#,
        )
        .unwrap();
        let array = FixtureArray::new(data);

        let ct1 = array.hardware(Some("CT1")).await.unwrap();
        assert_eq!(ct1.len(), 1);
        assert_eq!(ct1[0].status, "critical");
        assert!(array.hardware(Some("CT9")).await.is_err());

        let vol = array.volume_space("vol1").await.unwrap().unwrap();
        assert_eq!(vol.volumes, Some(8.0));
        assert!(array.volume_space("vol2").await.is_err());
        assert!(array.array_space().await.unwrap().is_none());
    }
}
