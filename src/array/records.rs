//! Record shapes returned by the FlashArray REST API.
//!
//! Only the fields the checks read are modelled; everything else in the
//! responses is ignored.

use serde::{Deserialize, Serialize};

/// An alert message (`GET message?open=true`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// `critical`, `warning` or `info`.
    pub current_severity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Array-wide space counters (`GET array?space=true`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArraySpace {
    /// Bytes used.
    pub total: Option<f64>,
    /// Usable capacity in bytes.
    pub capacity: Option<f64>,
}

/// Space counters of a single volume (`GET volume/<name>?space=true`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSpace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Bytes used including snapshots.
    pub total: Option<f64>,
    /// Provisioned size in bytes.
    pub size: Option<f64>,
    /// Bytes used by the volume data.
    pub volumes: Option<f64>,
}

/// A hardware component (`GET hardware`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareRecord {
    pub name: String,
    pub status: String,
}

/// A pod and the arrays it stretches over (`GET pod`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodRecord {
    pub name: String,
    #[serde(default)]
    pub arrays: Vec<PodArray>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodArray {
    pub name: String,
    pub status: String,
}

/// Mirrored write statistics (`GET pod?action=monitor&mirrored=true`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodMirrorStats {
    pub name: String,
    pub usec_per_mirrored_write_op: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_ignores_unknown_fields() {
        let alert: AlertRecord = serde_json::from_str(
            r#"{"id": 42, "current_severity": "warning", "event": "failure", "component_name": "ct0"}"#,
        )
        .unwrap();
        assert_eq!(alert.current_severity, "warning");
        assert_eq!(alert.component_name.as_deref(), Some("ct0"));
    }

    #[test]
    fn test_volume_space_partial() {
        let vol: VolumeSpace = serde_json::from_str(r#"{"name": "vol1", "volumes": 12345}"#).unwrap();
        assert_eq!(vol.volumes, Some(12345.0));
        assert_eq!(vol.size, None);
    }

    #[test]
    fn test_pod_without_arrays() {
        let pod: PodRecord = serde_json::from_str(r#"{"name": "pod1"}"#).unwrap();
        assert!(pod.arrays.is_empty());
    }
}
