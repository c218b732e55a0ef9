//! Generate testdata command implementation.
//!
//! Generates synthetic array data for `--test-data-file`.

use anyhow::Result;
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use purefa_check::array::{
    AlertRecord, ArraySpace, HardwareRecord, PodArray, PodMirrorStats, PodRecord, TestData,
    VolumeSpace,
};
use purefa_check::sources::alert::SEVERITIES;

const GB: f64 = 1024.0 * 1024.0 * 1024.0;
const TB: f64 = 1024.0 * GB;

const COMPONENTS: [&str; 8] = [
    "CH0", "CH0.BAY0", "CH0.BAY1", "CT0", "CT1", "CT0.FC0", "CT1.FC0", "CT0.ETH0",
];
const ALERT_COMPONENTS: [&str; 4] = ["ct0.eth0", "ct1.fc0", "array", "shelf0.psu1"];

/// Generates synthetic test data JSON file for testing purposes.
pub fn command_generate_testdata(output: PathBuf, alerts: usize, volumes: usize) -> Result<()> {
    debug!(
        "Generating test data: alerts={}, volumes={}, output={}",
        alerts,
        volumes,
        output.display()
    );

    let test_data = generate_test_data(&mut rand::thread_rng(), alerts, volumes);

    let json_content = serde_json::to_string_pretty(&test_data)?;
    fs::write(&output, &json_content)?;

    println!(
        "✅ Generated test data: {} alerts, {} volumes, {} hardware components in {}",
        test_data.alerts.len(),
        test_data.volumes.len(),
        test_data.hardware.len(),
        output.display()
    );

    Ok(())
}

/// Builds a healthy looking array with random alerts and space usage.
pub fn generate_test_data(rng: &mut impl Rng, alerts: usize, volumes: usize) -> TestData {
    let capacity = rng.gen_range(10.0..500.0_f64).floor() * TB;
    let used = capacity * rng.gen_range(0.05..0.90);

    let alerts = (0..alerts)
        .map(|i| AlertRecord {
            current_severity: SEVERITIES.choose(rng).copied().unwrap_or("info").to_string(),
            component_name: ALERT_COMPONENTS.choose(rng).map(|c| c.to_string()),
            details: Some(format!("synthetic alert {}", i + 1)),
        })
        .collect();

    let volumes = (1..=volumes)
        .map(|i| {
            let name = format!("vol{i}");
            let size = rng.gen_range(1.0..100.0_f64).floor() * 100.0 * GB;
            let data = size * rng.gen_range(0.0..0.95);
            let snapshots = data * rng.gen_range(0.0..0.2);
            let space = VolumeSpace {
                name: Some(name.clone()),
                total: Some((data + snapshots).floor()),
                size: Some(size),
                volumes: Some(data.floor()),
            };
            (name, space)
        })
        .collect();

    let hardware = COMPONENTS
        .iter()
        .map(|name| HardwareRecord {
            name: name.to_string(),
            status: "ok".to_string(),
        })
        .collect();

    let pods = vec![PodRecord {
        name: "pod1".to_string(),
        arrays: vec![
            PodArray {
                name: "fa01".to_string(),
                status: "online".to_string(),
            },
            PodArray {
                name: "fa02".to_string(),
                status: "online".to_string(),
            },
        ],
    }];

    let pod_mirror_stats = vec![PodMirrorStats {
        name: "pod1".to_string(),
        usec_per_mirrored_write_op: rng.gen_range(100.0..2500.0_f64).floor(),
    }];

    TestData {
        version: "1.0".to_string(),
        generated_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        alerts,
        array_space: Some(ArraySpace {
            total: Some(used.floor()),
            capacity: Some(capacity),
        }),
        volumes,
        hardware,
        pods,
        pod_mirror_stats,
    }
}
