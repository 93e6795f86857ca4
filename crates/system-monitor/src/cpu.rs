//! CPU model and utilisation sampling.

use std::time::Duration;

use chrono::Utc;
use sysinfo::System;

use crate::types::{CpuInfo, CpuUsage, MonitorError, MonitorResult};

/// Sample CPU usage over `window`.
///
/// Blocks the calling thread for the whole window (at least the platform
/// minimum between two usage refreshes).
pub fn collect_cpu(window: Duration) -> MonitorResult<CpuInfo> {
    let mut sys = System::new();
    sys.refresh_cpu();
    std::thread::sleep(window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
    sys.refresh_cpu();

    let cpus = sys.cpus();
    let first = cpus
        .first()
        .ok_or_else(|| MonitorError::Collect("no CPUs reported by the platform".to_string()))?;

    let per_core_percent: Vec<f64> = cpus.iter().map(|c| f64::from(c.cpu_usage())).collect();
    let total_percent = f64::from(sys.global_cpu_info().cpu_usage());

    Ok(CpuInfo {
        model_name: first.brand().trim().to_string(),
        physical_cores: sys.physical_core_count().unwrap_or(cpus.len()),
        logical_cores: cpus.len(),
        frequency_ghz: first.frequency() as f64 / 1000.0,
        usage: CpuUsage {
            total_percent,
            per_core_percent,
        },
        last_updated: Utc::now(),
    })
}
