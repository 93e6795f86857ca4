//! Host identity, uptime, and load.

use chrono::Utc;
use sysinfo::System;

use crate::types::{LoadAverage, MonitorResult, SystemInfo};

pub fn collect_system(include_load: bool) -> MonitorResult<SystemInfo> {
    let mut sys = System::new();
    sys.refresh_processes();

    let platform = match (System::name(), System::os_version()) {
        (Some(name), Some(version)) => format!("{name} {version}"),
        (Some(name), None) => name,
        _ => "unknown".to_string(),
    };

    let load_average = include_load.then(|| {
        let load = System::load_average();
        LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        }
    });

    Ok(SystemInfo {
        hostname: System::host_name().unwrap_or_else(|| "unknown".to_string()),
        os: std::env::consts::OS.to_string(),
        platform,
        kernel_version: System::kernel_version().unwrap_or_else(|| "unknown".to_string()),
        architecture: std::env::consts::ARCH.to_string(),
        uptime_secs: System::uptime(),
        process_count: sys.processes().len() as u64,
        load_average,
        last_updated: Utc::now(),
    })
}
