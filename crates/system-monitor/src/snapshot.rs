//! Full point-in-time snapshot across every collector.

use std::time::Duration;

use chrono::Utc;

use crate::process::ProcessSort;
use crate::types::{MonitorData, MonitorResult};
use crate::{collect_cpu, collect_disks, collect_memory, collect_network, collect_system, collect_top_processes};

const SNAPSHOT_CPU_WINDOW: Duration = Duration::from_secs(1);
const SNAPSHOT_PROCESS_LIMIT: usize = 10;

/// Gather system, CPU, memory, disk, network and top-process data.
pub fn collect_snapshot() -> MonitorResult<MonitorData> {
    let system = collect_system(true)?;
    let cpu = collect_cpu(SNAPSHOT_CPU_WINDOW)?;
    let memory = collect_memory()?;
    let disk = collect_disks(false)?;
    let network = collect_network(false, "")?;
    let processes = collect_top_processes(ProcessSort::Memory, SNAPSHOT_PROCESS_LIMIT)?;

    Ok(MonitorData {
        system,
        cpu,
        memory,
        network,
        disk,
        processes,
        timestamp: Utc::now(),
    })
}
