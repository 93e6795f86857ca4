//! RAM and swap counters.

use chrono::Utc;
use sysinfo::System;

use crate::types::{percent, MemoryInfo, MonitorError, MonitorResult, SwapInfo};

pub fn collect_memory() -> MonitorResult<MemoryInfo> {
    let mut sys = System::new();
    sys.refresh_memory();

    let total = sys.total_memory();
    if total == 0 {
        return Err(MonitorError::Collect(
            "memory counters unavailable".to_string(),
        ));
    }
    let used = sys.used_memory();

    let swap_total = sys.total_swap();
    let swap_used = sys.used_swap();

    Ok(MemoryInfo {
        total,
        used,
        available: sys.available_memory(),
        free: sys.free_memory(),
        used_percent: percent(used, total),
        swap: SwapInfo {
            total: swap_total,
            used: swap_used,
            free: sys.free_swap(),
            used_percent: percent(swap_used, swap_total),
        },
        last_updated: Utc::now(),
    })
}
