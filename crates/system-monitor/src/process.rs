//! Top-N process table.

use std::str::FromStr;

use chrono::Utc;
use sysinfo::System;

use crate::types::{MonitorResult, ProcessInfo, ProcessList};

/// Ordering key for [`collect_top_processes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessSort {
    Cpu,
    #[default]
    Memory,
}

impl ProcessSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessSort::Cpu => "cpu",
            ProcessSort::Memory => "memory",
        }
    }
}

impl FromStr for ProcessSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(ProcessSort::Cpu),
            "memory" => Ok(ProcessSort::Memory),
            other => Err(format!("unknown sort key '{other}', expected cpu or memory")),
        }
    }
}

/// Collect the `limit` heaviest processes by `sort`.
///
/// Per-process CPU usage needs two refreshes, so this blocks for the
/// platform's minimum CPU update interval.
pub fn collect_top_processes(sort: ProcessSort, limit: usize) -> MonitorResult<ProcessList> {
    let mut sys = System::new();
    sys.refresh_processes();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_processes();

    let processes: Vec<ProcessInfo> = sys
        .processes()
        .values()
        .filter(|p| !p.name().is_empty())
        .map(|p| {
            let memory_bytes = p.memory();
            ProcessInfo {
                pid: p.pid().as_u32(),
                name: p.name().to_string(),
                status: p.status().to_string(),
                cpu_percent: f64::from(p.cpu_usage()),
                memory_bytes,
                memory_mb: memory_bytes as f64 / (1024.0 * 1024.0),
                start_time: p.start_time(),
            }
        })
        .collect();

    Ok(top_n(processes, sort, limit))
}

/// Sort descending by `sort` and keep the first `limit`.
pub fn top_n(mut processes: Vec<ProcessInfo>, sort: ProcessSort, limit: usize) -> ProcessList {
    let total_count = processes.len();
    match sort {
        ProcessSort::Cpu => processes.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent)),
        ProcessSort::Memory => processes.sort_by(|a, b| b.memory_bytes.cmp(&a.memory_bytes)),
    }
    processes.truncate(limit);

    ProcessList {
        processes,
        total_count,
        last_updated: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proc_info(pid: u32, cpu: f64, mem: u64) -> ProcessInfo {
        ProcessInfo {
            pid,
            name: format!("p{pid}"),
            status: "Run".to_string(),
            cpu_percent: cpu,
            memory_bytes: mem,
            memory_mb: mem as f64 / (1024.0 * 1024.0),
            start_time: 0,
        }
    }

    fn sample() -> Vec<ProcessInfo> {
        vec![
            proc_info(1, 5.0, 300),
            proc_info(2, 50.0, 100),
            proc_info(3, 20.0, 900),
        ]
    }

    #[test]
    fn test_top_by_memory() {
        let list = top_n(sample(), ProcessSort::Memory, 2);
        let pids: Vec<u32> = list.processes.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![3, 1]);
        assert_eq!(list.total_count, 3);
    }

    #[test]
    fn test_top_by_cpu() {
        let list = top_n(sample(), ProcessSort::Cpu, 10);
        let pids: Vec<u32> = list.processes.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("cpu".parse::<ProcessSort>(), Ok(ProcessSort::Cpu));
        assert_eq!("memory".parse::<ProcessSort>(), Ok(ProcessSort::Memory));
        assert!("disk".parse::<ProcessSort>().is_err());
        assert_eq!(ProcessSort::default().as_str(), "memory");
    }
}
