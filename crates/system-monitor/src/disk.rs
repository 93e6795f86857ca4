//! Mounted partition usage.

use chrono::Utc;
use sysinfo::Disks;

use crate::types::{percent, DiskInfo, DiskPartition, MonitorResult};

const PSEUDO_MOUNTPOINTS: &[&str] = &[
    "/dev", "/proc", "/sys", "/run", "/boot/efi", "/snap", "/var/snap", "/tmp", "/dev/shm",
];

const PSEUDO_FILESYSTEMS: &[&str] = &[
    "tmpfs", "devtmpfs", "sysfs", "proc", "devfs", "squashfs", "overlay", "aufs", "fuse",
];

/// List mounted partitions. Unless `show_all`, virtual and system mounts are skipped.
pub fn collect_disks(show_all: bool) -> MonitorResult<DiskInfo> {
    let disks = Disks::new_with_refreshed_list();

    let partitions = disks
        .list()
        .iter()
        .filter_map(|disk| {
            let mountpoint = disk.mount_point().display().to_string();
            let fstype = disk.file_system().to_string_lossy().into_owned();
            if !show_all && is_pseudo_partition(&mountpoint, &fstype) {
                return None;
            }

            let total = disk.total_space();
            let free = disk.available_space();
            let used = total.saturating_sub(free);
            Some(DiskPartition {
                device: disk.name().to_string_lossy().into_owned(),
                mountpoint,
                fstype,
                total,
                used,
                free,
                used_percent: percent(used, total),
            })
        })
        .collect();

    Ok(DiskInfo {
        partitions,
        last_updated: Utc::now(),
    })
}

pub fn is_pseudo_partition(mountpoint: &str, fstype: &str) -> bool {
    PSEUDO_MOUNTPOINTS.contains(&mountpoint) || PSEUDO_FILESYSTEMS.contains(&fstype)
}
