//! Tool `disk_info`: mounted partitions and their usage.

use std::time::Duration;

use system_monitor::format::format_bytes;
use system_monitor::{collect_disks, DiskInfo};

use crate::types::{Arguments, InputSchema, Property};

use super::render::Report;
use super::{cached_or_collect, flag_arg, use_cache, MetricCache, Tool, ToolError};

const TTL: Duration = Duration::from_secs(30);

pub struct DiskInfoTool {
    cache: Option<MetricCache>,
}

impl DiskInfoTool {
    pub fn new(cache: Option<MetricCache>) -> Self {
        Self { cache }
    }
}

impl Tool for DiskInfoTool {
    fn name(&self) -> &str {
        "disk_info"
    }

    fn description(&self) -> &str {
        "Get disk partitions and space usage"
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new()
            .property(
                "show_all",
                Property::string("Include pseudo and virtual filesystems")
                    .one_of(&["true", "false"])
                    .with_default("false"),
            )
            .property(
                "use_cache",
                Property::string("Serve a recent cached result if available")
                    .one_of(&["true", "false"])
                    .with_default("false"),
            )
    }

    fn execute(&self, args: &Arguments) -> Result<String, ToolError> {
        let show_all = flag_arg(args, "show_all");
        let key = format!("disk_info_{show_all}");
        let info = cached_or_collect(self.cache.as_ref(), &key, TTL, use_cache(args), || {
            collect_disks(show_all)
        })?;
        Ok(render(&info))
    }
}

fn render(info: &DiskInfo) -> String {
    let mut report = Report::new("💽 Disk Information");
    if info.partitions.is_empty() {
        report.line("No partitions found");
    }

    for (i, part) in info.partitions.iter().enumerate() {
        if i > 0 {
            report.line("");
        }
        report
            .line(format!("📁 {}", part.mountpoint))
            .field("  Device", &part.device)
            .field("  Filesystem", &part.fstype)
            .field("  Total", format_bytes(part.total))
            .field("  Used", format_bytes(part.used))
            .field("  Free", format_bytes(part.free))
            .field("  Usage", format!("{:.2}%", part.used_percent));
    }

    report.finish(&info.last_updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use system_monitor::DiskPartition;

    #[test]
    fn test_render_partitions() {
        let info = DiskInfo {
            partitions: vec![DiskPartition {
                device: "/dev/sda1".to_string(),
                mountpoint: "/".to_string(),
                fstype: "ext4".to_string(),
                total: 100 * 1024 * 1024 * 1024,
                used: 40 * 1024 * 1024 * 1024,
                free: 60 * 1024 * 1024 * 1024,
                used_percent: 40.0,
            }],
            last_updated: Utc::now(),
        };
        let text = render(&info);
        assert!(text.contains("📁 /"));
        assert!(text.contains("Device: /dev/sda1"));
        assert!(text.contains("Total: 100.00 GiB"));
        assert!(text.contains("Usage: 40.00%"));
    }

    #[test]
    fn test_render_empty() {
        let info = DiskInfo {
            partitions: vec![],
            last_updated: Utc::now(),
        };
        assert!(render(&info).contains("No partitions found"));
    }
}
