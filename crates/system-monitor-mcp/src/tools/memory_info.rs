//! Tool `memory_info`: RAM and swap usage.

use std::time::Duration;

use system_monitor::format::format_bytes;
use system_monitor::{collect_memory, MemoryInfo};

use crate::types::{Arguments, InputSchema, Property};

use super::render::Report;
use super::{cached_or_collect, use_cache, MetricCache, Tool, ToolError};

const TTL: Duration = Duration::from_secs(15);
const CACHE_KEY: &str = "memory_info";

pub struct MemoryInfoTool {
    cache: Option<MetricCache>,
}

impl MemoryInfoTool {
    pub fn new(cache: Option<MetricCache>) -> Self {
        Self { cache }
    }
}

impl Tool for MemoryInfoTool {
    fn name(&self) -> &str {
        "memory_info"
    }

    fn description(&self) -> &str {
        "Get memory and swap usage"
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new().property(
            "use_cache",
            Property::string("Serve a recent cached result if available")
                .one_of(&["true", "false"])
                .with_default("false"),
        )
    }

    fn execute(&self, args: &Arguments) -> Result<String, ToolError> {
        let info = cached_or_collect(
            self.cache.as_ref(),
            CACHE_KEY,
            TTL,
            use_cache(args),
            collect_memory,
        )?;
        Ok(render(&info))
    }
}

fn render(info: &MemoryInfo) -> String {
    let mut report = Report::new("🧠 Memory Information");
    report
        .field("Total", format_bytes(info.total))
        .field("Used", format_bytes(info.used))
        .field("Available", format_bytes(info.available))
        .field("Free", format_bytes(info.free))
        .field("Usage", format!("{:.2}%", info.used_percent));

    report.section("💾 Swap");
    if info.swap.total == 0 {
        report.line("No swap configured");
    } else {
        report
            .field("Total", format_bytes(info.swap.total))
            .field("Used", format_bytes(info.swap.used))
            .field("Free", format_bytes(info.swap.free))
            .field("Usage", format!("{:.2}%", info.swap.used_percent));
    }

    report.finish(&info.last_updated)
}
