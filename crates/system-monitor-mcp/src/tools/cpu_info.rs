//! Tool `cpu_info`: CPU model, core counts and utilisation.

use std::time::Duration;

use system_monitor::format::parse_sample_window;
use system_monitor::{collect_cpu, CpuInfo};

use crate::types::{Arguments, InputSchema, Property};

use super::render::Report;
use super::{cached_or_collect, str_arg, use_cache, MetricCache, Tool, ToolError};

const TTL: Duration = Duration::from_secs(30);
const DEFAULT_DURATION: &str = "1s";

pub struct CpuInfoTool {
    cache: Option<MetricCache>,
}

impl CpuInfoTool {
    pub fn new(cache: Option<MetricCache>) -> Self {
        Self { cache }
    }
}

impl Tool for CpuInfoTool {
    fn name(&self) -> &str {
        "cpu_info"
    }

    fn description(&self) -> &str {
        "Get CPU usage and processor details"
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new()
            .property(
                "duration",
                Property::string("Sampling window (1s, 5s, 10s)")
                    .one_of(&["1s", "5s", "10s"])
                    .with_default(DEFAULT_DURATION),
            )
            .property(
                "use_cache",
                Property::string("Serve a recent cached result if available")
                    .one_of(&["true", "false"])
                    .with_default("false"),
            )
    }

    fn execute(&self, args: &Arguments) -> Result<String, ToolError> {
        let mut duration = str_arg(args, "duration", DEFAULT_DURATION);
        if duration.is_empty() {
            duration = DEFAULT_DURATION.to_string();
        }
        let window = parse_sample_window(&duration);

        let key = format!("cpu_info_{duration}");
        let info = cached_or_collect(self.cache.as_ref(), &key, TTL, use_cache(args), || {
            collect_cpu(window)
        })?;

        Ok(render(&info, &duration))
    }
}

fn render(info: &CpuInfo, duration: &str) -> String {
    let mut report = Report::new("💻 CPU Information");
    report
        .field("Model", &info.model_name)
        .field("Physical cores", info.physical_cores)
        .field("Logical cores", info.logical_cores)
        .field("Frequency", format!("{:.2} GHz", info.frequency_ghz));

    report
        .section(&format!("📊 CPU Usage (sampled over {duration})"))
        .field("Total", format!("{:.2}%", info.usage.total_percent));
    for (i, percent) in info.usage.per_core_percent.iter().enumerate() {
        report.field(&format!("Core {i}"), format!("{percent:.2}%"));
    }

    report.finish(&info.last_updated)
}
