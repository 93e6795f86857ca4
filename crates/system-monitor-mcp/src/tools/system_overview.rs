//! Tool `system_overview`: host identity, uptime and load.

use std::time::Duration;

use system_monitor::format::format_uptime;
use system_monitor::{collect_system, SystemInfo};

use crate::types::{Arguments, InputSchema, Property};

use super::render::Report;
use super::{cached_or_collect, str_arg, use_cache, MetricCache, Tool, ToolError};

const TTL: Duration = Duration::from_secs(60);

pub struct SystemOverviewTool {
    cache: Option<MetricCache>,
}

impl SystemOverviewTool {
    pub fn new(cache: Option<MetricCache>) -> Self {
        Self { cache }
    }
}

impl Tool for SystemOverviewTool {
    fn name(&self) -> &str {
        "system_overview"
    }

    fn description(&self) -> &str {
        "Get an overview of the host system"
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new()
            .property(
                "include_load",
                Property::string("Include 1/5/15 minute load averages")
                    .one_of(&["true", "false"])
                    .with_default("true"),
            )
            .property(
                "use_cache",
                Property::string("Serve a recent cached result if available")
                    .one_of(&["true", "false"])
                    .with_default("false"),
            )
    }

    fn execute(&self, args: &Arguments) -> Result<String, ToolError> {
        // Anything but an explicit "false" keeps the load section.
        let include_load = str_arg(args, "include_load", "true") != "false";

        let key = format!("system_overview_{include_load}");
        let info = cached_or_collect(self.cache.as_ref(), &key, TTL, use_cache(args), || {
            collect_system(include_load)
        })?;

        Ok(render(&info, include_load))
    }
}

fn render(info: &SystemInfo, include_load: bool) -> String {
    let mut report = Report::new("🖥️  System Overview");
    report
        .field("Hostname", &info.hostname)
        .field("OS", &info.os)
        .field("Platform", &info.platform)
        .field("Kernel", &info.kernel_version)
        .field("Architecture", &info.architecture)
        .field("Uptime", format_uptime(info.uptime_secs))
        .field("Processes", info.process_count);

    if include_load {
        report.section("📊 System Load");
        match &info.load_average {
            Some(load) => {
                report
                    .field("1 min", format!("{:.2}", load.one))
                    .field("5 min", format!("{:.2}", load.five))
                    .field("15 min", format!("{:.2}", load.fifteen));
            }
            None => {
                report.line("Load average is not available on this platform");
            }
        }
    }

    report.finish(&info.last_updated)
}
