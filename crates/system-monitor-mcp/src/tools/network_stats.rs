//! Tool `network_stats`: interface counters and an optional socket summary.

use std::time::Duration;

use system_monitor::format::format_bytes;
use system_monitor::{collect_network, NetworkInfo};

use crate::types::{Arguments, InputSchema, Property};

use super::render::Report;
use super::{cached_or_collect, flag_arg, str_arg, use_cache, MetricCache, Tool, ToolError};

const TTL: Duration = Duration::from_secs(10);

pub struct NetworkStatsTool {
    cache: Option<MetricCache>,
}

impl NetworkStatsTool {
    pub fn new(cache: Option<MetricCache>) -> Self {
        Self { cache }
    }
}

impl Tool for NetworkStatsTool {
    fn name(&self) -> &str {
        "network_stats"
    }

    fn description(&self) -> &str {
        "Get network interface traffic and connection statistics"
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new()
            .property(
                "show_connections",
                Property::string("Include a summary of open sockets")
                    .one_of(&["true", "false"])
                    .with_default("false"),
            )
            .property(
                "interface_filter",
                Property::string("Only report this interface (empty for all)").with_default(""),
            )
            .property(
                "use_cache",
                Property::string("Serve a recent cached result if available")
                    .one_of(&["true", "false"])
                    .with_default("false"),
            )
    }

    fn execute(&self, args: &Arguments) -> Result<String, ToolError> {
        let show_connections = flag_arg(args, "show_connections");
        let filter = str_arg(args, "interface_filter", "");

        let key = format!("network_stats_{show_connections}_{filter}");
        let info = cached_or_collect(self.cache.as_ref(), &key, TTL, use_cache(args), || {
            collect_network(show_connections, &filter)
        })?;

        Ok(render(&info, show_connections))
    }
}

fn render(info: &NetworkInfo, show_connections: bool) -> String {
    let mut report = Report::new("🌐 Network Interfaces");
    if info.interfaces.is_empty() {
        report.line("No matching interfaces");
    }

    for (i, iface) in info.interfaces.iter().enumerate() {
        if i > 0 {
            report.line("");
        }
        report
            .line(format!("🔌 {}", iface.name))
            .field("  Sent", format!("{} ({} packets)", format_bytes(iface.bytes_sent), iface.packets_sent))
            .field("  Received", format!("{} ({} packets)", format_bytes(iface.bytes_recv), iface.packets_recv))
            .field("  Errors in/out", format!("{}/{}", iface.errors_in, iface.errors_out));
    }

    if show_connections {
        let conns = &info.connections;
        report
            .section("🔗 Connections")
            .field("Total", conns.total);
        for (status, count) in &conns.by_status {
            report.field(&format!("  {status}"), count);
        }
        for (protocol, count) in &conns.by_protocol {
            report.field(&format!("  {protocol}"), count);
        }
        if !conns.details.is_empty() {
            report.line("");
            for c in &conns.details {
                report.line(format!(
                    "  {:<5} {}:{} -> {}:{} {}",
                    c.protocol, c.local_ip, c.local_port, c.remote_ip, c.remote_port, c.status
                ));
            }
        }
    }

    report.finish(&info.last_updated)
}
