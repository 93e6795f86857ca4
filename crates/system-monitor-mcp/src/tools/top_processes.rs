//! Tool `top_processes`: heaviest processes by CPU or memory.

use std::time::Duration;

use system_monitor::format::truncate;
use system_monitor::{collect_top_processes, ProcessList, ProcessSort};

use crate::types::{Arguments, InputSchema, Property};

use super::render::Report;
use super::{cached_or_collect, str_arg, use_cache, MetricCache, Tool, ToolError};

const TTL: Duration = Duration::from_secs(20);
const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;
const NAME_WIDTH: usize = 24;

pub struct TopProcessesTool {
    cache: Option<MetricCache>,
}

impl TopProcessesTool {
    pub fn new(cache: Option<MetricCache>) -> Self {
        Self { cache }
    }
}

impl Tool for TopProcessesTool {
    fn name(&self) -> &str {
        "top_processes"
    }

    fn description(&self) -> &str {
        "List the processes using the most CPU or memory"
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::new()
            .property(
                "sort_by",
                Property::string("Sort key")
                    .one_of(&["cpu", "memory"])
                    .with_default("memory"),
            )
            .property(
                "limit",
                Property::string("Number of processes to return (1-100)").with_default("10"),
            )
            .property(
                "use_cache",
                Property::string("Serve a recent cached result if available")
                    .one_of(&["true", "false"])
                    .with_default("false"),
            )
    }

    fn execute(&self, args: &Arguments) -> Result<String, ToolError> {
        let sort = parse_sort(&str_arg(args, "sort_by", "memory"));
        let limit = parse_limit(&str_arg(args, "limit", ""));

        let key = format!("top_processes_{}_{limit}", sort.as_str());
        let list = cached_or_collect(self.cache.as_ref(), &key, TTL, use_cache(args), || {
            collect_top_processes(sort, limit)
        })?;

        Ok(render(&list, sort))
    }
}

fn parse_sort(raw: &str) -> ProcessSort {
    raw.parse().unwrap_or_else(|e| {
        tracing::debug!("{e}; sorting by memory");
        ProcessSort::default()
    })
}

/// Out-of-range or unparseable limits fall back to the default.
fn parse_limit(raw: &str) -> usize {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 && n <= MAX_LIMIT as i64 => n as usize,
        _ => DEFAULT_LIMIT,
    }
}

fn render(list: &ProcessList, sort: ProcessSort) -> String {
    let title = match sort {
        ProcessSort::Cpu => "⚙️  Top Processes by CPU",
        ProcessSort::Memory => "⚙️  Top Processes by Memory",
    };
    let mut report = Report::new(title);
    report
        .field("Total processes", list.total_count)
        .field("Shown", list.processes.len())
        .line("")
        .line(format!(
            "{:>8}  {:<w$}  {:>8}  {:>12}  {}",
            "PID",
            "NAME",
            "CPU%",
            "MEMORY",
            "STATUS",
            w = NAME_WIDTH
        ));

    for p in &list.processes {
        report.line(format!(
            "{:>8}  {:<w$}  {:>7.2}%  {:>9.2} MB  {}",
            p.pid,
            truncate(&p.name, NAME_WIDTH),
            p.cpu_percent,
            p.memory_mb,
            p.status,
            w = NAME_WIDTH
        ));
    }

    report.finish(&list.last_updated)
}
