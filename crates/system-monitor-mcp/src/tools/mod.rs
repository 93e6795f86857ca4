//! MCP tool implementations.
//!
//! Every tool is a synchronous unit of work behind the [`Tool`] trait. Tools
//! that sample the operating system share one [`MetricCache`] and decide their
//! own cache keys and TTLs.

pub mod cpu_info;
pub mod disk_info;
pub mod memory_info;
pub mod network_stats;
pub mod registry;
pub mod system_overview;
pub mod top_processes;

mod render;

use std::time::Duration;

use serde_json::Value;
use system_monitor::{
    CpuInfo, DiskInfo, MemoryInfo, MonitorError, MonitorResult, NetworkInfo, ProcessList,
    SystemInfo, TtlCache,
};

use crate::types::{Arguments, InputSchema, ToolDefinition};

pub use cpu_info::CpuInfoTool;
pub use disk_info::DiskInfoTool;
pub use memory_info::MemoryInfoTool;
pub use network_stats::NetworkStatsTool;
pub use registry::ToolRegistry;
pub use system_overview::SystemOverviewTool;
pub use top_processes::TopProcessesTool;

/// Why a tool call failed. Reported to the client as flagged content.
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    #[error("{0}")]
    Collect(#[from] MonitorError),

    #[error("{0}")]
    Failed(String),
}

/// A named, independently invokable unit of work with a declared input schema.
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn input_schema(&self) -> InputSchema;

    /// Run the tool. Blocking; callers off the async runtime should use
    /// `spawn_blocking`.
    fn execute(&self, args: &Arguments) -> Result<String, ToolError>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// A cached collector result.
#[derive(Debug, Clone)]
pub enum Snapshot {
    Cpu(CpuInfo),
    Memory(MemoryInfo),
    Processes(ProcessList),
    Network(NetworkInfo),
    Disk(DiskInfo),
    System(SystemInfo),
}

/// The cache shared by all metric tools.
pub type MetricCache = TtlCache<Snapshot>;

/// Conversion between a collector result and its [`Snapshot`] variant.
pub(crate) trait Cached: Clone + Sized {
    fn into_snapshot(self) -> Snapshot;
    fn from_snapshot(snapshot: Snapshot) -> Option<Self>;
}

macro_rules! impl_cached {
    ($ty:ty, $variant:ident) => {
        impl Cached for $ty {
            fn into_snapshot(self) -> Snapshot {
                Snapshot::$variant(self)
            }

            fn from_snapshot(snapshot: Snapshot) -> Option<Self> {
                match snapshot {
                    Snapshot::$variant(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

impl_cached!(CpuInfo, Cpu);
impl_cached!(MemoryInfo, Memory);
impl_cached!(ProcessList, Processes);
impl_cached!(NetworkInfo, Network);
impl_cached!(DiskInfo, Disk);
impl_cached!(SystemInfo, System);

/// Serve `key` from the cache when allowed, otherwise collect and store.
///
/// A successful collection always refreshes the entry, even when the caller
/// asked not to read from the cache.
pub(crate) fn cached_or_collect<T: Cached>(
    cache: Option<&MetricCache>,
    key: &str,
    ttl: Duration,
    use_cache: bool,
    collect: impl FnOnce() -> MonitorResult<T>,
) -> Result<T, ToolError> {
    if use_cache {
        if let Some(hit) = cache.and_then(|c| c.get(key)).and_then(T::from_snapshot) {
            tracing::debug!("Cache hit: {key}");
            return Ok(hit);
        }
        tracing::debug!("Cache miss: {key}");
    }

    let value = collect()?;
    if let Some(cache) = cache {
        cache.set(key, value.clone().into_snapshot(), ttl);
    }
    Ok(value)
}

/// String form of argument `name`, or `default` when absent or null.
///
/// Booleans and numbers are accepted and rendered with their JSON text.
pub(crate) fn str_arg(args: &Arguments, name: &str, default: &str) -> String {
    match args.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

/// `true` only when the argument is exactly `"true"` (or JSON `true`).
pub(crate) fn flag_arg(args: &Arguments, name: &str) -> bool {
    str_arg(args, name, "false") == "true"
}

/// `use_cache` argument, shared by every metric tool.
pub(crate) fn use_cache(args: &Arguments) -> bool {
    flag_arg(args, "use_cache")
}
