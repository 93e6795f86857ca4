//! System monitor: metric collectors, TTL cache, and JSON snapshot storage.

pub mod cache;
pub mod cpu;
pub mod disk;
pub mod format;
pub mod memory;
pub mod network;
pub mod process;
pub mod snapshot;
pub mod storage;
pub mod system;
pub mod types;

pub use cache::{SweepHandle, TtlCache, DEFAULT_SWEEP_INTERVAL};
pub use cpu::collect_cpu;
pub use disk::collect_disks;
pub use memory::collect_memory;
pub use network::collect_network;
pub use process::{collect_top_processes, ProcessSort};
pub use snapshot::collect_snapshot;
pub use storage::{DataStorage, JsonStore};
pub use system::collect_system;
pub use types::*;
