//! Configuration loading and resolution.

use std::path::PathBuf;

use crate::types::{Implementation, SERVER_NAME, SERVER_VERSION};

/// Environment variable naming the snapshot data directory.
pub const DATA_DIR_ENV: &str = "SYSTEM_MONITOR_DATA_DIR";

const DEFAULT_DATA_DIR: &str = "data";

/// Settings resolved from CLI flags and the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub data_dir: PathBuf,
    pub cache_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cache_enabled: true,
        }
    }
}

impl ServerConfig {
    pub fn server_info(&self) -> Implementation {
        Implementation {
            name: self.name.clone(),
            version: self.version.clone(),
        }
    }
}

/// Resolve the snapshot directory: explicit flag, then `SYSTEM_MONITOR_DATA_DIR`, then `./data`.
pub fn resolve_data_dir(explicit: Option<&str>) -> PathBuf {
    resolve_data_dir_with(explicit, std::env::var(DATA_DIR_ENV).ok())
}

fn resolve_data_dir_with(explicit: Option<&str>, env: Option<String>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    match env {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_DATA_DIR),
    }
}
