//! JSON file storage for saved metric snapshots.
//!
//! Each key maps to `<data_dir>/<key>.json`. Writers hold an exclusive lock so a
//! concurrent reader never sees a partially written file from this process.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::{MonitorError, MonitorResult};

const FILE_EXTENSION: &str = "json";

/// Durable key-value store contract.
pub trait DataStorage {
    fn save<T: Serialize>(&self, key: &str, data: &T) -> MonitorResult<()>;
    fn load<T: DeserializeOwned>(&self, key: &str) -> MonitorResult<T>;
    fn delete(&self, key: &str) -> MonitorResult<()>;
    fn exists(&self, key: &str) -> bool;
}

/// One pretty-printed JSON file per key inside a data directory.
#[derive(Debug)]
pub struct JsonStore {
    data_dir: PathBuf,
    lock: RwLock<()>,
}

impl JsonStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    pub fn open(data_dir: impl AsRef<Path>) -> MonitorResult<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;
        tracing::debug!("JSON store opened at {}", data_dir.display());
        Ok(Self {
            data_dir,
            lock: RwLock::new(()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Keys of every `.json` file in the data directory, sorted.
    pub fn list_keys(&self) -> MonitorResult<Vec<String>> {
        let _guard = self.lock.read();
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn path_for(&self, key: &str) -> MonitorResult<PathBuf> {
        validate_key(key)?;
        Ok(self.data_dir.join(format!("{key}.{FILE_EXTENSION}")))
    }
}

impl DataStorage for JsonStore {
    fn save<T: Serialize>(&self, key: &str, data: &T) -> MonitorResult<()> {
        let path = self.path_for(key)?;
        let json = serde_json::to_vec_pretty(data)?;
        let _guard = self.lock.write();
        std::fs::write(&path, json)?;
        tracing::debug!("Saved {}", path.display());
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> MonitorResult<T> {
        let path = self.path_for(key)?;
        let _guard = self.lock.read();
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MonitorError::NotFound(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn delete(&self, key: &str) -> MonitorResult<()> {
        let path = self.path_for(key)?;
        let _guard = self.lock.write();
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, key: &str) -> bool {
        let Ok(path) = self.path_for(key) else {
            return false;
        };
        let _guard = self.lock.read();
        path.is_file()
    }
}

fn validate_key(key: &str) -> MonitorResult<()> {
    if key.is_empty()
        || key == "."
        || key.contains("..")
        || key.contains('/')
        || key.contains('\\')
        || key.contains('\0')
    {
        return Err(MonitorError::InvalidKey(key.to_string()));
    }
    Ok(())
}
