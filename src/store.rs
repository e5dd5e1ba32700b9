//! Flat key-value persistence for widget blobs.
//!
//! Each key maps to `<dir>/<key>.json`. Blobs are read and written wholesale;
//! the last write wins. Reads never fail: a missing or unparsable blob falls
//! back to `T::default()`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{zlog_debug, zlog_warn, Error, Result};

#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::Validation(format!("invalid store key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Best-effort read of a blob.
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                zlog_debug!("Store::load key={} not found, using defaults", key);
                T::default()
            }
            Err(e) => {
                zlog_warn!("Store::load key={} unreadable, using defaults: {}", key, e);
                T::default()
            }
        }
    }

    fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Write a blob through a temp file so readers never see half a file.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.path_for(key)?;
        if !self.dir.exists() {
            zlog_debug!("Creating store directory: {}", self.dir.display());
            fs::create_dir_all(&self.dir)?;
        }

        let contents = serde_json::to_string_pretty(value)?;
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, &contents)?;
        fs::rename(&temp_path, &path)?;
        zlog_debug!("Store::save key={} bytes={}", key, contents.len());
        Ok(())
    }
}
