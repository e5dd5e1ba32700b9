use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::{zlog_debug, Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_true")]
    pub dark_mode: bool,
    #[serde(default = "default_true")]
    pub sound: bool,
    /// Where widget blobs live. Defaults to `~/.gizmo/data`.
    pub data_dir: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dark_mode: true,
            sound: true,
            data_dir: None,
        }
    }
}

impl Config {
    pub fn gizmo_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".gizmo"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::gizmo_dir()?.join("gizmo.toml"))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(expand_tilde(dir)),
            None => Ok(Self::gizmo_dir()?.join("data")),
        }
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        zlog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            zlog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(&path)?)?;
        zlog_debug!(
            "Config loaded: dark_mode={}, sound={}, data_dir={:?}",
            config.dark_mode,
            config.sound,
            config.data_dir
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let dir = Self::gizmo_dir()?;
        if !dir.exists() {
            zlog_debug!("Creating gizmo directory: {}", dir.display());
            fs::create_dir_all(&dir)?;
        }
        let path = Self::config_path()?;
        fs::write(&path, toml::to_string_pretty(self)?)?;
        zlog_debug!("Config saved to {}", path.display());
        Ok(())
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
