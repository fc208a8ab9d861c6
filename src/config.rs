use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::actor::HOSTILE_CHANCE;
use crate::app_dirs::AppDirs;
use crate::game::{GameSettings, PauseMode, DEFAULT_FRAME_MS, MAX_FRAME_MS};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub frame_ms: u64,
    pub pause_mode: PauseMode,
    pub seed: Option<u64>,
    pub hostile_chance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_ms: DEFAULT_FRAME_MS,
            pause_mode: PauseMode::default(),
            seed: None,
            hostile_chance: HOSTILE_CHANCE,
        }
    }
}

impl From<&Config> for GameSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            // a zero frame interval would spin the loop and break the pop floor
            frame_ms: cfg.frame_ms.clamp(1, MAX_FRAME_MS),
            pause_mode: cfg.pause_mode,
            hostile_chance: cfg.hostile_chance.clamp(0.0, 1.0),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_load(&self) -> Result<Config, ConfigError> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice::<Config>(&bytes)?)
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing or unreadable config falls back to defaults
    fn load(&self) -> Config {
        match self.try_load() {
            Ok(cfg) => cfg,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => {
                warn!(path = %self.path.display(), "ignoring config: {e}");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
