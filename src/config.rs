use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::session::SessionConfig;

/// User settings persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub field_width: u32,
    pub field_height: u32,
    pub target_size: u32,
    pub countdown: u32,
    pub duration_secs: f64,
    pub leaderboard_limit: usize,
    pub player_name: String,
    /// Defaults to `scores.csv` in the state directory
    pub scores_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            field_width: session.field_width,
            field_height: session.field_height,
            target_size: session.target_size,
            countdown: session.countdown,
            duration_secs: session.duration_secs,
            leaderboard_limit: session.leaderboard_limit,
            player_name: session.player_name,
            scores_path: None,
        }
    }
}

impl Config {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            field_width: self.field_width,
            field_height: self.field_height,
            target_size: self.target_size,
            countdown: self.countdown,
            duration_secs: self.duration_secs,
            player_name: self.player_name.clone(),
            leaderboard_limit: self.leaderboard_limit,
        }
    }

    pub fn scores_path(&self) -> PathBuf {
        self.scores_path.clone().unwrap_or_else(AppDirs::scores_path)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
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
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring malformed config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
