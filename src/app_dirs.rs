use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/flick`, or the platform data dir without `$HOME`
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join("flick"))
        } else {
            ProjectDirs::from("", "", "flick").map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "flick")
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("flick_config.json"))
    }

    pub fn scores_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("scores.csv"))
            .unwrap_or_else(|| PathBuf::from("scores.csv"))
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("flick.log"))
            .unwrap_or_else(|| PathBuf::from("flick.log"))
    }
}
