use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::SessionConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub inhale_secs: u64,
    pub exhale_secs: u64,
    pub sound: bool,
    pub time_limit_mins: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inhale_secs: 4,
            exhale_secs: 6,
            sound: false,
            time_limit_mins: None,
        }
    }
}

impl Config {
    /// A hand-edited file may carry zero durations the cycle math cannot
    /// take; fall back to the defaults for those fields.
    pub fn sanitized(mut self) -> Self {
        if self.inhale_secs == 0 {
            self.inhale_secs = 4;
        }
        if self.exhale_secs == 0 {
            self.exhale_secs = 6;
        }
        self
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            inhale_secs: self.inhale_secs,
            exhale_secs: self.exhale_secs,
            time_limit_mins: self.time_limit_mins,
        }
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
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "pust") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("pust_config.json")
        };
        Self { path }
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
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg.sanitized();
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
