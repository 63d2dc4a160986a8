use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn history_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("pust");
            Some(state_dir.join("log.csv"))
        } else {
            ProjectDirs::from("", "", "pust")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("log.csv"))
        }
    }
}
