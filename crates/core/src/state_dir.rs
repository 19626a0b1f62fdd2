//! Where the client keeps its session, settings and logs

use crate::error::{CoreError, CoreResult};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const TOKEN_FILE: &str = "session.json";
const CONFIG_FILE: &str = "client.toml";

enum Layout {
    /// Everything below one directory (`--data-dir`, tests)
    Rooted(PathBuf),
    /// Per-platform config and data directories
    Platform(ProjectDirs),
    /// No home directory could be determined
    WorkingDir,
}

/// Application directories
///
/// With an override the tree is `<root>/config`, `<root>/data` and
/// `<root>/data/logs`. Otherwise the platform locations are used.
pub struct StateDir {
    layout: Layout,
}

impl StateDir {
    pub fn new() -> Self {
        let layout = match ProjectDirs::from("com", "Backoffice", "backoffice") {
            Some(dirs) => Layout::Platform(dirs),
            None => {
                warn!("No platform directories available, using the working directory");
                Layout::WorkingDir
            }
        };
        Self { layout }
    }

    pub fn with_override(path: impl Into<PathBuf>) -> Self {
        Self {
            layout: Layout::Rooted(path.into()),
        }
    }

    pub fn config_dir(&self) -> PathBuf {
        match &self.layout {
            Layout::Rooted(root) => root.join("config"),
            Layout::Platform(dirs) => dirs.config_dir().to_path_buf(),
            Layout::WorkingDir => PathBuf::from("./config"),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        match &self.layout {
            Layout::Rooted(root) => root.join("data"),
            Layout::Platform(dirs) => dirs.data_dir().to_path_buf(),
            Layout::WorkingDir => PathBuf::from("./data"),
        }
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    /// Persisted session tokens
    pub fn token_path(&self) -> PathBuf {
        self.data_dir().join(TOKEN_FILE)
    }

    /// Default settings file, picked up when no `--config` is given
    pub fn config_path(&self) -> PathBuf {
        self.config_dir().join(CONFIG_FILE)
    }

    pub fn create_directories(&self) -> CoreResult<()> {
        for dir in [self.config_dir(), self.data_dir(), self.logs_dir()] {
            ensure_dir(&dir)?;
        }
        debug!(
            config = %self.config_dir().display(),
            data = %self.data_dir().display(),
            "State directories ready"
        );
        Ok(())
    }
}

impl Default for StateDir {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_dir(dir: &Path) -> CoreResult<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| CoreError::io_error(format!("cannot create {}: {e}", dir.display())))
}
