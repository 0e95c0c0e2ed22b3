//! Configuration module
//!
//! Split into submodules for reduced complexity.

mod openers;
mod saved;

use std::path::{Path, PathBuf};

pub use openers::Openers;
pub use saved::SavedSettings;

use prefer::Config as PreferConfig;
use tracing::Level;

use crate::error::FsError;
use crate::trash::TrashStore;

/// Values read once at startup
#[derive(Clone, Debug)]
pub struct Settings {
    pub show_hidden: bool,
    pub start_in_cwd: bool,
    pub trash_dir: Option<PathBuf>,
    pub log_level: Level,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_hidden: false,
            start_in_cwd: true,
            trash_dir: None,
            log_level: Level::INFO,
        }
    }
}

impl Settings {
    pub fn trash_store(&self) -> Result<TrashStore, FsError> {
        match &self.trash_dir {
            Some(dir) => Ok(TrashStore::new(dir)),
            None => TrashStore::at_default_location(),
        }
    }

    /// Directory to open when no path was given on the command line
    pub fn start_dir(&self) -> Option<PathBuf> {
        if self.start_in_cwd {
            std::env::current_dir().ok()
        } else {
            dirs::home_dir()
        }
    }
}

pub struct Config {
    inner: Option<PreferConfig>,
}

impl Config {
    pub async fn load() -> prefer::Result<Self> {
        let inner = prefer::load("fmcore/config").await?;
        Ok(Self { inner: Some(inner) })
    }

    /// Config without a backing file, every key takes its default
    pub fn empty() -> Self {
        Self { inner: None }
    }

    async fn get_bool(&self, key: &str) -> Option<bool> {
        let inner = self.inner.as_ref()?;
        inner
            .get(key)
            .await
            .ok()
            .and_then(|v: prefer::ConfigValue| v.as_bool())
    }

    async fn get_str(&self, key: &str) -> Option<String> {
        let inner = self.inner.as_ref()?;
        inner
            .get(key)
            .await
            .ok()
            .and_then(|v: prefer::ConfigValue| v.as_str().map(|s| s.to_string()))
    }

    pub async fn show_hidden(&self) -> bool {
        self.get_bool("show_hidden").await.unwrap_or(false)
    }

    pub async fn start_in_cwd(&self) -> bool {
        self.get_bool("start_in_cwd").await.unwrap_or(true)
    }

    pub async fn trash_dir(&self) -> Option<PathBuf> {
        self.get_str("trash_dir")
            .await
            .filter(|s| !s.is_empty())
            .map(|s| expand_home(&s))
    }

    pub async fn log_level(&self) -> Level {
        self.get_str("log_level")
            .await
            .and_then(|s| s.parse().ok())
            .unwrap_or(Level::INFO)
    }

    pub async fn settings(&self) -> Settings {
        Settings {
            show_hidden: self.show_hidden().await,
            start_in_cwd: self.start_in_cwd().await,
            trash_dir: self.trash_dir().await,
            log_level: self.log_level().await,
        }
    }
}

/// Expand a leading `~/` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if path == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        _ => Path::new(path).to_path_buf(),
    }
}
