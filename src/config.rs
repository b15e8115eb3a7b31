use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

/// Persisted user configuration. Every field is optional; an absent remote
/// url or key simply leaves the hosted leaderboard disabled.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub remote_url: Option<String>,
    pub remote_key: Option<String>,
    pub scores_path: Option<PathBuf>,
}

/// Connection details for the hosted leaderboard table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub anon_key: String,
}

impl Config {
    /// Remote mode is on only when both the url and the key are non-empty.
    pub fn remote(&self) -> Option<RemoteConfig> {
        let base_url = non_blank(self.remote_url.as_deref())?;
        let anon_key = non_blank(self.remote_key.as_deref())?;
        Some(RemoteConfig { base_url, anon_key })
    }

    pub fn scores_path(&self) -> PathBuf {
        self.scores_path
            .clone()
            .unwrap_or_else(AppDirs::scores_path)
    }

    /// Layers explicitly given values over this config.
    pub fn merged(
        mut self,
        remote_url: Option<String>,
        remote_key: Option<String>,
        scores_path: Option<PathBuf>,
    ) -> Self {
        if remote_url.is_some() {
            self.remote_url = remote_url;
        }
        if remote_key.is_some() {
            self.remote_key = remote_key;
        }
        if scores_path.is_some() {
            self.scores_path = scores_path;
        }
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
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

    pub fn path(&self) -> &Path {
        &self.path
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
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("ignoring malformed config {}: {e}", self.path.display()),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
