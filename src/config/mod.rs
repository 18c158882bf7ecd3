//! Configuration management for Folio

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scroll animation speed multiplier (1.0 = normal, 0.0 = instant)
    pub animation_speed: f32,

    /// Vim mode enabled
    pub vim_mode: bool,

    /// Terminal width below which the sidebar overlays the content
    pub sidebar_breakpoint: u16,

    /// Show the sidebar at startup
    pub sidebar_open: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { animation_speed: 1.0, vim_mode: true, sidebar_breakpoint: 100, sidebar_open: true }
    }
}

impl Config {
    /// Read `config.json`, writing the defaults out on first run
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Read a config file at `path`, creating it with defaults if absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        serde_json::from_str(&contents).with_context(|| format!("Failed to parse {:?}", path))
    }

    /// Write the config as pretty JSON to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {:?}", dir))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write config to {:?}", path))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "folio").context("Failed to determine home directory")
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.json"))
    }

    /// Where the key-value store and log live
    pub fn data_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    pub fn store_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("storage.json"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("folio.log"))
    }

    /// Lines to move on one animation tick when `distance` lines remain
    pub fn scroll_step(&self, distance: usize) -> usize {
        if self.animation_speed <= 0.0 {
            return distance;
        }
        let step = (distance as f32 * 0.25 * self.animation_speed).ceil() as usize;
        step.clamp(1, distance.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_open_sidebar_in_vim_mode() {
        let config = Config::default();
        assert!(config.sidebar_open);
        assert!(config.vim_mode);
        assert_eq!(config.sidebar_breakpoint, 100);
    }

    #[test]
    fn first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.sidebar_breakpoint, 100);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"animation_speed":0.5,"vim_mode":false}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.animation_speed, 0.5);
        assert!(!config.vim_mode);
        assert!(config.sidebar_open);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn saved_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config { sidebar_breakpoint: 80, ..Default::default() };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().sidebar_breakpoint, 80);
    }

    #[test]
    fn zero_speed_scrolls_instantly() {
        let config = Config { animation_speed: 0.0, ..Default::default() };
        assert_eq!(config.scroll_step(40), 40);
    }

    #[test]
    fn scroll_step_is_at_least_one_line() {
        let config = Config::default();
        assert_eq!(config.scroll_step(1), 1);
        assert_eq!(config.scroll_step(40), 10);
    }
}
