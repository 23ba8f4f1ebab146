use anyhow::{Context, Result};
use directories::ProjectDirs;
use emojify_vision::{Thresholds, DEFAULT_SCALE_FACTOR};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "emojify")
}

pub static CONFIG_PATH: Lazy<PathBuf> = Lazy::new(|| match option_env!("EMOJIFY_CONFIG_PATH") {
    Some(path) => PathBuf::from(path),
    None => project_dirs()
        .map(|d| d.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("/usr/local/etc/emojify/config.toml")),
});

pub static ASSETS_DIR: Lazy<PathBuf> = Lazy::new(|| match option_env!("EMOJIFY_ASSETS_DIR") {
    Some(path) => PathBuf::from(path),
    None => project_dirs()
        .map(|d| d.data_dir().join("overlays"))
        .unwrap_or_else(|| PathBuf::from("/usr/local/share/emojify/overlays")),
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub smiling: f32,
    pub left_eye_open: f32,
    pub right_eye_open: f32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        let t = Thresholds::default();
        Self {
            smiling: t.smiling,
            left_eye_open: t.left_eye_open,
            right_eye_open: t.right_eye_open,
        }
    }
}

impl From<&ThresholdConfig> for Thresholds {
    fn from(cfg: &ThresholdConfig) -> Self {
        Thresholds {
            smiling: cfg.smiling,
            left_eye_open: cfg.left_eye_open,
            right_eye_open: cfg.right_eye_open,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scale_factor: f32,
    pub assets_dir: PathBuf,
    pub thresholds: ThresholdConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            assets_dir: ASSETS_DIR.clone(),
            thresholds: ThresholdConfig::default(),
        }
    }
}

impl Config {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::from(&self.thresholds)
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path.unwrap_or(&CONFIG_PATH);
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config at {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<()> {
    let path = path.unwrap_or(&CONFIG_PATH);
    let data = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, data)?;
    Ok(())
}
