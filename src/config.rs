use std::path::{Path, PathBuf};

use color_eyre::eyre::{bail, Result, WrapErr};
use serde::Deserialize;

pub const APP_NAME: &str = "datebook";

/// Contents of `config.toml`. Every section is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding the events file. Defaults to the platform data dir.
    pub dir: Option<PathBuf>,
    /// Storage key; the collection is saved as `<key>.json`.
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_key(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    /// Filter level used when neither `-v` nor `RUST_LOG` is given.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: default_level(),
        }
    }
}

fn default_key() -> String {
    "events".to_string()
}

fn default_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load from `path`, or from the default location when `path` is `None`.
    ///
    /// A missing default file yields the defaults. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content).wrap_err_with(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let key = self.storage.key.trim();
        if key.is_empty() {
            bail!("storage.key must not be empty");
        }
        if key.contains(['/', '\\']) || key == "." || key == ".." {
            bail!("storage.key '{}' must be a plain name, not a path", key);
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_NAME)))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn log_file(&self) -> PathBuf {
        self.log
            .file
            .clone()
            .unwrap_or_else(|| self.data_dir().join(format!("{}.log", APP_NAME)))
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME).join("config.toml"))
}
