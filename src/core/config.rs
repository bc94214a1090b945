use crate::core::valuation::DEFAULT_YEARLY_RATE;
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// fjall keyspace under the data directory
    #[default]
    Disk,
    /// Kept only for the lifetime of the process
    Memory,
}

fn default_currency() -> String {
    "SGD".to_string()
}

fn default_yearly_rate() -> f64 {
    DEFAULT_YEARLY_RATE
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Display label for amounts; no conversion is ever done.
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_yearly_rate")]
    pub yearly_rate: f64,
    /// Market price per gram used when `summary` is run without `--price`.
    #[serde(default)]
    pub default_price: Option<f64>,
    #[serde(default)]
    pub access_pin: Option<String>,
    #[serde(default)]
    pub storage: StorageBackend,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: default_currency(),
            yearly_rate: default_yearly_rate(),
            default_price: None,
            access_pin: None,
            storage: StorageBackend::default(),
            data_path: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
            .context("Run `aurum setup` to create a default configuration")
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "aurum")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("", "", "aurum")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.yearly_rate.is_finite() || self.yearly_rate < 0.0 {
            bail!(
                "yearly_rate must be a non-negative number, got {}",
                self.yearly_rate
            );
        }
        if let Some(price) = self.default_price {
            if !price.is_finite() || price < 0.0 {
                bail!("default_price must be a non-negative number, got {price}");
            }
        }
        Ok(())
    }
}
