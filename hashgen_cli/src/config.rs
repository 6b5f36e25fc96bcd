use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use hashgen_core::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory under the platform config dir holding `config.toml`
const APP_CONFIG_DIR: &str = "hashgen";

/// Prefix for environment overrides, e.g. `HASHGEN_ENGINE__BATCH_SIZE`
const ENV_PREFIX: &str = "HASHGEN_";

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Bulk output format used when `--output` is not given
    pub default_format: String,
    pub color_enabled: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "text".to_string(),
            color_enabled: true,
        }
    }
}

impl AppConfig {
    /// Apply CLI argument overrides to the configuration
    pub fn apply_cli_overrides(&mut self, workers: Option<usize>, batch_size: Option<usize>) {
        if let Some(workers) = workers {
            self.engine.worker_count = Some(workers);
        }
        if let Some(batch_size) = batch_size {
            self.engine.batch_size = batch_size;
        }
    }
}

/// Configuration manager that handles XDG-compliant paths and layered configuration
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new ConfigManager with default XDG-compliant paths
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a ConfigManager with a specific path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn get_config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    fn default_config_path() -> PathBuf {
        #[cfg(not(target_os = "windows"))]
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config.is_empty()
        {
            return PathBuf::from(xdg_config)
                .join(APP_CONFIG_DIR)
                .join("config.toml");
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_CONFIG_DIR)
            .join("config.toml")
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    ///
    /// CLI flags are applied afterwards with [`AppConfig::apply_cli_overrides`].
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new();

        // Layer 1: Defaults
        figment = figment.merge(Serialized::defaults(AppConfig::default()));

        // Layer 2: Config file (if exists)
        if self.config_path.exists() {
            log::debug!("Loading configuration from {}", self.config_path.display());
            figment = figment.merge(Toml::file(&self.config_path));
        }

        // Layer 3: Environment variables
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().context("Failed to load configuration")
    }

    /// Render the effective configuration as TOML
    pub fn show(&self) -> Result<String> {
        let config = self.load()?;
        toml::to_string_pretty(&config).context("Failed to serialize configuration")
    }
}

/// Load the configuration from the default location
pub fn get_config() -> Result<AppConfig> {
    ConfigManager::new().load()
}
