use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use neo_common::{DateRange, FilterMode, SortKey};

use crate::model::neo::api_client::DEFAULT_BASE_URL;
use crate::model::neo::ViewParams;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeoConfig {
    #[serde(default = "default_api_key")]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub date_range: DateRange,

    #[serde(default)]
    pub filter: FilterMode,

    #[serde(default)]
    pub sort: SortKey,

    /// Object to look up after the feed is loaded
    #[serde(default)]
    pub lookup_id: Option<String>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_api_key() -> String {
    "DEMO_KEY".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for NeoConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            date_range: DateRange::default(),
            filter: FilterMode::default(),
            sort: SortKey::default(),
            lookup_id: None,
            log_level: default_log_level(),
            log_dir: default_log_dir(),
        }
    }
}

impl NeoConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: NeoConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn view_params(&self) -> ViewParams {
        ViewParams {
            date_range: self.date_range,
            filter: self.filter,
            sort: self.sort,
        }
    }
}

pub static CONFIG: OnceLock<NeoConfig> = OnceLock::new();

/// Load `path` into [`CONFIG`]; a missing file yields the defaults.
pub fn read_config(path: impl AsRef<Path>) -> anyhow::Result<&'static NeoConfig> {
    let path = path.as_ref();
    let config = if path.exists() {
        NeoConfig::from_file(path)?
    } else {
        tracing::warn!("Config file {} not found, using defaults", path.display());
        NeoConfig::default()
    };

    Ok(CONFIG.get_or_init(|| config))
}
