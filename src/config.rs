//! Application configuration loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `HAPPINESS_CONFIG` environment variable (path to a TOML file)
//! 2. `happiness.toml` in the current working directory
//! 3. Built-in defaults
//!
//! Baseline tables given in the file replace the built-in tables wholesale;
//! an omitted table keeps its default.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::baseline::{default_product_ids, default_yesterday_scores, StaticBaselines};
use crate::error::ConfigError;
use crate::happiness::{MAX_SCORE, MIN_SCORE};

pub const CONFIG_ENV_VAR: &str = "HAPPINESS_CONFIG";
pub const LOCAL_CONFIG_FILE: &str = "happiness.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub chi: ChiConfig,

    #[serde(default)]
    pub baselines: BaselineConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Feedback fixture to score; the bundled fixture is used when unset.
    #[serde(default)]
    pub fixture: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChiConfig {
    #[serde(default = "default_chi_base_url")]
    pub base_url: String,

    #[serde(default = "default_chi_timeout_secs")]
    pub timeout_secs: u64,

    /// Product ids the CHI service tracks; other mapped ids are local only.
    #[serde(default = "default_chi_product_ids")]
    pub product_ids: Vec<i64>,
}

fn default_chi_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_chi_timeout_secs() -> u64 {
    30
}

fn default_chi_product_ids() -> Vec<i64> {
    vec![1, 2, 3]
}

impl Default for ChiConfig {
    fn default() -> Self {
        Self {
            base_url: default_chi_base_url(),
            timeout_secs: default_chi_timeout_secs(),
            product_ids: default_chi_product_ids(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaselineConfig {
    /// Prior-period score per product name.
    #[serde(default = "default_yesterday_scores")]
    pub yesterday: HashMap<String, i64>,

    /// External CHI product id per product name.
    #[serde(default = "default_product_ids")]
    pub product_ids: HashMap<String, i64>,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            yesterday: default_yesterday_scores(),
            product_ids: default_product_ids(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "loaded config from {CONFIG_ENV_VAR}");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "failed to load config from {CONFIG_ENV_VAR}, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{CONFIG_ENV_VAR} points to a missing file, falling back");
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("loaded config from ./{LOCAL_CONFIG_FILE}");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "failed to load ./{LOCAL_CONFIG_FILE}, using defaults");
                }
            }
        }

        info!("no config file found, using built-in defaults");
        Self::default()
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        for (product, score) in &self.baselines.yesterday {
            if !(MIN_SCORE..=MAX_SCORE).contains(score) {
                errors.push(format!(
                    "baselines.yesterday.\"{product}\" = {score} is outside {MIN_SCORE}..={MAX_SCORE}"
                ));
            }
        }
        for (product, id) in &self.baselines.product_ids {
            if *id <= 0 {
                errors.push(format!(
                    "baselines.product_ids.\"{product}\" = {id} must be positive"
                ));
            }
        }
        if self.chi.base_url.trim().is_empty() {
            errors.push("chi.base_url must not be empty".to_string());
        }
        for id in &self.chi.product_ids {
            if *id <= 0 {
                errors.push(format!("chi.product_ids entry {id} must be positive"));
            }
        }
        if self.chi.timeout_secs == 0 {
            errors.push("chi.timeout_secs must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            errors.sort();
            Err(ConfigError::Validation(errors))
        }
    }

    pub fn baselines(&self) -> StaticBaselines {
        StaticBaselines::new(
            self.baselines.yesterday.clone(),
            self.baselines.product_ids.clone(),
        )
    }
}
