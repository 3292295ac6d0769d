//! Configuration loading from TOML.
//!
//! Every section is optional: an absent section (or an absent file, via
//! `load_or_default`) falls back to the strategy defaults, which match
//! the competition submissions the strategies were tuned on. The
//! per-strategy config structs live beside their strategies.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::strategy::band::BandConfig;
use crate::strategy::basket::BasketConfig;
use crate::strategy::carry::CarryConfig;
use crate::strategy::meanrev::MeanReversionConfig;

/// Env var naming an alternative config file path.
pub const CONFIG_PATH_ENV: &str = "LAGOON_CONFIG";
/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub trader: TraderConfig,
    pub basket: BasketConfig,
    pub mean_reversion: MeanReversionConfig,
    pub band: BandConfig,
    pub carry: CarryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TraderConfig {
    /// Which trader the binary runs: `basket_arbitrage`, `mean_reversion`,
    /// `band`, `carry`, or `composite`.
    pub strategy: String,
}

impl Default for TraderConfig {
    fn default() -> Self {
        Self { strategy: "composite".into() }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load configuration, treating a missing file as all-defaults.
    /// A present-but-malformed file is still an error.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Config file path from `LAGOON_CONFIG`, else the default.
    pub fn path_from_env() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into())
    }
}
