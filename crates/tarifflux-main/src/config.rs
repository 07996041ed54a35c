// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of TariffLux.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use anyhow::{Context, Result, anyhow, bail};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tarifflux_core::{ScanOptions, TariffGroup};
use tarifflux_octopus::{DEFAULT_BASE_URL, OctopusConfig};
use tracing::info;

/// Config file read from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "tarifflux.toml";

/// Environment fallback for `catalog.api_key`
pub const API_KEY_ENV: &str = "OCTOPUS_API_KEY";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

#[derive(Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanSettings {
    #[serde(default)]
    pub products: Vec<String>,
    /// 0 means no limit
    #[serde(default)]
    pub max_products: usize,
    #[serde(default = "default_tariff_groups")]
    pub tariff_groups: Vec<TariffGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_pages() -> usize {
    1
}

fn default_tariff_groups() -> Vec<TariffGroup> {
    vec![TariffGroup::SingleRegisterElectricity]
}

fn default_timezone() -> String {
    "UTC".to_owned()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
            max_pages: default_max_pages(),
        }
    }
}

impl std::fmt::Debug for CatalogSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            max_products: 0,
            tariff_groups: default_tariff_groups(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            format: OutputFormat::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else `tarifflux.toml` when present, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            info!("📋 Loading configuration from {}", path.display());
            return Self::from_file(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_PATH);
        if fallback.exists() {
            info!("📋 Loading configuration from {}", fallback.display());
            return Self::from_file(fallback);
        }

        info!("📋 No configuration file found, using defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.catalog.base_url.starts_with("http://")
            && !self.catalog.base_url.starts_with("https://")
        {
            bail!("catalog.base_url must be an http(s) URL");
        }
        if self.catalog.request_timeout_secs == 0 {
            bail!("catalog.request_timeout_secs must be greater than 0");
        }
        if self.catalog.max_pages == 0 {
            bail!("catalog.max_pages must be at least 1");
        }
        if self.scan.tariff_groups.is_empty() {
            bail!("scan.tariff_groups must contain at least one group");
        }
        self.timezone()?;
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.report
            .timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid report.timezone '{}': {}", self.report.timezone, e))
    }

    /// Config value first, then the environment
    pub fn api_key(&self) -> Option<String> {
        self.catalog
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn octopus_config(&self) -> OctopusConfig {
        OctopusConfig {
            base_url: self.catalog.base_url.clone(),
            api_key: self.api_key(),
            request_timeout: Duration::from_secs(self.catalog.request_timeout_secs),
            max_pages: self.catalog.max_pages,
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            products: self.scan.products.clone(),
            max_products: (self.scan.max_products > 0).then_some(self.scan.max_products),
        }
    }
}
