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

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tarifflux_core::{CatalogError, CatalogResult, RawRateEntry, TariffCatalog, TariffProduct};
use tracing::{debug, error, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.octopus.energy/v1";

/// Connection settings for the Octopus Energy catalog
#[derive(Clone)]
pub struct OctopusConfig {
    pub base_url: String,
    /// Sent as the basic-auth username. Product endpoints are public, so
    /// this is optional.
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    /// Pages read from any paginated listing; 1 reads only the first page
    pub max_pages: usize,
}

impl Default for OctopusConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            request_timeout: Duration::from_secs(30),
            max_pages: 1,
        }
    }
}

impl fmt::Debug for OctopusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OctopusConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

/// One page of a paginated listing
#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    next: Option<String>,
}

/// Blocking Octopus Energy REST client
#[derive(Debug, Clone)]
pub struct OctopusClient {
    config: OctopusConfig,
    client: Client,
}

impl OctopusClient {
    pub fn new(mut config: OctopusConfig) -> CatalogResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("tarifflux/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::Config(format!("Failed to build HTTP client: {}", e)))?;

        config.base_url = config.base_url.trim_end_matches('/').to_owned();
        config.max_pages = config.max_pages.max(1);

        info!("Initializing Octopus catalog client: {}", config.base_url);
        Ok(Self { config, client })
    }

    fn products_url(&self) -> String {
        format!("{}/products/", self.config.base_url)
    }

    fn product_url(&self, code: &str) -> String {
        format!(
            "{}/products/{}/",
            self.config.base_url,
            urlencoding::encode(code)
        )
    }

    /// GET a JSON document, mapping status codes to catalog errors
    fn get_json(&self, url: &str) -> CatalogResult<Value> {
        debug!("🔍 [CATALOG] GET {}", url);

        let mut request = self.client.get(url);
        if let Some(key) = &self.config.api_key {
            request = request.basic_auth(key, None::<&str>);
        }

        let response = request.send().map_err(classify_error)?;

        match response.status() {
            status if status.is_success() => response
                .json::<Value>()
                .map_err(|e| CatalogError::InvalidResponse(format!("{}: {}", url, e))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!("❌ [CATALOG] Authentication failed for: {}", url);
                Err(CatalogError::Unauthorized)
            }
            StatusCode::NOT_FOUND => {
                warn!("⚠️ [CATALOG] Not found: {}", url);
                Err(CatalogError::NotFound(url.to_owned()))
            }
            status => {
                let message = response.text().unwrap_or_default();
                error!("❌ [CATALOG] Status {}: {}", status, message);
                Err(CatalogError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Collect `results` across pages, following `next` up to `max_pages`
    fn get_paginated(&self, url: &str) -> CatalogResult<Vec<Value>> {
        let mut results = Vec::new();
        let mut next = Some(url.to_owned());
        let mut pages = 0;

        while let Some(page_url) = next.take() {
            if pages >= self.config.max_pages {
                debug!("   Page limit {} reached, not following {}", pages, page_url);
                break;
            }

            let page: Page = serde_json::from_value(self.get_json(&page_url)?)?;
            pages += 1;
            results.extend(page.results);
            next = page.next;
        }

        Ok(results)
    }
}

/// Connection and timeout failures mean the catalog is unreachable; anything
/// else at transport level is reported as-is.
fn classify_error(e: reqwest::Error) -> CatalogError {
    if e.is_connect() || e.is_timeout() {
        CatalogError::Unreachable(e.to_string())
    } else {
        CatalogError::Transport(e.to_string())
    }
}

impl TariffCatalog for OctopusClient {
    fn list_products(&self) -> CatalogResult<Vec<TariffProduct>> {
        let results = self.get_paginated(&self.products_url())?;
        let total = results.len();

        let products: Vec<TariffProduct> = results
            .into_iter()
            .filter_map(|doc| match serde_json::from_value::<TariffProduct>(doc) {
                Ok(product) => Some(product),
                Err(e) => {
                    warn!("⚠️ [CATALOG] Skipping unreadable product entry: {}", e);
                    None
                }
            })
            .collect();

        info!("✅ [CATALOG] Listed {}/{} products", products.len(), total);
        Ok(products)
    }

    fn fetch_product_detail(&self, code: &str) -> CatalogResult<TariffProduct> {
        let doc = self.get_json(&self.product_url(code))?;
        serde_json::from_value(doc)
            .map_err(|e| CatalogError::InvalidResponse(format!("product {}: {}", code, e)))
    }

    fn fetch_linked_rates(&self, url: &str) -> CatalogResult<Vec<RawRateEntry>> {
        let entries: Vec<RawRateEntry> = self
            .get_paginated(url)?
            .iter()
            .map(RawRateEntry::from_json)
            .collect();

        debug!("   {} rate entries from {}", entries.len(), url);
        Ok(entries)
    }

    fn check_access(&self) -> CatalogResult<()> {
        info!("Testing catalog access...");
        self.get_json(&self.products_url()).map(|_| ())
    }

    fn name(&self) -> &str {
        "OctopusEnergy"
    }
}
