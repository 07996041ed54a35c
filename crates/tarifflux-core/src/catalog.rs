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

use tarifflux_types::{RawRateEntry, TariffProduct};
use thiserror::Error;

/// Tariff catalog error types
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Authentication failed")]
    Unauthorized,

    #[error("Catalog unreachable: {0}")]
    Unreachable(String),

    #[error("Catalog returned error status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// Authentication and connectivity failures affect every product, so a
    /// scan stops on them instead of repeating the same failure per product.
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Unreachable(_))
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Source of tariff product documents and linked rate listings.
///
/// All calls are blocking; a run issues them strictly one after another.
pub trait TariffCatalog {
    /// List every product currently offered
    fn list_products(&self) -> CatalogResult<Vec<TariffProduct>>;

    /// Fetch one product including its register groups
    fn fetch_product_detail(&self, code: &str) -> CatalogResult<TariffProduct>;

    /// Fetch the entries behind a `standard_unit_rates` link
    fn fetch_linked_rates(&self, url: &str) -> CatalogResult<Vec<RawRateEntry>>;

    /// Probe access once before a run
    fn check_access(&self) -> CatalogResult<()>;

    /// Get catalog name for logging
    fn name(&self) -> &str;
}
