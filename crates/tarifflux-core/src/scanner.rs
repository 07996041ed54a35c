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

use crate::catalog::{CatalogResult, TariffCatalog};
use crate::normalizer::RateRecordNormalizer;
use crate::selector::LatestWindowSelector;
use crate::summary::summarize;
use chrono::{DateTime, Utc};
use tarifflux_types::{ProductOutcome, ProductReport, TariffProduct};
use tracing::{info, warn};

/// Which products one run covers
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Explicit product codes, fetched directly in this order. Empty means
    /// every product from the catalog listing.
    pub products: Vec<String>,

    pub max_products: Option<usize>,
}

/// Runs one synchronous snapshot over the catalog
#[derive(Debug)]
pub struct CatalogScanner<'a, C: TariffCatalog> {
    catalog: &'a C,
    normalizer: RateRecordNormalizer,
    selector: LatestWindowSelector,
    options: ScanOptions,
}

impl<'a, C: TariffCatalog> CatalogScanner<'a, C> {
    pub fn new(
        catalog: &'a C,
        normalizer: RateRecordNormalizer,
        selector: LatestWindowSelector,
        options: ScanOptions,
    ) -> Self {
        Self {
            catalog,
            normalizer,
            selector,
            options,
        }
    }

    /// Scan every selected product in catalog order.
    ///
    /// Only authentication and connectivity failures end the run; any other
    /// per-product failure is recorded on that product's report.
    pub fn scan(&self, now: DateTime<Utc>) -> CatalogResult<Vec<ProductReport>> {
        let candidates = self.candidates()?;
        info!(
            "🔍 [SCAN] Scanning {} products from {}",
            candidates.len(),
            self.catalog.name()
        );

        let mut reports = Vec::with_capacity(candidates.len());
        for (code, listed) in &candidates {
            let report = match self.catalog.fetch_product_detail(code) {
                Ok(detail) => self.scan_product(&detail, now),
                Err(e) if e.is_fatal_for_run() => return Err(e),
                Err(e) => {
                    warn!("⚠️ [SCAN] Failed to fetch product {}: {}", code, e);
                    let outcome = ProductOutcome::FetchFailed {
                        reason: e.to_string(),
                    };
                    match listed {
                        Some(product) => report_for(product, outcome),
                        None => ProductReport {
                            code: code.clone(),
                            display_name: code.clone(),
                            description: None,
                            available_from: None,
                            available_to: None,
                            outcome,
                        },
                    }
                }
            };
            reports.push(report);
        }

        let summarized = reports.iter().filter(|r| r.summary().is_some()).count();
        info!(
            "✅ [SCAN] {}/{} products have rate information",
            summarized,
            reports.len()
        );
        Ok(reports)
    }

    /// Normalize and summarize one already-fetched product
    pub fn scan_product(&self, product: &TariffProduct, now: DateTime<Utc>) -> ProductReport {
        let normalized = self.normalizer.normalize(product, self.catalog, now);

        let outcome = match summarize(&normalized.windows, &self.selector) {
            Some(summary) => ProductOutcome::Summarized(summary),
            None => ProductOutcome::NoRates,
        };
        report_for(product, outcome)
    }

    fn candidates(&self) -> CatalogResult<Vec<(String, Option<TariffProduct>)>> {
        let limit = self.options.max_products.unwrap_or(usize::MAX);

        if !self.options.products.is_empty() {
            return Ok(self
                .options
                .products
                .iter()
                .take(limit)
                .map(|code| (code.clone(), None))
                .collect());
        }

        let listed = self.catalog.list_products()?;
        Ok(listed
            .into_iter()
            .take(limit)
            .map(|product| (product.code.clone(), Some(product)))
            .collect())
    }
}

fn report_for(product: &TariffProduct, outcome: ProductOutcome) -> ProductReport {
    let display_name = if product.display_name.trim().is_empty() {
        product.code.clone()
    } else {
        product.display_name.clone()
    };

    ProductReport {
        code: product.code.clone(),
        display_name,
        description: product.description.clone(),
        available_from: product.available_from,
        available_to: product.available_to,
        outcome,
    }
}
