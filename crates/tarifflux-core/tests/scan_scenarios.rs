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

//! Integration tests for full catalog scans
//!
//! Covers the flow: catalog listing -> product detail -> normalization -> summary

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;
use tarifflux_core::{
    CatalogError, CatalogResult, CatalogScanner, LatestWindowSelector, PaymentMethod,
    ProductOutcome, RateClassification, RateRecordNormalizer, RawRateEntry, ScanOptions,
    TariffCatalog, TariffProduct,
};

const AGILE_RATES: &str = "https://catalog.test/products/AGILE/standard-unit-rates/";

enum DetailResponse {
    Product(Value),
    NotFound,
    Unauthorized,
}

#[derive(Default)]
struct ScriptedCatalog {
    listing: Vec<Value>,
    details: HashMap<String, DetailResponse>,
    links: HashMap<String, Vec<RawRateEntry>>,
    detail_calls: RefCell<Vec<String>>,
}

impl TariffCatalog for ScriptedCatalog {
    fn list_products(&self) -> CatalogResult<Vec<TariffProduct>> {
        self.listing
            .iter()
            .map(|p| serde_json::from_value(p.clone()).map_err(CatalogError::from))
            .collect()
    }

    fn fetch_product_detail(&self, code: &str) -> CatalogResult<TariffProduct> {
        self.detail_calls.borrow_mut().push(code.to_owned());
        match self.details.get(code) {
            Some(DetailResponse::Product(doc)) => Ok(serde_json::from_value(doc.clone())?),
            Some(DetailResponse::Unauthorized) => Err(CatalogError::Unauthorized),
            Some(DetailResponse::NotFound) | None => Err(CatalogError::NotFound(code.to_owned())),
        }
    }

    fn fetch_linked_rates(&self, url: &str) -> CatalogResult<Vec<RawRateEntry>> {
        self.links
            .get(url)
            .cloned()
            .ok_or_else(|| CatalogError::Transport(format!("no route to {url}")))
    }

    fn check_access(&self) -> CatalogResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn half_hour(value: f64, hour: u32, minute: u32) -> RawRateEntry {
    let from = Utc.with_ymd_and_hms(2024, 1, 2, hour, minute, 0).unwrap();
    let to = from + chrono::Duration::minutes(30);
    RawRateEntry {
        value_inc_vat: Some(value),
        valid_from: Some(from.to_rfc3339()),
        valid_to: Some(to.to_rfc3339()),
    }
}

fn listed(code: &str, name: &str) -> Value {
    json!({
        "code": code,
        "display_name": name,
        "description": format!("{name} tariff"),
        "available_from": "2023-12-01T00:00:00Z",
        "available_to": null
    })
}

/// Payment method A has a linked schedule of four half hours on 2024-01-02,
/// payment method B only an inline flat rate of 20.0.
fn mixed_catalog() -> ScriptedCatalog {
    let mut catalog = ScriptedCatalog {
        listing: vec![listed("AGILE", "Agile Octopus")],
        ..Default::default()
    };
    catalog.details.insert(
        "AGILE".to_owned(),
        DetailResponse::Product(json!({
            "code": "AGILE",
            "display_name": "Agile Octopus",
            "single_register_electricity_tariffs": {
                "_C": {
                    "direct_debit_monthly": {
                        "code": "E-1R-AGILE-C",
                        "links": [{
                            "href": AGILE_RATES,
                            "rel": "standard_unit_rates",
                            "method": "GET"
                        }]
                    },
                    "varying": {"code": "E-1R-AGILE-C", "standard_unit_rate_inc_vat": 20.0}
                }
            }
        })),
    );
    catalog.links.insert(
        AGILE_RATES.to_owned(),
        vec![
            half_hour(10.0, 0, 0),
            half_hour(15.0, 0, 30),
            half_hour(30.0, 1, 0),
            half_hour(25.0, 1, 30),
        ],
    );
    catalog
}

fn scanner(catalog: &ScriptedCatalog, options: ScanOptions) -> CatalogScanner<'_, ScriptedCatalog> {
    CatalogScanner::new(
        catalog,
        RateRecordNormalizer::new(),
        LatestWindowSelector::default(),
        options,
    )
}

fn run_at(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, hour, 0, 0).unwrap()
}

#[test]
fn test_mixed_product_when_flat_rate_lands_on_same_day() {
    let catalog = mixed_catalog();
    let now = run_at(1, 2, 9);

    let normalized = RateRecordNormalizer::new().normalize(
        &catalog.fetch_product_detail("AGILE").unwrap(),
        &catalog,
        now,
    );
    assert_eq!(normalized.windows.len(), 5);

    let reports = scanner(&catalog, ScanOptions::default()).scan(now).unwrap();
    assert_eq!(reports.len(), 1);
    let summary = reports[0].summary().expect("summary");

    let RateClassification::Variable { min, max } = &summary.classification else {
        panic!("expected variable product");
    };
    assert_eq!(min.value(), 10.0);
    assert_eq!(max.value(), 30.0);
    assert_eq!(summary.latest_day, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_eq!(summary.latest_day_windows.len(), 5);
    assert_eq!(summary.window_count, 5);

    // Linked windows start at midnight, the synthesized one at run time
    let last = summary.latest_day_windows.last().unwrap();
    assert_eq!(*last.payment_method(), PaymentMethod::Varying);
    assert_eq!(last.valid_from(), now);
}

#[test]
fn test_mixed_product_when_flat_rate_lands_on_earlier_day() {
    let catalog = mixed_catalog();

    let reports = scanner(&catalog, ScanOptions::default())
        .scan(run_at(1, 1, 9))
        .unwrap();
    let summary = reports[0].summary().expect("summary");

    assert_eq!(summary.latest_day_windows.len(), 4);
    assert!(
        summary
            .latest_day_windows
            .iter()
            .all(|w| *w.payment_method() == PaymentMethod::DirectDebitMonthly)
    );
    assert!(summary.is_variable());
    assert_eq!(summary.window_count, 5);
}

#[test]
fn test_failed_product_does_not_stop_scan() {
    let mut catalog = mixed_catalog();
    catalog.listing = vec![
        listed("GONE", "Withdrawn"),
        listed("AGILE", "Agile Octopus"),
        listed("EMPTY", "No Rates"),
    ];
    catalog
        .details
        .insert("GONE".to_owned(), DetailResponse::NotFound);
    catalog.details.insert(
        "EMPTY".to_owned(),
        DetailResponse::Product(json!({"code": "EMPTY", "display_name": "No Rates"})),
    );

    let reports = scanner(&catalog, ScanOptions::default())
        .scan(run_at(1, 2, 9))
        .unwrap();

    let codes: Vec<_> = reports.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["GONE", "AGILE", "EMPTY"]);
    assert!(matches!(reports[0].outcome, ProductOutcome::FetchFailed { .. }));
    assert_eq!(reports[0].display_name, "Withdrawn");
    assert!(reports[1].summary().is_some());
    assert_eq!(reports[2].outcome, ProductOutcome::NoRates);
}

#[test]
fn test_unauthorized_aborts_scan_once() {
    let mut catalog = mixed_catalog();
    catalog.listing = vec![listed("LOCKED", "Locked"), listed("AGILE", "Agile Octopus")];
    catalog
        .details
        .insert("LOCKED".to_owned(), DetailResponse::Unauthorized);

    let result = scanner(&catalog, ScanOptions::default()).scan(run_at(1, 2, 9));

    assert!(matches!(result, Err(CatalogError::Unauthorized)));
    assert_eq!(*catalog.detail_calls.borrow(), vec!["LOCKED".to_owned()]);
}

#[test]
fn test_explicit_products_skip_listing() {
    let catalog = mixed_catalog();
    let options = ScanOptions {
        products: vec!["VAR-22-11-01".to_owned(), "AGILE".to_owned()],
        max_products: Some(1),
    };

    let reports = scanner(&catalog, options).scan(run_at(1, 2, 9)).unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].code, "VAR-22-11-01");
    assert!(matches!(reports[0].outcome, ProductOutcome::FetchFailed { .. }));
}

#[test]
fn test_inline_only_product_is_fixed_end_to_end() {
    let catalog = ScriptedCatalog::default();
    let product: TariffProduct = serde_json::from_value(json!({
        "code": "FIX-12M-24-01-01",
        "display_name": null,
        "single_register_electricity_tariffs": {
            "_A": {
                "direct_debit_monthly": {"standard_unit_rate_inc_vat": 25.0},
                "varying": {"standard_unit_rate_inc_vat": 25.0}
            },
            "_B": {"direct_debit_monthly": {"standard_unit_rate_inc_vat": 25.0}}
        }
    }))
    .unwrap();
    let now = run_at(3, 15, 12);

    let report = scanner(&catalog, ScanOptions::default()).scan_product(&product, now);

    assert_eq!(report.display_name, "FIX-12M-24-01-01");
    let summary = report.summary().expect("summary");
    assert_eq!(summary.classification, RateClassification::Fixed { rate: 25.0 });
    assert_eq!(summary.window_count, 3);
    assert_eq!(summary.latest_day, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    assert!(summary.latest_day_windows.iter().all(|w| w.valid_from() == now));
}
