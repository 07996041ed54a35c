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

use crate::catalog::TariffCatalog;
use crate::strategy::{
    InlineFlatRateStrategy, LinkedScheduleStrategy, PaymentMethodNode, RateStrategy,
    ResolveContext,
};
use chrono::{DateTime, Utc};
use tarifflux_types::{PaymentMethod, RateWindow, RawRateEntry, TariffGroup, TariffProduct};
use thiserror::Error;
use tracing::{debug, info};

/// Why a single raw rate entry was dropped
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedEntry {
    #[error("missing value_inc_vat")]
    MissingValue,

    #[error("missing {0}")]
    MissingTimestamp(&'static str),

    #[error("invalid {field} timestamp '{raw}'")]
    InvalidTimestamp { field: &'static str, raw: String },

    #[error("valid_from is not before valid_to")]
    EmptyWindow,
}

/// Convert one raw entry into a window tagged with `method`.
///
/// Timestamps must be RFC 3339 with an explicit offset; a zone-less
/// timestamp is rejected rather than assumed local.
pub fn window_from_entry(
    entry: &RawRateEntry,
    method: &PaymentMethod,
) -> Result<RateWindow, MalformedEntry> {
    let value = entry.value_inc_vat.ok_or(MalformedEntry::MissingValue)?;
    let valid_from = parse_timestamp("valid_from", entry.valid_from.as_deref())?;
    let valid_to = parse_timestamp("valid_to", entry.valid_to.as_deref())?;

    RateWindow::new(value, valid_from, valid_to, method.clone()).ok_or(MalformedEntry::EmptyWindow)
}

fn parse_timestamp(
    field: &'static str,
    raw: Option<&str>,
) -> Result<DateTime<Utc>, MalformedEntry> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(MalformedEntry::MissingTimestamp(field))?;

    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| MalformedEntry::InvalidTimestamp {
            field,
            raw: raw.to_owned(),
        })
}

/// How one payment method was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub register: String,
    pub method: PaymentMethod,
    /// Winning strategy, `None` when no strategy produced windows
    pub strategy: Option<&'static str>,
    pub windows: usize,
}

/// Counters collected during one normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    pub registers: usize,
    pub payment_methods: usize,
    pub skipped_entries: usize,
    pub link_failures: usize,
    pub resolutions: Vec<Resolution>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub windows: Vec<RateWindow>,
    pub report: NormalizationReport,
}

/// Flattens a product's register / payment-method tree into rate windows
#[derive(Debug)]
pub struct RateRecordNormalizer {
    groups: Vec<TariffGroup>,
    strategies: Vec<Box<dyn RateStrategy>>,
}

impl Default for RateRecordNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RateRecordNormalizer {
    /// Electricity registers, linked schedule first then inline flat rate
    pub fn new() -> Self {
        Self {
            groups: vec![TariffGroup::SingleRegisterElectricity],
            strategies: vec![
                Box::new(LinkedScheduleStrategy),
                Box::new(InlineFlatRateStrategy),
            ],
        }
    }

    pub fn with_groups(mut self, groups: Vec<TariffGroup>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_strategies(mut self, strategies: Vec<Box<dyn RateStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Normalize one product.
    ///
    /// Every register of every configured group is visited. Windows are
    /// concatenated in visiting order without de-duplication. An empty result
    /// means "no rate information", not a failure.
    pub fn normalize(
        &self,
        product: &TariffProduct,
        catalog: &dyn TariffCatalog,
        now: DateTime<Utc>,
    ) -> Normalized {
        let mut report = NormalizationReport::default();
        let mut windows = Vec::new();

        for &group in &self.groups {
            for (register, node) in product.registers(group) {
                report.registers += 1;

                for (key, value) in node {
                    let Some(method) = PaymentMethodNode::from_value(register, key, value) else {
                        continue;
                    };
                    report.payment_methods += 1;

                    let mut ctx = ResolveContext {
                        catalog,
                        now,
                        report: &mut report,
                    };
                    let (strategy, resolved) = self.resolve(&method, &mut ctx);

                    report.resolutions.push(Resolution {
                        register: register.to_owned(),
                        method: method.method.clone(),
                        strategy,
                        windows: resolved.len(),
                    });
                    windows.extend(resolved);
                }
            }
        }

        info!(
            "📊 [NORMALIZE] {}: {} windows, {} registers, {} methods, {} skipped, {} failed links",
            product.code,
            windows.len(),
            report.registers,
            report.payment_methods,
            report.skipped_entries,
            report.link_failures
        );

        Normalized { windows, report }
    }

    fn resolve(
        &self,
        method: &PaymentMethodNode<'_>,
        ctx: &mut ResolveContext<'_>,
    ) -> (Option<&'static str>, Vec<RateWindow>) {
        for strategy in &self.strategies {
            match strategy.resolve(method, ctx) {
                Some(windows) if !windows.is_empty() => {
                    debug!(
                        "   {}/{} resolved by {} ({} windows)",
                        method.register,
                        method.key,
                        strategy.name(),
                        windows.len()
                    );
                    return (Some(strategy.name()), windows);
                }
                _ => {}
            }
        }

        debug!("   {}/{} has no rate information", method.register, method.key);
        (None, Vec::new())
    }
}
