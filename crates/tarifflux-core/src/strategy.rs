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

//! Rate resolution strategies for a single payment method.
//!
//! The normalizer applies strategies in order and keeps the first non-empty
//! result, so adding a new rate source means adding a strategy, not another
//! branch in the walker.

use crate::catalog::TariffCatalog;
use crate::normalizer::{NormalizationReport, window_from_entry};
use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use std::fmt;
use tarifflux_types::{PaymentMethod, RateWindow};
use tracing::{debug, trace, warn};

/// Link relation pointing at the time-bounded unit-rate listing
pub const STANDARD_UNIT_RATES_REL: &str = "standard_unit_rates";

/// Inline flat unit rate including VAT
pub const INLINE_RATE_FIELD: &str = "standard_unit_rate_inc_vat";

/// Payment method sub-record of a register, recognised by shape
#[derive(Debug, Clone)]
pub struct PaymentMethodNode<'a> {
    pub register: &'a str,
    pub key: &'a str,
    pub method: PaymentMethod,
    pub node: &'a Map<String, Value>,
}

impl<'a> PaymentMethodNode<'a> {
    /// Returns `Some` only when `value` is an object exposing either a `links`
    /// array or an inline unit rate. The key itself is never inspected.
    pub fn from_value(register: &'a str, key: &'a str, value: &'a Value) -> Option<Self> {
        let node = value.as_object()?;
        let has_links = node.get("links").is_some_and(Value::is_array);
        let has_inline_rate = node.contains_key(INLINE_RATE_FIELD);

        (has_links || has_inline_rate).then(|| Self {
            register,
            key,
            method: PaymentMethod::from_key(key),
            node,
        })
    }

    /// `href` of every link tagged `standard_unit_rates`, in document order
    pub fn rate_links(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        let node: &'a Map<String, Value> = self.node;
        node.get("links")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter(|link| {
                link.get("rel").and_then(Value::as_str) == Some(STANDARD_UNIT_RATES_REL)
            })
            .filter_map(|link| link.get("href").and_then(Value::as_str))
    }

    pub fn inline_rate(&self) -> Option<f64> {
        self.node.get(INLINE_RATE_FIELD).and_then(Value::as_f64)
    }
}

/// Shared state handed to each strategy
pub struct ResolveContext<'a> {
    pub catalog: &'a dyn TariffCatalog,
    pub now: DateTime<Utc>,
    pub report: &'a mut NormalizationReport,
}

impl fmt::Debug for ResolveContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveContext")
            .field("catalog", &self.catalog.name())
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

/// One source of rate windows for a payment method
pub trait RateStrategy: fmt::Debug {
    /// Strategy name for logging
    fn name(&self) -> &'static str;

    /// `None` (or an empty vector) means "this source produced nothing" and
    /// the next strategy is tried.
    fn resolve(
        &self,
        method: &PaymentMethodNode<'_>,
        ctx: &mut ResolveContext<'_>,
    ) -> Option<Vec<RateWindow>>;
}

/// Follows `standard_unit_rates` links through the catalog
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkedScheduleStrategy;

impl RateStrategy for LinkedScheduleStrategy {
    fn name(&self) -> &'static str {
        "linked_schedule"
    }

    fn resolve(
        &self,
        method: &PaymentMethodNode<'_>,
        ctx: &mut ResolveContext<'_>,
    ) -> Option<Vec<RateWindow>> {
        let mut windows = Vec::new();

        for url in method.rate_links() {
            debug!(
                "🔗 [NORMALIZE] Fetching linked rates for {}/{}: {}",
                method.register, method.key, url
            );

            let entries = match ctx.catalog.fetch_linked_rates(url) {
                Ok(entries) => entries,
                Err(e) => {
                    ctx.report.link_failures += 1;
                    warn!(
                        "⚠️ [NORMALIZE] Linked rates unavailable for {}/{} ({}), falling back",
                        method.register, method.key, e
                    );
                    continue;
                }
            };

            if entries.is_empty() {
                debug!("   Link returned no entries: {}", url);
                continue;
            }

            for entry in &entries {
                match window_from_entry(entry, &method.method) {
                    Ok(window) => windows.push(window),
                    Err(reason) => {
                        ctx.report.skipped_entries += 1;
                        trace!("   Skipping rate entry {:?}: {}", entry, reason);
                    }
                }
            }
        }

        (!windows.is_empty()).then_some(windows)
    }
}

/// Turns an inline flat rate into one window covering the next 24 hours.
///
/// The window is synthetic: it states "this rate applies from now", it is not
/// a historical record.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineFlatRateStrategy;

impl InlineFlatRateStrategy {
    pub const WINDOW_HOURS: i64 = 24;
}

impl RateStrategy for InlineFlatRateStrategy {
    fn name(&self) -> &'static str {
        "inline_flat_rate"
    }

    fn resolve(
        &self,
        method: &PaymentMethodNode<'_>,
        ctx: &mut ResolveContext<'_>,
    ) -> Option<Vec<RateWindow>> {
        let rate = method.inline_rate()?;
        let window = RateWindow::new(
            rate,
            ctx.now,
            ctx.now + Duration::hours(Self::WINDOW_HOURS),
            method.method.clone(),
        )?;

        debug!(
            "💷 [NORMALIZE] Inline flat rate for {}/{}: {:.2}p/kWh",
            method.register, method.key, rate
        );
        Some(vec![window])
    }
}
