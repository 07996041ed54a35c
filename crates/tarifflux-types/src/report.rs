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

use crate::rates::RateWindow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============= Derived Rate Facts =============

/// Fixed vs. variable outcome over a product's full window sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RateClassification {
    /// Every window carries the same value
    Fixed { rate: f64 },

    /// At least two distinct values; ties resolve to the earliest window
    Variable { min: RateWindow, max: RateWindow },
}

impl RateClassification {
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable { .. })
    }
}

/// Summary of one product's normalized rates. Only exists when at least one
/// window was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSummary {
    pub classification: RateClassification,

    /// Most recent calendar day with a window starting on it
    pub latest_day: NaiveDate,

    /// Windows starting on `latest_day`, ascending by start
    pub latest_day_windows: Vec<RateWindow>,

    /// Size of the full normalized sequence
    pub window_count: usize,
}

impl RateSummary {
    pub fn is_variable(&self) -> bool {
        self.classification.is_variable()
    }
}

// ============= Per-Product Report =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProductOutcome {
    Summarized(RateSummary),

    /// Normalization produced no windows
    NoRates,

    /// Product detail could not be fetched; other products are unaffected
    FetchFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReport {
    pub code: String,
    pub display_name: String,
    pub description: Option<String>,
    pub available_from: Option<DateTime<Utc>>,
    pub available_to: Option<DateTime<Utc>>,
    pub outcome: ProductOutcome,
}

impl ProductReport {
    pub fn summary(&self) -> Option<&RateSummary> {
        match &self.outcome {
            ProductOutcome::Summarized(summary) => Some(summary),
            ProductOutcome::NoRates | ProductOutcome::FetchFailed { .. } => None,
        }
    }
}
