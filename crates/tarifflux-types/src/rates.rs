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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ============= Normalized Rate Windows =============

/// Billing arrangement under which a register's unit rate is quoted.
///
/// Catalog key names vary between product generations, so anything not
/// recognised is kept verbatim in `Other` instead of being rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    DirectDebitMonthly,
    DirectDebitQuarterly,
    NonDirectDebit,
    Prepayment,
    Varying,
    Other(String),
    #[default]
    Unknown,
}

impl PaymentMethod {
    /// Map a catalog key (e.g. `direct_debit_monthly`) to a payment method
    pub fn from_key(key: &str) -> Self {
        let normalized = key.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "" | "unknown" => Self::Unknown,
            "direct_debit_monthly" => Self::DirectDebitMonthly,
            "direct_debit_quarterly" => Self::DirectDebitQuarterly,
            "non_direct_debit" => Self::NonDirectDebit,
            "prepayment" => Self::Prepayment,
            "varying" => Self::Varying,
            _ => Self::Other(normalized),
        }
    }

    pub fn as_key(&self) -> &str {
        match self {
            Self::DirectDebitMonthly => "direct_debit_monthly",
            Self::DirectDebitQuarterly => "direct_debit_quarterly",
            Self::NonDirectDebit => "non_direct_debit",
            Self::Prepayment => "prepayment",
            Self::Varying => "varying",
            Self::Other(key) => key,
            Self::Unknown => "unknown",
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(key: String) -> Self {
        Self::from_key(&key)
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        method.as_key().to_owned()
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// A unit price valid over a half-open interval `[valid_from, valid_to)`.
///
/// Immutable once built; `valid_from < valid_to` holds for every instance,
/// including deserialized ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WindowFields")]
pub struct RateWindow {
    /// Unit price including VAT (p/kWh)
    value: f64,

    valid_from: DateTime<Utc>,

    valid_to: DateTime<Utc>,

    payment_method: PaymentMethod,
}

#[derive(Deserialize)]
struct WindowFields {
    value: f64,
    valid_from: DateTime<Utc>,
    valid_to: DateTime<Utc>,
    #[serde(default)]
    payment_method: PaymentMethod,
}

impl TryFrom<WindowFields> for RateWindow {
    type Error = String;

    fn try_from(fields: WindowFields) -> Result<Self, Self::Error> {
        Self::new(
            fields.value,
            fields.valid_from,
            fields.valid_to,
            fields.payment_method,
        )
        .ok_or_else(|| {
            format!(
                "rate window must start before it ends ({} >= {})",
                fields.valid_from, fields.valid_to
            )
        })
    }
}

impl RateWindow {
    /// Build a window, returning `None` when `valid_from` is not strictly
    /// before `valid_to`.
    pub fn new(
        value: f64,
        valid_from: DateTime<Utc>,
        valid_to: DateTime<Utc>,
        payment_method: PaymentMethod,
    ) -> Option<Self> {
        (valid_from < valid_to).then_some(Self {
            value,
            valid_from,
            valid_to,
            payment_method,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn valid_from(&self) -> DateTime<Utc> {
        self.valid_from
    }

    pub fn valid_to(&self) -> DateTime<Utc> {
        self.valid_to
    }

    pub fn payment_method(&self) -> &PaymentMethod {
        &self.payment_method
    }
}

// ============= Raw Catalog Entries =============

/// One element of a linked unit-rate listing, as delivered by the catalog.
///
/// Fields are optional because the catalog is not trusted to send them;
/// validation happens during normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRateEntry {
    pub value_inc_vat: Option<f64>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
}

impl RawRateEntry {
    /// Extract an entry from arbitrary JSON. Values of the wrong JSON type are
    /// read as absent rather than failing the whole listing.
    pub fn from_json(value: &Value) -> Self {
        let text = |field: &str| {
            value
                .get(field)
                .and_then(Value::as_str)
                .map(str::to_owned)
        };

        Self {
            value_inc_vat: value.get("value_inc_vat").and_then(Value::as_f64),
            valid_from: text("valid_from"),
            valid_to: text("valid_to"),
        }
    }
}
