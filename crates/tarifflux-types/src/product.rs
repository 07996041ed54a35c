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

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Top-level register collection inside a product document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TariffGroup {
    #[default]
    #[serde(rename = "single_register_electricity_tariffs")]
    SingleRegisterElectricity,
    #[serde(rename = "single_register_gas_tariffs")]
    SingleRegisterGas,
}

impl TariffGroup {
    pub fn key(self) -> &'static str {
        match self {
            Self::SingleRegisterElectricity => "single_register_electricity_tariffs",
            Self::SingleRegisterGas => "single_register_gas_tariffs",
        }
    }
}

impl fmt::Display for TariffGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TariffGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "single_register_electricity_tariffs" | "electricity" => {
                Ok(Self::SingleRegisterElectricity)
            }
            "single_register_gas_tariffs" | "gas" => Ok(Self::SingleRegisterGas),
            other => Err(format!("Unknown tariff group: {other}")),
        }
    }
}

/// Product document from the tariff catalog.
///
/// Only the descriptive fields are typed. Register collections stay as raw
/// JSON in `tariffs` because their nesting is irregular across products.
/// Descriptive fields are display-only, so a null or unreadable value is read
/// as absent; only `code` is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffProduct {
    pub code: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub display_name: String,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub full_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub brand: Option<String>,

    /// Catalog's own flag, informational only
    #[serde(default, deserialize_with = "lenient_opt_bool")]
    pub is_variable: Option<bool>,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub available_from: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub available_to: Option<DateTime<Utc>>,

    /// Every other top-level key (register groups, links, sample quotes)
    #[serde(flatten)]
    pub tariffs: Map<String, Value>,
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(lenient_opt_string(de)?.unwrap_or_default())
}

fn lenient_opt_bool<'de, D: Deserializer<'de>>(de: D) -> Result<Option<bool>, D::Error> {
    Ok(Value::deserialize(de)?.as_bool())
}

/// RFC 3339 first; zone-less dates and date-times are read as UTC
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    de: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let Value::String(raw) = Value::deserialize(de)? else {
        return Ok(None);
    };
    let raw = raw.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(at.with_timezone(&Utc)));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Some(at.and_utc()));
    }
    Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc()))
}

impl TariffProduct {
    /// Registers of one group keyed by register code (e.g. `_A`).
    /// Non-object entries are ignored.
    pub fn registers(
        &self,
        group: TariffGroup,
    ) -> impl Iterator<Item = (&str, &Map<String, Value>)> {
        self.tariffs
            .get(group.key())
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|registers| {
                registers
                    .iter()
                    .filter_map(|(code, node)| node.as_object().map(|node| (code.as_str(), node)))
            })
    }
}
