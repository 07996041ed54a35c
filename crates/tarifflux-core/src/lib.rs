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

pub mod catalog;
pub mod classifier;
pub mod normalizer;
pub mod scanner;
pub mod selector;
pub mod strategy;
pub mod summary;

pub use catalog::{CatalogError, CatalogResult, TariffCatalog};
pub use classifier::classify;
pub use normalizer::{MalformedEntry, NormalizationReport, Normalized, RateRecordNormalizer};
pub use scanner::{CatalogScanner, ScanOptions};
pub use selector::{LatestDay, LatestWindowSelector};
pub use strategy::{
    InlineFlatRateStrategy, LinkedScheduleStrategy, PaymentMethodNode, RateStrategy,
    ResolveContext,
};
pub use summary::summarize;

pub use tarifflux_types::*;
