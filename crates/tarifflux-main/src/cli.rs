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

//! CLI argument definitions using clap.

use crate::config::{Config, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tarifflux_core::TariffGroup;

#[derive(Parser, Debug)]
#[command(name = "tarifflux")]
#[command(author, version, about = "TariffLux energy tariff catalog scanner")]
#[command(
    long_about = "Fetches the product catalog of an energy supplier, normalizes every product's\n\
    rate records into validity windows and reports fixed vs. variable pricing together\n\
    with the most recent day of rates.\n\
    \nExamples:\n  \
    tarifflux scan                                # Scan the whole catalog\n  \
    tarifflux scan --product AGILE-24-10-01       # Scan one product\n  \
    tarifflux scan --format json --max-products 5 # Machine-readable output\n  \
    tarifflux check --config tarifflux.toml       # Verify catalog access"
)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan catalog products and print their rate summaries
    Scan(ScanArgs),

    /// Verify that the catalog is reachable and the API key is accepted
    Check,
}

#[derive(Parser, Debug, Default)]
pub struct ScanArgs {
    /// Product code to scan; repeat for several. Skips the catalog listing.
    #[arg(long = "product", short = 'p', value_name = "CODE")]
    pub products: Vec<String>,

    /// Stop after this many products
    #[arg(long)]
    pub max_products: Option<usize>,

    /// IANA timezone used to pick the latest day (e.g. Europe/London)
    #[arg(long)]
    pub timezone: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Maximum catalog pages to follow
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Also read single-register gas tariffs
    #[arg(long)]
    pub gas: bool,
}

impl ScanArgs {
    /// Command-line values override the config file
    pub fn apply(&self, config: &mut Config) {
        if !self.products.is_empty() {
            config.scan.products = self.products.clone();
        }
        if let Some(max) = self.max_products {
            config.scan.max_products = max;
        }
        if let Some(tz) = &self.timezone {
            config.report.timezone = tz.clone();
        }
        if let Some(format) = self.format {
            config.report.format = format;
        }
        if let Some(pages) = self.max_pages {
            config.catalog.max_pages = pages;
        }
        if self.gas && !config.scan.tariff_groups.contains(&TariffGroup::SingleRegisterGas) {
            config.scan.tariff_groups.push(TariffGroup::SingleRegisterGas);
        }
    }
}
