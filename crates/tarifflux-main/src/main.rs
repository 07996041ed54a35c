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

mod cli;
mod config;
mod render;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use clap::Parser;
use tarifflux_core::{
    CatalogError, CatalogScanner, LatestWindowSelector, RateRecordNormalizer, TariffCatalog,
};
use tarifflux_octopus::OctopusClient;
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

use crate::cli::{Cli, Commands};
use crate::config::{API_KEY_ENV, Config, OutputFormat};
use crate::render::{JsonRenderer, TextRenderer};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Check => run_check(&config),
        Commands::Scan(args) => {
            args.apply(&mut config);
            config.validate()?;
            run_scan(&config)
        }
    }
}

/// Logs go to stderr so the report on stdout stays machine-readable
fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Setting default tracing subscriber failed")
}

fn connect(config: &Config) -> Result<OctopusClient> {
    let octopus = config.octopus_config();
    if octopus.api_key.is_none() {
        info!(
            "🔑 No API key configured (catalog.api_key or {}), using anonymous access",
            API_KEY_ENV
        );
    }
    debug!("Catalog config: {:?}", octopus);

    let client = OctopusClient::new(octopus).context("Failed to build catalog client")?;
    client.check_access().map_err(explain_access_error)?;
    info!("✅ Connected to {} catalog", client.name());
    Ok(client)
}

fn explain_access_error(error: CatalogError) -> anyhow::Error {
    match error {
        CatalogError::Unauthorized => anyhow!(
            "Authentication failed. Check catalog.api_key or {} in your supplier account",
            API_KEY_ENV
        ),
        CatalogError::Unreachable(reason) => {
            anyhow!("Catalog is unreachable: {}", reason)
        }
        other => anyhow::Error::new(other).context("Catalog access check failed"),
    }
}

fn run_check(config: &Config) -> Result<()> {
    config.validate()?;
    connect(config)?;
    println!("Catalog access OK: {}", config.catalog.base_url);
    Ok(())
}

fn run_scan(config: &Config) -> Result<()> {
    let client = connect(config)?;
    let timezone = config.timezone()?;

    info!("🚀 Starting tariff scan");
    info!("   Catalog: {}", config.catalog.base_url);
    info!(
        "   Tariff groups: {}",
        config
            .scan
            .tariff_groups
            .iter()
            .map(|g| g.key())
            .collect::<Vec<_>>()
            .join(", ")
    );
    info!("   Report timezone: {}", timezone);

    let normalizer = RateRecordNormalizer::new().with_groups(config.scan.tariff_groups.clone());
    let scanner = CatalogScanner::new(
        &client,
        normalizer,
        LatestWindowSelector::new(timezone),
        config.scan_options(),
    );

    let reports = scanner
        .scan(Utc::now())
        .map_err(explain_access_error)
        .context("Catalog scan aborted")?;

    let output = match config.report.format {
        OutputFormat::Text => TextRenderer::new(timezone).render(&reports),
        OutputFormat::Json => JsonRenderer::render(&reports)?,
    };
    println!("{}", output);
    Ok(())
}
