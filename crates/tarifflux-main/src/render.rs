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

//! Output formatters for scan reports.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use comfy_table::{Attribute, Cell, Table, presets::UTF8_FULL};
use std::fmt::Write;
use tarifflux_core::{ProductOutcome, ProductReport, RateClassification, RateSummary, RateWindow};

/// Human-readable console report
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    timezone: Tz,
}

/// Pretty-printed JSON of the full report list
#[derive(Debug)]
pub struct JsonRenderer;

impl TextRenderer {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn render(&self, reports: &[ProductReport]) -> String {
        let mut output = String::new();

        if reports.is_empty() {
            output.push_str("No tariffs found.\n");
            return output;
        }

        output.push_str("Energy Tariffs:\n");
        output.push_str(&"=".repeat(50));
        output.push('\n');

        for report in reports {
            output.push('\n');
            self.render_product(&mut output, report);
        }
        output
    }

    fn render_product(&self, output: &mut String, report: &ProductReport) {
        let _ = writeln!(output, "{} ({})", report.display_name, report.code);
        let _ = writeln!(
            output,
            "Description: {}",
            report
                .description
                .as_deref()
                .unwrap_or("No description available")
        );
        let _ = writeln!(output, "Available From: {}", self.date_or_na(report.available_from));
        let _ = writeln!(output, "Available To: {}", self.date_or_na(report.available_to));

        match &report.outcome {
            ProductOutcome::Summarized(summary) => self.render_summary(output, summary),
            ProductOutcome::NoRates => output.push_str("No rate information available\n"),
            ProductOutcome::FetchFailed { reason } => {
                let _ = writeln!(output, "Product details unavailable: {}", reason);
            }
        }
    }

    fn render_summary(&self, output: &mut String, summary: &RateSummary) {
        match &summary.classification {
            RateClassification::Fixed { rate } => {
                let _ = writeln!(output, "Fixed Rate Product: {:.2}p/kWh", rate);
            }
            RateClassification::Variable { min, max } => {
                output.push_str("Variable Rate Product:\n");
                let _ = writeln!(output, "  Min Rate: {}", self.window_line(min));
                let _ = writeln!(output, "  Max Rate: {}", self.window_line(max));
            }
        }

        let _ = writeln!(
            output,
            "Rates for {} ({} of {} windows):",
            summary.latest_day,
            summary.latest_day_windows.len(),
            summary.window_count
        );

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("Rate (p/kWh)").add_attribute(Attribute::Bold),
            Cell::new("Payment method").add_attribute(Attribute::Bold),
            Cell::new("From").add_attribute(Attribute::Bold),
            Cell::new("To").add_attribute(Attribute::Bold),
        ]);
        for window in &summary.latest_day_windows {
            table.add_row(vec![
                Cell::new(format!("{:.2}", window.value())),
                Cell::new(window.payment_method().as_key()),
                Cell::new(self.time(window.valid_from())),
                Cell::new(self.time(window.valid_to())),
            ]);
        }
        output.push_str(&table.to_string());
        output.push('\n');
    }

    fn window_line(&self, window: &RateWindow) -> String {
        format!(
            "{:.2}p/kWh ({}-{}, {})",
            window.value(),
            self.time(window.valid_from()),
            self.time(window.valid_to()),
            window.payment_method()
        )
    }

    fn time(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.timezone).format("%H:%M").to_string()
    }

    fn date_or_na(&self, at: Option<DateTime<Utc>>) -> String {
        at.map(|t| t.with_timezone(&self.timezone).format("%Y-%m-%d %H:%M %Z").to_string())
            .unwrap_or_else(|| "N/A".to_owned())
    }
}

impl JsonRenderer {
    pub fn render(reports: &[ProductReport]) -> Result<String> {
        serde_json::to_string_pretty(reports).context("Failed to serialize scan reports")
    }
}
