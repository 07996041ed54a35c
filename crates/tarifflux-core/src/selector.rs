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

use chrono::NaiveDate;
use chrono_tz::Tz;
use tarifflux_types::RateWindow;

/// Windows starting on the most recent calendar day of a sequence
#[derive(Debug, Clone, PartialEq)]
pub struct LatestDay {
    pub day: NaiveDate,
    /// Ascending by `valid_from`; equal starts keep their input order
    pub windows: Vec<RateWindow>,
}

/// Picks the latest calendar day, with days bucketed in `timezone`
#[derive(Debug, Clone, Copy)]
pub struct LatestWindowSelector {
    timezone: Tz,
}

impl Default for LatestWindowSelector {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl LatestWindowSelector {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Calendar day of a window's start in the selector's time zone
    pub fn day_of(&self, window: &RateWindow) -> NaiveDate {
        window.valid_from().with_timezone(&self.timezone).date_naive()
    }

    /// Returns `None` for an empty sequence ("no data").
    pub fn select(&self, windows: &[RateWindow]) -> Option<LatestDay> {
        let day = windows.iter().map(|w| self.day_of(w)).max()?;

        let mut latest: Vec<RateWindow> = windows
            .iter()
            .filter(|w| self.day_of(w) == day)
            .cloned()
            .collect();
        // sort_by_key is stable
        latest.sort_by_key(|w| w.valid_from());

        Some(LatestDay {
            day,
            windows: latest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use tarifflux_types::PaymentMethod;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0).unwrap()
    }

    fn window(value: f64, from: DateTime<Utc>, method: PaymentMethod) -> RateWindow {
        RateWindow::new(value, from, from + chrono::Duration::minutes(30), method).unwrap()
    }

    #[test]
    fn test_empty_sequence_has_no_latest_day() {
        assert!(LatestWindowSelector::default().select(&[]).is_none());
    }

    #[test]
    fn test_keeps_only_latest_day_sorted() {
        let windows = vec![
            window(20.0, at(1, 23, 30), PaymentMethod::Varying),
            window(22.0, at(2, 1, 0), PaymentMethod::Varying),
            window(18.0, at(1, 12, 0), PaymentMethod::Varying),
            window(21.0, at(2, 0, 0), PaymentMethod::Varying),
            window(23.0, at(2, 0, 30), PaymentMethod::Varying),
        ];

        let latest = LatestWindowSelector::default().select(&windows).unwrap();

        assert_eq!(latest.day, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        let values: Vec<f64> = latest.windows.iter().map(|w| w.value()).collect();
        assert_eq!(values, vec![21.0, 23.0, 22.0]);
        let on_day = windows
            .iter()
            .filter(|w| w.valid_from().date_naive() == latest.day)
            .count();
        assert_eq!(latest.windows.len(), on_day);
    }

    #[test]
    fn test_equal_starts_keep_input_order() {
        let windows = vec![
            window(25.0, at(2, 0, 0), PaymentMethod::DirectDebitMonthly),
            window(20.0, at(2, 0, 0), PaymentMethod::NonDirectDebit),
            window(19.0, at(1, 22, 0), PaymentMethod::DirectDebitMonthly),
        ];

        let latest = LatestWindowSelector::default().select(&windows).unwrap();

        let methods: Vec<_> = latest
            .windows
            .iter()
            .map(|w| w.payment_method().clone())
            .collect();
        assert_eq!(
            methods,
            vec![PaymentMethod::DirectDebitMonthly, PaymentMethod::NonDirectDebit]
        );
    }

    #[test]
    fn test_day_boundary_follows_timezone() {
        // 23:30 UTC on 30 June is 00:30 BST on 1 July
        let windows = vec![
            window(
                20.0,
                Utc.with_ymd_and_hms(2024, 6, 30, 22, 0, 0).unwrap(),
                PaymentMethod::Varying,
            ),
            window(
                21.0,
                Utc.with_ymd_and_hms(2024, 6, 30, 23, 30, 0).unwrap(),
                PaymentMethod::Varying,
            ),
        ];

        let utc = LatestWindowSelector::default().select(&windows).unwrap();
        assert_eq!(utc.day, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(utc.windows.len(), 2);

        let london = LatestWindowSelector::new(chrono_tz::Europe::London)
            .select(&windows)
            .unwrap();
        assert_eq!(london.day, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(london.windows.len(), 1);
        assert_eq!(london.windows[0].value(), 21.0);
    }
}
