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

use crate::classifier::classify;
use crate::selector::LatestWindowSelector;
use tarifflux_types::{RateSummary, RateWindow};

/// Derive the summary of a normalized sequence.
///
/// Classification always runs over the full sequence; only the schedule is
/// restricted to the latest day. `None` when there are no windows.
pub fn summarize(windows: &[RateWindow], selector: &LatestWindowSelector) -> Option<RateSummary> {
    let classification = classify(windows)?;
    let latest = selector.select(windows)?;

    Some(RateSummary {
        classification,
        latest_day: latest.day,
        latest_day_windows: latest.windows,
        window_count: windows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use tarifflux_types::{PaymentMethod, RateClassification};

    #[test]
    fn test_variable_product_stays_variable_when_latest_day_is_flat() {
        let day_one = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let day_two = day_one + Duration::days(1);
        let windows = vec![
            RateWindow::new(15.0, day_one, day_one + Duration::hours(12), PaymentMethod::Varying)
                .unwrap(),
            RateWindow::new(28.0, day_two, day_two + Duration::hours(12), PaymentMethod::Varying)
                .unwrap(),
        ];

        let summary = summarize(&windows, &LatestWindowSelector::default()).unwrap();

        assert!(summary.is_variable());
        assert_eq!(summary.latest_day_windows.len(), 1);
        assert_eq!(summary.window_count, 2);
        assert!(matches!(
            summary.classification,
            RateClassification::Variable { ref min, .. } if min.value() == 15.0
        ));
    }

    #[test]
    fn test_no_windows_no_summary() {
        assert!(summarize(&[], &LatestWindowSelector::default()).is_none());
    }
}
