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

use std::cmp::Ordering;
use tarifflux_types::{RateClassification, RateWindow};

/// Classify a full normalized sequence as fixed or variable.
///
/// Must be given the whole sequence: a single day of a variable product can
/// look fixed. Payment method is ignored. Returns `None` for an empty
/// sequence ("no data").
pub fn classify(windows: &[RateWindow]) -> Option<RateClassification> {
    let first = windows.first()?;

    // Numeric equality, so 0.0 and -0.0 are one rate
    if windows.iter().all(|w| w.value() == first.value()) {
        return Some(RateClassification::Fixed { rate: first.value() });
    }

    let min = pick(windows, Ordering::Less)?;
    let max = pick(windows, Ordering::Greater)?;

    Some(RateClassification::Variable {
        min: min.clone(),
        max: max.clone(),
    })
}

/// Extreme window in direction `wanted`; ties go to the earliest `valid_from`,
/// then to the earlier position in the sequence.
fn pick(windows: &[RateWindow], wanted: Ordering) -> Option<&RateWindow> {
    windows.iter().reduce(|best, candidate| {
        // Catalog values are parsed from JSON and never NaN
        match candidate.value().partial_cmp(&best.value()) {
            Some(ord) if ord == wanted => candidate,
            Some(Ordering::Equal) if candidate.valid_from() < best.valid_from() => candidate,
            _ => best,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use tarifflux_types::PaymentMethod;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
    }

    fn window_at(value: f64, from: DateTime<Utc>, method: PaymentMethod) -> RateWindow {
        RateWindow::new(value, from, from + Duration::minutes(30), method).unwrap()
    }

    fn series(values: &[f64]) -> Vec<RateWindow> {
        values
            .iter()
            .zip(0i64..)
            .map(|(&value, slot)| {
                window_at(value, start() + Duration::minutes(30 * slot), PaymentMethod::Varying)
            })
            .collect()
    }

    #[test]
    fn test_empty_sequence_is_no_data() {
        assert!(classify(&[]).is_none());
    }

    #[test]
    fn test_single_value_is_fixed() {
        assert_eq!(
            classify(&series(&[25.0])),
            Some(RateClassification::Fixed { rate: 25.0 })
        );
    }

    #[test]
    fn test_same_rate_under_two_payment_methods_is_fixed() {
        let windows = vec![
            window_at(24.5, start(), PaymentMethod::Varying),
            window_at(24.5, start(), PaymentMethod::NonDirectDebit),
        ];

        assert_eq!(
            classify(&windows),
            Some(RateClassification::Fixed { rate: 24.5 })
        );
    }

    #[test]
    fn test_signed_zero_is_one_rate() {
        let windows = series(&[0.0, -0.0, 0.0]);

        let Some(RateClassification::Fixed { rate }) = classify(&windows) else {
            panic!("expected fixed classification");
        };
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn test_variable_min_max_with_tie() {
        let windows = series(&[30.0, 12.5, 45.2, 12.5]);

        let Some(RateClassification::Variable { min, max }) = classify(&windows) else {
            panic!("expected variable classification");
        };

        assert_eq!(min.value(), 12.5);
        assert_eq!(min.valid_from(), windows[1].valid_from());
        assert_eq!(max.value(), 45.2);
        assert_eq!(max.valid_from(), windows[2].valid_from());
    }

    #[test]
    fn test_negative_rates_rank_below_zero() {
        let windows = series(&[0.0, -3.5, 12.0]);

        let Some(RateClassification::Variable { min, max }) = classify(&windows) else {
            panic!("expected variable classification");
        };

        assert_eq!(min.value(), -3.5);
        assert_eq!(max.value(), 12.0);
    }

    #[test]
    fn test_tie_prefers_earliest_start_not_position() {
        let earlier = start() - Duration::hours(1);
        let windows = vec![
            window_at(12.5, start(), PaymentMethod::Varying),
            window_at(40.0, start() + Duration::minutes(30), PaymentMethod::Varying),
            // Later in the sequence but earlier in time
            window_at(12.5, earlier, PaymentMethod::Varying),
        ];

        let Some(RateClassification::Variable { min, .. }) = classify(&windows) else {
            panic!("expected variable classification");
        };

        assert_eq!(min.valid_from(), earlier);
    }
}
