//! Date stepping for recurring templates and installment plans.

use chrono::{Days, Months, NaiveDate};

use crate::database::models::Frequency;

/// The `n`th occurrence counted from `start`. Month-based steps are always
/// computed from `start`, clamping to the end of shorter months, so a
/// Jan 31 anchor yields Feb 29, Mar 31, Apr 30 and never drifts.
pub fn nth_occurrence(start: NaiveDate, frequency: Frequency, n: u32) -> Option<NaiveDate> {
    match frequency {
        Frequency::Daily => start.checked_add_days(Days::new(n as u64)),
        Frequency::Weekly => start.checked_add_days(Days::new(7 * n as u64)),
        Frequency::Monthly => start.checked_add_months(Months::new(n)),
        Frequency::Yearly => start.checked_add_months(Months::new(n.checked_mul(12)?)),
    }
}

/// Occurrence dates of a template that fall after `after` and on or before
/// both `target` and the template's `end`. Lazy, so callers bound how many
/// they take.
pub fn occurrence_dates(
    start: NaiveDate,
    end: Option<NaiveDate>,
    frequency: Frequency,
    after: Option<NaiveDate>,
    target: NaiveDate,
) -> impl Iterator<Item = NaiveDate> {
    let limit = match end {
        Some(end) if end < target => end,
        _ => target,
    };

    (0..=u32::MAX)
        .map_while(move |n| nth_occurrence(start, frequency, n))
        .take_while(move |date| *date <= limit)
        .filter(move |date| after.map_or(true, |a| *date > a))
}

/// Split `total` into `count` installments in whole cents; the last one
/// absorbs the remainder.
pub fn split_installments(total: f64, count: u32) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let total_cents = (total * 100.0).round() as i64;
    let base = total_cents / count as i64;
    let remainder = total_cents - base * count as i64;

    (0..count)
        .map(|i| {
            let cents = if i + 1 == count { base + remainder } else { base };
            cents as f64 / 100.0
        })
        .collect()
}

/// Monthly due dates for each installment, starting at the purchase date
pub fn installment_dates(purchase: NaiveDate, count: u32) -> Option<Vec<NaiveDate>> {
    (0..count)
        .map(|i| purchase.checked_add_months(Months::new(i)))
        .collect()
}

/// Amount rounded to whole cents
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn monthly_steps_clamp_without_drift() {
        let start = d("2024-01-31");
        let dates: Vec<_> = (0..4)
            .map(|n| nth_occurrence(start, Frequency::Monthly, n).unwrap())
            .collect();
        assert_eq!(
            dates,
            vec![d("2024-01-31"), d("2024-02-29"), d("2024-03-31"), d("2024-04-30")]
        );
    }

    #[test]
    fn yearly_from_leap_day() {
        assert_eq!(
            nth_occurrence(d("2024-02-29"), Frequency::Yearly, 1),
            Some(d("2025-02-28"))
        );
        assert_eq!(
            nth_occurrence(d("2024-02-29"), Frequency::Yearly, 4),
            Some(d("2028-02-29"))
        );
    }

    #[test]
    fn occurrences_stop_at_target_and_end() {
        let weekly: Vec<_> =
            occurrence_dates(d("2024-03-01"), None, Frequency::Weekly, None, d("2024-03-20")).collect();
        assert_eq!(weekly, vec![d("2024-03-01"), d("2024-03-08"), d("2024-03-15")]);

        let bounded: Vec<_> = occurrence_dates(
            d("2024-03-01"),
            Some(d("2024-03-03")),
            Frequency::Daily,
            None,
            d("2024-12-31"),
        )
        .collect();
        assert_eq!(bounded, vec![d("2024-03-01"), d("2024-03-02"), d("2024-03-03")]);
    }

    #[test]
    fn occurrences_skip_already_materialized() {
        let dates: Vec<_> = occurrence_dates(
            d("2024-01-15"),
            None,
            Frequency::Monthly,
            Some(d("2024-02-15")),
            d("2024-04-30"),
        )
        .collect();
        assert_eq!(dates, vec![d("2024-03-15"), d("2024-04-15")]);
    }

    #[test]
    fn target_before_start_yields_nothing() {
        assert!(occurrence_dates(d("2024-05-01"), None, Frequency::Daily, None, d("2024-04-30"))
            .next()
            .is_none());
    }

    #[test]
    fn installments_sum_to_total() {
        let parts = split_installments(100.0, 3);
        assert_eq!(parts, vec![33.33, 33.33, 33.34]);
        let sum_cents: i64 = parts.iter().map(|p| (p * 100.0).round() as i64).sum();
        assert_eq!(sum_cents, 10_000);

        assert_eq!(split_installments(42.5, 1), vec![42.5]);
        assert!(split_installments(10.0, 0).is_empty());
    }

    #[test]
    fn installments_are_monthly_from_purchase() {
        let dates = installment_dates(d("2024-01-31"), 3).unwrap();
        assert_eq!(dates, vec![d("2024-01-31"), d("2024-02-29"), d("2024-03-31")]);
    }
}
