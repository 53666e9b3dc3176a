use chrono::NaiveDate;

use super::dates::add_months;
use crate::errors::{LedgerError, Result};

pub const MAX_INSTALLMENTS: u32 = 120;

/// An installment as produced by the generator, before identifiers and
/// timestamps are assigned at persistence time.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentDraft {
    pub installment_number: u32,
    pub amount: f64,
    pub due_date: NaiveDate,
}

/// Splits `total_amount` into `count` monthly installments starting at
/// `first_due_date`. Every installment carries `total_amount / count`,
/// including the last, so the sum may differ from the total by a rounding
/// remainder; no absorption step is applied.
pub fn generate_schedule(
    total_amount: f64,
    count: u32,
    first_due_date: NaiveDate,
) -> Result<Vec<InstallmentDraft>> {
    if !total_amount.is_finite() || total_amount <= 0.0 {
        return Err(LedgerError::InvalidSchedule(format!(
            "total amount must be positive, got {total_amount}"
        )));
    }
    if count == 0 {
        return Err(LedgerError::InvalidSchedule(
            "installment count must be at least 1".into(),
        ));
    }
    if count > MAX_INSTALLMENTS {
        return Err(LedgerError::InvalidSchedule(format!(
            "installment count {count} exceeds the maximum of {MAX_INSTALLMENTS}"
        )));
    }

    let amount = total_amount / count as f64;
    let drafts = (0..count)
        .map(|i| InstallmentDraft {
            installment_number: i + 1,
            amount,
            due_date: add_months(first_due_date, i),
        })
        .collect();
    Ok(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn generates_monthly_sequence_with_equal_amounts() {
        let drafts = generate_schedule(1200.0, 12, date(2024, 1, 15)).unwrap();
        assert_eq!(drafts.len(), 12);
        for (i, draft) in drafts.iter().enumerate() {
            assert_eq!(draft.installment_number, i as u32 + 1);
            assert!((draft.amount - 100.0).abs() < f64::EPSILON);
        }
        assert_eq!(drafts[0].due_date, date(2024, 1, 15));
        assert_eq!(drafts[1].due_date, date(2024, 2, 15));
        assert_eq!(drafts[11].due_date, date(2024, 12, 15));
    }

    #[test]
    fn due_dates_are_strictly_increasing() {
        let drafts = generate_schedule(900.0, 36, date(2023, 12, 31)).unwrap();
        for pair in drafts.windows(2) {
            assert!(pair[0].due_date < pair[1].due_date);
        }
    }

    #[test]
    fn month_end_due_dates_clamp_into_short_months() {
        let drafts = generate_schedule(200.0, 2, date(2024, 1, 31)).unwrap();
        assert_eq!(drafts[0].due_date, date(2024, 1, 31));
        assert_eq!(drafts[1].due_date, date(2024, 2, 29));
    }

    #[test]
    fn inexact_division_spreads_evenly_without_absorption() {
        let drafts = generate_schedule(100.0, 3, date(2024, 1, 1)).unwrap();
        let total: f64 = drafts.iter().map(|d| d.amount).sum();
        assert!((total - 100.0).abs() < 3.0 * f64::EPSILON * 100.0);
        assert!((drafts[2].amount - drafts[0].amount).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(matches!(
            generate_schedule(0.0, 3, date(2024, 1, 1)),
            Err(LedgerError::InvalidSchedule(_))
        ));
        assert!(matches!(
            generate_schedule(-10.0, 3, date(2024, 1, 1)),
            Err(LedgerError::InvalidSchedule(_))
        ));
        assert!(matches!(
            generate_schedule(f64::NAN, 3, date(2024, 1, 1)),
            Err(LedgerError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_counts() {
        assert!(matches!(
            generate_schedule(100.0, 0, date(2024, 1, 1)),
            Err(LedgerError::InvalidSchedule(_))
        ));
        assert!(matches!(
            generate_schedule(100.0, 121, date(2024, 1, 1)),
            Err(LedgerError::InvalidSchedule(_))
        ));
        assert!(generate_schedule(100.0, 120, date(2024, 1, 1)).is_ok());
    }
}
