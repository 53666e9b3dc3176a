//! Aggregation of an expense's summary fields from its installment records.

use chrono::NaiveDate;

use super::expense::{Expense, ExpenseStatus};
use super::installment::{DisplayStatus, Installment};

/// Snapshot derived from the current installment set. `paid_installments`,
/// `remaining_amount`, and `status` are the fields persisted back onto the
/// expense; the rest are read-side conveniences.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSummary {
    pub total_installments: u32,
    pub paid_installments: u32,
    pub pending_installments: u32,
    pub overdue_installments: u32,
    pub paid_amount: f64,
    pub remaining_amount: f64,
    pub progress_percent: u32,
    pub status: ExpenseStatus,
}

/// Recomputes the summary from the full installment set. Pure and
/// idempotent: safe to re-run at any time to repair a stale summary.
/// Business-state anomalies (negative remainder, paid count exceeding the
/// configured installment count) are logged and clamped, never returned as
/// errors, so the summary stays displayable.
pub fn recompute_summary(
    expense: &Expense,
    installments: &[Installment],
    reference: NaiveDate,
) -> ExpenseSummary {
    let total_installments = installments.len() as u32;
    let paid_installments = installments.iter().filter(|i| i.is_paid()).count() as u32;
    let overdue_installments = installments
        .iter()
        .filter(|i| i.display_status(reference) == DisplayStatus::Overdue)
        .count() as u32;
    let pending_installments = total_installments - paid_installments;

    if paid_installments > expense.installment_count {
        tracing::warn!(
            expense_id = %expense.id,
            paid = paid_installments,
            expected = expense.installment_count,
            "paid installment count exceeds the expense's installment count"
        );
    }

    let paid_amount: f64 = installments
        .iter()
        .filter(|i| i.is_paid())
        .map(|i| i.amount)
        .sum();
    let raw_remaining = expense.total_amount - paid_amount;
    if raw_remaining < 0.0 {
        tracing::warn!(
            expense_id = %expense.id,
            remaining = raw_remaining,
            "negative remaining amount clamped to zero"
        );
    }
    let remaining_amount = raw_remaining.max(0.0);

    let progress_percent = if total_installments > 0 {
        ((paid_installments as f64 / total_installments as f64) * 100.0).round() as u32
    } else {
        0
    };
    let status = if total_installments > 0 && paid_installments == total_installments {
        ExpenseStatus::Completed
    } else {
        ExpenseStatus::Active
    };

    ExpenseSummary {
        total_installments,
        paid_installments,
        pending_installments,
        overdue_installments,
        paid_amount,
        remaining_amount,
        progress_percent,
        status,
    }
}

impl ExpenseSummary {
    /// Writes the persisted summary fields back onto the expense.
    pub fn apply_to(&self, expense: &mut Expense) {
        expense.paid_installments = self.paid_installments;
        expense.remaining_amount = self.remaining_amount;
        expense.status = self.status;
        expense.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::installment::InstallmentStatus;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(total: f64, count: u32) -> Expense {
        let now = Utc::now();
        Expense {
            id: Uuid::new_v4(),
            title: "Oven".into(),
            category: "equipment".into(),
            supplier: None,
            payment_method: "card".into(),
            description: None,
            total_amount: total,
            installment_count: count,
            installment_value: total / count as f64,
            first_due_date: date(2024, 1, 15),
            paid_installments: 0,
            remaining_amount: total,
            status: ExpenseStatus::Active,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    fn installments_for(expense: &Expense) -> Vec<Installment> {
        let now = Utc::now();
        (1..=expense.installment_count)
            .map(|n| Installment {
                id: Uuid::new_v4(),
                expense_id: expense.id,
                installment_number: n,
                amount: expense.installment_value,
                due_date: crate::ledger::dates::add_months(expense.first_due_date, n - 1),
                status: InstallmentStatus::Pending,
                paid_at: None,
                paid_by: None,
                payment_proof: None,
                notes: String::new(),
                created_at: now,
                updated_at: now,
            })
            .collect()
    }

    #[test]
    fn counts_and_amounts_follow_paid_installments() {
        let expense = expense(1200.0, 12);
        let mut installments = installments_for(&expense);
        for i in installments.iter_mut().take(3) {
            i.mark_paid(Utc::now(), Uuid::new_v4(), None);
        }
        let summary = recompute_summary(&expense, &installments, date(2024, 1, 1));
        assert_eq!(summary.paid_installments, 3);
        assert_eq!(summary.pending_installments, 9);
        assert!((summary.paid_amount - 300.0).abs() < 1e-9);
        assert!((summary.remaining_amount - 900.0).abs() < 1e-9);
        assert_eq!(summary.progress_percent, 25);
        assert_eq!(summary.status, ExpenseStatus::Active);
    }

    #[test]
    fn completes_exactly_when_every_installment_is_paid() {
        let expense = expense(1200.0, 12);
        let mut installments = installments_for(&expense);
        for i in installments.iter_mut().take(11) {
            i.mark_paid(Utc::now(), Uuid::new_v4(), None);
        }
        let before = recompute_summary(&expense, &installments, date(2024, 1, 1));
        assert_eq!(before.status, ExpenseStatus::Active);

        installments[11].mark_paid(Utc::now(), Uuid::new_v4(), None);
        let after = recompute_summary(&expense, &installments, date(2024, 1, 1));
        assert_eq!(after.status, ExpenseStatus::Completed);
        assert!(after.remaining_amount.abs() < 1e-9);
        assert_eq!(after.progress_percent, 100);
    }

    #[test]
    fn recompute_is_idempotent() {
        let expense = expense(300.0, 3);
        let mut installments = installments_for(&expense);
        installments[0].mark_paid(Utc::now(), Uuid::new_v4(), None);
        let reference = date(2024, 2, 1);
        let first = recompute_summary(&expense, &installments, reference);
        let second = recompute_summary(&expense, &installments, reference);
        assert_eq!(first, second);
    }

    #[test]
    fn overdue_count_tracks_the_reference_date() {
        let expense = expense(300.0, 3);
        let installments = installments_for(&expense);
        let before_any = recompute_summary(&expense, &installments, date(2024, 1, 15));
        assert_eq!(before_any.overdue_installments, 0);
        let after_two = recompute_summary(&expense, &installments, date(2024, 3, 1));
        assert_eq!(after_two.overdue_installments, 2);
    }

    #[test]
    fn negative_remainder_is_clamped_not_propagated() {
        let expense = expense(100.0, 2);
        let mut installments = installments_for(&expense);
        for i in installments.iter_mut() {
            i.amount = 80.0;
            i.mark_paid(Utc::now(), Uuid::new_v4(), None);
        }
        let summary = recompute_summary(&expense, &installments, date(2024, 1, 1));
        assert_eq!(summary.remaining_amount, 0.0);
    }

    #[test]
    fn empty_installment_set_stays_active() {
        let expense = expense(100.0, 2);
        let summary = recompute_summary(&expense, &[], date(2024, 1, 1));
        assert_eq!(summary.status, ExpenseStatus::Active);
        assert_eq!(summary.progress_percent, 0);
        assert!((summary.remaining_amount - 100.0).abs() < 1e-9);
    }
}
