//! Expense lifecycle: creation with schedule generation, lookups, metadata
//! edits, and deletion.

use chrono::Utc;
use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::ledger::{
    generate_schedule, recompute_summary, EstablishmentId, Expense, ExpensePatch, ExpenseStatus,
    ExpenseSummary, Installment, InstallmentStatus, NewExpense,
};
use crate::storage::DocumentStore;

/// Validated CRUD over expense aggregates and their installment schedules.
pub struct ExpenseService;

impl ExpenseService {
    /// Creates the expense and its full installment schedule. The expense
    /// document is written first, then each installment; the writes are not
    /// atomic, but a partial schedule is recoverable because the summary is
    /// always re-derived from whatever installments exist.
    pub fn create(
        store: &dyn DocumentStore,
        scope: EstablishmentId,
        input: NewExpense,
        actor: Uuid,
    ) -> Result<Expense> {
        let drafts = generate_schedule(
            input.total_amount,
            input.installment_count,
            input.first_due_date,
        )?;
        let now = Utc::now();
        let expense = Expense {
            id: Uuid::new_v4(),
            title: input.title,
            category: input.category,
            supplier: input.supplier,
            payment_method: input.payment_method,
            description: input.description,
            total_amount: input.total_amount,
            installment_count: input.installment_count,
            installment_value: input.total_amount / input.installment_count as f64,
            first_due_date: input.first_due_date,
            paid_installments: 0,
            remaining_amount: input.total_amount,
            status: ExpenseStatus::Active,
            created_by: actor,
            created_at: now,
            updated_at: now,
        };
        store.insert_expense(scope, &expense)?;
        tracing::info!(expense_id = %expense.id, count = drafts.len(), "expense created");

        for draft in drafts {
            let installment = Installment {
                id: Uuid::new_v4(),
                expense_id: expense.id,
                installment_number: draft.installment_number,
                amount: draft.amount,
                due_date: draft.due_date,
                status: InstallmentStatus::Pending,
                paid_at: None,
                paid_by: None,
                payment_proof: None,
                notes: String::new(),
                created_at: now,
                updated_at: now,
            };
            store.insert_installment(scope, expense.id, &installment)?;
        }
        Ok(expense)
    }

    pub fn get(
        store: &dyn DocumentStore,
        scope: EstablishmentId,
        expense_id: Uuid,
    ) -> Result<Expense> {
        store
            .fetch_expense(scope, expense_id)?
            .ok_or_else(|| LedgerError::NotFound(format!("expense {expense_id}")))
    }

    /// Lists the establishment's expenses, newest first.
    pub fn list(store: &dyn DocumentStore, scope: EstablishmentId) -> Result<Vec<Expense>> {
        store.list_expenses(scope)
    }

    /// Lists an expense's installments in natural order.
    pub fn installments_of(
        store: &dyn DocumentStore,
        scope: EstablishmentId,
        expense_id: Uuid,
    ) -> Result<Vec<Installment>> {
        store.list_installments(scope, expense_id)
    }

    /// Derives the current summary from the stored installment set without
    /// persisting anything.
    pub fn summary_of(
        store: &dyn DocumentStore,
        scope: EstablishmentId,
        expense_id: Uuid,
        reference: chrono::NaiveDate,
    ) -> Result<ExpenseSummary> {
        let expense = Self::get(store, scope, expense_id)?;
        let installments = store.list_installments(scope, expense_id)?;
        Ok(recompute_summary(&expense, &installments, reference))
    }

    /// Edits descriptive metadata only; summary and amount fields are
    /// untouched.
    pub fn update_metadata(
        store: &dyn DocumentStore,
        scope: EstablishmentId,
        expense_id: Uuid,
        patch: ExpensePatch,
    ) -> Result<Expense> {
        let mut expense = Self::get(store, scope, expense_id)?;
        if let Some(title) = patch.title {
            expense.title = title;
        }
        if let Some(category) = patch.category {
            expense.category = category;
        }
        if let Some(supplier) = patch.supplier {
            expense.supplier = Some(supplier);
        }
        if let Some(payment_method) = patch.payment_method {
            expense.payment_method = payment_method;
        }
        if let Some(description) = patch.description {
            expense.description = Some(description);
        }
        expense.touch();
        store.update_expense(scope, &expense)?;
        Ok(expense)
    }

    /// Removes the installments first, then the aggregate. Best effort: a
    /// failure in between leaves the expense present and still consistent.
    pub fn delete(
        store: &dyn DocumentStore,
        scope: EstablishmentId,
        expense_id: Uuid,
    ) -> Result<()> {
        store.delete_installments_of(scope, expense_id)?;
        store.delete_expense(scope, expense_id)?;
        tracing::info!(expense_id = %expense_id, "expense deleted");
        Ok(())
    }
}
