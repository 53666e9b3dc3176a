//! Payment recording: the pending -> paid transition, optional proof
//! attachment, and the summary recompute that follows every installment
//! mutation.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::ledger::{recompute_summary, EstablishmentId, Expense, ExpenseSummary, Installment};
use crate::storage::{AttachmentStore, DocumentStore};

/// Outcome of a recorded payment: the updated installment and the expense
/// after its summary was re-derived.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub installment: Installment,
    pub expense: Expense,
    pub summary: ExpenseSummary,
}

/// Records installment payments and keeps the parent expense summary in
/// step with the installment records.
pub struct PaymentService;

impl PaymentService {
    /// Marks one installment paid. Proof upload, when requested, happens
    /// first and gates the state transition: an upload failure leaves the
    /// installment untouched. The installment write and the summary write
    /// are not atomic; a failure in between leaves the installment paid and
    /// the summary stale, which [`PaymentService::repair_summary`] fixes.
    ///
    /// Re-invoking on an already paid installment only attaches or replaces
    /// the proof; `paid_at` and `paid_by` are never overwritten.
    pub fn mark_paid(
        store: &dyn DocumentStore,
        attachments: &dyn AttachmentStore,
        scope: EstablishmentId,
        expense_id: Uuid,
        installment_id: Uuid,
        actor: Uuid,
        proof: Option<&[u8]>,
    ) -> Result<PaymentReceipt> {
        let mut installment = store
            .fetch_installment(scope, expense_id, installment_id)?
            .ok_or_else(|| LedgerError::NotFound(format!("installment {installment_id}")))?;

        let proof_reference = match proof {
            Some(bytes) => Some(Self::upload_proof(
                attachments,
                scope,
                expense_id,
                installment_id,
                bytes,
            )?),
            None => None,
        };

        installment.mark_paid(Utc::now(), actor, proof_reference);
        store.update_installment(scope, expense_id, &installment)?;
        tracing::info!(
            installment_id = %installment.id,
            number = installment.installment_number,
            "installment marked paid"
        );

        let (expense, summary) = Self::refresh_summary(store, scope, expense_id)?;
        Ok(PaymentReceipt {
            installment,
            expense,
            summary,
        })
    }

    /// Uploads and attaches a proof to an installment without touching its
    /// payment state. Usable before or after payment.
    pub fn attach_proof(
        store: &dyn DocumentStore,
        attachments: &dyn AttachmentStore,
        scope: EstablishmentId,
        expense_id: Uuid,
        installment_id: Uuid,
        bytes: &[u8],
    ) -> Result<String> {
        let mut installment = store
            .fetch_installment(scope, expense_id, installment_id)?
            .ok_or_else(|| LedgerError::NotFound(format!("installment {installment_id}")))?;
        let reference =
            Self::upload_proof(attachments, scope, expense_id, installment_id, bytes)?;
        installment.attach_proof(reference.clone());
        store.update_installment(scope, expense_id, &installment)?;
        Ok(reference)
    }

    /// Re-derives and persists the expense summary from the current
    /// installment set. Idempotent; the recovery path for a crash between
    /// an installment write and its summary write.
    pub fn repair_summary(
        store: &dyn DocumentStore,
        scope: EstablishmentId,
        expense_id: Uuid,
    ) -> Result<(Expense, ExpenseSummary)> {
        Self::refresh_summary(store, scope, expense_id)
    }

    /// Re-fetches the full installment set, recomputes, and persists. The
    /// re-read is deliberate: incrementing a cached counter would race with
    /// concurrent payments on sibling installments.
    fn refresh_summary(
        store: &dyn DocumentStore,
        scope: EstablishmentId,
        expense_id: Uuid,
    ) -> Result<(Expense, ExpenseSummary)> {
        let mut expense = store
            .fetch_expense(scope, expense_id)?
            .ok_or_else(|| LedgerError::NotFound(format!("expense {expense_id}")))?;
        let installments = store.list_installments(scope, expense_id)?;
        let summary = recompute_summary(&expense, &installments, today());
        summary.apply_to(&mut expense);
        store.update_expense(scope, &expense)?;
        Ok((expense, summary))
    }

    fn upload_proof(
        attachments: &dyn AttachmentStore,
        scope: EstablishmentId,
        expense_id: Uuid,
        installment_id: Uuid,
        bytes: &[u8],
    ) -> Result<String> {
        let hint = format!("{}_{}_{}", scope.0, expense_id, installment_id);
        attachments.upload(bytes, &hint)
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
