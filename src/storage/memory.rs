use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use super::{AttachmentStore, DocumentStore};
use crate::errors::{LedgerError, Result};
use crate::ledger::{EstablishmentId, Expense, Installment};

/// Embedded backend keeping every record in process memory. Doubles as the
/// test double for the persistence collaborator.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Records>,
}

#[derive(Default)]
struct Records {
    expenses: HashMap<(EstablishmentId, Uuid), Expense>,
    installments: HashMap<(EstablishmentId, Uuid), Vec<Installment>>,
    attachments: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored attachments, for test assertions.
    pub fn attachment_count(&self) -> usize {
        self.inner.lock().expect("memory store poisoned").attachments.len()
    }
}

impl DocumentStore for MemoryStore {
    fn insert_expense(&self, scope: EstablishmentId, expense: &Expense) -> Result<()> {
        let mut records = self.inner.lock().expect("memory store poisoned");
        records.expenses.insert((scope, expense.id), expense.clone());
        Ok(())
    }

    fn fetch_expense(&self, scope: EstablishmentId, id: Uuid) -> Result<Option<Expense>> {
        let records = self.inner.lock().expect("memory store poisoned");
        Ok(records.expenses.get(&(scope, id)).cloned())
    }

    fn list_expenses(&self, scope: EstablishmentId) -> Result<Vec<Expense>> {
        let records = self.inner.lock().expect("memory store poisoned");
        let mut expenses: Vec<Expense> = records
            .expenses
            .iter()
            .filter(|((s, _), _)| *s == scope)
            .map(|(_, e)| e.clone())
            .collect();
        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(expenses)
    }

    fn update_expense(&self, scope: EstablishmentId, expense: &Expense) -> Result<()> {
        let mut records = self.inner.lock().expect("memory store poisoned");
        match records.expenses.get_mut(&(scope, expense.id)) {
            Some(slot) => {
                *slot = expense.clone();
                Ok(())
            }
            None => Err(LedgerError::NotFound(format!("expense {}", expense.id))),
        }
    }

    fn delete_expense(&self, scope: EstablishmentId, id: Uuid) -> Result<()> {
        let mut records = self.inner.lock().expect("memory store poisoned");
        records.expenses.remove(&(scope, id));
        Ok(())
    }

    fn insert_installment(
        &self,
        scope: EstablishmentId,
        expense_id: Uuid,
        installment: &Installment,
    ) -> Result<()> {
        let mut records = self.inner.lock().expect("memory store poisoned");
        records
            .installments
            .entry((scope, expense_id))
            .or_default()
            .push(installment.clone());
        Ok(())
    }

    fn fetch_installment(
        &self,
        scope: EstablishmentId,
        expense_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Installment>> {
        let records = self.inner.lock().expect("memory store poisoned");
        Ok(records
            .installments
            .get(&(scope, expense_id))
            .and_then(|set| set.iter().find(|i| i.id == id).cloned()))
    }

    fn list_installments(
        &self,
        scope: EstablishmentId,
        expense_id: Uuid,
    ) -> Result<Vec<Installment>> {
        let records = self.inner.lock().expect("memory store poisoned");
        let mut installments = records
            .installments
            .get(&(scope, expense_id))
            .cloned()
            .unwrap_or_default();
        installments.sort_by_key(|i| i.installment_number);
        Ok(installments)
    }

    fn update_installment(
        &self,
        scope: EstablishmentId,
        expense_id: Uuid,
        installment: &Installment,
    ) -> Result<()> {
        let mut records = self.inner.lock().expect("memory store poisoned");
        let set = records
            .installments
            .get_mut(&(scope, expense_id))
            .ok_or_else(|| LedgerError::NotFound(format!("expense {expense_id}")))?;
        let slot = set
            .iter_mut()
            .find(|i| i.id == installment.id)
            .ok_or_else(|| LedgerError::NotFound(format!("installment {}", installment.id)))?;
        *slot = installment.clone();
        Ok(())
    }

    fn delete_installments_of(&self, scope: EstablishmentId, expense_id: Uuid) -> Result<()> {
        let mut records = self.inner.lock().expect("memory store poisoned");
        records.installments.remove(&(scope, expense_id));
        Ok(())
    }
}

impl AttachmentStore for MemoryStore {
    fn upload(&self, bytes: &[u8], path_hint: &str) -> Result<String> {
        let mut records = self.inner.lock().expect("memory store poisoned");
        let reference = format!("mem://{path_hint}");
        records.attachments.insert(reference.clone(), bytes.to_vec());
        Ok(reference)
    }
}

/// Attachment store that always fails, for exercising the proof-upload
/// failure path in tests.
pub struct FailingAttachmentStore;

impl AttachmentStore for FailingAttachmentStore {
    fn upload(&self, _bytes: &[u8], path_hint: &str) -> Result<String> {
        Err(LedgerError::ProofUpload(format!(
            "upload rejected for {path_hint}"
        )))
    }
}
