//! Abstract persistence collaborators. The ledger services only see these
//! traits, never a concrete backend; the embedded in-memory store and the
//! JSON file store both sit behind the same interface.

pub mod json_backend;
pub mod memory;

use uuid::Uuid;

use crate::errors::Result;
use crate::ledger::{EstablishmentId, Expense, Installment};

/// Generic document persistence for expenses and their installments.
/// Installments live under exactly one parent expense; every call is
/// scoped to an establishment.
pub trait DocumentStore: Send + Sync {
    fn insert_expense(&self, scope: EstablishmentId, expense: &Expense) -> Result<()>;
    fn fetch_expense(&self, scope: EstablishmentId, id: Uuid) -> Result<Option<Expense>>;
    /// Lists expenses ordered by creation time, newest first.
    fn list_expenses(&self, scope: EstablishmentId) -> Result<Vec<Expense>>;
    fn update_expense(&self, scope: EstablishmentId, expense: &Expense) -> Result<()>;
    fn delete_expense(&self, scope: EstablishmentId, id: Uuid) -> Result<()>;

    fn insert_installment(
        &self,
        scope: EstablishmentId,
        expense_id: Uuid,
        installment: &Installment,
    ) -> Result<()>;
    fn fetch_installment(
        &self,
        scope: EstablishmentId,
        expense_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Installment>>;
    /// Lists installments ordered by installment number.
    fn list_installments(
        &self,
        scope: EstablishmentId,
        expense_id: Uuid,
    ) -> Result<Vec<Installment>>;
    fn update_installment(
        &self,
        scope: EstablishmentId,
        expense_id: Uuid,
        installment: &Installment,
    ) -> Result<()>;
    fn delete_installments_of(&self, scope: EstablishmentId, expense_id: Uuid) -> Result<()>;
}

/// External object storage for payment-proof attachments. Returns a
/// retrievable reference for the stored blob.
pub trait AttachmentStore: Send + Sync {
    fn upload(&self, bytes: &[u8], path_hint: &str) -> Result<String>;
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
