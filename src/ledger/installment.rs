use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dates::is_overdue;

/// Persisted lifecycle state. `Paid` is terminal; there is no un-pay.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    Pending,
    Paid,
}

/// View-level state derived from the stored status and a reference date.
/// "Overdue" exists only here; the persisted status stays `Pending` until
/// the installment is explicitly paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    Pending,
    Overdue,
    Paid,
}

/// One scheduled, individually payable portion of an expense. Belongs to
/// exactly one expense and is never moved or re-created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installment {
    pub id: Uuid,
    pub expense_id: Uuid,
    pub installment_number: u32,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: InstallmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_by: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_proof: Option<String>,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Installment {
    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }

    /// Classifies the installment for display against `reference`.
    pub fn display_status(&self, reference: NaiveDate) -> DisplayStatus {
        match self.status {
            InstallmentStatus::Paid => DisplayStatus::Paid,
            InstallmentStatus::Pending => {
                if is_overdue(self.due_date, reference) {
                    DisplayStatus::Overdue
                } else {
                    DisplayStatus::Pending
                }
            }
        }
    }

    /// Applies the pending -> paid transition. Once paid, `paid_at` and
    /// `paid_by` are frozen; repeated calls only attach or replace the
    /// proof reference.
    pub fn mark_paid(&mut self, paid_at: DateTime<Utc>, paid_by: Uuid, proof: Option<String>) {
        if self.status == InstallmentStatus::Pending {
            self.status = InstallmentStatus::Paid;
            self.paid_at = Some(paid_at);
            self.paid_by = Some(paid_by);
        }
        if proof.is_some() {
            self.payment_proof = proof;
        }
        self.updated_at = Utc::now();
    }

    pub fn attach_proof(&mut self, proof: String) {
        self.payment_proof = Some(proof);
        self.updated_at = Utc::now();
    }
}
