use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tenant scope for every ledger operation. Replaces the original system's
/// ambient "current establishment" with an explicit parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EstablishmentId(pub Uuid);

impl EstablishmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EstablishmentId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Active,
    Completed,
}

/// Aggregate root: an obligation to pay `total_amount` over a fixed number
/// of monthly installments. Summary fields (`paid_installments`,
/// `remaining_amount`, `status`) are owned by the aggregator and must never
/// be edited directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub total_amount: f64,
    pub installment_count: u32,
    pub installment_value: f64,
    pub first_due_date: NaiveDate,
    pub paid_installments: u32,
    pub remaining_amount: f64,
    pub status: ExpenseStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Caller-supplied input for creating an expense; everything else on
/// [`Expense`] is derived at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub supplier: Option<String>,
    pub payment_method: String,
    #[serde(default)]
    pub description: Option<String>,
    pub total_amount: f64,
    pub installment_count: u32,
    pub first_due_date: NaiveDate,
}

/// Metadata edits applied to an existing expense. Summary and amount fields
/// are deliberately absent: installment amounts are fixed at creation and
/// summary fields belong to the aggregator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpensePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
