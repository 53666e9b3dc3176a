//! Ledger domain models and the pure schedule/summary logic.

pub mod dates;
pub mod expense;
pub mod installment;
pub mod schedule;
pub mod summary;

pub use dates::{add_months, is_overdue};
pub use expense::{EstablishmentId, Expense, ExpensePatch, ExpenseStatus, NewExpense};
pub use installment::{DisplayStatus, Installment, InstallmentStatus};
pub use schedule::{generate_schedule, InstallmentDraft, MAX_INSTALLMENTS};
pub use summary::{recompute_summary, ExpenseSummary};
