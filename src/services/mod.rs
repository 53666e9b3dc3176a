//! Validated operations over the stores: expense lifecycle and payment
//! recording. Services own the ordering guarantees the pure ledger logic
//! relies on (most importantly re-reading the installment set before every
//! summary recompute).

pub mod expense_service;
pub mod payment_service;

pub use expense_service::ExpenseService;
pub use payment_service::{PaymentReceipt, PaymentService};
