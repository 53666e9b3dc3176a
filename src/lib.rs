#![doc(test(attr(deny(warnings))))]

//! Expense Core turns a lump-sum expense into a schedule of dated,
//! individually payable installments, tracks their payment state, and keeps
//! the expense summary (paid count, remaining amount, overall status)
//! consistent with the installment records.

pub mod errors;
pub mod ledger;
pub mod services;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}
