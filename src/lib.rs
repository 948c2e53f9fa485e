#![doc(test(attr(deny(warnings))))]

//! Household budget core: recurring obligations normalised to monthly figures,
//! month-scoped paid/unpaid tracking, and the storage and shell around them.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod months;
pub mod payments;
pub mod storage;
pub mod utils;

pub use aggregate::{monthly_equivalent, total_monthly, MonthScope};
pub use errors::{BudgetError, Result};
pub use months::{month_options, year_month_options, MonthOption};
pub use payments::{PaidKey, PaidLedgerStore, PaymentTracker, StatusFilter};

use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT.call_once(|| {
        utils::init_tracing();
        tracing::info!("fambudget core initialized");
    });
}
