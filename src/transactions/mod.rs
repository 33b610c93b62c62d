//! The transactions browser: filtered listing, CSV export, and dispatching
//! report jobs to the functions backend.

mod export;
mod filter;
mod models;
mod page;
mod query;
mod report;

pub use export::export_transactions_csv;
pub use page::{TransactionsState, get_transactions_page};
pub use report::{TransactionReportState, send_transaction_report};
