//! In-memory adapters for the driven ports.
//!
//! Used when no database URL is configured and by the HTTP integration
//! tests. State lives behind `tokio` locks and is lost on restart.

mod blood_bank_repository;
mod ledger_record_repository;
mod user_repository;

pub use blood_bank_repository::InMemoryBloodBankRepository;
pub use ledger_record_repository::InMemoryLedgerRecordRepository;
pub use user_repository::InMemoryUserRepository;
