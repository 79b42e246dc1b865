//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL through `diesel-async` and `bb8` connection pooling.
//!
//! Repositories only translate between Diesel rows and domain types; the
//! ledger rules stay in the domain. Row structs (`models.rs`) and table
//! definitions (`schema.rs`) never leave this module, and every database
//! failure is mapped onto the owning port's error type.
//!
//! # Example
//!
//! ```no_run
//! use saveablood::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), saveablood::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/saveablood")).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_blood_bank_repository;
mod diesel_ledger_record_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_blood_bank_repository::DieselBloodBankRepository;
pub use diesel_ledger_record_repository::DieselLedgerRecordRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
