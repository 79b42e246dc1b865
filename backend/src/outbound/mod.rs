//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **memory**: process-local repositories for development and tests
//!
//! Adapters translate between domain types and storage representations and
//! provide the per-bank atomicity the ledger relies on. They hold no business
//! rules.

pub mod memory;
pub mod persistence;
