//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are called by inbound adapters and
//! implemented by domain services. Driven ports (`*Repository`) are called by
//! services and implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod blood_bank_repository;
mod identity_command;
mod identity_query;
mod ledger_command;
mod ledger_query;
mod ledger_record_repository;
mod user_repository;

#[cfg(test)]
pub use blood_bank_repository::MockBloodBankRepository;
pub use blood_bank_repository::{BloodBankRepository, BloodBankRepositoryError};
#[cfg(test)]
pub use identity_command::MockIdentityCommand;
pub use identity_command::IdentityCommand;
#[cfg(test)]
pub use identity_query::MockIdentityQuery;
pub use identity_query::{DonorSearch, IdentityQuery};
#[cfg(test)]
pub use ledger_command::MockLedgerCommand;
pub use ledger_command::{DonationOutcome, LedgerCommand};
#[cfg(test)]
pub use ledger_query::MockLedgerQuery;
pub use ledger_query::{Dashboard, LedgerQuery};
#[cfg(test)]
pub use ledger_record_repository::MockLedgerRecordRepository;
pub use ledger_record_repository::{LedgerRecordRepository, LedgerRecordRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserAccount, UserPersistenceError, UserRepository};
