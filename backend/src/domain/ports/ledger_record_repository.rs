//! Read port for the append-only donation and request records.
//!
//! Records are written by [`super::BloodBankRepository`] in the same unit of
//! work as the inventory change they describe.

use async_trait::async_trait;

use crate::domain::{DonationRecord, Location, RequestRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ledger record adapters.
    pub enum LedgerRecordRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "ledger record repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "ledger record repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerRecordRepository: Send + Sync {
    /// Every donation post, newest first.
    async fn list_donations(&self) -> Result<Vec<DonationRecord>, LedgerRecordRepositoryError>;

    /// Requests recorded at exactly `location`, newest first.
    async fn list_requests_at(
        &self,
        location: &Location,
    ) -> Result<Vec<RequestRecord>, LedgerRecordRepositoryError>;
}
