//! Port for blood bank persistence and atomic inventory mutation.
//!
//! The ledger rules live in [`crate::domain::Inventory`]. Adapters supply
//! the atomicity: [`BloodBankRepository::commit_donation`] and
//! [`BloodBankRepository::commit_request`] load, mutate and store a bank's
//! counters and append the matching record as one unit of work. Either both
//! land or neither does. Mutations of the same bank serialise; different
//! banks never contend.

use async_trait::async_trait;

use crate::domain::{
    BankSeed, BloodBank, BloodBankId, BloodType, DonationRecord, RequestDraft, RequestRecord,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by blood bank repository adapters.
    pub enum BloodBankRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "blood bank repository connection failed: {message}",
        /// Query, mutation or record insert failed during execution.
        Query { message: String } =>
            "blood bank repository query failed: {message}",
        /// Stored or resulting counters violate inventory invariants.
        Inventory { message: String } =>
            "blood bank inventory rejected: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BloodBankRepository: Send + Sync {
    /// Fetch one bank with a consistent snapshot of its counters.
    async fn find_by_id(
        &self,
        id: &BloodBankId,
    ) -> Result<Option<BloodBank>, BloodBankRepositoryError>;

    /// All banks ordered by name.
    async fn list(&self) -> Result<Vec<BloodBank>, BloodBankRepositoryError>;

    /// Credit one unit of `blood_type` to `record.blood_bank_id` and append
    /// `record`. Returns the new count, or `Ok(None)` when the bank does not
    /// exist, in which case nothing is written.
    async fn commit_donation(
        &self,
        blood_type: BloodType,
        record: &DonationRecord,
    ) -> Result<Option<u32>, BloodBankRepositoryError>;

    /// Adjudicate `draft` against its bank and append the resulting record.
    ///
    /// A missing bank changes no counter and appends
    /// [`RequestDraft::unmatched`].
    async fn commit_request(
        &self,
        draft: &RequestDraft,
    ) -> Result<RequestRecord, BloodBankRepositoryError>;

    /// Create any seed bank whose name is not yet present, with zero counts.
    /// Existing banks are left untouched.
    async fn seed(&self, seeds: &[BankSeed]) -> Result<(), BloodBankRepositoryError>;
}
