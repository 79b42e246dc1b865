//! Driving port for the two ledger mutations.
//!
//! The caller's role is trusted: the HTTP boundary only forwards donors to
//! [`LedgerCommand::post_donation`] and recipients to
//! [`LedgerCommand::request_blood`].

use async_trait::async_trait;

use crate::domain::{BloodBankId, BloodType, DonationRecord, Error, PostContent, RequestRecord, User};

/// Outcome of a donation post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonationOutcome {
    /// The donor's type was credited and a record written.
    Recorded(DonationRecord),
    /// No such bank; nothing was changed or written.
    BankNotFound,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerCommand: Send + Sync {
    /// Credit one unit of the donor's own blood type to `bank_id`.
    async fn post_donation(
        &self,
        donor: &User,
        bank_id: BloodBankId,
        content: PostContent,
    ) -> Result<DonationOutcome, Error>;

    /// Take one unit of `blood_type` from `bank_id` if available.
    ///
    /// Always writes a [`RequestRecord`]; a missing bank yields an
    /// unfulfilled record at the unknown location.
    async fn request_blood(
        &self,
        requester: &User,
        bank_id: BloodBankId,
        blood_type: BloodType,
    ) -> Result<RequestRecord, Error>;
}
