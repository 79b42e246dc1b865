//! Ledger domain service.
//!
//! Builds donation and request records and hands them to the bank
//! repository, which commits each counter change together with its record.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    BloodBankRepository, BloodBankRepositoryError, Dashboard, DonationOutcome, LedgerCommand,
    LedgerQuery, LedgerRecordRepository, LedgerRecordRepositoryError,
};
use crate::domain::{
    BloodBank, BloodBankId, BloodType, DonationRecord, Error, Location, PostContent, RecordId,
    RequestDraft, RequestRecord, User,
};

/// Ledger service implementing the ledger driving ports.
#[derive(Clone)]
pub struct LedgerService<B, R> {
    banks: Arc<B>,
    records: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<B, R> LedgerService<B, R> {
    pub fn new(banks: Arc<B>, records: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            banks,
            records,
            clock,
        }
    }
}

impl<B, R> LedgerService<B, R>
where
    B: BloodBankRepository,
    R: LedgerRecordRepository,
{
    fn map_bank_error(error: BloodBankRepositoryError) -> Error {
        match error {
            BloodBankRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("blood bank repository unavailable: {message}"))
            }
            BloodBankRepositoryError::Query { message } => {
                Error::internal(format!("blood bank repository error: {message}"))
            }
            BloodBankRepositoryError::Inventory { message } => {
                Error::internal(format!("inventory invariant violated: {message}"))
            }
        }
    }

    fn map_record_error(error: LedgerRecordRepositoryError) -> Error {
        match error {
            LedgerRecordRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("ledger records unavailable: {message}"))
            }
            LedgerRecordRepositoryError::Query { message } => {
                Error::internal(format!("ledger record error: {message}"))
            }
        }
    }
}

#[async_trait]
impl<B, R> LedgerCommand for LedgerService<B, R>
where
    B: BloodBankRepository,
    R: LedgerRecordRepository,
{
    async fn post_donation(
        &self,
        donor: &User,
        bank_id: BloodBankId,
        content: PostContent,
    ) -> Result<DonationOutcome, Error> {
        let blood_type = donor.blood_type();
        let record = DonationRecord {
            id: RecordId::random(),
            donor_id: *donor.id(),
            blood_bank_id: bank_id,
            content,
            created_at: self.clock.utc(),
        };
        let Some(units) = self
            .banks
            .commit_donation(blood_type, &record)
            .await
            .map_err(Self::map_bank_error)?
        else {
            warn!(%bank_id, donor_id = %donor.id(), "donation ignored: no such bank");
            return Ok(DonationOutcome::BankNotFound);
        };
        info!(%bank_id, %blood_type, units, "donation recorded");
        Ok(DonationOutcome::Recorded(record))
    }

    async fn request_blood(
        &self,
        requester: &User,
        bank_id: BloodBankId,
        blood_type: BloodType,
    ) -> Result<RequestRecord, Error> {
        let draft = RequestDraft {
            id: RecordId::random(),
            requester_id: *requester.id(),
            blood_bank_id: bank_id,
            blood_type,
            created_at: self.clock.utc(),
        };
        let record = self
            .banks
            .commit_request(&draft)
            .await
            .map_err(Self::map_bank_error)?;
        if record.location == Location::unknown() {
            warn!(%bank_id, requester_id = %requester.id(), "request against unknown bank");
        } else {
            info!(%bank_id, %blood_type, fulfilled = record.fulfilled, "request adjudicated");
        }
        Ok(record)
    }
}

#[async_trait]
impl<B, R> LedgerQuery for LedgerService<B, R>
where
    B: BloodBankRepository,
    R: LedgerRecordRepository,
{
    async fn inventory_snapshot(&self, bank_id: BloodBankId) -> Result<BloodBank, Error> {
        self.banks
            .find_by_id(&bank_id)
            .await
            .map_err(Self::map_bank_error)?
            .ok_or_else(|| Error::not_found(format!("blood bank {bank_id} not found")))
    }

    async fn list_banks(&self) -> Result<Vec<BloodBank>, Error> {
        self.banks.list().await.map_err(Self::map_bank_error)
    }

    async fn dashboard(&self, viewer: &User) -> Result<Dashboard, Error> {
        let donations = self
            .records
            .list_donations()
            .await
            .map_err(Self::map_record_error)?;
        let requests = self
            .records
            .list_requests_at(viewer.location())
            .await
            .map_err(Self::map_record_error)?;
        Ok(Dashboard {
            user: viewer.clone(),
            donations,
            requests,
        })
    }
}

#[cfg(test)]
#[path = "ledger_service_tests.rs"]
mod tests;
