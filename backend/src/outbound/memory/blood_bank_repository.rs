//! `BloodBankRepository` holding each bank behind its own mutex.
//!
//! The outer map is only write-locked while seeding. Mutations take a read
//! lock long enough to clone the bank's handle, then serialise on that
//! bank's mutex alone, so banks never contend with each other.
//!
//! A mutation changes a copy of the counters, inserts its record into the
//! shared [`InMemoryLedgerRecordRepository`], and only then stores the copy.
//! A failed insert leaves the bank as it was.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::ports::{
    BloodBankRepository, BloodBankRepositoryError, LedgerRecordRepositoryError,
};
use crate::domain::{
    BankSeed, BloodBank, BloodBankId, BloodType, DonationRecord, Inventory, Location,
    RequestDraft, RequestRecord,
};

use super::InMemoryLedgerRecordRepository;

type BankHandle = Arc<Mutex<BloodBank>>;

#[derive(Debug, Clone, Default)]
pub struct InMemoryBloodBankRepository {
    banks: Arc<RwLock<HashMap<BloodBankId, BankHandle>>>,
    records: InMemoryLedgerRecordRepository,
}

impl InMemoryBloodBankRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing banks, e.g. with non-zero inventories.
    #[must_use]
    pub fn with_banks(banks: impl IntoIterator<Item = BloodBank>) -> Self {
        let banks = banks
            .into_iter()
            .map(|bank| (bank.id(), Arc::new(Mutex::new(bank))))
            .collect();
        Self {
            banks: Arc::new(RwLock::new(banks)),
            records: InMemoryLedgerRecordRepository::new(),
        }
    }

    /// The record store this repository writes to, for reading records back.
    #[must_use]
    pub fn records(&self) -> InMemoryLedgerRecordRepository {
        self.records.clone()
    }

    async fn handle(&self, id: &BloodBankId) -> Option<BankHandle> {
        self.banks.read().await.get(id).cloned()
    }
}

fn record_error(error: LedgerRecordRepositoryError) -> BloodBankRepositoryError {
    BloodBankRepositoryError::query(error.to_string())
}

#[async_trait]
impl BloodBankRepository for InMemoryBloodBankRepository {
    async fn find_by_id(
        &self,
        id: &BloodBankId,
    ) -> Result<Option<BloodBank>, BloodBankRepositoryError> {
        match self.handle(id).await {
            Some(handle) => Ok(Some(handle.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<BloodBank>, BloodBankRepositoryError> {
        let handles: Vec<BankHandle> = self.banks.read().await.values().cloned().collect();
        let mut banks = Vec::with_capacity(handles.len());
        for handle in handles {
            banks.push(handle.lock().await.clone());
        }
        banks.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(banks)
    }

    async fn commit_donation(
        &self,
        blood_type: BloodType,
        record: &DonationRecord,
    ) -> Result<Option<u32>, BloodBankRepositoryError> {
        let Some(handle) = self.handle(&record.blood_bank_id).await else {
            return Ok(None);
        };
        let mut bank = handle.lock().await;
        let mut inventory = *bank.inventory();
        let units = inventory
            .donate(blood_type)
            .map_err(|err| BloodBankRepositoryError::inventory(err.to_string()))?;

        self.records
            .insert_donation(record)
            .await
            .map_err(record_error)?;
        *bank.inventory_mut() = inventory;
        Ok(Some(units))
    }

    async fn commit_request(
        &self,
        draft: &RequestDraft,
    ) -> Result<RequestRecord, BloodBankRepositoryError> {
        let Some(handle) = self.handle(&draft.blood_bank_id).await else {
            let record = draft.unmatched();
            self.records
                .insert_request(&record)
                .await
                .map_err(record_error)?;
            return Ok(record);
        };
        let mut bank = handle.lock().await;
        let mut inventory = *bank.inventory();
        let fulfilment = inventory.request(draft.blood_type);
        let record = draft.adjudicated(fulfilment, bank.location().clone());

        self.records
            .insert_request(&record)
            .await
            .map_err(record_error)?;
        *bank.inventory_mut() = inventory;
        Ok(record)
    }

    async fn seed(&self, seeds: &[BankSeed]) -> Result<(), BloodBankRepositoryError> {
        let mut banks = self.banks.write().await;
        let mut names = Vec::with_capacity(banks.len());
        for handle in banks.values() {
            names.push(handle.lock().await.name().to_owned());
        }

        for seed in seeds {
            if names.iter().any(|name| name == seed.name) {
                continue;
            }
            let location = Location::new(seed.location).map_err(|err| {
                BloodBankRepositoryError::query(format!("invalid seed location: {err}"))
            })?;
            let bank = BloodBank::new(
                BloodBankId::random(),
                seed.name,
                location,
                Inventory::empty(),
            );
            names.push(seed.name.to_owned());
            banks.insert(bank.id(), Arc::new(Mutex::new(bank)));
        }
        Ok(())
    }
}
