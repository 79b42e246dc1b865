//! Append-only `LedgerRecordRepository` kept in process memory.
//!
//! Writes go through [`super::InMemoryBloodBankRepository`], which inserts
//! records while it holds the affected bank's mutex.

use std::sync::Arc;
#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{LedgerRecordRepository, LedgerRecordRepositoryError};
use crate::domain::{DonationRecord, Location, RecordId, RequestRecord};

#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerRecordRepository {
    donations: Arc<RwLock<Vec<DonationRecord>>>,
    requests: Arc<RwLock<Vec<RequestRecord>>>,
    #[cfg(test)]
    reject_writes: Arc<AtomicBool>,
}

impl InMemoryLedgerRecordRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later insert fail as a storage error would.
    #[cfg(test)]
    pub(crate) fn reject_writes(&self) {
        self.reject_writes.store(true, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), LedgerRecordRepositoryError> {
        #[cfg(test)]
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(LedgerRecordRepositoryError::query("record store rejected the write"));
        }
        Ok(())
    }

    /// Append a donation post. Record ids are unique across the store.
    pub(super) async fn insert_donation(
        &self,
        record: &DonationRecord,
    ) -> Result<(), LedgerRecordRepositoryError> {
        self.check_writable()?;
        let mut donations = self.donations.write().await;
        if donations.iter().any(|existing| existing.id == record.id) {
            return Err(duplicate(record.id));
        }
        donations.push(record.clone());
        Ok(())
    }

    /// Append a request record. Record ids are unique across the store.
    pub(super) async fn insert_request(
        &self,
        record: &RequestRecord,
    ) -> Result<(), LedgerRecordRepositoryError> {
        self.check_writable()?;
        let mut requests = self.requests.write().await;
        if requests.iter().any(|existing| existing.id == record.id) {
            return Err(duplicate(record.id));
        }
        requests.push(record.clone());
        Ok(())
    }
}

fn duplicate(id: RecordId) -> LedgerRecordRepositoryError {
    LedgerRecordRepositoryError::query(format!("record {id} already exists"))
}

/// Newest first; records sharing a timestamp keep reverse append order.
fn newest_first<T: Clone>(records: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut ordered: Vec<T> = records.iter().rev().cloned().collect();
    ordered.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    ordered
}

#[async_trait]
impl LedgerRecordRepository for InMemoryLedgerRecordRepository {
    async fn list_donations(&self) -> Result<Vec<DonationRecord>, LedgerRecordRepositoryError> {
        let donations = self.donations.read().await;
        Ok(newest_first(&donations, |record| record.created_at))
    }

    async fn list_requests_at(
        &self,
        location: &Location,
    ) -> Result<Vec<RequestRecord>, LedgerRecordRepositoryError> {
        let requests = self.requests.read().await;
        let matching: Vec<RequestRecord> = requests
            .iter()
            .filter(|record| &record.location == location)
            .cloned()
            .collect();
        Ok(newest_first(&matching, |record| record.created_at))
    }
}
