//! PostgreSQL-backed `LedgerRecordRepository` implementation using Diesel ORM.
//!
//! Rows are inserted by `DieselBloodBankRepository` inside its mutation
//! transactions; this adapter only reads them back.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::error;

use crate::domain::ports::{LedgerRecordRepository, LedgerRecordRepositoryError};
use crate::domain::{
    BloodBankId, BloodType, DonationRecord, Location, PostContent, RecordId, RequestRecord, UserId,
};

use super::error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{BloodPostRow, BloodRequestRow};
use super::pool::{DbPool, PoolError};
use super::schema::{blood_posts, blood_requests};

/// Diesel-backed implementation of the `LedgerRecordRepository` port.
#[derive(Clone)]
pub struct DieselLedgerRecordRepository {
    pool: DbPool,
}

impl DieselLedgerRecordRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LedgerRecordRepositoryError {
    map_basic_pool_error(error, LedgerRecordRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LedgerRecordRepositoryError {
    map_basic_diesel_error(
        error,
        LedgerRecordRepositoryError::query,
        LedgerRecordRepositoryError::connection,
    )
}

fn corrupt_row(table: &'static str, id: uuid::Uuid, reason: String) -> LedgerRecordRepositoryError {
    error!(table, record_id = %id, %reason, "stored ledger record failed to decode");
    LedgerRecordRepositoryError::query(format!("stored {table} row {id} is invalid"))
}

fn post_to_record(row: BloodPostRow) -> Result<DonationRecord, LedgerRecordRepositoryError> {
    let content = PostContent::new(&row.content)
        .map_err(|err| corrupt_row("blood_posts", row.id, err.to_string()))?;
    Ok(DonationRecord {
        id: RecordId::from_uuid(row.id),
        donor_id: UserId::from_uuid(row.user_id),
        blood_bank_id: BloodBankId::from_uuid(row.blood_bank_id),
        content,
        created_at: row.created_at,
    })
}

fn request_to_record(row: BloodRequestRow) -> Result<RequestRecord, LedgerRecordRepositoryError> {
    let blood_type = row
        .blood_type_needed
        .parse::<BloodType>()
        .map_err(|err| corrupt_row("blood_requests", row.id, err.to_string()))?;
    let location = Location::new(&row.location_needed)
        .map_err(|err| corrupt_row("blood_requests", row.id, err.to_string()))?;
    Ok(RequestRecord {
        id: RecordId::from_uuid(row.id),
        requester_id: UserId::from_uuid(row.user_id),
        blood_bank_id: BloodBankId::from_uuid(row.blood_bank_id),
        blood_type,
        location,
        fulfilled: row.fulfilled,
        created_at: row.created_at,
    })
}

#[async_trait]
impl LedgerRecordRepository for DieselLedgerRecordRepository {
    async fn list_donations(&self) -> Result<Vec<DonationRecord>, LedgerRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<BloodPostRow> = blood_posts::table
            .order_by(blood_posts::created_at.desc())
            .select(BloodPostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(post_to_record).collect()
    }

    async fn list_requests_at(
        &self,
        location: &Location,
    ) -> Result<Vec<RequestRecord>, LedgerRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<BloodRequestRow> = blood_requests::table
            .filter(blood_requests::location_needed.eq(location.as_ref()))
            .order_by(blood_requests::created_at.desc())
            .select(BloodRequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(request_to_record).collect()
    }
}
