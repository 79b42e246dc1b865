//! PostgreSQL-backed `BloodBankRepository` implementation using Diesel ORM.
//!
//! Each ledger mutation runs in its own transaction: the bank row is locked
//! with `SELECT ... FOR UPDATE`, the domain rule is applied to the loaded
//! counters, the counters are written back and the matching `blood_posts` or
//! `blood_requests` row is inserted before commit. A failed insert rolls the
//! counter change back. Concurrent mutations of the same bank serialise on
//! the row lock while other banks proceed independently.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::error;
use uuid::Uuid;

use crate::domain::ports::{BloodBankRepository, BloodBankRepositoryError};
use crate::domain::{
    BankSeed, BloodBank, BloodBankId, BloodType, DonationRecord, Inventory, Location,
    RequestDraft, RequestRecord,
};

use super::error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{BloodBankRow, BloodPostRow, BloodRequestRow, InventoryUpdate, NewBloodBankRow};
use super::pool::{DbPool, PoolError};
use super::schema::{blood_banks, blood_posts, blood_requests};

/// Diesel-backed implementation of the `BloodBankRepository` port.
#[derive(Clone)]
pub struct DieselBloodBankRepository {
    pool: DbPool,
}

impl DieselBloodBankRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BloodBankRepositoryError {
    map_basic_pool_error(error, BloodBankRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BloodBankRepositoryError {
    map_basic_diesel_error(
        error,
        BloodBankRepositoryError::query,
        BloodBankRepositoryError::connection,
    )
}

fn row_to_bank(row: BloodBankRow) -> Result<BloodBank, BloodBankRepositoryError> {
    let inventory = Inventory::from_columns(row.counters()).map_err(|err| {
        error!(bank_id = %row.id, error = %err, "stored inventory is invalid");
        BloodBankRepositoryError::inventory(err.to_string())
    })?;
    let location = Location::new(&row.location).map_err(|err| {
        error!(bank_id = %row.id, error = %err, "stored bank location is invalid");
        BloodBankRepositoryError::query(format!("stored bank {} is invalid", row.id))
    })?;
    Ok(BloodBank::new(
        BloodBankId::from_uuid(row.id),
        row.name,
        location,
        inventory,
    ))
}

fn donation_row(record: &DonationRecord) -> BloodPostRow {
    BloodPostRow {
        id: *record.id.as_uuid(),
        user_id: *record.donor_id.as_uuid(),
        blood_bank_id: *record.blood_bank_id.as_uuid(),
        content: record.content.as_ref().to_owned(),
        created_at: record.created_at,
    }
}

fn request_row(record: &RequestRecord) -> BloodRequestRow {
    BloodRequestRow {
        id: *record.id.as_uuid(),
        user_id: *record.requester_id.as_uuid(),
        blood_bank_id: *record.blood_bank_id.as_uuid(),
        blood_type_needed: record.blood_type.label().to_owned(),
        location_needed: record.location.as_ref().to_owned(),
        fulfilled: record.fulfilled,
        created_at: record.created_at,
    }
}

/// Errors raised inside the mutation transaction.
///
/// Diesel errors roll the transaction back through `From`; domain failures
/// are carried out unchanged after the rollback.
enum MutationFailure {
    Diesel(diesel::result::Error),
    Repository(BloodBankRepositoryError),
}

impl From<diesel::result::Error> for MutationFailure {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

impl From<BloodBankRepositoryError> for MutationFailure {
    fn from(value: BloodBankRepositoryError) -> Self {
        Self::Repository(value)
    }
}

impl From<MutationFailure> for BloodBankRepositoryError {
    fn from(value: MutationFailure) -> Self {
        match value {
            MutationFailure::Diesel(err) => map_diesel_error(err),
            MutationFailure::Repository(err) => err,
        }
    }
}

/// Load and row-lock a bank inside the current transaction.
async fn lock_bank(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> Result<Option<BloodBank>, MutationFailure> {
    let row = blood_banks::table
        .filter(blood_banks::id.eq(id))
        .select(BloodBankRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()?;
    Ok(row.map(row_to_bank).transpose()?)
}

async fn store_inventory(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    inventory: &Inventory,
    updated_at: DateTime<Utc>,
) -> Result<(), MutationFailure> {
    diesel::update(blood_banks::table.filter(blood_banks::id.eq(id)))
        .set(InventoryUpdate::from_counters(inventory.to_columns(), updated_at))
        .execute(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl BloodBankRepository for DieselBloodBankRepository {
    async fn find_by_id(
        &self,
        id: &BloodBankId,
    ) -> Result<Option<BloodBank>, BloodBankRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<BloodBankRow> = blood_banks::table
            .filter(blood_banks::id.eq(id.as_uuid()))
            .select(BloodBankRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_bank).transpose()
    }

    async fn list(&self) -> Result<Vec<BloodBank>, BloodBankRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<BloodBankRow> = blood_banks::table
            .order_by(blood_banks::name)
            .select(BloodBankRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_bank).collect()
    }

    async fn commit_donation(
        &self,
        blood_type: BloodType,
        record: &DonationRecord,
    ) -> Result<Option<u32>, BloodBankRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let bank_uuid = *record.blood_bank_id.as_uuid();
        let row = donation_row(record);
        let updated_at = record.created_at;

        let units = conn
            .transaction::<_, MutationFailure, _>(|conn| {
                async move {
                    let Some(bank) = lock_bank(conn, bank_uuid).await? else {
                        return Ok(None);
                    };
                    let mut inventory = *bank.inventory();
                    let units = inventory.donate(blood_type).map_err(|err| {
                        BloodBankRepositoryError::inventory(err.to_string())
                    })?;

                    store_inventory(conn, bank_uuid, &inventory, updated_at).await?;
                    diesel::insert_into(blood_posts::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    Ok(Some(units))
                }
                .scope_boxed()
            })
            .await?;

        Ok(units)
    }

    async fn commit_request(
        &self,
        draft: &RequestDraft,
    ) -> Result<RequestRecord, BloodBankRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let bank_uuid = *draft.blood_bank_id.as_uuid();

        let record = conn
            .transaction::<_, MutationFailure, _>(|conn| {
                async move {
                    let record = match lock_bank(conn, bank_uuid).await? {
                        Some(bank) => {
                            let mut inventory = *bank.inventory();
                            let fulfilment = inventory.request(draft.blood_type);
                            store_inventory(conn, bank_uuid, &inventory, draft.created_at)
                                .await?;
                            draft.adjudicated(fulfilment, bank.location().clone())
                        }
                        None => draft.unmatched(),
                    };
                    diesel::insert_into(blood_requests::table)
                        .values(&request_row(&record))
                        .execute(conn)
                        .await?;
                    Ok(record)
                }
                .scope_boxed()
            })
            .await?;

        Ok(record)
    }

    async fn seed(&self, seeds: &[BankSeed]) -> Result<(), BloodBankRepositoryError> {
        if seeds.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NewBloodBankRow<'_>> = seeds
            .iter()
            .map(|seed| NewBloodBankRow {
                id: Uuid::new_v4(),
                name: seed.name,
                location: seed.location,
            })
            .collect();

        diesel::insert_into(blood_banks::table)
            .values(&rows)
            .on_conflict(blood_banks::name)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
