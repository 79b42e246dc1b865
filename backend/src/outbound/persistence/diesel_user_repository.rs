//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::error;

use crate::domain::ports::{UserAccount, UserPersistenceError, UserRepository};
use crate::domain::{BloodType, Location, PasswordHash, Role, User, UserId, Username};

use super::error_mapping::{is_unique_violation, map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const USERNAME_CONSTRAINT: &str = "users_username_key";

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn decode_row(row: &UserRow) -> Result<UserAccount, String> {
    let username = Username::new(&row.username).map_err(|err| err.to_string())?;
    let blood_type = row
        .blood_type
        .parse::<BloodType>()
        .map_err(|err| err.to_string())?;
    let location = Location::new(&row.location).map_err(|err| err.to_string())?;
    let role = row.role.parse::<Role>().map_err(|err| err.to_string())?;
    let password_hash =
        PasswordHash::parse(row.password_hash.as_str()).map_err(|err| err.to_string())?;
    Ok(UserAccount {
        user: User::new(UserId::from_uuid(row.id), username, blood_type, location, role),
        password_hash,
    })
}

/// Values are validated on insert, so a row that fails to decode is corrupt
/// data: it is logged and surfaced as a query error.
fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    decode_row(&row).map_err(|reason| {
        error!(user_id = %row.id, %reason, "stored user row failed to decode");
        UserPersistenceError::query(format!("stored user {} is invalid", row.id))
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            username: user.username().as_ref(),
            password_hash: password_hash.as_str(),
            blood_type: user.blood_type().label(),
            location: user.location().as_ref(),
            role: user.role().as_str(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err, USERNAME_CONSTRAINT) {
                    UserPersistenceError::duplicate_username(user.username().as_ref())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account)
            .transpose()
            .map(|account| account.map(|account| account.user))
    }

    async fn find_account(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account).transpose()
    }

    async fn find_donors(
        &self,
        blood_type: BloodType,
        location: &Location,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(users::role.eq(Role::Donor.as_str()))
            .filter(users::blood_type.eq(blood_type.label()))
            .filter(users::location.eq(location.as_ref()))
            .order_by(users::username)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| row_to_account(row).map(|account| account.user))
            .collect()
    }
}
