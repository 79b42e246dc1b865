//! Identity domain service: registration, login and donor search.
//!
//! Password hashing and verification run on tokio's blocking pool so a slow
//! key derivation never stalls the worker serving other requests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    DonorSearch, IdentityCommand, IdentityQuery, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, PasswordHash, PasswordHasher, Registration, User, UserId, Username,
};

/// Identity service implementing the identity driving ports.
#[derive(Clone)]
pub struct IdentityService<U> {
    users: Arc<U>,
    hasher: PasswordHasher,
}

impl<U> IdentityService<U> {
    pub fn new(users: Arc<U>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }
}

impl<U> IdentityService<U>
where
    U: UserRepository,
{
    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateUsername { username } => {
                Error::conflict("username already exists").with_details(json!({
                    "field": "username",
                    "value": username,
                    "code": "duplicate_username",
                }))
            }
        }
    }

    fn invalid_credentials() -> Error {
        Error::unauthorized("invalid username or password")
    }

    async fn hash_password(&self, password: &str) -> Result<PasswordHash, Error> {
        let hasher = self.hasher;
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))
    }

    async fn verify_password(hash: PasswordHash, password: &str) -> Result<bool, Error> {
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hash.verify(&password))
            .await
            .map_err(|err| Error::internal(format!("password check task failed: {err}")))?
            .map_err(|err| Error::internal(format!("stored password hash unusable: {err}")))
    }
}

#[async_trait]
impl<U> IdentityCommand for IdentityService<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let password_hash = self.hash_password(registration.password()).await?;
        let user = User::new(
            UserId::random(),
            registration.username().clone(),
            registration.blood_type(),
            registration.location().clone(),
            registration.role(),
        );

        self.users
            .insert(&user, &password_hash)
            .await
            .map_err(Self::map_user_error)?;
        info!(user_id = %user.id(), role = %user.role(), "user registered");
        Ok(user)
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Ok(username) = Username::new(credentials.username()) else {
            return Err(Self::invalid_credentials());
        };
        let Some(account) = self
            .users
            .find_account(&username)
            .await
            .map_err(Self::map_user_error)?
        else {
            warn!("login rejected: unknown username");
            return Err(Self::invalid_credentials());
        };

        let matches = Self::verify_password(account.password_hash, credentials.password()).await?;
        if !matches {
            warn!(user_id = %account.user.id(), "login rejected: wrong password");
            return Err(Self::invalid_credentials());
        }
        Ok(account.user)
    }
}

#[async_trait]
impl<U> IdentityQuery for IdentityService<U>
where
    U: UserRepository,
{
    async fn current_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users.find_by_id(id).await.map_err(Self::map_user_error)
    }

    async fn search_donors(&self, search: &DonorSearch) -> Result<Vec<User>, Error> {
        self.users
            .find_donors(search.blood_type, &search.location)
            .await
            .map_err(Self::map_user_error)
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
