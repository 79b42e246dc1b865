//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{BloodType, Location, PasswordHash, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A user with the same username already exists.
        DuplicateUsername { username: String } => "username already exists: {username}",
    }
}

/// A user together with the credential hash used to authenticate them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub user: User,
    pub password_hash: PasswordHash,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `DuplicateUsername` if the name is taken.
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user and their credential hash by username.
    async fn find_account(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Donors with exactly `blood_type` registered at exactly `location`.
    async fn find_donors(
        &self,
        blood_type: BloodType,
        location: &Location,
    ) -> Result<Vec<User>, UserPersistenceError>;
}
