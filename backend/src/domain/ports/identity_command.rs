//! Driving port for registration and login.
//!
//! Inbound adapters call this port with validated input and receive the
//! user to bind to the session. Handler tests substitute a mock.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityCommand: Send + Sync {
    /// Create a new account. A taken username is an `ErrorCode::Conflict`.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;

    /// Check credentials. Unknown users and wrong passwords are both
    /// `ErrorCode::Unauthorized` so callers cannot probe for usernames.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}
