//! Driving port for identity reads: the session's user and donor search.

use async_trait::async_trait;

use crate::domain::{BloodType, Error, Location, User, UserId};

/// Exact-match donor search criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorSearch {
    pub blood_type: BloodType,
    pub location: Location,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityQuery: Send + Sync {
    /// Resolve the user bound to a session, if the account still exists.
    async fn current_user(&self, id: &UserId) -> Result<Option<User>, Error>;

    /// Donors with exactly the requested type at exactly the requested location.
    async fn search_donors(&self, search: &DonorSearch) -> Result<Vec<User>, Error>;
}
