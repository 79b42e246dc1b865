//! Driving port for ledger read models.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{BloodBank, BloodBankId, DonationRecord, Error, RequestRecord, User};

/// Dashboard read model: every donation post plus the requests recorded at
/// the viewer's location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user: User,
    pub donations: Vec<DonationRecord>,
    pub requests: Vec<RequestRecord>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// A consistent snapshot of one bank. Missing banks are `NotFound`.
    async fn inventory_snapshot(&self, bank_id: BloodBankId) -> Result<BloodBank, Error>;

    async fn list_banks(&self) -> Result<Vec<BloodBank>, Error>;

    async fn dashboard(&self, viewer: &User) -> Result<Dashboard, Error>;
}
