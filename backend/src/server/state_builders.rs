//! Builders wiring repositories into the services behind [`HttpState`].

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use saveablood::domain::ports::{
    BloodBankRepository, BloodBankRepositoryError, LedgerRecordRepository, UserRepository,
};
use saveablood::domain::{DEFAULT_BANKS, IdentityService, LedgerService, PasswordHasher};
use saveablood::inbound::http::state::HttpState;
use saveablood::outbound::memory::{InMemoryBloodBankRepository, InMemoryUserRepository};
use saveablood::outbound::persistence::{
    DbPool, DieselBloodBankRepository, DieselLedgerRecordRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Build the handler state from the configured storage, seeding the default
/// banks first when enabled.
///
/// # Errors
/// Returns the repository error when seeding fails.
pub(crate) async fn build_http_state(
    config: &ServerConfig,
) -> Result<HttpState, BloodBankRepositoryError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => {
            info!(storage = "postgres", "wiring ledger adapters");
            diesel_state(pool, config.hasher, clock, config.seed_banks).await
        }
        None => {
            info!(storage = "memory", "wiring ledger adapters");
            let banks = InMemoryBloodBankRepository::new();
            let records = banks.records();
            wire(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(banks),
                Arc::new(records),
                config.hasher,
                clock,
                config.seed_banks,
            )
            .await
        }
    }
}

async fn diesel_state(
    pool: &DbPool,
    hasher: PasswordHasher,
    clock: Arc<dyn Clock>,
    seed_banks: bool,
) -> Result<HttpState, BloodBankRepositoryError> {
    wire(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselBloodBankRepository::new(pool.clone())),
        Arc::new(DieselLedgerRecordRepository::new(pool.clone())),
        hasher,
        clock,
        seed_banks,
    )
    .await
}

async fn wire<U, B, R>(
    users: Arc<U>,
    banks: Arc<B>,
    records: Arc<R>,
    hasher: PasswordHasher,
    clock: Arc<dyn Clock>,
    seed_banks: bool,
) -> Result<HttpState, BloodBankRepositoryError>
where
    U: UserRepository + 'static,
    B: BloodBankRepository + 'static,
    R: LedgerRecordRepository + 'static,
{
    if seed_banks {
        banks.seed(&DEFAULT_BANKS).await?;
        info!(count = DEFAULT_BANKS.len(), "default blood banks seeded");
    }

    let identity = Arc::new(IdentityService::new(users, hasher));
    let ledger = Arc::new(LedgerService::new(banks, records, clock));
    Ok(HttpState::new(
        identity.clone(),
        identity,
        ledger.clone(),
        ledger,
    ))
}
