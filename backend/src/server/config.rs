//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use saveablood::domain::PasswordHasher;
use saveablood::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) hasher: PasswordHasher,
    pub(crate) seed_banks: bool,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration using the resolved session settings.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            hasher,
            seed_banks: false,
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// Without one the server keeps users, banks and ledger records in
    /// memory for the life of the process.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Create the default banks before serving requests.
    #[must_use]
    pub fn with_seed_banks(mut self, seed_banks: bool) -> Self {
        self.seed_banks = seed_banks;
        self
    }
}
