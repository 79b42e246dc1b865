//! Embedded schema migrations applied at start-up.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations from the `backend/migrations` directory.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("failed to connect for migrations: {0}")]
    Connect(#[from] diesel::ConnectionError),
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
    #[error("migration task panicked or was cancelled: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Apply pending migrations on a blocking thread.
///
/// Diesel's migration harness needs a synchronous connection, so this opens a
/// short-lived `PgConnection` separate from the async pool.
pub async fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || -> Result<usize, MigrationError> {
        let mut conn = PgConnection::establish(&url)?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| MigrationError::Apply {
                message: err.to_string(),
            })?;
        for version in &applied {
            info!(%version, "applied migration");
        }
        Ok(applied.len())
    })
    .await?
}
