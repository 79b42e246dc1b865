//! Shared mapping from pool and Diesel failures to port error constructors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(super) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel errors into query/connection constructors.
///
/// Only closed connections count as connection failures; everything else,
/// including `NotFound`, is a query failure. Database messages are logged at
/// debug level and never forwarded, since they may echo row data.
pub(super) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Whether `error` is a unique constraint violation on `constraint`.
pub(super) fn is_unique_violation(error: &DieselError, constraint: &str) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info.constraint_name() == Some(constraint)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(&'static str),
        Connection(String),
    }

    #[rstest]
    #[case(DieselError::NotFound, Mapped::Query("record not found"))]
    #[case(DieselError::RollbackTransaction, Mapped::Query("database error"))]
    #[case(
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, Box::new(String::from("gone"))),
        Mapped::Connection("database connection error".to_owned())
    )]
    #[case(
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, Box::new(String::from("dup"))),
        Mapped::Query("database error")
    )]
    fn diesel_errors_map_to_categories(#[case] error: DieselError, #[case] expected: Mapped) {
        let mapped = map_basic_diesel_error(error, Mapped::Query, |message| {
            Mapped::Connection(message.to_owned())
        });
        assert_eq!(mapped, expected);
    }

    #[test]
    fn pool_errors_map_to_connection() {
        let mapped = map_basic_pool_error(PoolError::checkout("timed out"), Mapped::Connection);
        assert_eq!(mapped, Mapped::Connection("timed out".to_owned()));
    }

    #[test]
    fn unique_violation_requires_matching_constraint() {
        // String implements DatabaseErrorInformation with no constraint name.
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(String::from("duplicate key")),
        );
        assert!(!is_unique_violation(&error, "users_username_key"));
    }
}
