//! Shared Diesel error mapping for the discovery repositories.
//!
//! Every repository port exposes `Connection` and `Query` variants; these
//! helpers route pool and Diesel failures onto those constructors and log the
//! underlying cause at debug level.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure onto the port's connection error.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(error.into_message())
}

/// Map a Diesel failure onto the port's query or connection error.
///
/// Closed connections are reported as connection failures; everything else is
/// a query failure carrying the database message.
pub(crate) fn map_diesel_error<E>(
    error: diesel::result::Error,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            error = %error,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => query(info.message().to_owned()),
        other => query(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error routing.
    use super::*;
    use crate::domain::ports::SubCategoryRepositoryError;
    use rstest::rstest;

    fn map(error: diesel::result::Error) -> SubCategoryRepositoryError {
        map_diesel_error(
            error,
            SubCategoryRepositoryError::query,
            SubCategoryRepositoryError::connection,
        )
    }

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let mapped = map_pool_error(
            PoolError::checkout("timed out"),
            SubCategoryRepositoryError::connection,
        );
        assert_eq!(mapped, SubCategoryRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn not_found_becomes_query_error() {
        assert_eq!(
            map(diesel::result::Error::NotFound),
            SubCategoryRepositoryError::query("record not found")
        );
    }

    #[rstest]
    fn rollback_becomes_query_error() {
        let mapped = map(diesel::result::Error::RollbackTransaction);
        assert!(matches!(mapped, SubCategoryRepositoryError::Query { .. }));
    }
}
