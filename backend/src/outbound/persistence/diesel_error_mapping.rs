//! Shared Diesel error mapping for the clinical repositories and the
//! identity store.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{IdentityStoreError, RepositoryError};

use super::pool::PoolError;

/// Coarse classification of a Diesel failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Connection,
    Unique,
    ForeignKey,
    Check,
    Query,
}

fn classify(error: &DieselError) -> Failure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => Failure::Connection,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => Failure::Unique,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            Failure::ForeignKey
        }
        DieselError::DatabaseError(
            DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation,
            _,
        ) => Failure::Check,
        _ => Failure::Query,
    }
}

fn pool_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Map pool failures for the clinical repositories.
pub(crate) fn map_pool_error(error: PoolError) -> RepositoryError {
    RepositoryError::connection(pool_message(error))
}

/// Map Diesel failures for the clinical repositories.
///
/// Every constraint violation becomes [`RepositoryError::Constraint`] so the
/// service layer can answer with a client error instead of a server fault.
pub(crate) fn map_diesel_error(error: DieselError) -> RepositoryError {
    match classify(&error) {
        Failure::Connection => RepositoryError::connection("database connection error"),
        Failure::Unique => RepositoryError::constraint("duplicate record"),
        Failure::ForeignKey => RepositoryError::constraint("related record missing or in use"),
        Failure::Check => RepositoryError::constraint("value rejected by the store"),
        Failure::Query => RepositoryError::query("database error"),
    }
}

/// Map pool failures for the identity store.
pub(crate) fn map_identity_pool_error(error: PoolError) -> IdentityStoreError {
    IdentityStoreError::connection(pool_message(error))
}

/// Map Diesel failures for the identity store.
pub(crate) fn map_identity_diesel_error(error: DieselError) -> IdentityStoreError {
    match classify(&error) {
        Failure::Connection => IdentityStoreError::connection("database connection error"),
        Failure::Unique => IdentityStoreError::duplicate("identity record already exists"),
        Failure::ForeignKey => IdentityStoreError::missing("referenced identity record"),
        Failure::Check | Failure::Query => IdentityStoreError::query("database error"),
    }
}
