//! Translation of driven-port failures into domain errors.

use serde_json::json;

use super::Error;
use super::ports::{IdentityStoreError, RepositoryError};

/// Map a repository failure onto the public error taxonomy.
///
/// Constraint violations are the caller's fault (a dangling reference or a
/// still-referenced row), so they surface as `invalid_request`.
pub(crate) fn map_repository_error(error: RepositoryError) -> Error {
    match error {
        RepositoryError::Connection { message } => {
            Error::service_unavailable(format!("repository unavailable: {message}"))
        }
        RepositoryError::Query { message } => {
            Error::internal(format!("repository error: {message}"))
        }
        RepositoryError::Constraint { .. } => {
            Error::invalid_request("request conflicts with related records")
                .with_details(json!({ "code": "constraint_violation" }))
        }
    }
}

pub(crate) fn map_identity_error(error: IdentityStoreError) -> Error {
    match error {
        IdentityStoreError::Connection { message } => {
            Error::service_unavailable(format!("identity store unavailable: {message}"))
        }
        IdentityStoreError::Duplicate { message } => {
            Error::conflict(format!("identity record already exists: {message}"))
        }
        IdentityStoreError::Query { message } | IdentityStoreError::Missing { message } => {
            Error::internal(format!("identity store error: {message}"))
        }
    }
}

/// `not_found` error naming the entity and id.
pub(crate) fn not_found(entity: &str, id: impl std::fmt::Display) -> Error {
    Error::not_found(format!("{entity} {id} not found"))
}
