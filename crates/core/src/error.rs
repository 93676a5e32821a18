//! Domain failures, independent of HTTP.
//!
//! The API layer maps each variant to a status code and an error `code`
//! string; nothing here knows about either.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No `entity` row has primary key `id`.
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: DbId },

    /// Input rejected before any store access.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The operation would violate a uniqueness or dependency rule, such as
    /// deleting an asset that still has actions under the restrict policy.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not authenticated: {0}")]
    Unauthorized(String),

    #[error("not permitted: {0}")]
    Forbidden(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
