//! HTTP error mapping.
//!
//! Every failure leaves the server as `{"error": <message>, "code": <CODE>}`.
//! Internal details (SQL text, I/O errors, store connection strings) are
//! logged and replaced with a fixed message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use maintrack_core::error::CoreError;
use maintrack_db::store::StoreError;
use serde_json::json;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A CRUD repository call failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The report-side store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Malformed request that never reached domain validation, such as a
    /// multipart body without its file part.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}

/// Status, machine code and client-facing message of one error response.
struct Failure {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl Failure {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            INTERNAL_MESSAGE,
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let failure = match &self {
            AppError::Core(core) => core_failure(core),
            AppError::Database(err) | AppError::Store(StoreError::Database(err)) => {
                sqlx_failure(err)
            }
            AppError::Store(StoreError::Unavailable(reason)) => {
                tracing::warn!(%reason, "Entity store unavailable");
                Failure::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORE_UNAVAILABLE",
                    "The data store is temporarily unavailable",
                )
            }
            AppError::BadRequest(msg) => {
                Failure::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                Failure::internal()
            }
        };

        let body = json!({ "error": failure.message, "code": failure.code });
        (failure.status, Json(body)).into_response()
    }
}

fn core_failure(err: &CoreError) -> Failure {
    match err {
        CoreError::NotFound { entity, id } => Failure::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => {
            Failure::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        CoreError::Conflict(msg) => Failure::new(StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => {
            Failure::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
        }
        CoreError::Forbidden(msg) => Failure::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            Failure::internal()
        }
    }
}

/// Client-facing wording for the named unique constraints in the migrations.
fn unique_violation_message(constraint: &str) -> String {
    match constraint {
        "uq_assets_code" => "An asset with this code already exists".to_string(),
        "uq_users_username" => "Username is already taken".to_string(),
        "uq_users_email" => "Email is already registered".to_string(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

/// Postgres error classes that reach clients:
///
/// | SQLSTATE | Meaning               | Response |
/// |----------|-----------------------|----------|
/// | `23505`  | unique violation      | 409      |
/// | `23503`  | foreign key violation | 409      |
/// | `23514`  | check violation       | 400      |
///
/// `RowNotFound` is 404. Anything else is a sanitized 500.
fn sqlx_failure(err: &sqlx::Error) -> Failure {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return Failure::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found");
        }
        sqlx::Error::Database(db_err) => db_err,
        other => {
            tracing::error!(error = %other, "Database error");
            return Failure::internal();
        }
    };

    let constraint = db_err.constraint().unwrap_or("unknown");
    match db_err.code().as_deref() {
        Some("23505") => Failure::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            unique_violation_message(constraint),
        ),
        Some("23503") => Failure::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Row is still referenced: {constraint}"),
        ),
        Some("23514") => Failure::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Value rejected by constraint: {constraint}"),
        ),
        _ => {
            tracing::error!(error = %db_err, "Database error");
            Failure::internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_unique_constraints_get_readable_messages() {
        assert_eq!(
            unique_violation_message("uq_assets_code"),
            "An asset with this code already exists"
        );
        assert!(unique_violation_message("uq_other").contains("uq_other"));
    }
}
