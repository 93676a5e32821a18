//! Role gates for handlers.
//!
//! Each extractor authenticates through [`AuthUser`] and then checks the
//! caller's role against a minimum [`Role`]. A valid token with too little
//! privilege is 403; a missing or bad token is 401.
//!
//! | Extractor             | Minimum role |
//! |-----------------------|--------------|
//! | [`RequireAuth`]       | viewer       |
//! | [`RequireTechnician`] | technician   |
//! | [`RequireManager`]    | manager      |
//! | [`RequireAdmin`]      | admin        |

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use maintrack_core::error::CoreError;
use maintrack_core::roles::{has_at_least, Role};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require_role(
    parts: &mut Parts,
    state: &AppState,
    minimum: Role,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !has_at_least(&user.role, minimum) {
        tracing::debug!(
            user_id = user.user_id,
            role = %user.role,
            required = minimum.as_str(),
            "Role check failed",
        );
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "{} role or higher required",
            minimum.label()
        ))));
    }
    Ok(user)
}

/// Any authenticated user with a recognised role.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Viewer).await.map(Self)
    }
}

/// Users who record maintenance work: actions, failures, documents.
pub struct RequireTechnician(pub AuthUser);

impl FromRequestParts<AppState> for RequireTechnician {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Technician).await.map(Self)
    }
}

/// Users who maintain the asset register.
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Manager).await.map(Self)
    }
}

/// Administrators only.
///
/// ```ignore
/// async fn purge(RequireAdmin(admin): RequireAdmin) -> AppResult<StatusCode> {
///     Ok(StatusCode::NO_CONTENT)
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, Role::Admin).await.map(Self)
    }
}
