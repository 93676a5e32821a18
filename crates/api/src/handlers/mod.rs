//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! CRUD handlers delegate to the corresponding repository in `maintrack_db`;
//! report handlers go through [`crate::reports`]. Errors map via
//! [`AppError`](crate::error::AppError).

pub mod actions;
pub mod assets;
pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod failures;
pub mod reports;
pub mod users;

use maintrack_core::error::CoreError;
use maintrack_core::types::DbId;
use maintrack_db::repositories::AssetRepo;

use crate::error::{AppError, AppResult};

/// Verify that an asset exists, returning NotFound if it does not.
pub(crate) async fn ensure_asset_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<()> {
    if !AssetRepo::exists(pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Asset", id)));
    }
    Ok(())
}
