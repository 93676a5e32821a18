//! Read-side entity store used by the report pipeline.
//!
//! [`EntityStore`] is object-safe and passed around as
//! `Arc<dyn EntityStore>`. [`PgStore`] delegates to the repositories;
//! [`MemoryStore`] keeps rows in process for tests and local runs.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use maintrack_core::date_filter::DateFilter;
use maintrack_core::types::DbId;

use crate::models::action::Action;
use crate::models::asset::Asset;
use crate::models::failure::Failure;

/// Errors surfaced by an [`EntityStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// The backing store cannot be reached right now.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(err.to_string())
            }
            sqlx::Error::Io(ref io) => StoreError::Unavailable(io.to_string()),
            other => StoreError::Database(other),
        }
    }
}

/// Child entity kinds counted per asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    Action,
    Failure,
}

/// Selector for child listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChildQuery {
    pub asset_id: Option<DbId>,
    pub filter: DateFilter,
}

impl ChildQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_asset(asset_id: DbId, filter: DateFilter) -> Self {
        Self {
            asset_id: Some(asset_id),
            filter,
        }
    }
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Cheap reachability probe for `/health`.
    async fn ping(&self) -> Result<(), StoreError>;

    /// All assets, newest first (`created_at DESC, id DESC`).
    async fn list_assets(&self) -> Result<Vec<Asset>, StoreError>;

    async fn get_asset(&self, id: DbId) -> Result<Option<Asset>, StoreError>;

    /// Actions matching `query`, ordered `performed_at DESC`.
    async fn list_actions(&self, query: &ChildQuery) -> Result<Vec<Action>, StoreError>;

    /// Failures matching `query`, ordered `detected_at DESC`.
    async fn list_failures(&self, query: &ChildQuery) -> Result<Vec<Failure>, StoreError>;

    /// Number of `kind` children of `asset_id` whose dated column satisfies
    /// `filter`.
    async fn count(
        &self,
        kind: ChildKind,
        asset_id: DbId,
        filter: &DateFilter,
    ) -> Result<i64, StoreError>;
}
