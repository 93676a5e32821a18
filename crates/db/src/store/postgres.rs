use async_trait::async_trait;
use maintrack_core::date_filter::DateFilter;
use maintrack_core::types::DbId;
use sqlx::PgPool;

use super::{ChildKind, ChildQuery, EntityStore, StoreError};
use crate::models::action::Action;
use crate::models::asset::Asset;
use crate::models::failure::Failure;
use crate::repositories::{ActionRepo, AssetRepo, FailureRepo};

/// [`EntityStore`] backed by the Postgres repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, StoreError> {
        Ok(AssetRepo::list(&self.pool).await?)
    }

    async fn get_asset(&self, id: DbId) -> Result<Option<Asset>, StoreError> {
        Ok(AssetRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_actions(&self, query: &ChildQuery) -> Result<Vec<Action>, StoreError> {
        Ok(ActionRepo::list(&self.pool, query.asset_id, &query.filter).await?)
    }

    async fn list_failures(&self, query: &ChildQuery) -> Result<Vec<Failure>, StoreError> {
        Ok(FailureRepo::list(&self.pool, query.asset_id, &query.filter).await?)
    }

    async fn count(
        &self,
        kind: ChildKind,
        asset_id: DbId,
        filter: &DateFilter,
    ) -> Result<i64, StoreError> {
        let count = match kind {
            ChildKind::Action => ActionRepo::count(&self.pool, Some(asset_id), filter).await?,
            ChildKind::Failure => FailureRepo::count(&self.pool, Some(asset_id), filter).await?,
        };
        tracing::trace!(kind = ?kind, asset_id, count, "Counted children");
        Ok(count)
    }
}
