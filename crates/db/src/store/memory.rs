use async_trait::async_trait;
use maintrack_core::date_filter::DateFilter;
use maintrack_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;

use super::{ChildKind, ChildQuery, EntityStore, StoreError};
use crate::models::action::Action;
use crate::models::asset::Asset;
use crate::models::failure::Failure;

#[derive(Default)]
struct Tables {
    assets: Vec<Asset>,
    actions: Vec<Action>,
    failures: Vec<Failure>,
    /// When set, every call fails with [`StoreError::Unavailable`].
    outage: Option<String>,
}

impl Tables {
    fn check(&self) -> Result<(), StoreError> {
        match &self.outage {
            Some(reason) => Err(StoreError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

/// In-process [`EntityStore`].
///
/// Rows are supplied up front; ordering and filtering follow [`PgStore`]
/// semantics.
///
/// [`PgStore`]: super::PgStore
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(assets: Vec<Asset>, actions: Vec<Action>, failures: Vec<Failure>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                assets,
                actions,
                failures,
                outage: None,
            }),
        }
    }

    /// Make every subsequent call fail as unavailable (`Some`) or recover
    /// (`None`).
    pub async fn set_outage(&self, reason: Option<String>) {
        self.tables.write().await.outage = reason;
    }
}

fn matches(asset_id: DbId, ts: Timestamp, query: &ChildQuery) -> bool {
    query.asset_id.map_or(true, |id| id == asset_id) && query.filter.contains(ts)
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.tables.read().await.check()
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, StoreError> {
        let tables = self.tables.read().await;
        tables.check()?;
        let mut assets = tables.assets.clone();
        assets.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(assets)
    }

    async fn get_asset(&self, id: DbId) -> Result<Option<Asset>, StoreError> {
        let tables = self.tables.read().await;
        tables.check()?;
        Ok(tables.assets.iter().find(|a| a.id == id).cloned())
    }

    async fn list_actions(&self, query: &ChildQuery) -> Result<Vec<Action>, StoreError> {
        let tables = self.tables.read().await;
        tables.check()?;
        let mut actions: Vec<Action> = tables
            .actions
            .iter()
            .filter(|a| matches(a.asset_id, a.performed_at, query))
            .cloned()
            .collect();
        actions.sort_by(|a, b| (b.performed_at, b.id).cmp(&(a.performed_at, a.id)));
        Ok(actions)
    }

    async fn list_failures(&self, query: &ChildQuery) -> Result<Vec<Failure>, StoreError> {
        let tables = self.tables.read().await;
        tables.check()?;
        let mut failures: Vec<Failure> = tables
            .failures
            .iter()
            .filter(|f| matches(f.asset_id, f.detected_at, query))
            .cloned()
            .collect();
        failures.sort_by(|a, b| (b.detected_at, b.id).cmp(&(a.detected_at, a.id)));
        Ok(failures)
    }

    async fn count(
        &self,
        kind: ChildKind,
        asset_id: DbId,
        filter: &DateFilter,
    ) -> Result<i64, StoreError> {
        let tables = self.tables.read().await;
        tables.check()?;
        let query = ChildQuery::for_asset(asset_id, *filter);
        let count = match kind {
            ChildKind::Action => tables
                .actions
                .iter()
                .filter(|a| matches(a.asset_id, a.performed_at, &query))
                .count(),
            ChildKind::Failure => tables
                .failures
                .iter()
                .filter(|f| matches(f.asset_id, f.detected_at, &query))
                .count(),
        };
        Ok(count as i64)
    }
}
