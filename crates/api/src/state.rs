use std::sync::Arc;

use maintrack_db::store::EntityStore;

use crate::config::ServerConfig;
use crate::storage::FileStorage;

/// Handler state. Cloned per request; every field is a pool or an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool used by the CRUD repositories.
    pub pool: maintrack_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Read-side store behind the report pipeline.
    pub store: Arc<dyn EntityStore>,
    /// Storage for uploaded document bytes.
    pub files: Arc<dyn FileStorage>,
}
