//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod action_repo;
pub mod asset_repo;
pub mod dashboard_repo;
pub mod document_repo;
pub mod failure_repo;
pub mod user_repo;

pub use action_repo::ActionRepo;
pub use asset_repo::AssetRepo;
pub use dashboard_repo::DashboardRepo;
pub use document_repo::DocumentRepo;
pub use failure_repo::FailureRepo;
pub use user_repo::UserRepo;
