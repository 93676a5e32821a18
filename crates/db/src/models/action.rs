//! Maintenance action entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use maintrack_core::types::{DbId, Timestamp};

/// A row from the `actions` table.
///
/// `action_type` is exposed as `type` on the wire.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Action {
    pub id: DbId,
    pub asset_id: DbId,
    #[serde(rename = "type")]
    pub action_type: String,
    pub severity: String,
    pub description: Option<String>,
    pub status: String,
    pub performed_by: Option<String>,
    pub performed_at: Timestamp,
    pub created_by: String,
    pub custom_fields: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a new action. `created_by` comes from the caller's
/// identity, not the payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAction {
    pub asset_id: DbId,
    #[serde(rename = "type")]
    pub action_type: String,
    pub severity: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[validate(length(max = 255))]
    pub performed_by: Option<String>,
    /// Defaults to now.
    pub performed_at: Option<Timestamp>,
    pub custom_fields: Option<serde_json::Value>,
}

/// DTO for updating an action. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAction {
    pub asset_id: Option<DbId>,
    #[serde(rename = "type")]
    pub action_type: Option<String>,
    pub severity: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[validate(length(max = 255))]
    pub performed_by: Option<String>,
    pub performed_at: Option<Timestamp>,
    pub custom_fields: Option<serde_json::Value>,
}
