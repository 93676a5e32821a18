//! Failure record entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use maintrack_core::types::{DbId, Timestamp};

/// A row from the `failures` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Failure {
    pub id: DbId,
    pub asset_id: DbId,
    #[serde(rename = "type")]
    pub failure_type: String,
    pub description: Option<String>,
    pub severity: String,
    pub status: String,
    pub detected_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
    pub resolution_details: Option<String>,
    pub resolved_by: Option<String>,
    pub reported_by: Option<String>,
    pub custom_fields: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a new failure.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFailure {
    pub asset_id: DbId,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 255, message = "type must be 1-255 characters"))]
    pub failure_type: String,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    /// Defaults to now.
    pub detected_at: Option<Timestamp>,
    pub resolved_at: Option<Timestamp>,
    pub resolution_details: Option<String>,
    #[validate(length(max = 255))]
    pub resolved_by: Option<String>,
    #[validate(length(max = 255))]
    pub reported_by: Option<String>,
    pub custom_fields: Option<serde_json::Value>,
}

/// DTO for updating a failure. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFailure {
    pub asset_id: Option<DbId>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 255, message = "type must be 1-255 characters"))]
    pub failure_type: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub detected_at: Option<Timestamp>,
    pub resolved_at: Option<Timestamp>,
    pub resolution_details: Option<String>,
    #[validate(length(max = 255))]
    pub resolved_by: Option<String>,
    #[validate(length(max = 255))]
    pub reported_by: Option<String>,
    pub custom_fields: Option<serde_json::Value>,
}
