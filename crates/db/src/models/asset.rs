//! Asset entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use maintrack_core::types::{DbId, Timestamp};

use crate::models::action::Action;
use crate::models::failure::Failure;

/// A row from the `assets` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub location: Option<String>,
    pub system: Option<String>,
    pub specifications: Option<String>,
    pub custom_fields: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An asset together with its full action and failure history.
#[derive(Debug, Clone, Serialize)]
pub struct AssetDetail {
    #[serde(flatten)]
    pub asset: Asset,
    pub actions: Vec<Action>,
    pub failures: Vec<Failure>,
}

/// DTO for creating a new asset.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAsset {
    #[validate(length(min = 1, max = 50, message = "code must be 1-50 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[validate(length(max = 255))]
    pub system: Option<String>,
    pub specifications: Option<String>,
    pub custom_fields: Option<serde_json::Value>,
}

/// DTO for updating an existing asset. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAsset {
    #[validate(length(min = 1, max = 50, message = "code must be 1-50 characters"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[validate(length(max = 255))]
    pub system: Option<String>,
    pub specifications: Option<String>,
    pub custom_fields: Option<serde_json::Value>,
}
