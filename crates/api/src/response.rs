//! Success envelope.
//!
//! Every 2xx JSON body is `{"data": ...}`: entity rows, lists, login results
//! and projected report tables alike. Errors use the `{"error","code"}` shape
//! from [`crate::error`] instead.

use serde::Serialize;

/// ```ignore
/// Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
