//! HTTP-level integration tests for the asset, action, failure, document
//! and dashboard endpoints against a real database.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{
    body_bytes, body_json, delete_auth, get, get_auth, post_json_auth, post_multipart_auth,
    put_json_auth, token_for, Part,
};
use maintrack_core::deletion::AssetDeletePolicy;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn admin() -> String {
    token_for(1, "admin")
}

fn manager() -> String {
    token_for(2, "manager")
}

fn technician() -> String {
    token_for(3, "technician")
}

fn viewer() -> String {
    token_for(4, "viewer")
}

async fn create_asset(pool: &PgPool, code: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/assets",
        &manager(),
        json!({"code": code, "name": format!("Asset {code}"), "location": "Hall B"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn create_action(pool: &PgPool, asset_id: i64, performed_at: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/actions",
        &technician(),
        json!({"asset_id": asset_id, "type": "inspection", "performed_at": performed_at}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn create_failure(pool: &PgPool, asset_id: i64, detected_at: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/failures",
        &viewer(),
        json!({"asset_id": asset_id, "type": "Leak", "severity": "high", "detected_at": detected_at}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_and_get_asset(pool: PgPool) {
    let id = create_asset(&pool, "PMP-01").await;
    create_action(&pool, id, "2024-03-05T08:00:00Z").await;
    create_failure(&pool, id, "2024-03-06T08:00:00Z").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/assets/{id}"), &viewer()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["code"], "PMP-01");
    assert_eq!(data["actions"].as_array().unwrap().len(), 1);
    assert_eq!(data["failures"][0]["type"], "Leak");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_asset_routes_require_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/assets").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_viewer_cannot_create_asset(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/assets",
        &viewer(),
        json!({"code": "X-1", "name": "Nope"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_asset_code_returns_409(pool: PgPool) {
    create_asset(&pool, "DUP-1").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/assets",
        &manager(),
        json!({"code": "DUP-1", "name": "Again"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_blank_asset_code_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/assets",
        &manager(),
        json!({"code": "", "name": "Nameless code"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_asset_is_partial(pool: PgPool) {
    let id = create_asset(&pool, "UPD-1").await;

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/assets/{id}"),
        &manager(),
        json!({"name": "Renamed"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Renamed");
    assert_eq!(json["data"]["code"], "UPD-1");
    assert_eq!(json["data"]["location"], "Hall B");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_restrict_policy_refuses_asset_with_children(pool: PgPool) {
    let id = create_asset(&pool, "RST-1").await;
    create_failure(&pool, id, "2024-03-06T08:00:00Z").await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/assets/{id}"), &admin()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/assets/{id}"), &viewer()).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_cascade_policy_removes_children(pool: PgPool) {
    let id = create_asset(&pool, "CSC-1").await;
    let action_id = create_action(&pool, id, "2024-03-05T08:00:00Z").await;
    create_failure(&pool, id, "2024-03-06T08:00:00Z").await;

    let config = maintrack_api::config::ServerConfig {
        asset_delete_policy: AssetDeletePolicy::Cascade,
        ..common::test_config()
    };
    let app = common::build_test_app_with(pool.clone(), config);
    let response = delete_auth(app, &format!("/api/v1/assets/{id}"), &admin()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/assets/{id}"), &viewer()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/actions/{action_id}"), &viewer()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_only_admin_deletes_assets(pool: PgPool) {
    let id = create_asset(&pool, "DEL-1").await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/assets/{id}"), &manager()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/assets/{id}"), &admin()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_asset_list_counts_within_window(pool: PgPool) {
    let id = create_asset(&pool, "CNT-1").await;
    create_failure(&pool, id, "2024-03-18T10:00:00Z").await;
    create_failure(&pool, id, "2024-03-19T00:00:00Z").await;
    create_action(&pool, id, "2024-03-20T23:59:59.999Z").await;

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        "/api/v1/assets?include_counts=true&start_date=2024-03-19&end_date=2024-03-20",
        &viewer(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let row = &json["data"][0];
    assert_eq!(row["code"], "CNT-1");
    assert_eq!(row["failures_count"], 1);
    assert_eq!(row["actions_count"], 1);
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_action_records_creator_and_defaults(pool: PgPool) {
    let asset_id = create_asset(&pool, "ACT-1").await;
    let action_id = create_action(&pool, asset_id, "2024-03-05T08:00:00Z").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/actions/{action_id}"), &viewer()).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["created_by"], "technician-user");
    assert_eq!(json["data"]["severity"], "medium");
    assert_eq!(json["data"]["status"], "Planned");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_action_for_missing_asset_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/actions",
        &technician(),
        json!({"asset_id": 999999, "type": "repair"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_action_type_is_rejected(pool: PgPool) {
    let asset_id = create_asset(&pool, "ACT-2").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/actions",
        &technician(),
        json!({"asset_id": asset_id, "type": "polishing"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_viewer_cannot_record_actions(pool: PgPool) {
    let asset_id = create_asset(&pool, "ACT-3").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/actions",
        &viewer(),
        json!({"asset_id": asset_id, "type": "repair"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_actions_by_asset_filters_on_dates(pool: PgPool) {
    let asset_id = create_asset(&pool, "ACT-4").await;
    create_action(&pool, asset_id, "2024-03-01T08:00:00Z").await;
    create_action(&pool, asset_id, "2024-03-10T08:00:00Z").await;

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/actions/asset/{asset_id}?start_date=2024-03-05"),
        &viewer(),
    )
    .await;
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["performed_at"], "2024-03-10T08:00:00Z");
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_failure_update_and_delete(pool: PgPool) {
    let asset_id = create_asset(&pool, "FLR-1").await;
    let id = create_failure(&pool, asset_id, "2024-03-06T08:00:00Z").await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/failures/{id}"),
        &viewer(),
        json!({"status": "Resolved", "resolved_by": "sam"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "Resolved");
    assert_eq!(json["data"]["type"], "Leak");

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/failures/{id}"), &viewer()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/failures/{id}"), &viewer()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_document_upload_list_and_delete(pool: PgPool) {
    let asset_id = create_asset(&pool, "DOC-1").await;
    let config = common::test_config();
    let upload_dir = config.upload_dir.clone();
    let asset_field = asset_id.to_string();

    let app = common::build_test_app_with(pool.clone(), config.clone());
    let response = post_multipart_auth(
        app,
        "/api/v1/documents/upload",
        &technician(),
        &[
            Part::Text("asset_id", &asset_field),
            Part::File {
                field: "document",
                file_name: "manual.pdf",
                content_type: "application/pdf",
                bytes: b"%PDF-1.4 pump manual",
            },
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let doc = &json["data"];
    assert_eq!(doc["name"], "manual.pdf");
    assert_eq!(doc["type"], "other");
    let public_path = doc["file_path"].as_str().unwrap().to_string();
    assert!(public_path.starts_with("/uploads/documents/document-"));
    let doc_id = doc["id"].as_i64().unwrap();

    // The stored file is served back under its public path.
    let app = common::build_test_app_with(pool.clone(), config.clone());
    let response = get(app, &public_path).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"%PDF-1.4 pump manual");

    let app = common::build_test_app_with(pool.clone(), config.clone());
    let response = get_auth(app, &format!("/api/v1/documents/asset/{asset_id}"), &viewer()).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let app = common::build_test_app_with(pool, config);
    let response = delete_auth(app, &format!("/api/v1/documents/{doc_id}"), &technician()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let file_name = public_path.rsplit('/').next().unwrap();
    assert!(!upload_dir.join("documents").join(file_name).exists());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_document_upload_rejects_disallowed_type(pool: PgPool) {
    let asset_id = create_asset(&pool, "DOC-2").await;
    let asset_field = asset_id.to_string();

    let app = common::build_test_app(pool);
    let response = post_multipart_auth(
        app,
        "/api/v1/documents/upload",
        &technician(),
        &[
            Part::Text("asset_id", &asset_field),
            Part::File {
                field: "document",
                file_name: "bundle.zip",
                content_type: "application/zip",
                bytes: b"PK",
            },
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_document_upload_requires_file(pool: PgPool) {
    let asset_id = create_asset(&pool, "DOC-3").await;
    let asset_field = asset_id.to_string();

    let app = common::build_test_app(pool);
    let response = post_multipart_auth(
        app,
        "/api/v1/documents/upload",
        &technician(),
        &[Part::Text("asset_id", &asset_field)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Dashboard and reports over Postgres
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_dashboard_summary(pool: PgPool) {
    let a = create_asset(&pool, "DSH-1").await;
    create_asset(&pool, "DSH-2").await;
    create_action(&pool, a, "2024-03-05T08:00:00Z").await;
    let f = create_failure(&pool, a, "2024-03-06T08:00:00Z").await;
    create_failure(&pool, a, "2024-03-07T08:00:00Z").await;

    let app = common::build_test_app(pool.clone());
    put_json_auth(
        app,
        &format!("/api/v1/failures/{f}"),
        &viewer(),
        json!({"status": "Closed"}),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/dashboard/summary", &viewer()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["total_assets"], 2);
    assert_eq!(data["total_actions"], 1);
    assert_eq!(data["total_failures"], 2);
    assert_eq!(data["unresolved_failures"], 1);
    assert_eq!(data["actions_by_type"][0]["label"], "inspection");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_failures_report_over_postgres(pool: PgPool) {
    let id = create_asset(&pool, "RPT-1").await;
    create_failure(&pool, id, "2024-03-18T10:00:00Z").await;
    create_failure(&pool, id, "2024-03-19T10:00:00Z").await;

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/reports?kind=failures_by_asset&asset_id={id}&start=2024-03-19&end=2024-03-20"),
        &viewer(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let rows = json["data"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["asset_code"], "RPT-1");
    assert_eq!(rows[0]["detected_at_formatted"], "2024-03-19 10:00:00");
}
