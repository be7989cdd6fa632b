//! Black-box tests over the full router with in-memory stores.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use estoque_api::app::{build_app, services::AppServices};

fn app() -> Router {
    build_app(Arc::new(AppServices::memory()))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_request_as(method: &str, uri: &str, user_id: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-user-id", user_id)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_as(uri: &str, user_id: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("x-user-id", user_id)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, req).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

/// Registers a user and returns their id string.
async fn register(app: &Router, username: &str, pin: &str) -> String {
    let (status, body) = send_json(
        app,
        json_request(
            "POST",
            "/auth/register",
            json!({ "username": username, "pin": pin }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

fn product_form(codigo_pa: &str) -> Value {
    json!({
        "codigo_pa": codigo_pa,
        "descricao": "Tinta Epóxi Azul",
        "quantidade": "12",
        "lote": "L-2024-07",
        "validade": "2026-05-01",
        "codigo_barras": "7891234567895",
    })
}

#[tokio::test]
async fn health_answers_ok() {
    let app = app();
    let (status, body) = send_json(&app, get_as("/health", "ignored")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_then_login_round_trip() {
    let app = app();
    let id = register(&app, "maria", "1234").await;

    let (status, body) = send_json(
        &app,
        json_request("POST", "/auth/login", json!({ "username": "maria", "pin": "1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_str().unwrap(), id);
    assert_eq!(body["username"], "maria");
    assert_eq!(body["is_master"], false);
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn wrong_pin_and_unknown_user_both_answer_401() {
    let app = app();
    register(&app, "maria", "1234").await;

    let (status, body) = send_json(
        &app,
        json_request("POST", "/auth/login", json!({ "username": "maria", "pin": "9999" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");

    let (status, body) = send_json(
        &app,
        json_request("POST", "/auth/login", json!({ "username": "nobody", "pin": "1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
async fn malformed_pin_is_rejected_at_registration() {
    let app = app();
    let (status, body) = send_json(
        &app,
        json_request("POST", "/auth/register", json!({ "username": "ana", "pin": "12a4" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn duplicate_username_answers_409() {
    let app = app();
    register(&app, "maria", "1234").await;

    let (status, body) = send_json(
        &app,
        json_request("POST", "/auth/register", json!({ "username": "  maria ", "pin": "5678" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate_username");
}

#[tokio::test]
async fn protected_routes_need_a_known_identity() {
    let app = app();

    let no_header = Request::builder()
        .method("GET")
        .uri("/products")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, no_header).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get_as("/products", "not-a-uuid")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let ghost = uuid::Uuid::now_v7().to_string();
    let (status, _) = send(&app, get_as("/products", &ghost)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn product_lifecycle_create_list_filter_delete() {
    let app = app();
    let user = register(&app, "maria", "1234").await;

    let (status, created) = send_json(
        &app,
        json_request_as("POST", "/products", &user, product_form("PA-100")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["codigo_pa"], "PA-100");
    assert_eq!(created["quantidade"], 12);
    let product_id = created["id"].as_str().unwrap().to_string();

    let (status, listed) = send_json(&app, get_as("/products", &user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Free-text filter over the snapshot.
    let (status, hits) = send_json(&app, get_as("/products?q=ep%C3%B3xi", &user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits.as_array().unwrap().len(), 1);

    let (status, misses) = send_json(&app, get_as("/products?q=verniz", &user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(misses.as_array().unwrap().len(), 0);

    let uri = format!("/products/{product_id}");
    let (status, _) = send(&app, json_request_as("DELETE", &uri, &user, Value::Null)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, json_request_as("DELETE", &uri, &user, Value::Null)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_is_scoped_to_the_caller() {
    let app = app();
    let maria = register(&app, "maria", "1234").await;
    let joao = register(&app, "joao", "5678").await;

    let (status, _) = send(
        &app,
        json_request_as("POST", "/products", &maria, product_form("PA-100")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, listed) = send_json(&app, get_as("/products", &joao)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn deleting_someone_elses_row_is_forbidden() {
    let app = app();
    let maria = register(&app, "maria", "1234").await;
    let joao = register(&app, "joao", "5678").await;

    let (status, created) = send_json(
        &app,
        json_request_as("POST", "/products", &maria, product_form("PA-100")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/products/{}", created["id"].as_str().unwrap());

    let (status, body) = send_json(&app, json_request_as("DELETE", &uri, &joao, Value::Null)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn invalid_product_form_answers_400() {
    let app = app();
    let user = register(&app, "maria", "1234").await;

    let (status, body) = send_json(
        &app,
        json_request_as(
            "POST",
            "/products",
            &user,
            json!({
                "codigo_pa": "PA-1",
                "descricao": "x",
                "quantidade": "-3",
                "lote": "L1",
                "validade": "2026-01-01",
                "codigo_barras": "",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn resolve_falls_back_to_the_latest_product_row() {
    let app = app();
    let user = register(&app, "maria", "1234").await;

    let (status, _) = send(
        &app,
        json_request_as("POST", "/products", &user, product_form("PA-100")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, hit) = send_json(&app, get_as("/products/resolve/PA-100", &user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hit["found"], true);
    assert_eq!(hit["descricao"], "Tinta Epóxi Azul");
    assert_eq!(hit["codigo_barras"], "7891234567895");

    let (status, miss) = send_json(&app, get_as("/products/resolve/PA-999", &user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(miss["found"], false);
}

#[tokio::test]
async fn bulk_import_requires_the_master_role() {
    let app = app();
    let user = register(&app, "maria", "1234").await;

    let rows = json!([{
        "codigo_pa": "PA-1",
        "descricao": "Tinta",
        "validade": "2026-01-01",
    }]);
    let (status, body) = send_json(
        &app,
        json_request_as("POST", "/products/bulk", &user, rows),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "unauthorized");

    // Nothing was written on the rejected path.
    let (status, listed) = send_json(&app, get_as("/products", &user)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn stats_reflect_the_whole_table() {
    let app = app();
    let maria = register(&app, "maria", "1234").await;
    let joao = register(&app, "joao", "5678").await;

    let no_header = Request::builder()
        .method("GET")
        .uri("/products/stats")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, no_header).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, empty) = send_json(&app, get_as("/products/stats", &maria)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["total_products"], 0);
    assert_eq!(empty["total_quantity"], 0);

    let (status, _) = send(
        &app,
        json_request_as("POST", "/products", &maria, product_form("PA-100")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // The counters are table-wide, so joao sees maria's row too.
    let (status, stats) = send_json(&app, get_as("/products/stats", &joao)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_products"], 1);
    assert_eq!(stats["total_quantity"], 12);
    assert_eq!(stats["recent_products"], 1);
}

#[tokio::test]
async fn export_streams_a_spreadsheet_attachment() {
    let app = app();
    let user = register(&app, "maria", "1234").await;

    let (status, _) = send(
        &app,
        json_request_as("POST", "/products", &user, product_form("PA-100")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get_as("/products/export?start=2020-01-01", &user))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"produtos_apos_"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    // XLSX is a zip container.
    assert_eq!(&body[..2], b"PK");
}
