use std::sync::Arc;

use axum::{Json, Router, extract::Extension, http::StatusCode, response::IntoResponse, routing::post};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CredentialsRequest>,
) -> axum::response::Response {
    match services.credentials.register(&body.username, &body.pin).await {
        Ok(identity) => (
            StatusCode::CREATED,
            Json(dto::IdentityResponse::from(identity)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CredentialsRequest>,
) -> axum::response::Response {
    match services
        .credentials
        .authenticate(&body.username, &body.pin)
        .await
    {
        Ok(identity) => Json(dto::IdentityResponse::from(identity)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
