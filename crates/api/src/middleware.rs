//! Identity-header middleware for the protected routes.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use estoque_auth::Session;
use estoque_core::UserId;

use crate::app::errors;
use crate::app::services::AppServices;

/// Header carrying the client-held identity.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct AuthState {
    pub services: Arc<AppServices>,
}

/// Resolve `x-user-id` into a `Session` extension or reject with 401.
pub async fn session_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(raw) = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "missing x-user-id header",
        );
    };

    let user_id: UserId = match raw.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "malformed user id");
        }
    };

    let identity = match state.services.users.find_by_id(user_id).await {
        Ok(Some(identity)) => identity,
        Ok(None) => {
            return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "unknown identity");
        }
        Err(e) => return errors::domain_error_to_response(e),
    };

    req.extensions_mut().insert(Session::authenticated(identity));
    next.run(req).await
}
