use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::Utc;

use estoque_auth::Session;
use estoque_core::ProductId;
use estoque_export::{export_filename, to_spreadsheet};
use estoque_inventory::{ProductDraft, ProductForm, ProductRecord, filter_snapshot};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/export", get(export_products))
        .route("/stats", get(product_stats))
        .route("/bulk", post(bulk_import))
        .route("/resolve/:codigo_pa", get(resolve_product))
        .route("/:id", delete(delete_product))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<Session>,
    Json(form): Json<ProductForm>,
) -> axum::response::Response {
    let owner = match session.require() {
        Ok(identity) => identity.id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.repository.create(form, owner).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<Session>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    let owner = match session.require() {
        Ok(identity) => identity.id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match fetch_snapshot(&services, owner, &query).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let actor = match session.require() {
        Ok(identity) => identity.clone(),
        Err(e) => return errors::domain_error_to_response(e),
    };

    let id: ProductId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.repository.delete(&actor, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn resolve_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<Session>,
    Path(codigo_pa): Path<String>,
) -> axum::response::Response {
    if let Err(e) = session.require() {
        return errors::domain_error_to_response(e);
    }

    match services.resolver.resolve(&codigo_pa).await {
        Ok(hit) => Json(dto::ResolveResponse::from_lookup(hit)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn bulk_import(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<Session>,
    Json(drafts): Json<Vec<ProductDraft>>,
) -> axum::response::Response {
    let actor = match session.require() {
        Ok(identity) => identity.id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.importer.bulk_import(actor, drafts).await {
        Ok(report) => Json(dto::ImportResponse {
            inserted: report.inserted,
        })
        .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn product_stats(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<Session>,
) -> axum::response::Response {
    if let Err(e) = session.require() {
        return errors::domain_error_to_response(e);
    }

    match services.repository.stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn export_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<Session>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    let owner = match session.require() {
        Ok(identity) => identity.id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let rows = match fetch_snapshot(&services, owner, &query).await {
        Ok(rows) => rows,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let names = match services.users.usernames().await {
        Ok(names) => names,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let bytes = match to_spreadsheet(&rows, |id| names.get(&id).cloned()) {
        Ok(bytes) => bytes,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let filename = export_filename(&query.range(), Utc::now().date_naive());
    (
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// Owner-scoped snapshot with the free-text filter applied in memory.
async fn fetch_snapshot(
    services: &AppServices,
    owner: estoque_core::UserId,
    query: &dto::ListQuery,
) -> estoque_core::DomainResult<Vec<ProductRecord>> {
    let rows = services.repository.list(owner, &query.range()).await?;
    Ok(match query.q.as_deref() {
        Some(term) if !term.trim().is_empty() => filter_snapshot(&rows, term)
            .into_iter()
            .cloned()
            .collect(),
        _ => rows,
    })
}
