//! Service wiring: domain components over either store backend.

use std::sync::Arc;

use sqlx::PgPool;

use estoque_auth::{CredentialAdapter, UserStore};
use estoque_core::DomainResult;
use estoque_infra::{
    MemoryBarcodeStore, MemoryProductStore, MemoryUserStore, PgBarcodeStore, PgProductStore,
    PgUserStore, ensure_schema,
};
use estoque_inventory::{
    BarcodeStore, BulkImporter, ProductRepository, ProductResolver, ProductStore,
};

/// Everything the handlers need, built once at startup.
pub struct AppServices {
    pub users: Arc<dyn UserStore>,
    pub credentials: CredentialAdapter,
    pub repository: ProductRepository,
    pub resolver: ProductResolver,
    pub importer: BulkImporter,
}

impl AppServices {
    pub fn from_stores(
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
        barcodes: Arc<dyn BarcodeStore>,
    ) -> Self {
        Self {
            credentials: CredentialAdapter::new(users.clone()),
            repository: ProductRepository::new(products.clone()),
            resolver: ProductResolver::new(barcodes, products.clone()),
            importer: BulkImporter::new(users.clone(), products),
            users,
        }
    }

    /// Volatile in-memory backend (dev and tests).
    pub fn memory() -> Self {
        Self::from_stores(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryProductStore::new()),
            Arc::new(MemoryBarcodeStore::default()),
        )
    }

    /// Postgres backend; bootstraps the schema idempotently.
    pub async fn postgres(pool: PgPool) -> DomainResult<Self> {
        ensure_schema(&pool).await?;
        Ok(Self::from_stores(
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgProductStore::new(pool.clone())),
            Arc::new(PgBarcodeStore::new(pool)),
        ))
    }
}
