//! Ports over the `products` and `barcodes` tables.
//!
//! Implementations live in `estoque-infra` (in-memory for tests/dev,
//! Postgres for production). The ports assume the store guarantees
//! durability and atomicity of each individual call, nothing across calls.

use chrono::{DateTime, Utc};

use estoque_core::{DomainResult, ProductId, UserId};

use crate::product::{BarcodeRef, ProductRecord};
use crate::repository::DateRange;
use crate::stats::InventoryStats;

/// Port over the `products` table.
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, record: ProductRecord) -> DomainResult<ProductRecord>;

    /// All-or-nothing batch insert; returns the number of rows written.
    async fn insert_batch(&self, records: Vec<ProductRecord>) -> DomainResult<u64>;

    /// Global (not owner-scoped) lookup by exact PA code, most recent
    /// `created_at` first.
    async fn find_latest_by_pa(&self, codigo_pa: &str) -> DomainResult<Option<ProductRecord>>;

    /// Owner-scoped listing, optionally bounded to a calendar-date range on
    /// `created_at` (inclusive both sides), ordered `created_at` descending.
    async fn list_by_owner(
        &self,
        owner: UserId,
        range: &DateRange,
    ) -> DomainResult<Vec<ProductRecord>>;

    async fn get(&self, id: ProductId) -> DomainResult<Option<ProductRecord>>;

    /// Remove the row; `Ok(false)` when it did not exist.
    async fn delete(&self, id: ProductId) -> DomainResult<bool>;

    /// Table-wide counters relative to `now`; spans every owner.
    async fn stats(&self, now: DateTime<Utc>) -> DomainResult<InventoryStats>;
}

/// Port over the read-only `barcodes` lookup table.
#[async_trait::async_trait]
pub trait BarcodeStore: Send + Sync {
    /// Exact match on the reference row's PA code.
    async fn find_by_pa(&self, codigo_pa: &str) -> DomainResult<Option<BarcodeRef>>;
}
